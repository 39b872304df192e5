use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "schedule_status")]
pub enum ScheduleStatus {
    #[sea_orm(string_value = "scheduled")]
    Scheduled,
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl ScheduleStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "scheduled" => Some(Self::Scheduled),
            "inprogress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "schedule")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub route_id: Uuid,
    pub bus_id: Uuid,
    pub driver_id: Uuid,
    pub departure_time: Time,
    pub trip_date: Date,
    /// Snapshot of the route price when the schedule was created or last updated.
    pub price: Decimal,
    pub status: ScheduleStatus,
    pub actual_departure_time: Option<DateTimeWithTimeZone>,
    pub actual_arrival_time: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    /// Actual departure/arrival values after moving this schedule to `next`.
    ///
    /// The departure timestamp is stamped the first time the schedule enters
    /// InProgress and the arrival timestamp the first time it enters
    /// Completed; once set, neither is ever overwritten, whatever path the
    /// status takes afterwards.
    pub fn stamped_times(
        &self,
        next: &ScheduleStatus,
        now: DateTimeWithTimeZone,
    ) -> (Option<DateTimeWithTimeZone>, Option<DateTimeWithTimeZone>) {
        let departure = match (next, self.actual_departure_time) {
            (ScheduleStatus::InProgress, None) => Some(now),
            (_, existing) => existing,
        };
        let arrival = match (next, self.actual_arrival_time) {
            (ScheduleStatus::Completed, None) => Some(now),
            (_, existing) => existing,
        };
        (departure, arrival)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::route::Entity",
        from = "Column::RouteId",
        to = "super::route::Column::Id"
    )]
    Route,
    #[sea_orm(
        belongs_to = "super::bus::Entity",
        from = "Column::BusId",
        to = "super::bus::Column::Id"
    )]
    Bus,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::DriverId",
        to = "super::user::Column::Id"
    )]
    Driver,
    #[sea_orm(has_many = "super::booking::Entity")]
    Bookings,
}

impl Related<super::route::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Route.def()
    }
}

impl Related<super::bus::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bus.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Driver.def()
    }
}

impl Related<super::booking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bookings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};

    fn schedule(status: ScheduleStatus) -> Model {
        Model {
            id: Uuid::new_v4(),
            route_id: Uuid::new_v4(),
            bus_id: Uuid::new_v4(),
            driver_id: Uuid::new_v4(),
            departure_time: NaiveTime::from_hms_opt(8, 30, 0).unwrap(),
            trip_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            price: Decimal::from(5000),
            status,
            actual_departure_time: None,
            actual_arrival_time: None,
            created_at: Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap().into(),
        }
    }

    #[test]
    fn first_in_progress_stamps_departure() {
        let s = schedule(ScheduleStatus::Scheduled);
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 8, 35, 0).unwrap().into();

        let (departure, arrival) = s.stamped_times(&ScheduleStatus::InProgress, now);
        assert_eq!(departure, Some(now));
        assert_eq!(arrival, None);
    }

    #[test]
    fn second_in_progress_keeps_original_departure() {
        let first = Utc.with_ymd_and_hms(2025, 6, 1, 8, 35, 0).unwrap().into();
        let mut s = schedule(ScheduleStatus::InProgress);
        s.actual_departure_time = Some(first);

        let later = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap().into();
        let (departure, _) = s.stamped_times(&ScheduleStatus::InProgress, later);
        assert_eq!(departure, Some(first));
    }

    #[test]
    fn first_completed_stamps_arrival_once() {
        let departed = Utc.with_ymd_and_hms(2025, 6, 1, 8, 35, 0).unwrap().into();
        let mut s = schedule(ScheduleStatus::InProgress);
        s.actual_departure_time = Some(departed);

        let arrived = Utc.with_ymd_and_hms(2025, 6, 1, 11, 10, 0).unwrap().into();
        let (departure, arrival) = s.stamped_times(&ScheduleStatus::Completed, arrived);
        assert_eq!(departure, Some(departed));
        assert_eq!(arrival, Some(arrived));

        s.actual_arrival_time = Some(arrived);
        let later = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap().into();
        let (_, arrival_again) = s.stamped_times(&ScheduleStatus::Completed, later);
        assert_eq!(arrival_again, Some(arrived));
    }

    #[test]
    fn cancelling_stamps_nothing() {
        let s = schedule(ScheduleStatus::Scheduled);
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 8, 35, 0).unwrap().into();

        let (departure, arrival) = s.stamped_times(&ScheduleStatus::Cancelled, now);
        assert_eq!(departure, None);
        assert_eq!(arrival, None);
    }
}
