pub mod booking;
pub mod bus;
pub mod bus_maintenance;
pub mod payment;
pub mod route;
pub mod schedule;
pub mod user;
