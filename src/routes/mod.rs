use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers::{
    auth, bookings, buses, dashboard, maintenance, payments, routes as route_handlers, schedules,
    users,
};
use crate::middleware::auth::{auth_middleware, require_admin};
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    let bus_routes = Router::new()
        .route("/", get(buses::list_buses))
        .route("/", post(buses::create_bus))
        .route("/available", get(buses::available_buses))
        .route("/{id}", get(buses::get_bus))
        .route("/{id}", put(buses::update_bus))
        .route("/{id}", delete(buses::delete_bus))
        .route("/{id}/maintenance", get(maintenance::bus_maintenance));

    let route_routes = Router::new()
        .route("/", get(route_handlers::list_routes))
        .route("/", post(route_handlers::create_route))
        .route("/{id}", get(route_handlers::get_route))
        .route("/{id}", put(route_handlers::update_route))
        .route("/{id}", delete(route_handlers::delete_route));

    let schedule_routes = Router::new()
        .route("/", get(schedules::list_schedules))
        .route("/", post(schedules::create_schedule))
        .route("/date", get(schedules::schedules_by_date))
        .route("/date-range", get(schedules::schedules_by_date_range))
        .route("/route/{route_id}", get(schedules::schedules_by_route))
        .route("/driver/{driver_id}", get(schedules::schedules_by_driver))
        .route("/{id}", get(schedules::get_schedule))
        .route("/{id}", put(schedules::update_schedule))
        .route("/{id}", delete(schedules::delete_schedule))
        .route("/{id}/status", put(schedules::update_schedule_status));

    let booking_routes = Router::new()
        .route("/", get(bookings::list_bookings))
        .route("/", post(bookings::create_booking))
        .route("/payments", post(bookings::process_payment))
        .route("/date-range", get(bookings::bookings_by_date_range))
        .route("/reference/{reference}", get(bookings::booking_by_reference))
        .route("/schedule/{schedule_id}", get(bookings::bookings_by_schedule))
        .route("/{id}", get(bookings::get_booking))
        .route("/{id}", delete(bookings::delete_booking))
        .route("/{id}/status", put(bookings::update_booking_status))
        .route("/{id}/verify", put(bookings::verify_booking))
        .route("/{id}/noshow", put(bookings::mark_no_show));

    let payment_routes = Router::new()
        .route("/", get(payments::list_payments))
        .route("/booking/{booking_id}", get(payments::payment_by_booking))
        .route("/{id}", get(payments::get_payment))
        .route("/{id}", delete(payments::delete_payment))
        .route("/{id}/status", put(payments::update_payment_status));

    let maintenance_routes = Router::new()
        .route("/", post(maintenance::create_maintenance))
        .route("/{id}", delete(maintenance::delete_maintenance))
        .route("/{id}/status", put(maintenance::update_maintenance_status));

    let user_routes = Router::new()
        .route("/", get(users::list_users))
        .route("/", post(users::create_user))
        .route("/drivers", get(users::list_drivers))
        .route("/register-driver", post(users::register_driver))
        .route("/login-step1", post(auth::login_step1))
        .route("/verify-otp", post(auth::verify_otp))
        .route("/{id}", get(users::get_user))
        .route("/{id}", put(users::update_user))
        .route("/{id}", delete(users::delete_user));

    // Requires a valid token
    let me_routes = Router::new()
        .route("/me", get(users::current_user))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Requires a valid token with the admin role
    let admin_user_routes = Router::new()
        .route("/{id}/driverstatus", put(users::update_driver_status))
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let dashboard_routes = Router::new()
        .route("/stats", get(dashboard::stats))
        .route("/alerts", get(dashboard::alerts))
        .route("/latest-bookings", get(dashboard::latest_bookings));

    Router::new()
        .nest("/api/buses", bus_routes)
        .nest("/api/routes", route_routes)
        .nest("/api/schedules", schedule_routes)
        .nest("/api/bookings", booking_routes)
        .nest("/api/payments", payment_routes)
        .nest("/api/maintenance", maintenance_routes)
        .nest(
            "/api/users",
            user_routes.merge(me_routes).merge(admin_user_routes),
        )
        .nest("/api/dashboard", dashboard_routes)
        .with_state(state)
}
