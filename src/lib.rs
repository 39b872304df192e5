pub mod config;
pub mod db;
pub mod email;
pub mod entities;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod otp;
pub mod routes;
pub mod utils;

use sea_orm::DatabaseConnection;

pub use config::Config;
pub use error::{AppError, AppResult};

use email::Mailer;
use otp::OtpStore;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Config,
    pub mailer: Mailer,
    pub otps: OtpStore,
}
