pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod scope;
pub mod services;
pub mod store;

pub use config::Config;
pub use error::{AppError, Result};
pub use services::NotificationCenter;
