pub mod notifications;

pub use notifications::{register_routes, ApiResponse};
