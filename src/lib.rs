pub mod auth;
pub mod db;
pub mod error;
pub mod middleware;
pub mod notification;
pub mod routes;
pub mod state;
pub mod statistics;
pub mod task;
pub mod user;

pub use error::{AppError, Result};
pub use routes::create_router;
pub use state::{AppState, Clock, Config};
