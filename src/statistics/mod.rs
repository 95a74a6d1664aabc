pub mod statistics_handlers;
pub mod statistics_service;

pub use statistics_handlers::get_statistics;
pub use statistics_service::{week_bounds, Statistics, StatisticsService};
