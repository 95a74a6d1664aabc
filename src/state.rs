use anyhow::Context;
use chrono::{Local, NaiveDate, NaiveDateTime};
use std::sync::Arc;

use crate::{
    auth::AuthService,
    notification::NotificationService,
    statistics::StatisticsService,
    task::{TaskService, TaskStore},
    user::UserStore,
};

/// Source of the local wall-clock time that views and scans are computed against.
pub type Clock = Arc<dyn Fn() -> NaiveDateTime + Send + Sync>;

#[derive(Clone)]
pub struct AppState {
    pub task_service: TaskService,
    pub notification_service: NotificationService,
    pub statistics_service: StatisticsService,
    pub auth_service: AuthService,
    clock: Clock,
}

impl AppState {
    pub fn new(config: &Config, tasks: Arc<dyn TaskStore>, users: Arc<dyn UserStore>) -> Self {
        Self {
            task_service: TaskService::new(tasks.clone()),
            notification_service: NotificationService::new(tasks.clone()),
            statistics_service: StatisticsService::new(tasks),
            auth_service: AuthService::new(
                users,
                config.jwt_secret.clone(),
                config.session_hours,
            ),
            clock: Arc::new(|| Local::now().naive_local()),
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn now(&self) -> NaiveDateTime {
        (self.clock)()
    }

    pub fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

#[derive(Clone)]
pub struct Config {
    /// `None` runs on the in-memory stores.
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub session_hours: i64,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: std::env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
            database_max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .context("DATABASE_MAX_CONNECTIONS must be a number")?,
            jwt_secret: std::env::var("JWT_SECRET")
                .context("JWT_SECRET must be set")?,
            session_hours: std::env::var("SESSION_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()
                .context("SESSION_HOURS must be a number")?,
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("PORT must be a port number")?,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
