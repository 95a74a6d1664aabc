pub mod auth_dto;
pub mod auth_handlers;
pub mod auth_service;
pub mod jwt;
pub mod password;

pub use auth_dto::{LoginForm, SignupForm, SignupRejected};
pub use auth_handlers::{login, logout, signup, SESSION_COOKIE};
pub use auth_service::{AuthService, SignupOutcome};
pub use jwt::{create_session_token, verify_session_token};
pub use password::{hash_password, verify_password};
