//! HTTP handlers

mod auth;
mod health;

pub use auth::{login, logout, me, refresh};
pub use health::{health, ready};
