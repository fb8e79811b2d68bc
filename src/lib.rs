#![doc = "The `taskshare` library crate."]
#![doc = ""]
#![doc = "Users register and log in with email and password, receive an HTTP-only session"]
#![doc = "cookie, and manage tasks that are private to them or shared read-only with every"]
#![doc = "authenticated user. The binary (`main.rs`) wires these modules to PostgreSQL."]

pub mod access;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;

pub use crate::error::AppError;
pub use crate::state::AppState;
