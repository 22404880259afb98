pub mod auth;

pub use auth::{AdminCredentials, RequireLogin};
