pub mod config;
pub mod error;
pub mod service;
pub mod router;
pub mod middleware;
pub mod handlers;
pub mod db;
pub mod types;
pub mod views;

pub use error::ToolroomError;
pub use service::inventory::InventoryOps;
