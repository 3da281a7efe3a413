pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod entities;
pub mod error;
pub mod lifecycle;
pub mod metrics;
pub mod migrator;
pub mod store;
pub mod telemetry;
pub mod validation;

pub use sea_orm;
