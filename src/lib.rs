//! Shelf API: REST CRUD over authors, books and food items backed by a relational store.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod migration;
pub mod model;
pub mod routes;
pub mod server;
pub mod service;
pub mod sql;
pub mod store;

pub use config::{load_from_env, Settings};
pub use error::{AppError, ConfigError};
pub use migration::sync_schema;
pub use server::{build_app, start};
pub use service::Collection;
pub use store::{Database, Store};
