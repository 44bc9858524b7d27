//! HTTP handlers for resource CRUD and the service's fixed routes.

pub mod common;
pub mod resource;
pub use common::*;
