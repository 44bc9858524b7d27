//! Routers: fixed routes and one CRUD router per resource.

mod common;
mod resource;
pub use common::common_routes;
pub use resource::resource_routes;
