//! Collection: generic CRUD over one entity type, and request body validation.

mod collection;
mod validation;
pub use collection::Collection;
pub use validation::{parse_body, RequestValidator};
