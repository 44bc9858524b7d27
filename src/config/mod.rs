//! Runtime settings: environment loading, typed settings, validation.

pub mod types;
pub mod loader;
pub mod validator;

pub use types::*;
pub use loader::*;
pub use validator::*;
