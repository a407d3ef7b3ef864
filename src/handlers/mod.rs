//! HTTP handlers for the CRUD resources.

pub mod resource;
pub use resource::*;
