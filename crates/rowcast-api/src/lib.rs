//! HTTP surface for Rowcast.
//!
//! One streaming `GET` endpoint serves every registered shape; the registry
//! binds endpoint names to `(descriptor, cursor source)` pairs, and the
//! handlers own the channel plumbing between the engine's streaming driver
//! and the actix response body.

pub mod handlers;
pub mod models;
pub mod registry;
pub mod routes;

pub use registry::{ShapeRegistry, StreamRegistration};
