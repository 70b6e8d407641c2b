//! Request handlers.

pub mod health;
pub mod stream;

pub use health::healthcheck;
pub use stream::stream_shape;
