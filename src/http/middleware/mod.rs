//! Middleware attached to the shared router at construction time.

pub mod body;
pub mod headers;
