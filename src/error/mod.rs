//! Error types

mod types;

pub use types::{HandlerError, InvocationError};
