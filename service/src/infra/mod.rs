//! Infrastructure layer.

pub mod backend;

pub use self::backend::{Auth, Authed, Backend, Error, Violation};
#[cfg(feature = "rest")]
pub use self::backend::{rest, Rest};
