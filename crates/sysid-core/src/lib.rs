//! sysid-core: shared numeric foundation for the identification workspace.
//!
//! Contains:
//! - numeric (Real + tolerances + float helpers + sample spacing)
//! - error (shared error types)

pub mod error;
pub mod numeric;

pub use error::{CoreError, CoreResult};
pub use numeric::*;
