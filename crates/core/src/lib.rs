// crates/core/src/lib.rs
//! Domain types and pure presentation logic for the Echo Break dashboard.
//!
//! Nothing in this crate touches the database or the network: aggregate rows
//! come in, human-readable records and declarative chart specs come out.

pub mod charts;
pub mod error;
pub mod fallback;
pub mod format;
pub mod types;

pub use charts::*;
pub use error::*;
pub use format::*;
pub use types::*;
