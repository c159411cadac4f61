//! Command implementations.
//!
//! - [`build`] - bundle the entry into every declared output
//! - [`check`] - validate the descriptor without building

pub mod build;
pub mod check;
pub(crate) mod utils;

pub use build::execute as build_execute;
pub use check::execute as check_execute;
