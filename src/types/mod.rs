//! Type definitions for tokreport

mod error;
mod report;
mod usage;

pub use error::*;
pub use report::*;
pub use usage::*;
