//! Age and guardian policy.
//!
//! Pure functions: a patient requires a guardian when they are a minor, an
//! elder, or have a declared disability, checked in that order.

mod age;
mod guardian;

pub use age::*;
pub use guardian::*;
