//! Command implementations for the form-analyzer CLI

mod analyze;
mod fields;
mod misc;

pub use analyze::*;
pub use fields::*;
pub use misc::*;
