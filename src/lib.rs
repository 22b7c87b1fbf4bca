pub mod analyze;
pub mod cli;
pub mod config;
pub mod description;
pub mod dump;
pub mod error;
pub mod field;
pub mod filter;
pub mod forms;
pub mod matching;
pub mod normalize;
pub mod render;
pub mod selectors;
pub mod textract;

pub use error::{FormError, Result};
