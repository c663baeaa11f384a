pub mod aggregate;
pub mod cli;
pub mod error;
pub mod git;
pub mod hours;
pub mod model;
pub mod options;
pub mod parse;
pub mod rank;
pub mod util;

pub use error::{GrindError, Result};
