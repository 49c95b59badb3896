#![forbid(unsafe_code)]

pub mod catalog;
pub mod cli;
pub mod error;
pub mod player;

pub use cli::run_from_env;
pub use error::{DemoError, Result};
