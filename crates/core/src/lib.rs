pub mod config;
pub mod error;
pub mod job;

pub use config::Config;
pub use error::*;
pub use job::*;
