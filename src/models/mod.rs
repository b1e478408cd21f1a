pub mod config;
pub mod execution;
pub mod job;

pub use config::*;
pub use execution::*;
pub use job::*;
