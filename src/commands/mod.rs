pub mod serve;
pub mod solve;

pub use serve::*;
pub use solve::*;
