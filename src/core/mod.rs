pub mod artifact;
pub mod config;
pub mod dispatcher;
pub mod executor;
pub mod extract;
pub mod pipeline;
pub mod prompts;
pub mod server;
pub mod synthesis;
pub mod validator;

pub use artifact::*;
pub use config::*;
pub use dispatcher::*;
pub use executor::*;
pub use extract::*;
pub use pipeline::*;
pub use prompts::*;
pub use server::*;
pub use synthesis::*;
pub use validator::*;
