//! SolveHook - webhook-driven solver synthesis
//!
//! SolveHook accepts a job (requester email, shared secret, quiz URL) over HTTP,
//! asks a chat-completion model to write a standalone program that solves the
//! task on that page, stores the program in a single artifact slot and runs it
//! as a child process, logging what it printed.
//!
//! # Architecture
//!
//! - **commands**: CLI command implementations (serve, solve)
//! - **core**: Validator, prompt builder, synthesis client, artifact store,
//!   execution runner, pipeline, dispatcher and webhook server
//! - **models**: Data structures (config, job, execution results)
//! - **error**: Error types

pub mod commands;
pub mod core;
pub mod error;
pub mod models;

pub use error::{JobError, PipelineError, Result, SolveHookError};
