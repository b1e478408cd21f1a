use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use solvehook::commands::{run_server, solve_once};
use solvehook::models::ConfigOverrides;

/// SolveHook - webhook that synthesizes and runs quiz solver programs
#[derive(Parser)]
#[command(name = "solvehook")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct OverrideArgs {
    /// Override the completion model
    #[arg(long)]
    model: Option<String>,

    /// Override the chat completions endpoint
    #[arg(long)]
    llm_url: Option<String>,

    /// Override the completion request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Override the program used to run the generated artifact
    #[arg(long)]
    interpreter: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the webhook server
    Serve {
        /// Address to bind
        #[arg(long, env = "HOST")]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long, env = "PORT")]
        port: Option<u16>,

        #[command(flatten)]
        overrides: OverrideArgs,
    },

    /// Synthesize and run a solver for one URL in the foreground
    Solve {
        /// Requester email passed to the generated program
        #[arg(long)]
        email: String,

        /// Quiz page URL
        #[arg(long)]
        url: String,

        #[command(flatten)]
        overrides: OverrideArgs,
    },
}

impl OverrideArgs {
    fn into_overrides(self, host: Option<String>, port: Option<u16>) -> ConfigOverrides {
        ConfigOverrides {
            host,
            port,
            model: self.model,
            llm_url: self.llm_url,
            timeout: self.timeout,
            interpreter: self.interpreter,
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Set up logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    let project_root = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("Error: cannot determine working directory: {}", e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Serve { host, port, overrides } => {
            run_server(&project_root, overrides.into_overrides(host, port)).await
        }

        Commands::Solve { email, url, overrides } => {
            match solve_once(&project_root, overrides.into_overrides(None, None), &email, &url).await {
                Ok(true) => Ok(()),
                Ok(false) => std::process::exit(1),
                Err(e) => Err(e),
            }
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
