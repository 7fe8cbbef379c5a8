use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

mod backend;
mod config;
mod html;
mod report;
mod server;
mod session;
mod slots;
mod types;

#[derive(Parser, Debug)]
#[command(name = "appello")]
#[command(about = "Web front end for the student attendance tracker")]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Backend API base URL (overrides APPELLO_BACKEND_URL)
    #[arg(long, global = true)]
    backend_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the web server (default)
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8090")]
        port: u16,
    },
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level))
        .add_directive("hyper=warn".parse().unwrap())
        .add_directive("reqwest=warn".parse().unwrap());

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_max_level(Level::TRACE)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing(&args.log_level);

    let backend_url = config::backend_url(args.backend_url);
    let port = match args.command {
        // Default to serve if no command specified
        None => 8090,
        Some(Commands::Serve { port }) => port,
    };

    server::serve(port, &backend_url).await
}
