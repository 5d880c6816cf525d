use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use bookchat::core::config::Config;
use bookchat::core::query::{HttpQueryService, QueryService, SimulatedQueryService};
use bookchat::ui::chat_loop::run_chat;
use bookchat::utils::logging::LoggingState;

#[derive(Parser)]
#[command(name = "bookchat")]
#[command(version)]
#[command(about = "A terminal chat interface for the Physical AI & Humanoid Robotics book")]
#[command(
    long_about = "Bookchat is a full-screen terminal chat interface for asking questions \
about the Physical AI & Humanoid Robotics book. Without an endpoint it answers from a \
built-in simulated backend; point it at a retrieval backend with --endpoint.\n\n\
Controls:\n\
  Type              Enter your question in the input field\n\
  Enter             Send the question\n\
  Shift+Enter       Insert a new line\n\
  Up/Down/Mouse     Scroll through the transcript\n\
  Mouse drag        Select transcript text (shown above the input box)\n\
  Ctrl+C            Quit"
)]
struct Args {
    /// Base URL of the retrieval backend; queries are simulated when omitted
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Append the conversation to this file as it happens
    #[arg(short, long)]
    log: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Diagnostics go to stderr and stay silent unless RUST_LOG is set.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let endpoint = args.endpoint.or(config.endpoint);
    let log_file = args.log.or(config.log_file);

    let logging = match LoggingState::new(log_file) {
        Ok(logging) => logging,
        Err(e) => {
            eprintln!("Could not open log file: {e}");
            std::process::exit(1);
        }
    };

    let (service, backend_label): (Arc<dyn QueryService>, String) = match endpoint {
        Some(url) => (Arc::new(HttpQueryService::new(url.clone())), url),
        None => (Arc::new(SimulatedQueryService), "simulated".to_string()),
    };

    run_chat(service, backend_label, logging).await
}
