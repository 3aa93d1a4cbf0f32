use clap::Parser;
use tracing_subscriber::EnvFilter;

use snare::cli;
use snare::errors::SnareError;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(!cli.no_color)
        .init();

    let result = match cli.command {
        cli::Commands::Serve(args) => cli::serve::handle_serve(args).await,
        cli::Commands::List(args) => cli::list::handle_list(args).await,
        cli::Commands::Trigger(args) => cli::trigger::handle_trigger(args).await,
        cli::Commands::Validate(args) => cli::validate::handle_validate(args).await,
    };

    match result {
        Ok(()) => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            let exit_code = match &e {
                SnareError::Config(_) | SnareError::Yaml(_) => 2,
                SnareError::UnknownCase(_) => 3,
                SnareError::Overloaded(_) => 4,
                _ => 1,
            };
            std::process::exit(exit_code);
        }
    }
}
