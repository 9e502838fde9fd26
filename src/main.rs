use std::env;

use rent_or_sell::api::CommandError;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let raw_args: Vec<String> = env::args().collect();
    match raw_args.get(1).map(|s| s.as_str()) {
        Some("serve") => {
            let port = raw_args
                .get(2)
                .and_then(|s| s.parse::<u16>().ok())
                .unwrap_or(8080);
            if let Err(e) = rent_or_sell::api::run_http_server(port).await {
                tracing::error!("Server error: {e}");
                std::process::exit(1);
            }
        }
        Some("project") => {
            let args = std::iter::once("rent-or-sell project".to_string())
                .chain(raw_args.into_iter().skip(2));
            match rent_or_sell::api::run_project_command(args) {
                Ok(json) => println!("{json}"),
                Err(CommandError::Args(e)) => e.exit(),
                Err(e) => {
                    eprintln!("{e}");
                    std::process::exit(1);
                }
            }
        }
        _ => {
            eprintln!("Usage: rent-or-sell serve [port]");
            eprintln!("       rent-or-sell project [--flag value ...]");
            std::process::exit(1);
        }
    }
}
