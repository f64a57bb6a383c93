use std::env;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use vertiline::cli::commands::Cli;
use vertiline::cli::handlers;

fn init_tracing() {
    let filter = EnvFilter::try_from_env("VERTILINE_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "vertiline=debug,info"
        } else {
            "vertiline=info,warn"
        })
    });

    let format = env::var("VERTILINE_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    // stdout carries command output, so logs go to stderr
    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    if let Err(e) = handlers::dispatch(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
