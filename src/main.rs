// file: src/main.rs
// version: 1.0.0
// guid: 3e8b6c1f-0a94-4d27-85f3-b2c9e7a1d460

//! xitool - Main entry point

use clap::Parser;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;
use tokio::signal;
use tracing::warn;
use xitool::{cli, logging::init_logger};

fn main() {
    let cli = cli::Cli::parse();

    if let Err(e) = init_logger(cli.verbose, cli.quiet) {
        eprintln!("{}", e);
    }

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to start runtime: {}", e);
            std::process::exit(-1);
        }
    };

    let status = Arc::new(AtomicI32::new(0));
    let code = runtime.block_on(async {
        tokio::select! {
            code = cli::run(cli, status.clone()) => code,
            _ = interrupted() => {
                warn!("Interrupted, exiting");
                status.load(Ordering::SeqCst)
            }
        }
    });

    std::process::exit(code);
}

/// Resolves on Ctrl+C; never resolves if the handler cannot be installed
async fn interrupted() {
    if let Err(e) = signal::ctrl_c().await {
        warn!("Failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
}
