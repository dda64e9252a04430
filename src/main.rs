mod cli;
mod commands;
mod output;

use clap::Parser;
use mkimport::ImportError;
use output::CommandSummary;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = commands::dispatch(cli).await {
        report(&err);
        std::process::exit(1);
    }
}

/// ログ出力の初期化（`-v` 指定時は debug、それ以外は RUST_LOG か warn）
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn report(err: &ImportError) {
    match err {
        ImportError::Batch(errors) => {
            let summary = CommandSummary::failed(errors.len());
            eprintln!("{} {}", summary.prefix, summary.message);
            for nested in errors {
                eprintln!("  {nested}");
            }
        }
        other => eprintln!("{other}"),
    }
}
