use clap::Parser;
use openrpc_client_generator::cli::{Cli, Command};
use openrpc_client_generator::config::init_logging;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let Command::Generate(args) = cli.command;

    let settings = match args.settings() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    };
    init_logging(&settings.logging);
    settings.log_source();

    let report = match args.run(settings).await {
        Ok(report) => report,
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    };

    for outcome in &report.outcomes {
        if outcome.is_success() {
            println!("{outcome}");
        } else {
            eprintln!("{outcome}");
        }
    }
    if let Err(e) = report.into_result() {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}
