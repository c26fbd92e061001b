use clap::Parser;
use docquery::{cli, config, logging};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    if let Err(err) = config::init_config() {
        eprintln!("error: {err}");
        return ExitCode::FAILURE;
    }
    logging::init_tracing();

    match cli::run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
