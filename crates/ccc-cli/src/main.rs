use ccc_cli::{cli, logging, run};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let matches = cli::build().get_matches();
    logging::init(matches.get_flag("log-json"));

    let mut stdout = std::io::stdout().lock();
    match run(&matches, &mut stdout).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "command failed");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
