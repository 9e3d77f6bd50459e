use std::process::ExitCode;

use clap::Parser;
use tokreport::cli::Cli;
use tokreport::types::TokreportError;

fn main() -> ExitCode {
    let cli = Cli::parse();
    tokreport::logging::init(cli.verbose);

    match cli.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            let code = e
                .downcast_ref::<TokreportError>()
                .map_or(1, TokreportError::exit_code);
            ExitCode::from(code)
        }
    }
}
