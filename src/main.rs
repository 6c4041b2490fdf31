use std::process::ExitCode;

fn main() -> ExitCode {
    match staticmap::cli::run_with_args(std::env::args_os()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
