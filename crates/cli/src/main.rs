use std::process::ExitCode;

fn main() -> ExitCode {
    canopy_cli::run()
}
