use std::process::ExitCode;

fn main() -> ExitCode {
    inistage_cli::run()
}
