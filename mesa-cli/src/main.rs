//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use mesa_cli::CliError;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::new().filter_or("MESA_LOG", "warn")).init();

    match mesa_cli::run() {
        Ok(()) => {}
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => report_and_exit(&err),
    }
}

#[expect(
    clippy::print_stderr,
    reason = "the binary reports fatal errors on stderr"
)]
fn report_and_exit(err: &CliError) -> ! {
    eprintln!("mesa: {err}");
    std::process::exit(1);
}
