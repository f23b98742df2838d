use clap::Parser;
use lookback::cli::{Cli, run};
use lookback::log::init_logging;

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    run(cli)
}
