use anyhow::Result;
use flutter_sweep::cli::Cli;
use flutter_sweep::logging;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logger(cli.verbose, cli.quiet);
    cli.run()
}
