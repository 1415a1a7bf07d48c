use chatmark_cli::Cli;
use chatmark_cli::run_main;
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_main(cli)
}
