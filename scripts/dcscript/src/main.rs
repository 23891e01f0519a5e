use clap::Parser;
use cmds::Cmd;

mod cmds;
mod util;

#[derive(Debug, Parser)]
#[command(about = "dcscript: developers' utilities for the desktop calendar")]
struct Cli {
    #[command(subcommand)]
    command: cmds::Commands,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    log::info!("{:?}", cli);
    cli.command.run()
}
