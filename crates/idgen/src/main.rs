mod cli;
mod config;
mod run;

use anyhow::Result;
use cli::Command;

fn main() -> Result<()> {
    let cli = cli::parse();
    run::initialise_tracing();

    let config_path = cli.config.as_deref();
    match cli.command {
        Command::List(args) => run::list(args),
        Command::Schemes => run::schemes(),
        Command::Render(args) => run::render(args, run::load_config(config_path)?.as_ref()),
        Command::Animate(args) => run::animate(args, run::load_config(config_path)?.as_ref()),
        Command::Batch(args) => run::batch(args, run::load_config(config_path)?.as_ref()),
    }
}
