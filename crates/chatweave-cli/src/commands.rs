use super::args::{Cli, Commands};
use super::handlers;
use crate::config::Config;
use crate::telemetry;
use anyhow::Result;

pub fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    telemetry::init(cli.log_level, config.log_level);

    match cli.command {
        Commands::Merge {
            paths,
            format,
            output,
            pretty,
        } => handlers::merge::handle(
            &paths,
            config.format(format),
            config.output(output),
            config.pretty(pretty),
        ),

        Commands::Roots { paths, format } => handlers::roots::handle(&paths, config.format(format)),

        Commands::Providers => handlers::providers::list(),
    }
}
