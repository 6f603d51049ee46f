mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{command, Cli, Commands};
use meteocast::config::MeteocastConfig;
use std::env;

#[tokio::main]
async fn main() -> Result<()> {
    // Set RUST_LOG=info (or debug) to see progress.
    env_logger::init();
    configure_polars_display();
    let cli = Cli::parse();
    let config = MeteocastConfig::load_from(&cli.config)?;

    match cli.command {
        Commands::Forecast {
            kind,
            start,
            end,
            horizon,
            lag_policy,
            plot,
        } => {
            let (report, plots) =
                command::forecast(config, kind, start, end, horizon, lag_policy, plot).await?;
            println!("{report}");
            for path in plots {
                println!("Plot saved as `{}`", path.display());
            }
        }
        Commands::Map {
            theme,
            out,
            project,
        } => {
            let path = command::map(config, theme, out, project).await?;
            println!("Map saved as `{}`", path.display());
        }
    }

    Ok(())
}

fn configure_polars_display() {
    // show every column
    env::set_var("POLARS_FMT_MAX_COLS", "-1");
    // show every row of a day of hourly steps
    env::set_var("POLARS_FMT_MAX_ROWS", "48");
}
