use clap::Parser;
use std::path::Path;

mod app;
mod catalog;
mod cli;
mod config;
mod semantic;
#[cfg(test)]
mod tests;
mod translate;
mod web;

use app::App;
use config::Config;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = cli::Args::parse();
    let mut config = Config::load();

    match args.command {
        cli::Command::Serve { port } => {
            let env_port = std::env::var("PORT").ok();
            config.port = web::resolve_port(port, env_port.as_deref(), config.port);

            let app = App::new(config)?;
            web::start_daemon(app);
            Ok(())
        }

        cli::Command::Suggest { query, catalog } => {
            let app = App::new(config)?;

            let products = catalog
                .map(|path| catalog::load_catalog(Path::new(&path)))
                .transpose()?;

            let suggestions = app.suggest(&query, products)?;
            println!("{}", serde_json::to_string_pretty(&suggestions)?);
            Ok(())
        }

        cli::Command::Nudge { summary } => {
            let app = App::new(config)?;
            let nudge = app.nudge(&summary)?;
            println!("{}", serde_json::to_string_pretty(&nudge)?);
            Ok(())
        }

        cli::Command::Translate { text } => {
            let app = App::new(config)?;
            let translation = app.translate(&text)?;
            println!("{translation}");
            Ok(())
        }
    }
}
