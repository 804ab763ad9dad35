use clap::Parser;
use migration::{Migrator, MigratorTrait};

mod cli;
mod commands;
mod error;
mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = cli::Cli::parse();
    let mut settings = settings::Settings::new(cli.config.as_deref())?;
    if let Some(database_url) = cli.database_url {
        settings.database_url = database_url;
    }
    if let Some(level) = cli.log_level {
        settings.log_level = level;
    }

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "clipit={level},engine={level}",
            level = settings.log_level
        ))
        .with_writer(std::io::stderr)
        .init();

    let db = connect_db(&settings.database_url).await?;
    let engine = engine::Engine::builder().database(db).build().await?;

    if let Err(err) = commands::run(&engine, cli.command).await {
        tracing::debug!("command failed: {err:?}");
        eprintln!("{err}");
        std::process::exit(1);
    }

    Ok(())
}

async fn connect_db(database_url: &str) -> error::Result<sea_orm::DatabaseConnection> {
    tracing::debug!("connecting to {database_url}");
    let database = sea_orm::Database::connect(database_url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
