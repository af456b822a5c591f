use clap::{Parser, Subcommand};

mod db;
mod usage;

#[derive(Debug, Parser)]
#[command(name = "tessera-app", about = "Tessera discounts CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Db(db::DbCommand),
    Usage(usage::UsageCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Db(command) => db::run(command).await,
            Commands::Usage(command) => usage::run(command).await,
        }
    }
}
