use clap::{Args, Subcommand};

mod show;

#[derive(Debug, Args)]
pub(crate) struct UsageCommand {
    #[command(subcommand)]
    command: UsageSubcommand,
}

#[derive(Debug, Subcommand)]
enum UsageSubcommand {
    /// Print usage totals for one discount
    Show(show::ShowUsageArgs),
}

pub(crate) async fn run(command: UsageCommand) -> Result<(), String> {
    match command.command {
        UsageSubcommand::Show(args) => show::run(args).await,
    }
}
