use clap::Args;
use tessera::uuids::{DiscountId, StoreId};
use tessera_app::{
    database::{self, Db},
    domain::discounts::{DiscountCatalog, PgDiscountCatalog},
};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct ShowUsageArgs {
    /// Store the discount belongs to
    #[arg(long)]
    store: Uuid,

    /// Discount UUID
    #[arg(long)]
    discount: Uuid,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

pub(crate) async fn run(args: ShowUsageArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let catalog = PgDiscountCatalog::new(Db::new(pool));

    let summary = catalog
        .usage_summary(
            StoreId::from_uuid(args.store),
            DiscountId::from_uuid(args.discount),
        )
        .await
        .map_err(|error| format!("failed to load usage: {error}"))?;

    let json = serde_json::to_string_pretty(&summary)
        .map_err(|error| format!("failed to render usage: {error}"))?;

    println!("{json}");

    Ok(())
}
