use color_eyre::eyre::Result;
use dotenv::dotenv;
use slotbook_api::config::ApiConfig;
use slotbook_db::{create_pool, schema::initialize_database};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenv().ok();

    let config = ApiConfig::from_env()?;
    slotbook_api::init_tracing(config.log_level)?;
    info!(
        addr = %config.server_addr(),
        max_connections = config.database_max_connections,
        "Starting slotbook"
    );

    let db_pool = create_pool(&config.database_url, config.database_max_connections).await?;
    initialize_database(&db_pool).await?;

    slotbook_api::start_server(config, db_pool).await
}
