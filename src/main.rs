use color_eyre::eyre::Result;
use dotenv::dotenv;
use nexusone_api::config::ApiConfig;
use nexusone_db::{create_pool, schema::initialize_database};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    let config = ApiConfig::from_env()?;

    let db_pool = create_pool(&config.database_url).await?;
    initialize_database(&db_pool).await?;

    nexusone_api::start_server(config, db_pool).await?;

    Ok(())
}
