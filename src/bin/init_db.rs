//! Creates the database schema before the server is started for the first time.

use notes_web::{config::Config, db};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("🔥 Invalid configuration: {}", err);
            std::process::exit(1);
        }
    };

    let result = match db::connect(&config.database_url).await {
        Ok(pool) => db::bootstrap(&pool).await,
        Err(err) => Err(err),
    };

    match result {
        Ok(()) => println!("Database initialized successfully."),
        Err(err) => {
            tracing::error!("🔥 Failed to initialize the database: {:?}", err);
            std::process::exit(1);
        }
    }
}
