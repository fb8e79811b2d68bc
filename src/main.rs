use actix_web::{middleware::Logger, web, App, HttpServer};
use sqlx::PgPool;
use std::io;

use taskshare::{config::Config, routes, AppState};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env().map_err(|e| {
        log::error!("invalid configuration: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e)
    })?;

    let pool = PgPool::connect(&config.database_url).await.map_err(|e| {
        log::error!("failed to connect to database: {}", e);
        io::Error::new(io::ErrorKind::Other, e)
    })?;
    sqlx::migrate!("./migrations").run(&pool).await.map_err(|e| {
        log::error!("failed to run migrations: {}", e);
        io::Error::new(io::ErrorKind::Other, e)
    })?;

    let state = AppState::from_config(&config, pool)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
    let state = web::Data::new(state);

    log::info!(
        "starting taskshare at {} (sessions: {:?}, allowed origin: {})",
        config.server_url(),
        config.session_backend,
        config.allowed_origin
    );

    let allowed_origin = config.allowed_origin.clone();
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(routes::cors(&allowed_origin))
            .wrap(Logger::default())
            .configure(routes::config)
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
