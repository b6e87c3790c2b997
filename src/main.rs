use actix_files::Files;
use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::{cookie::Key, middleware::Logger, web, App, HttpServer};
use anyhow::Context;

use AiDraftAgent::config;
use AiDraftAgent::in_flight::InFlightGuard;
use AiDraftAgent::routes;
use AiDraftAgent::routes::app_state::AppState;
use AiDraftAgent::services::llm_service::LlmGateway;
use AiDraftAgent::settings_manager::SettingsManager;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    config::init_logging();

    let state = AppState {
        settings: SettingsManager::new(),
        gateway: LlmGateway::new().context("Failed to build the HTTP client")?,
        in_flight: InFlightGuard::new(),
    };
    let session_key = Key::generate();
    let addr = config::bind_address();

    log::info!("Starting server on http://{}", addr);
    HttpServer::new(move || {
        App::new()
            // Log incoming requests.
            .wrap(Logger::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), session_key.clone())
                    .cookie_secure(false)
                    .build(),
            )
            .app_data(web::Data::new(state.clone()))
            .configure(routes::generate_routes::init_routes)
            .configure(routes::settings_routes::init_routes)
            // Serve the compose page and its assets.
            .service(Files::new("/", "./static").index_file("index.html"))
    })
    .bind(addr.as_str())
    .with_context(|| format!("Failed to bind {}", addr))?
    .run()
    .await?;
    Ok(())
}
