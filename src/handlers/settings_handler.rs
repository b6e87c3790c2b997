use actix_session::Session;
use actix_web::{web, HttpResponse};
use log::info;
use serde_json::Value;

use crate::handlers::session_handler;
use crate::routes::app_state::AppState;

/// Returns the stored settings for the session, or the defaults when the
/// user never saved any.
pub async fn load_settings(
    data: web::Data<AppState>,
    session: Session,
    explicit: Option<String>,
) -> HttpResponse {
    let session_id = session_handler::resolve_session_id(&session, explicit.as_deref());
    let settings = data.settings.get(&session_id);
    HttpResponse::Ok().json(settings)
}

/// Applies the posted fields to the stored settings and echoes the result.
pub async fn save_settings(
    data: web::Data<AppState>,
    session: Session,
    req_body: web::Json<Value>,
) -> HttpResponse {
    let session_id =
        session_handler::resolve_session_id(&session, session_handler::explicit_session_id(&req_body));
    let updated = data.settings.update(&session_id, &req_body);
    info!(
        "Saved AI settings for session {} (provider {})",
        session_id,
        updated.provider.as_str()
    );
    HttpResponse::Ok().json(updated)
}
