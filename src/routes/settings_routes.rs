use std::collections::HashMap;

use actix_session::Session;
use actix_web::{get, post, web, Responder};
use serde_json::Value;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(ai_settings_load);
    cfg.service(ai_settings_save);
}

#[get("/ajax/ai_settings")]
async fn ai_settings_load(
    data: web::Data<crate::routes::app_state::AppState>,
    session: Session,
    query: web::Query<HashMap<String, String>>,
) -> impl Responder {
    let explicit = query.get("session_id").cloned();
    crate::handlers::settings_handler::load_settings(data, session, explicit).await
}

#[post("/ajax/ai_settings")]
async fn ai_settings_save(
    data: web::Data<crate::routes::app_state::AppState>,
    session: Session,
    req_body: web::Json<Value>,
) -> impl Responder {
    crate::handlers::settings_handler::save_settings(data, session, req_body).await
}
