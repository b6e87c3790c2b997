use actix_session::Session;
use actix_web::{post, web, Responder};
use serde_json::Value;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(ai_generate);
}

#[post("/ajax/ai_generate")]
async fn ai_generate(
    data: web::Data<crate::routes::app_state::AppState>,
    session: Session,
    req_body: web::Json<Value>,
) -> impl Responder {
    crate::handlers::generate_handler::handle_generate_request(data, session, req_body).await
}
