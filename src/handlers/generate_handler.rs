use actix_session::Session;
use actix_web::{web, HttpResponse};
use log::{error, info, warn};
use serde_json::{json, Value};

use crate::handlers::session_handler;
use crate::in_flight::InFlightGuard;
use crate::models::generation::GenerationMode;
use crate::models::user_settings::UserSettings;
use crate::routes::app_state::AppState;
use crate::services::llm_service::GenerateBackend;
use crate::services::parser_service;

const REPLY_INSTRUCTION: &str = "Generate a professional reply to the following email:\n\n";

pub async fn handle_generate_request(
    data: web::Data<AppState>,
    session: Session,
    req_body: web::Json<Value>,
) -> HttpResponse {
    let session_id =
        session_handler::resolve_session_id(&session, session_handler::explicit_session_id(&req_body));
    let settings = data.settings.get(&session_id);

    let payload =
        process_request(&data.gateway, &data.in_flight, &session_id, &settings, &req_body).await;
    HttpResponse::Ok().json(payload)
}

/// Validate the request, run the generation, and shape the response
/// payload. The transport contract is always-200: failures come back as an
/// empty `ai_generated_text` plus a notice.
pub async fn process_request(
    backend: &dyn GenerateBackend,
    in_flight: &InFlightGuard,
    session_id: &str,
    settings: &UserSettings,
    req_body: &Value,
) -> Value {
    let user_prompt = match plan_user_prompt(req_body) {
        Ok(prompt) => prompt,
        Err(notice) => return failure_payload(notice),
    };

    if !in_flight.begin(session_id) {
        warn!("Rejected generation for session {}: one is already in flight", session_id);
        return failure_payload("AI generation already in progress");
    }

    info!("Dispatching generation for session {}", session_id);
    let result = backend
        .generate(settings, &settings.system_prompt, &user_prompt)
        .await;
    in_flight.finish(session_id);

    match result {
        Ok(text) => success_payload(&text, req_body),
        Err(e) => {
            error!("AI generation failed for session {}: {}", session_id, e);
            failure_payload(&format!("AI generation failed: {}", e))
        }
    }
}

/// Build the user prompt from the request, or return the rejection notice.
/// Reply mode wraps the quoted email context in a fixed instruction.
fn plan_user_prompt(req_body: &Value) -> Result<String, &'static str> {
    let mode = req_body
        .get("ai_mode")
        .and_then(Value::as_str)
        .and_then(GenerationMode::parse)
        .ok_or("Invalid request")?;

    match mode {
        GenerationMode::Prompt => {
            let prompt = req_body.get("ai_prompt").and_then(Value::as_str).unwrap_or("");
            if prompt.trim().is_empty() {
                return Err("Missing prompt or context");
            }
            Ok(prompt.to_string())
        }
        GenerationMode::Reply => {
            let context = req_body.get("ai_context").and_then(Value::as_str).unwrap_or("");
            if context.trim().is_empty() {
                return Err("Missing prompt or context");
            }
            Ok(format!("{}{}", REPLY_INSTRUCTION, context))
        }
    }
}

fn success_payload(text: &str, req_body: &Value) -> Value {
    let parsed = parser_service::parse(text);
    let current_subject = req_body
        .get("compose_subject")
        .and_then(Value::as_str)
        .unwrap_or("");
    let current_body = req_body
        .get("compose_body")
        .and_then(Value::as_str)
        .unwrap_or("");
    let merged = parser_service::merge_into_compose(&parsed, current_subject, current_body);

    json!({
        "ai_generated_text": text,
        "ai_subject": merged.subject,
        "ai_body": merged.body,
        "ai_cursor_pos": merged.cursor_pos,
    })
}

fn failure_payload(notice: &str) -> Value {
    json!({ "ai_generated_text": "", "notice": notice })
}
