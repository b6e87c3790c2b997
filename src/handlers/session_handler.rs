use actix_session::Session;
use log::{error, warn};
use serde_json::Value;
use uuid::Uuid;

/// Resolve the key the settings store and in-flight guard use for this
/// request: the cookie session when present, an explicit `session_id`
/// supplied by the request otherwise, or a freshly minted id that is
/// written back into the cookie.
pub fn resolve_session_id(session: &Session, explicit: Option<&str>) -> String {
    if let Ok(Some(id)) = session.get::<String>("session_id") {
        return id;
    }
    if let Some(id) = explicit {
        if !id.is_empty() {
            warn!("No session_id cookie; using the id supplied by the request");
            return id.to_string();
        }
    }
    let id = Uuid::new_v4().to_string();
    if let Err(e) = session.insert("session_id", id.clone()) {
        error!("Failed to store session_id in cookie: {:?}", e);
    }
    id
}

pub fn explicit_session_id(body: &Value) -> Option<&str> {
    body.get("session_id").and_then(Value::as_str)
}
