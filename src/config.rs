pub fn init_logging() {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
}

pub const DEFAULT_API_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "llama2";
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful email assistant. Generate professional and concise email responses.";

use std::env;

const BIND_ADDR: &str = "127.0.0.1:8080";

pub fn bind_address() -> String {
    env::var("AI_DRAFT_BIND").unwrap_or_else(|_| BIND_ADDR.to_string())
}
