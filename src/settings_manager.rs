use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::models::user_settings::UserSettings;

/// Shared per-session settings store. Generation takes a snapshot via
/// `get`; writes go through `update` (last write wins).
#[derive(Clone)]
pub struct SettingsManager {
    settings: Arc<Mutex<HashMap<String, UserSettings>>>,
}

impl SettingsManager {
    pub fn new() -> Self {
        SettingsManager {
            settings: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Returns the stored settings for a session, or the defaults
    pub fn get(&self, session_id: &str) -> UserSettings {
        let settings = self.settings.lock().unwrap();
        settings.get(session_id).cloned().unwrap_or_default()
    }

    /// Inserts or replaces the settings for a session
    pub fn insert(&self, session_id: String, settings: UserSettings) {
        let mut map = self.settings.lock().unwrap();
        map.insert(session_id, settings);
    }

    /// Applies a settings form to the stored settings and returns the result
    pub fn update(&self, session_id: &str, form: &Value) -> UserSettings {
        let mut map = self.settings.lock().unwrap();
        let entry = map.entry(session_id.to_string()).or_default();
        entry.apply(form);
        entry.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user_settings::Provider;
    use serde_json::json;

    #[test]
    fn get_falls_back_to_defaults() {
        let manager = SettingsManager::new();
        assert_eq!(manager.get("nobody"), UserSettings::default());
    }

    #[test]
    fn update_persists_and_coerces() {
        let manager = SettingsManager::new();
        let updated = manager.update("alice", &json!({"provider": "totally-new", "model": "mistral"}));
        assert_eq!(updated.provider, Provider::Local);
        assert_eq!(updated.model, "mistral");

        let fetched = manager.get("alice");
        assert_eq!(fetched, updated);
        assert_eq!(manager.get("bob"), UserSettings::default());
    }
}
