use crate::in_flight::InFlightGuard;
use crate::services::llm_service::LlmGateway;
use crate::settings_manager::SettingsManager;

#[derive(Clone)]
pub struct AppState {
    pub settings: SettingsManager,
    pub gateway: LlmGateway,
    pub in_flight: InFlightGuard,
}
