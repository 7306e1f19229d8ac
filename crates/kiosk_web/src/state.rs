use std::sync::Arc;
use kiosk_storage::DashboardStore;

pub struct AppState {
    pub store: Arc<dyn DashboardStore>,
}
