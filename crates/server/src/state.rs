use std::sync::Arc;

use models::clock::EventClock;
use notify::Notifier;
use sea_orm::DatabaseConnection;

/// Dependency-injected application state: both store connections, the
/// notification gateway, and the event clock. Cloned per request by axum.
#[derive(Clone)]
pub struct AppState {
    pub festival: DatabaseConnection,
    pub escaperoom: DatabaseConnection,
    pub notifier: Arc<Notifier>,
    pub clock: EventClock,
}
