use std::sync::Arc;

use storage::Database;

use crate::clients::blob::ObjectStore;
use crate::clients::mailer::Mailer;
use crate::config::Config;

/// Shared request state. Everything is constructed once at startup and
/// injected; no component reaches for globals.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub blob: Arc<dyn ObjectStore>,
    pub mailer: Arc<dyn Mailer>,
    pub config: Arc<Config>,
}
