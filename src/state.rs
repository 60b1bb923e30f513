//! Shared application state injected into all handlers.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::services::LinkService;
use crate::domain::repositories::MappingStore;
use crate::domain::visit_event::VisitEvent;
use crate::infrastructure::cache::CacheService;

/// Cheaply cloneable handle to the services behind the HTTP layer.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    pub cache: Arc<dyn CacheService>,
    pub store: Arc<dyn MappingStore>,
    pub visit_sender: mpsc::Sender<VisitEvent>,
    /// Prefix for short URLs returned by `POST /create`.
    pub base_url: String,
}

impl AppState {
    pub fn new(
        link_service: Arc<LinkService>,
        cache: Arc<dyn CacheService>,
        store: Arc<dyn MappingStore>,
        visit_sender: mpsc::Sender<VisitEvent>,
        base_url: String,
    ) -> Self {
        Self {
            link_service,
            cache,
            store,
            visit_sender,
            base_url,
        }
    }
}
