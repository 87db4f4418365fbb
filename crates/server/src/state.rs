use std::sync::Arc;

use service::EntityStore;

use crate::mailer::Mailer;

#[derive(Clone)]
pub struct ServerState {
    pub store: Arc<EntityStore>,
    pub mailer: Arc<dyn Mailer>,
}
