use std::sync::Arc;

use crate::service::SearchService;

#[derive(Clone)]
pub struct GatewayState {
    pub service: Arc<SearchService>,
}

impl GatewayState {
    pub fn new(service: Arc<SearchService>) -> Self {
        Self { service }
    }
}
