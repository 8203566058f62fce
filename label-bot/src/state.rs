//! Shared application state

use crate::config::Config;
use crate::transport::ChatTransport;
use label_sheet::LabelSheetGenerator;
use std::sync::Arc;

/// Welcome message settings
#[derive(Debug, Clone)]
pub struct Welcome {
    pub bot_name: String,
    pub support_contact: Option<String>,
}

#[derive(Clone)]
pub struct AppState {
    pub transport: Arc<dyn ChatTransport>,
    pub generator: Arc<LabelSheetGenerator>,
    pub welcome: Arc<Welcome>,
    /// Full URL registered by `GET /`
    pub webhook_endpoint: String,
}

impl AppState {
    pub fn new(config: &Config, transport: Arc<dyn ChatTransport>) -> Self {
        Self {
            transport,
            generator: Arc::new(LabelSheetGenerator::new(config.label_config())),
            welcome: Arc::new(Welcome {
                bot_name: config.bot_name.clone(),
                support_contact: config.support_contact.clone(),
            }),
            webhook_endpoint: config.webhook_endpoint(),
        }
    }
}
