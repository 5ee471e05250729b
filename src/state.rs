use log::{info, warn};
use std::fmt;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::audit_log_service::{AuditLog, FileAuditLog, MongoAuditLog};
use crate::services::catalog_service::{Catalog, CatalogError};
use crate::services::handoff_service::WhatsAppHandoff;
use crate::services::session_service::SessionStore;

#[derive(Debug)]
pub enum StartupError {
    Catalog(CatalogError),
    Handoff(url::ParseError),
}

impl fmt::Display for StartupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartupError::Catalog(err) => write!(f, "Catalog error: {}", err),
            StartupError::Handoff(err) => write!(f, "Invalid WhatsApp link: {}", err),
        }
    }
}

impl std::error::Error for StartupError {}

impl From<CatalogError> for StartupError {
    fn from(err: CatalogError) -> Self {
        StartupError::Catalog(err)
    }
}

impl From<url::ParseError> for StartupError {
    fn from(err: url::ParseError) -> Self {
        StartupError::Handoff(err)
    }
}

/// Everything the handlers share. Built once and handed to actix as `web::Data`.
pub struct AppState {
    pub config: AppConfig,
    pub catalog: Catalog,
    pub audit_log: Arc<dyn AuditLog>,
    pub handoff: WhatsAppHandoff,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        catalog: Catalog,
        audit_log: Arc<dyn AuditLog>,
    ) -> Result<Self, StartupError> {
        let handoff = WhatsAppHandoff::new(&config.whatsapp_number)?;
        let sessions = Arc::new(SessionStore::new(
            config.session_settings(),
            audit_log.clone(),
            handoff.clone(),
        ));

        Ok(Self {
            config,
            catalog,
            audit_log,
            handoff,
            sessions,
        })
    }

    /// Load the catalog and pick the audit backend described by `config`.
    pub async fn from_config(config: AppConfig) -> Result<Self, StartupError> {
        let catalog = match &config.catalog_path {
            Some(path) => {
                info!("Loading catalog from {}", path.display());
                Catalog::from_path(path)?
            }
            None => Catalog::bundled()?,
        };
        info!("Catalog loaded with {} tours", catalog.len());

        let audit_log = Self::audit_log_for(&config).await;
        info!("Audit log backend: {}", audit_log.backend());

        Self::new(config, catalog, audit_log)
    }

    async fn audit_log_for(config: &AppConfig) -> Arc<dyn AuditLog> {
        if let Some(uri) = &config.mongodb_uri {
            match MongoAuditLog::connect(uri).await {
                Ok(log) => return Arc::new(log),
                Err(err) => warn!(
                    "MongoDB audit log unavailable, falling back to {}: {}",
                    config.audit_log_path.display(),
                    err
                ),
            }
        }
        Arc::new(FileAuditLog::new(&config.audit_log_path))
    }
}
