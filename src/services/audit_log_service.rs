use async_trait::async_trait;
use log::{debug, warn};
use mongodb::{Client, Collection};
use std::fmt;
use std::path::PathBuf;
use tokio::sync::Mutex;

use crate::db::mongo::{create_mongo_client, AUDIT_DATABASE};
use crate::models::inquiry::BookingIntent;

pub const AUDIT_COLLECTION: &str = "TourBookings";

#[derive(Debug)]
pub enum AuditLogError {
    Io(std::io::Error),
    Serialization(serde_json::Error),
    Database(mongodb::error::Error),
}

impl fmt::Display for AuditLogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditLogError::Io(err) => write!(f, "I/O error: {}", err),
            AuditLogError::Serialization(err) => write!(f, "Serialization error: {}", err),
            AuditLogError::Database(err) => write!(f, "Database error: {}", err),
        }
    }
}

impl std::error::Error for AuditLogError {}

impl From<std::io::Error> for AuditLogError {
    fn from(err: std::io::Error) -> Self {
        AuditLogError::Io(err)
    }
}

impl From<serde_json::Error> for AuditLogError {
    fn from(err: serde_json::Error) -> Self {
        AuditLogError::Serialization(err)
    }
}

impl From<mongodb::error::Error> for AuditLogError {
    fn from(err: mongodb::error::Error) -> Self {
        AuditLogError::Database(err)
    }
}

/// Append-only record of submitted booking intents. Nothing reads it back.
#[async_trait]
pub trait AuditLog: Send + Sync {
    async fn append(&self, intent: &BookingIntent) -> Result<(), AuditLogError>;

    fn backend(&self) -> &'static str;
}

/// Append and swallow failures. A failed write never changes the outcome of
/// a submission; it is only logged.
pub async fn record_best_effort(log: &dyn AuditLog, intent: &BookingIntent) {
    match log.append(intent).await {
        Ok(()) => debug!("Recorded booking intent {} ({})", intent.id, log.backend()),
        Err(err) => warn!(
            "Failed to record booking intent {} in {} audit log: {}",
            intent.id,
            log.backend(),
            err
        ),
    }
}

/// JSON array kept in a single file, rewritten on every append.
pub struct FileAuditLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileAuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    // Missing or unreadable slots start over as an empty list
    async fn read_existing(&self) -> Vec<serde_json::Value> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                warn!(
                    "Audit log {} is corrupt, starting a new list: {}",
                    self.path.display(),
                    err
                );
                Vec::new()
            }),
            Err(_) => Vec::new(),
        }
    }
}

#[async_trait]
impl AuditLog for FileAuditLog {
    async fn append(&self, intent: &BookingIntent) -> Result<(), AuditLogError> {
        let _guard = self.write_lock.lock().await;

        let mut records = self.read_existing().await;
        records.push(serde_json::to_value(intent)?);

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let body = serde_json::to_vec_pretty(&records)?;
        tokio::fs::write(&self.path, body).await?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "file"
    }
}

pub struct MongoAuditLog {
    collection: Collection<BookingIntent>,
}

impl MongoAuditLog {
    pub fn new(client: &Client) -> Self {
        Self {
            collection: client.database(AUDIT_DATABASE).collection(AUDIT_COLLECTION),
        }
    }

    pub async fn connect(uri: &str) -> Result<Self, AuditLogError> {
        let client = create_mongo_client(uri).await?;
        Ok(Self::new(&client))
    }
}

#[async_trait]
impl AuditLog for MongoAuditLog {
    async fn append(&self, intent: &BookingIntent) -> Result<(), AuditLogError> {
        self.collection.insert_one(intent).await?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "mongodb"
    }
}

/// Keeps intents in memory. Used for dry runs and tests.
#[derive(Default)]
pub struct MemoryAuditLog {
    records: Mutex<Vec<BookingIntent>>,
}

impl MemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn records(&self) -> Vec<BookingIntent> {
        self.records.lock().await.clone()
    }
}

#[async_trait]
impl AuditLog for MemoryAuditLog {
    async fn append(&self, intent: &BookingIntent) -> Result<(), AuditLogError> {
        self.records.lock().await.push(intent.clone());
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
