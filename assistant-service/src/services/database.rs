use crate::models::UserRecord;
use async_trait::async_trait;
use mongodb::{bson::doc, Client as MongoClient, Collection, Database};
use service_core::error::AppError;
use std::collections::HashMap;
use std::sync::RwLock;

const USERS_COLLECTION: &str = "usuarios";

/// Read-only access to the externally owned user records.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user(&self, uid: &str) -> Result<Option<UserRecord>, AppError>;
    async fn health_check(&self) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct MongoUserStore {
    client: MongoClient,
    db: Database,
}

impl MongoUserStore {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!(uri = %uri, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB at {}: {}", uri, e);
            AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Connected to MongoDB database");
        Ok(Self { client, db })
    }

    fn users(&self) -> Collection<UserRecord> {
        self.db.collection(USERS_COLLECTION)
    }
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn find_user(&self, uid: &str) -> Result<Option<UserRecord>, AppError> {
        self.users()
            .find_one(doc! { "_id": uid }, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to look up user {}: {}", uid, e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;
        Ok(())
    }
}

/// In-memory user store used by tests.
pub struct MemoryUserStore {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
        }
    }

    pub fn insert(&self, uid: &str, record: UserRecord) {
        self.users
            .write()
            .expect("user store lock poisoned")
            .insert(uid.to_string(), record);
    }
}

impl Default for MemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_user(&self, uid: &str) -> Result<Option<UserRecord>, AppError> {
        Ok(self
            .users
            .read()
            .expect("user store lock poisoned")
            .get(uid)
            .cloned())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}
