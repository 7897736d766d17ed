use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;

use super::error::ApiError;

/// Shared handler state: the registry connection behind a mutex.
///
/// SQLite access is serialized; counter allocation and status updates run
/// in transactions on the guarded connection.
#[derive(Clone)]
pub struct ApiContext {
    db: Arc<Mutex<Connection>>,
}

impl ApiContext {
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
        }
    }

    pub fn db(&self) -> Result<MutexGuard<'_, Connection>, ApiError> {
        self.db
            .lock()
            .map_err(|_| ApiError::Internal("database lock poisoned".into()))
    }
}
