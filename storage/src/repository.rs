use async_trait::async_trait;

use crate::error::StorageError;
use crate::models::{NewGroupMessage, NewSingleMessage};

/// Write side of the message store. Each call is one atomic single-row insert; the store assigns
/// the record id (returned) and the timestamp when none is given.
#[async_trait]
pub trait MessageStore: Send + Sync {
    async fn insert_single(&self, message: &NewSingleMessage) -> Result<i64, StorageError>;
    async fn insert_group(&self, message: &NewGroupMessage) -> Result<i64, StorageError>;
}
