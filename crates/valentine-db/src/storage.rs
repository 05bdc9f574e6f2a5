use crate::error::Result;
use crate::models::{Confession, Creator, InsertConfession, InsertCreator, InsertMessage, Message};

/// Create/read/update access to creators, messages and confessions.
///
/// Every method is atomic with respect to the single record it touches.
/// Lookups that miss return `Ok(None)`. Methods may block on I/O, so async
/// callers should run them on a blocking thread.
///
/// Field contents are not validated here; callers check shape and
/// vocabulary before calling.
pub trait Storage: Send + Sync {
    /// Short name of the backend, for logs and health checks.
    fn backend_name(&self) -> &'static str;

    /// Release the backing store. Later calls may fail with
    /// [`StorageError::Unavailable`](crate::StorageError::Unavailable).
    fn close(&self) -> Result<()> {
        Ok(())
    }

    // -- Creators --

    /// Fails with [`StorageError::Conflict`](crate::StorageError::Conflict)
    /// if the slug is already in use.
    fn create_creator(&self, input: &InsertCreator) -> Result<Creator>;
    fn get_creator_by_slug(&self, slug: &str) -> Result<Option<Creator>>;
    fn get_creator_by_id(&self, id: i64) -> Result<Option<Creator>>;

    // -- Messages --

    /// Fails with [`StorageError::UnknownCreator`](crate::StorageError::UnknownCreator)
    /// if `creator_id` does not reference an existing creator.
    fn create_message(&self, input: &InsertMessage) -> Result<Message>;

    /// Most recent first. Ties on timestamp fall back to id, newest first.
    fn get_messages_for_creator(&self, creator_id: i64) -> Result<Vec<Message>>;

    /// Set the read and/or archived flags in one update; `None` leaves a
    /// flag as it is. Returns `None` if the message does not exist or
    /// belongs to another creator.
    fn update_message_flags(
        &self,
        creator_id: i64,
        message_id: i64,
        read: Option<bool>,
        archived: Option<bool>,
    ) -> Result<Option<Message>>;

    // -- Confessions --

    fn create_confession(&self, input: &InsertConfession) -> Result<Confession>;
    fn get_confession(&self, id: &str) -> Result<Option<Confession>>;

    /// Replaces the response wholesale. Any string is accepted.
    fn update_confession_status(&self, id: &str, response: &str) -> Result<Option<Confession>>;
}
