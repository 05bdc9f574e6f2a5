use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use tracing::{info, warn};

use crate::error::{Result, StorageError};
use crate::ids::{self, IdGenerator, MAX_ID_ATTEMPTS};
use crate::models::{Confession, Creator, InsertConfession, InsertCreator, InsertMessage, Message};
use crate::storage::Storage;

/// Process-local backend for running without a database.
///
/// Not durable: every record is lost when the process exits. It enforces
/// the same slug uniqueness and creator references as the SQLite schema.
pub struct MemoryStorage {
    state: Mutex<MemoryState>,
    next_id: IdGenerator,
}

#[derive(Default)]
struct MemoryState {
    creators: HashMap<i64, Creator>,
    creator_slugs: HashMap<String, i64>,
    messages: HashMap<i64, Message>,
    confessions: HashMap<String, Confession>,
    last_creator_id: i64,
    last_message_id: i64,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MemoryState::default()),
            next_id: ids::generate_confession_id,
        }
    }

    pub fn with_id_generator(mut self, next_id: IdGenerator) -> Self {
        self.next_id = next_id;
        self
    }

    #[cfg(test)]
    fn set_sender_timestamp(&self, message_id: i64, at: chrono::DateTime<Utc>) {
        if let Some(m) = self.state().messages.get_mut(&message_id) {
            m.sender_timestamp = at;
        }
    }

    // Every mutation completes before the guard drops, so a poisoned map is
    // still consistent.
    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage for MemoryStorage {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn create_creator(&self, input: &InsertCreator) -> Result<Creator> {
        let mut state = self.state();

        if state.creator_slugs.contains_key(&input.slug) {
            warn!("Slug '{}' already taken", input.slug);
            return Err(StorageError::Conflict { field: "slug", value: input.slug.clone() });
        }

        state.last_creator_id += 1;
        let creator = Creator {
            id: state.last_creator_id,
            display_name: input.display_name.clone(),
            slug: input.slug.clone(),
            passcode: input.passcode.clone(),
            created_at: Utc::now(),
        };
        state.creator_slugs.insert(creator.slug.clone(), creator.id);
        state.creators.insert(creator.id, creator.clone());

        info!("Created creator {} ({})", creator.id, creator.slug);
        Ok(creator)
    }

    fn get_creator_by_slug(&self, slug: &str) -> Result<Option<Creator>> {
        let state = self.state();
        Ok(state
            .creator_slugs
            .get(slug)
            .and_then(|id| state.creators.get(id))
            .cloned())
    }

    fn get_creator_by_id(&self, id: i64) -> Result<Option<Creator>> {
        Ok(self.state().creators.get(&id).cloned())
    }

    fn create_message(&self, input: &InsertMessage) -> Result<Message> {
        let mut state = self.state();

        if !state.creators.contains_key(&input.creator_id) {
            return Err(StorageError::UnknownCreator(input.creator_id));
        }

        state.last_message_id += 1;
        let message = Message {
            id: state.last_message_id,
            creator_id: input.creator_id,
            kind: input.kind.clone(),
            vibe: input.vibe.clone(),
            content: input.content.clone(),
            bouquet_id: input.bouquet_id.clone(),
            note: input.note.clone(),
            sender_device: input.sender_device.clone(),
            sender_location: input.sender_location.clone(),
            sender_timestamp: Utc::now(),
            is_read: false,
            is_archived: false,
        };
        state.messages.insert(message.id, message.clone());

        info!("Delivered {} {} to creator {}", message.kind, message.id, message.creator_id);
        Ok(message)
    }

    fn get_messages_for_creator(&self, creator_id: i64) -> Result<Vec<Message>> {
        let mut messages: Vec<Message> = self
            .state()
            .messages
            .values()
            .filter(|m| m.creator_id == creator_id)
            .cloned()
            .collect();

        messages.sort_by(|a, b| {
            b.sender_timestamp
                .cmp(&a.sender_timestamp)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(messages)
    }

    fn update_message_flags(
        &self,
        creator_id: i64,
        message_id: i64,
        read: Option<bool>,
        archived: Option<bool>,
    ) -> Result<Option<Message>> {
        let mut state = self.state();
        Ok(state
            .messages
            .get_mut(&message_id)
            .filter(|m| m.creator_id == creator_id)
            .map(|m| {
                if let Some(read) = read {
                    m.is_read = read;
                }
                if let Some(archived) = archived {
                    m.is_archived = archived;
                }
                m.clone()
            }))
    }

    fn create_confession(&self, input: &InsertConfession) -> Result<Confession> {
        let mut state = self.state();

        for _ in 0..MAX_ID_ATTEMPTS {
            let id = (self.next_id)();
            if state.confessions.contains_key(&id) {
                warn!("Confession id {} collided, drawing another", id);
                continue;
            }

            let confession = Confession::new(id, input, Utc::now());
            state.confessions.insert(confession.id.clone(), confession.clone());
            info!("Created confession {}", confession.id);
            return Ok(confession);
        }
        Err(StorageError::IdSpaceExhausted)
    }

    fn get_confession(&self, id: &str) -> Result<Option<Confession>> {
        Ok(self.state().confessions.get(id).cloned())
    }

    fn update_confession_status(&self, id: &str, response: &str) -> Result<Option<Confession>> {
        let mut state = self.state();
        Ok(state.confessions.get_mut(id).map(|c| {
            c.response = Some(response.to_string());
            info!("Confession {} answered '{}'", id, response);
            c.clone()
        }))
    }
}
