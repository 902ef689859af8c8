use cfg_if::cfg_if;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::chat::message::Message;
use crate::error::ChatError;

pub const STORAGE_KEY: &str = "chatMessages";
pub const STORAGE_VERSION: u32 = 1;
pub const MAX_STORED_MESSAGES: usize = 200;

/// String key-value persistence, `localStorage` shaped.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, ChatError>;
    fn set(&self, key: &str, value: &str) -> Result<(), ChatError>;
    fn remove(&self, key: &str) -> Result<(), ChatError>;
}

/// In-process store. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    fn entries(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, ChatError> {
        self.entries
            .lock()
            .map_err(|e| ChatError::Storage(format!("memory store poisoned: {}", e)))
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, ChatError> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ChatError> {
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), ChatError> {
        self.entries()?.remove(key);
        Ok(())
    }
}

cfg_if! {
    if #[cfg(feature = "hydrate")] {
        use web_sys::window;

        /// The browser's `localStorage`.
        #[derive(Debug, Clone, Copy, Default)]
        pub struct BrowserStorage;

        fn local_storage() -> Result<web_sys::Storage, ChatError> {
            window()
                .and_then(|w| w.local_storage().ok().flatten())
                .ok_or_else(|| ChatError::Storage("localStorage is not available".to_string()))
        }

        fn js_error(value: wasm_bindgen::JsValue) -> ChatError {
            ChatError::Storage(format!("{:?}", value))
        }

        impl KeyValueStore for BrowserStorage {
            fn get(&self, key: &str) -> Result<Option<String>, ChatError> {
                local_storage()?.get_item(key).map_err(js_error)
            }

            fn set(&self, key: &str, value: &str) -> Result<(), ChatError> {
                local_storage()?.set_item(key, value).map_err(js_error)
            }

            fn remove(&self, key: &str) -> Result<(), ChatError> {
                local_storage()?.remove_item(key).map_err(js_error)
            }
        }
    }
}

#[derive(Serialize)]
struct StoredConversationRef<'a> {
    version: u32,
    messages: &'a [Message],
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredConversation {
    Versioned { version: u32, messages: Vec<Message> },
    // Written before the envelope existed: a bare array.
    Legacy(Vec<Message>),
}

/// Keeps the message list under one key, wrapped in a versioned envelope
/// and capped to the most recent messages.
#[derive(Debug, Clone)]
pub struct ConversationStore<S> {
    backend: S,
    key: String,
    max_messages: usize,
}

impl<S: KeyValueStore> ConversationStore<S> {
    pub fn new(backend: S) -> Self {
        Self {
            backend,
            key: STORAGE_KEY.to_string(),
            max_messages: MAX_STORED_MESSAGES,
        }
    }

    pub fn with_limit(mut self, max_messages: usize) -> Self {
        self.max_messages = max_messages;
        self
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn try_load(&self) -> Result<Vec<Message>, ChatError> {
        let Some(raw) = self.backend.get(&self.key)? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<StoredConversation>(&raw) {
            Ok(StoredConversation::Versioned { version, messages }) if version == STORAGE_VERSION => {
                Ok(messages)
            }
            Ok(StoredConversation::Versioned { version, .. }) => Err(ChatError::Storage(format!(
                "unsupported history version {}",
                version
            ))),
            Ok(StoredConversation::Legacy(messages)) => {
                log::info!("loaded {} messages from unversioned history", messages.len());
                Ok(messages)
            }
            Err(e) => Err(ChatError::Storage(format!("unreadable history: {}", e))),
        }
    }

    /// Loads the stored history, starting empty if it can't be read.
    pub fn load(&self) -> Vec<Message> {
        match self.try_load() {
            Ok(messages) => messages,
            Err(e) => {
                log::warn!("starting with an empty conversation: {}", e);
                Vec::new()
            }
        }
    }

    pub fn save(&self, messages: &[Message]) -> Result<(), ChatError> {
        let start = messages.len().saturating_sub(self.max_messages);
        let stored = StoredConversationRef {
            version: STORAGE_VERSION,
            messages: &messages[start..],
        };
        let json = serde_json::to_string(&stored)
            .map_err(|e| ChatError::Storage(format!("failed to encode history: {}", e)))?;
        self.backend.set(&self.key, &json)
    }

    pub fn clear(&self) -> Result<(), ChatError> {
        self.backend.remove(&self.key)
    }

    /// Mirrors the in-memory list: an empty conversation removes the record.
    pub fn persist(&self, messages: &[Message]) -> Result<(), ChatError> {
        if messages.is_empty() {
            self.clear()
        } else {
            self.save(messages)
        }
    }
}
