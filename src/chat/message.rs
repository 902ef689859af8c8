use serde::{Deserialize, Serialize};

use crate::chat::normalize::NormalizedResult;
use crate::types::Source;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Bot,
}

/// One turn of the conversation. Serialized in the same camelCase shape the
/// page has always kept in `localStorage`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(rename = "type")]
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<Source>>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_follow_up: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_query: Option<String>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            sources: None,
            is_follow_up: false,
            original_query: None,
        }
    }

    /// Bot answer to a top-level search.
    pub fn answer(result: NormalizedResult) -> Self {
        Self {
            role: Role::Bot,
            content: result.content,
            sources: Some(result.sources),
            is_follow_up: false,
            original_query: None,
        }
    }

    /// Bot answer to a follow-up, anchored to the query that opened the session.
    pub fn follow_up_answer(result: NormalizedResult, original_query: Option<String>) -> Self {
        Self {
            role: Role::Bot,
            content: result.content,
            sources: Some(result.sources),
            is_follow_up: true,
            original_query,
        }
    }

    /// Synthetic bot message for a failed request. Never carries sources.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            role: Role::Bot,
            content: text.into(),
            sources: None,
            is_follow_up: false,
            original_query: None,
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    pub fn has_sources(&self) -> bool {
        self.sources.as_ref().is_some_and(|s| !s.is_empty())
    }
}
