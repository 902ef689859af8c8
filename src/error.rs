/// Errors on the client side of the chat.
///
/// The `Display` text of a network failure is what ends up in the
/// conversation, so keep those messages short and user readable.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ChatError {
    #[error("Search failed")]
    SearchFailed { status: u16 },
    #[error("Follow-up failed")]
    FollowUpFailed { status: u16 },
    #[error("network error: {0}")]
    Network(String),
    #[error("could not read response: {0}")]
    Decode(String),
    #[error("Speech recognition not supported in your browser.")]
    SpeechUnavailable,
    #[error("speech error: {0}")]
    Speech(String),
    #[error("a request is already in flight")]
    Busy,
    #[error("message cannot be empty")]
    EmptyQuery,
    #[error("storage error: {0}")]
    Storage(String),
}

impl ChatError {
    /// Text of the bot message appended when a request fails.
    pub fn conversation_text(&self) -> String {
        format!("Sorry, I encountered an error: {}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_error_display() {
        assert_eq!(ChatError::SearchFailed { status: 500 }.to_string(), "Search failed");
        assert_eq!(ChatError::FollowUpFailed { status: 404 }.to_string(), "Follow-up failed");
        assert_eq!(
            ChatError::Network("connection refused".to_string()).to_string(),
            "network error: connection refused"
        );
        assert_eq!(ChatError::EmptyQuery.to_string(), "message cannot be empty");
    }

    #[test]
    fn test_conversation_text_mentions_error() {
        let text = ChatError::FollowUpFailed { status: 502 }.conversation_text();
        assert_eq!(text, "Sorry, I encountered an error: Follow-up failed");
        assert!(text.contains("error"));
    }
}
