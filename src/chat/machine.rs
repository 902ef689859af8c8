use crate::chat::message::Message;
use crate::chat::normalize::normalize;
use crate::chat::session::{Dispatch, Session, SessionResolver};
use crate::error::ChatError;
use crate::types::SearchResponse;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
    Listening,
}

/// How a `q` parameter reached the search page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedTrigger {
    /// The page was opened with the parameter already in its URL.
    Mount,
    /// The location changed while the page was open.
    Navigation,
}

/// What happened to a response handed to [`ChatState::complete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Answered,
    Failed,
    /// The session was reset while the request was in flight.
    Discarded,
}

/// Conversation state of the search page: messages, session routing,
/// the request phase and the sidebar flag.
#[derive(Debug, Clone, Default)]
pub struct ChatState {
    messages: Vec<Message>,
    resolver: SessionResolver,
    phase: Phase,
    sidebar_open: bool,
}

impl ChatState {
    pub fn with_messages(messages: Vec<Message>) -> Self {
        Self {
            messages,
            ..Default::default()
        }
    }

    pub fn restore(&mut self, messages: Vec<Message>) {
        self.messages = messages;
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == Phase::Submitting
    }

    pub fn is_listening(&self) -> bool {
        self.phase == Phase::Listening
    }

    pub fn session(&self) -> &Session {
        self.resolver.session()
    }

    pub fn search_query(&self) -> Option<&str> {
        self.resolver.search_query()
    }

    pub fn retry_counter(&self) -> u32 {
        self.resolver.retry_counter()
    }

    pub fn sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    pub fn set_sidebar_open(&mut self, open: bool) {
        self.sidebar_open = open;
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_open = !self.sidebar_open;
    }

    /// Sends whatever the user typed: a follow-up when a session is active,
    /// a top-level search otherwise. The user message is appended before the
    /// request goes out.
    pub fn submit(&mut self, input: &str) -> Result<Dispatch, ChatError> {
        let query = self.accept_input(input)?;
        let dispatch = self.resolver.resolve(&query);
        self.begin(query);
        Ok(dispatch)
    }

    /// Top-level search path, used when a query arrives through the page URL.
    pub fn search(&mut self, input: &str) -> Result<Dispatch, ChatError> {
        let query = self.accept_input(input)?;
        let dispatch = self.resolver.start_search(&query);
        self.begin(query);
        Ok(dispatch)
    }

    /// Whether a `q` parameter starts a top-level search. Opening the page
    /// with one always searches, restored history or not. A later location
    /// change only seeds an empty conversation. Either way the query must
    /// differ from the search already on screen.
    pub fn should_seed(&self, url_query: &str, trigger: SeedTrigger) -> bool {
        let query = url_query.trim();
        if query.is_empty() || self.phase != Phase::Idle || self.search_query() == Some(query) {
            return false;
        }
        match trigger {
            SeedTrigger::Mount => true,
            SeedTrigger::Navigation => self.messages.is_empty(),
        }
    }

    pub fn complete(
        &mut self,
        dispatch: &Dispatch,
        result: Result<SearchResponse, ChatError>,
    ) -> Completion {
        if !self.resolver.is_current(dispatch) {
            log::warn!(
                "discarding response for '{}' issued before the session was reset",
                dispatch.query()
            );
            return Completion::Discarded;
        }
        self.phase = Phase::Idle;

        match result {
            Ok(response) => {
                self.resolver.accept(dispatch, &response);
                let normalized = normalize(&response);
                if normalized.opens_sidebar() {
                    self.sidebar_open = true;
                }

                let message = if dispatch.is_follow_up() {
                    let original_query = self.session().original_query.clone();
                    Message::follow_up_answer(normalized, original_query)
                } else {
                    Message::answer(normalized)
                };
                self.messages.push(message);
                Completion::Answered
            }
            Err(e) => {
                log::error!("request for '{}' failed: {}", dispatch.query(), e);
                self.messages.push(Message::error(e.conversation_text()));
                Completion::Failed
            }
        }
    }

    pub fn begin_listening(&mut self, available: bool) -> Result<(), ChatError> {
        if !available {
            return Err(ChatError::SpeechUnavailable);
        }
        if self.phase != Phase::Idle {
            return Err(ChatError::Busy);
        }
        self.phase = Phase::Listening;
        Ok(())
    }

    /// A transcript goes straight through the submit path.
    pub fn finish_listening(&mut self, transcript: &str) -> Result<Dispatch, ChatError> {
        self.cancel_listening();
        self.submit(transcript)
    }

    pub fn cancel_listening(&mut self) {
        if self.phase == Phase::Listening {
            self.phase = Phase::Idle;
        }
    }

    /// Drops the conversation and the session. Anything still in flight
    /// will come back as [`Completion::Discarded`].
    pub fn clear(&mut self) {
        self.messages.clear();
        self.resolver.clear();
        self.phase = Phase::Idle;
        self.sidebar_open = false;
    }

    fn accept_input(&self, input: &str) -> Result<String, ChatError> {
        let query = input.trim();
        if query.is_empty() {
            return Err(ChatError::EmptyQuery);
        }
        if self.phase != Phase::Idle {
            return Err(ChatError::Busy);
        }
        Ok(query.to_string())
    }

    fn begin(&mut self, query: String) {
        self.messages.push(Message::user(query));
        self.phase = Phase::Submitting;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::message::Role;
    use crate::chat::session::Route;
    use crate::types::Source;

    fn answered(session_id: Option<&str>, answer: &str) -> SearchResponse {
        SearchResponse {
            session_id: session_id.map(str::to_string),
            answer: Some(answer.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_submit_appends_user_message_before_response() {
        let mut state = ChatState::default();
        let dispatch = state.submit("  what is tokio?  ").unwrap();

        assert_eq!(state.phase(), Phase::Submitting);
        assert_eq!(state.messages(), &[Message::user("what is tokio?")]);
        assert_eq!(dispatch.query(), "what is tokio?");
    }

    #[test]
    fn test_empty_and_concurrent_submissions_are_rejected() {
        let mut state = ChatState::default();
        assert_eq!(state.submit("   "), Err(ChatError::EmptyQuery));
        assert!(state.messages().is_empty());

        state.submit("first").unwrap();
        assert_eq!(state.submit("second"), Err(ChatError::Busy));
        assert_eq!(state.messages().len(), 1);
    }

    #[test]
    fn test_success_returns_to_idle_with_bot_message() {
        let mut state = ChatState::default();
        let dispatch = state.submit("q").unwrap();
        let completion = state.complete(&dispatch, Ok(answered(Some("s-1"), "<b>yes</b>")));

        assert_eq!(completion, Completion::Answered);
        assert_eq!(state.phase(), Phase::Idle);
        let bot = &state.messages()[1];
        assert_eq!(bot.role, Role::Bot);
        assert_eq!(bot.content, "yes");
        assert!(!bot.is_follow_up);
        assert_eq!(state.session().id.as_deref(), Some("s-1"));
    }

    #[test]
    fn test_follow_up_answer_is_anchored_to_original_query() {
        let mut state = ChatState::default();
        let search = state.submit("origin").unwrap();
        state.complete(&search, Ok(answered(Some("s-1"), "a")));

        let follow_up = state.submit("more please").unwrap();
        assert!(matches!(follow_up.route, Route::FollowUp { .. }));
        state.complete(&follow_up, Ok(answered(None, "b")));

        let bot = state.messages().last().unwrap();
        assert!(bot.is_follow_up);
        assert_eq!(bot.original_query.as_deref(), Some("origin"));
    }

    #[test]
    fn test_failure_appends_single_error_message() {
        let mut state = ChatState::default();
        let search = state.submit("origin").unwrap();
        state.complete(&search, Ok(answered(Some("s-1"), "a")));

        let follow_up = state.submit("again").unwrap();
        let before = state.messages().len();
        let completion =
            state.complete(&follow_up, Err(ChatError::FollowUpFailed { status: 500 }));

        assert_eq!(completion, Completion::Failed);
        assert_eq!(state.messages().len(), before + 1);
        let bot = state.messages().last().unwrap();
        assert_eq!(bot.role, Role::Bot);
        assert!(bot.content.contains("error"));
        assert!(bot.sources.is_none());
        assert_eq!(state.phase(), Phase::Idle);
    }

    #[test]
    fn test_sources_open_sidebar_and_absence_leaves_it() {
        let mut state = ChatState::default();
        let first = state.submit("a").unwrap();
        state.complete(&first, Ok(answered(None, "no sources")));
        assert!(!state.sidebar_open());

        let second = state.submit("a").unwrap();
        let with_sources = SearchResponse {
            answer: Some("cited".to_string()),
            sources: Some(vec![Source {
                title: Some("Doc".to_string()),
                ..Default::default()
            }]),
            ..Default::default()
        };
        state.complete(&second, Ok(with_sources));
        assert!(state.sidebar_open());

        let third = state.submit("a").unwrap();
        state.complete(&third, Ok(answered(None, "plain")));
        assert!(state.sidebar_open());
    }

    #[test]
    fn test_stale_response_is_discarded_after_clear() {
        let mut state = ChatState::default();
        let search = state.submit("origin").unwrap();
        state.clear();

        let completion = state.complete(&search, Ok(answered(Some("s-1"), "late")));
        assert_eq!(completion, Completion::Discarded);
        assert!(state.messages().is_empty());
        assert!(!state.session().is_active());
    }

    #[test]
    fn test_stale_completion_does_not_release_newer_request() {
        let mut state = ChatState::default();
        let old = state.submit("old").unwrap();
        state.clear();
        let new = state.submit("new").unwrap();

        assert_eq!(state.complete(&old, Err(ChatError::Network("late".into()))), Completion::Discarded);
        assert_eq!(state.phase(), Phase::Submitting);
        assert_eq!(state.complete(&new, Ok(answered(None, "fresh"))), Completion::Answered);
        assert_eq!(state.phase(), Phase::Idle);
    }

    #[test]
    fn test_listening_transitions() {
        let mut state = ChatState::default();
        assert_eq!(state.begin_listening(false), Err(ChatError::SpeechUnavailable));
        assert_eq!(state.phase(), Phase::Idle);

        state.begin_listening(true).unwrap();
        assert!(state.is_listening());
        assert_eq!(state.begin_listening(true), Err(ChatError::Busy));

        let dispatch = state.finish_listening("spoken words").unwrap();
        assert_eq!(dispatch.query(), "spoken words");
        assert!(state.is_submitting());
    }

    #[test]
    fn test_cancelled_listening_returns_to_idle() {
        let mut state = ChatState::default();
        state.begin_listening(true).unwrap();
        state.cancel_listening();
        assert_eq!(state.phase(), Phase::Idle);
    }

    #[test]
    fn test_url_seeding_rules() {
        let mut state = ChatState::default();
        assert!(state.should_seed("rust", SeedTrigger::Mount));
        assert!(state.should_seed("rust", SeedTrigger::Navigation));
        assert!(!state.should_seed("  ", SeedTrigger::Mount));

        let dispatch = state.search("rust").unwrap();
        assert!(!state.should_seed("other", SeedTrigger::Mount));
        state.complete(&dispatch, Ok(answered(None, "a")));
        assert!(!state.should_seed("rust", SeedTrigger::Mount));
        assert!(!state.should_seed("other", SeedTrigger::Navigation));
    }

    #[test]
    fn test_opening_page_with_query_searches_over_restored_history() {
        let mut state = ChatState::default();
        state.restore(vec![
            Message::user("earlier question"),
            Message::error("Sorry, I encountered an error: Search failed"),
        ]);

        assert!(state.should_seed("brand new question", SeedTrigger::Mount));
        assert!(!state.should_seed("brand new question", SeedTrigger::Navigation));

        let dispatch = state.search("brand new question").unwrap();
        assert_eq!(
            dispatch.route,
            Route::Search {
                query: "brand new question".to_string(),
                attempt: 0
            }
        );
        assert_eq!(state.messages().len(), 3);
        assert!(state.is_submitting());
    }

    #[test]
    fn test_typing_while_listening_is_rejected() {
        let mut state = ChatState::default();
        state.begin_listening(true).unwrap();

        assert_eq!(state.submit("typed while mic open"), Err(ChatError::Busy));
        assert_eq!(state.search("typed while mic open"), Err(ChatError::Busy));
        assert!(state.messages().is_empty());
        assert!(state.is_listening());

        let dispatch = state.finish_listening("spoken words").unwrap();
        assert_eq!(dispatch.query(), "spoken words");
        assert_eq!(state.messages(), &[Message::user("spoken words")]);
    }
}
