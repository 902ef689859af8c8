pub mod machine;
pub mod message;
pub mod normalize;
pub mod plain_text;
pub mod session;

pub use machine::{ChatState, Completion, Phase, SeedTrigger};
pub use message::{Message, Role};
pub use normalize::{normalize, NormalizedResult, ResponseShape};
pub use session::{Dispatch, Route, Session, SessionResolver};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{execute, SearchApi};
    use crate::error::ChatError;
    use crate::storage::{ConversationStore, MemoryStorage};
    use crate::types::{ResultItem, SearchResponse, Source};
    use std::cell::RefCell;
    use std::collections::VecDeque;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Search(String),
        FollowUp(String, String),
    }

    /// Scripted backend that records which endpoint each request hit.
    #[derive(Default)]
    struct FakeBackend {
        calls: RefCell<Vec<Call>>,
        replies: RefCell<VecDeque<Result<SearchResponse, ChatError>>>,
    }

    impl FakeBackend {
        fn reply(self, reply: Result<SearchResponse, ChatError>) -> Self {
            self.replies.borrow_mut().push_back(reply);
            self
        }

        fn next(&self) -> Result<SearchResponse, ChatError> {
            self.replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Ok(SearchResponse::default()))
        }
    }

    impl SearchApi for FakeBackend {
        async fn search(&self, query: &str) -> Result<SearchResponse, ChatError> {
            self.calls.borrow_mut().push(Call::Search(query.to_string()));
            self.next()
        }

        async fn follow_up(
            &self,
            session_id: &str,
            query: &str,
        ) -> Result<SearchResponse, ChatError> {
            self.calls
                .borrow_mut()
                .push(Call::FollowUp(session_id.to_string(), query.to_string()));
            self.next()
        }
    }

    /// Drives state, backend and store the way the search page does.
    struct Page {
        state: ChatState,
        backend: FakeBackend,
        store: ConversationStore<MemoryStorage>,
    }

    impl Page {
        fn new(backend: FakeBackend) -> Self {
            let store = ConversationStore::new(MemoryStorage::default());
            Self {
                state: ChatState::with_messages(store.load()),
                backend,
                store,
            }
        }

        async fn send(&mut self, input: &str) -> Completion {
            let dispatch = self.state.submit(input).expect("submission accepted");
            self.store.save(self.state.messages()).unwrap();
            let result = execute(&self.backend, &dispatch).await;
            let completion = self.state.complete(&dispatch, result);
            self.store.save(self.state.messages()).unwrap();
            completion
        }
    }

    fn session_answer(id: &str, answer: &str) -> SearchResponse {
        SearchResponse {
            session_id: Some(id.to_string()),
            answer: Some(answer.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_persisted_history_matches_memory_after_turns() {
        let backend = FakeBackend::default()
            .reply(Ok(session_answer("s-1", "first answer")))
            .reply(Ok(SearchResponse {
                results: Some(vec![ResultItem {
                    title: Some("Ownership".to_string()),
                    summary: Some("<em>moves</em>".to_string()),
                    ..Default::default()
                }]),
                ..Default::default()
            }))
            .reply(Ok(SearchResponse {
                content: Some("done".to_string()),
                sources: Some(vec![Source {
                    url: Some("https://example.com".to_string()),
                    ..Default::default()
                }]),
                ..Default::default()
            }));
        let mut page = Page::new(backend);

        page.send("first").await;
        page.send("second").await;
        page.send("third").await;

        assert_eq!(page.state.messages().len(), 6);
        assert_eq!(page.store.try_load().unwrap(), page.state.messages());

        let reloaded = ChatState::with_messages(page.store.load());
        assert_eq!(reloaded.messages(), page.state.messages());
    }

    #[tokio::test]
    async fn test_same_query_without_session_fetches_again() {
        let mut page = Page::new(FakeBackend::default());

        page.send("rust async").await;
        page.send("rust async").await;

        assert_eq!(page.state.retry_counter(), 1);
        assert_eq!(
            *page.backend.calls.borrow(),
            vec![
                Call::Search("rust async".to_string()),
                Call::Search("rust async".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn test_session_routes_next_message_to_follow_up() {
        let backend = FakeBackend::default().reply(Ok(session_answer("s-9", "hello")));
        let mut page = Page::new(backend);

        page.send("start").await;
        page.send("continue").await;

        assert_eq!(
            *page.backend.calls.borrow(),
            vec![
                Call::Search("start".to_string()),
                Call::FollowUp("s-9".to_string(), "continue".to_string())
            ]
        );
        let last = page.state.messages().last().unwrap();
        assert!(last.is_follow_up);
        assert_eq!(last.original_query.as_deref(), Some("start"));
    }

    #[tokio::test]
    async fn test_failed_follow_up_appends_one_error_message() {
        let backend = FakeBackend::default()
            .reply(Ok(session_answer("s-1", "hello")))
            .reply(Err(ChatError::FollowUpFailed { status: 503 }));
        let mut page = Page::new(backend);

        page.send("start").await;
        let before = page.state.messages().len();
        let completion = page.send("continue").await;

        assert_eq!(completion, Completion::Failed);
        // the user turn plus exactly one bot turn
        assert_eq!(page.state.messages().len(), before + 2);
        let error = page.state.messages().last().unwrap();
        assert_eq!(error.role, Role::Bot);
        assert!(error.content.contains("error"));

        let stored = serde_json::to_value(page.state.messages()).unwrap();
        assert!(stored[before + 1].get("sources").is_none());
    }

    #[tokio::test]
    async fn test_sidebar_follows_sources() {
        let backend = FakeBackend::default()
            .reply(Ok(session_answer("s-1", "no citations")))
            .reply(Ok(SearchResponse {
                answer: Some("cited".to_string()),
                sources: Some(vec![Source {
                    title: Some("Doc".to_string()),
                    ..Default::default()
                }]),
                ..Default::default()
            }));
        let mut page = Page::new(backend);

        page.send("a").await;
        assert!(!page.state.sidebar_open());
        page.send("b").await;
        assert!(page.state.sidebar_open());
    }
}
