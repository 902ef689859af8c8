use crate::types::SearchResponse;

/// Backend conversational context. `id` stays empty until a search response
/// hands one out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub id: Option<String>,
    pub original_query: Option<String>,
}

impl Session {
    pub fn is_active(&self) -> bool {
        self.id.is_some()
    }
}

/// Which endpoint a submitted query goes to.
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    /// `attempt` is the retry counter at dispatch time, so resubmitting the
    /// current query yields a dispatch distinct from the one before it.
    Search { query: String, attempt: u32 },
    FollowUp { session_id: String, query: String },
}

/// A request the page is about to send, tagged with the session epoch it
/// was issued under.
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatch {
    pub route: Route,
    pub epoch: u64,
}

impl Dispatch {
    pub fn query(&self) -> &str {
        match &self.route {
            Route::Search { query, .. } | Route::FollowUp { query, .. } => query,
        }
    }

    pub fn is_follow_up(&self) -> bool {
        matches!(self.route, Route::FollowUp { .. })
    }

    /// Page URL to reflect a top-level search into, if this is one.
    pub fn page_url(&self) -> Option<String> {
        match &self.route {
            Route::Search { query, .. } => {
                Some(format!("/search?q={}", urlencoding::encode(query)))
            }
            Route::FollowUp { .. } => None,
        }
    }
}

/// Decides between a new search and a follow-up, and owns the search
/// bookkeeping (current query, retry counter, epoch).
#[derive(Debug, Clone, Default)]
pub struct SessionResolver {
    session: Session,
    search_query: Option<String>,
    retry_counter: u32,
    epoch: u64,
}

impl SessionResolver {
    pub fn resolve(&mut self, query: &str) -> Dispatch {
        match self.session.id.clone() {
            Some(session_id) => Dispatch {
                route: Route::FollowUp {
                    session_id,
                    query: query.to_string(),
                },
                epoch: self.epoch,
            },
            None => self.start_search(query),
        }
    }

    /// Top-level search path. Repeating the current query forces a refetch;
    /// anything else drops the session and starts over.
    pub fn start_search(&mut self, query: &str) -> Dispatch {
        if self.search_query.as_deref() == Some(query) {
            self.retry_counter += 1;
        } else {
            self.reset();
            self.search_query = Some(query.to_string());
        }

        Dispatch {
            route: Route::Search {
                query: query.to_string(),
                attempt: self.retry_counter,
            },
            epoch: self.epoch,
        }
    }

    /// Adopts the session id from a successful search response.
    pub fn accept(&mut self, dispatch: &Dispatch, response: &SearchResponse) {
        let Route::Search { query, .. } = &dispatch.route else {
            return;
        };
        if let Some(id) = response.session_id.as_deref().filter(|id| !id.is_empty()) {
            log::info!("adopting search session {}", id);
            self.session.id = Some(id.to_string());
            if self.session.original_query.is_none() {
                self.session.original_query = Some(query.clone());
            }
        }
    }

    pub fn is_current(&self, dispatch: &Dispatch) -> bool {
        dispatch.epoch == self.epoch
    }

    pub fn reset(&mut self) {
        self.session = Session::default();
        self.epoch += 1;
    }

    pub fn clear(&mut self) {
        self.reset();
        self.search_query = None;
        self.retry_counter = 0;
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn search_query(&self) -> Option<&str> {
        self.search_query.as_deref()
    }

    pub fn retry_counter(&self) -> u32 {
        self.retry_counter
    }
}
