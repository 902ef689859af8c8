use cfg_if::cfg_if;

use crate::chat::session::{Dispatch, Route};
use crate::error::ChatError;
use crate::types::SearchResponse;

pub const SEARCH_PATH: &str = "/api/search";
pub const FOLLOW_UP_PATH: &str = "/api/follow-up";

/// The two backend calls the search page makes.
#[allow(async_fn_in_trait)]
pub trait SearchApi {
    async fn search(&self, query: &str) -> Result<SearchResponse, ChatError>;
    async fn follow_up(&self, session_id: &str, query: &str) -> Result<SearchResponse, ChatError>;
}

pub fn search_url(base: &str, query: &str) -> String {
    format!("{}{}?q={}", base, SEARCH_PATH, urlencoding::encode(query))
}

/// Sends a dispatch to whichever endpoint its route names.
pub async fn execute<A: SearchApi>(
    api: &A,
    dispatch: &Dispatch,
) -> Result<SearchResponse, ChatError> {
    match &dispatch.route {
        Route::Search { query, attempt } => {
            log::info!("searching '{}' (attempt {})", query, attempt);
            api.search(query).await
        }
        Route::FollowUp { session_id, query } => {
            log::info!("follow-up in session {}: '{}'", session_id, query);
            api.follow_up(session_id, query).await
        }
    }
}

cfg_if! {
    if #[cfg(feature = "hydrate")] {
        use wasm_bindgen::{JsCast, JsValue};
        use wasm_bindgen_futures::JsFuture;
        use web_sys::{Headers, Request, RequestInit, Response};

        use crate::types::FollowUpRequest;

        /// Same-origin `fetch` against the page's own server.
        #[derive(Debug, Clone, Copy, Default)]
        pub struct BrowserSearchClient;

        impl SearchApi for BrowserSearchClient {
            async fn search(&self, query: &str) -> Result<SearchResponse, ChatError> {
                let request = Request::new_with_str(&search_url("", query)).map_err(js_error)?;
                let response = fetch(&request).await?;
                if !response.ok() {
                    return Err(ChatError::SearchFailed { status: response.status() });
                }
                read_json(response).await
            }

            async fn follow_up(&self, session_id: &str, query: &str) -> Result<SearchResponse, ChatError> {
                let body = serde_json::to_string(&FollowUpRequest {
                    session_id: session_id.to_string(),
                    query: query.to_string(),
                })
                .map_err(|e| ChatError::Decode(e.to_string()))?;

                let headers = Headers::new().map_err(js_error)?;
                headers.set("Content-Type", "application/json").map_err(js_error)?;

                let init = RequestInit::new();
                init.set_method("POST");
                init.set_headers(&headers);
                init.set_body(&JsValue::from_str(&body));

                let request = Request::new_with_str_and_init(FOLLOW_UP_PATH, &init).map_err(js_error)?;
                let response = fetch(&request).await?;
                if !response.ok() {
                    return Err(ChatError::FollowUpFailed { status: response.status() });
                }
                read_json(response).await
            }
        }

        async fn fetch(request: &Request) -> Result<Response, ChatError> {
            let window = web_sys::window()
                .ok_or_else(|| ChatError::Network("no window to fetch from".to_string()))?;
            let value = JsFuture::from(window.fetch_with_request(request))
                .await
                .map_err(js_error)?;
            value.dyn_into::<Response>().map_err(js_error)
        }

        async fn read_json(response: Response) -> Result<SearchResponse, ChatError> {
            let text = JsFuture::from(response.text().map_err(js_error)?)
                .await
                .map_err(js_error)?
                .as_string()
                .ok_or_else(|| ChatError::Decode("response body is not text".to_string()))?;
            serde_json::from_str(&text).map_err(|e| {
                log::error!("failed to parse search response: {}", e);
                ChatError::Decode(e.to_string())
            })
        }

        fn js_error(value: JsValue) -> ChatError {
            ChatError::Network(
                value
                    .as_string()
                    .unwrap_or_else(|| format!("{:?}", value)),
            )
        }
    } else {
        /// Stand-in for builds without a browser. Every call fails.
        #[derive(Debug, Clone, Copy, Default)]
        pub struct OfflineSearchClient;

        impl SearchApi for OfflineSearchClient {
            async fn search(&self, _query: &str) -> Result<SearchResponse, ChatError> {
                Err(ChatError::Network("search is only available in the browser".to_string()))
            }

            async fn follow_up(&self, _session_id: &str, _query: &str) -> Result<SearchResponse, ChatError> {
                Err(ChatError::Network("search is only available in the browser".to_string()))
            }
        }
    }
}
