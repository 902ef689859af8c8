use cfg_if::cfg_if;

cfg_if! {
    if #[cfg(feature = "ssr")] {
        use axum::extract::FromRef;
        use leptos::prelude::LeptosOptions;

        use crate::config::BackendConfig;

        #[derive(FromRef, Clone)]
        pub struct AppState {
            pub leptos_options: LeptosOptions,
            pub backend: SearchBackend,
        }

        /// Pooled HTTP client for the upstream search service.
        #[derive(Clone)]
        pub struct SearchBackend {
            pub client: reqwest::Client,
            pub base_url: String,
        }

        impl SearchBackend {
            pub fn new(config: &BackendConfig) -> Result<Self, reqwest::Error> {
                let client = reqwest::Client::builder()
                    .timeout(config.timeout)
                    .build()?;
                Ok(Self {
                    client,
                    base_url: config.base_url.clone(),
                })
            }
        }
    }
}
