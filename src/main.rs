use cfg_if::cfg_if;

cfg_if! {
    if #[cfg(feature = "ssr")] {
        use axum::{
            body::Body as AxumBody,
            extract::State,
            http::Request,
            response::IntoResponse,
            routing::{get, post},
            Router,
        };
        use dotenv::dotenv;
        use env_logger::Env;
        use leptos::prelude::*;
        use leptos_axum::{generate_route_list, LeptosRoutes};
        use imigpt::api::{FOLLOW_UP_PATH, SEARCH_PATH};
        use imigpt::app::*;
        use imigpt::config::BackendConfig;
        use imigpt::handlers::{follow_up_handler, search_handler};
        use imigpt::state::{AppState, SearchBackend};

        #[tokio::main]
        async fn main() {
            dotenv().ok();
            env_logger::init_from_env(Env::default().default_filter_or("info"));

            let conf = get_configuration(None).unwrap();
            let leptos_options = conf.leptos_options;
            let addr = leptos_options.site_addr;
            let routes = generate_route_list(App);

            let backend_config = BackendConfig::from_env()
                .expect("search backend configuration is invalid");
            let backend = SearchBackend::new(&backend_config)
                .expect("failed to build the search backend client");
            log::info!("forwarding searches to {}", backend.base_url);

            let app_state = AppState {
                leptos_options: leptos_options.clone(),
                backend,
            };

            let app = Router::new()
                .route(SEARCH_PATH, get(search_handler))
                .route(FOLLOW_UP_PATH, post(follow_up_handler))
                .leptos_routes_with_handler(routes, get(|State(app_state): State<AppState>, request: Request<AxumBody>| async move {
                    let handler = leptos_axum::render_app_to_stream_with_context(
                        move || {
                            provide_context(app_state.clone());
                        },
                        move || shell(leptos_options.clone())
                    );
                    handler(request).await.into_response()
                }))
                .fallback(leptos_axum::file_and_error_handler::<AppState, _>(shell))
                .with_state(app_state);

            log::info!("Starting server at {}", addr);

            let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
            log::info!("listening on http://{}", &addr);
            axum::serve(listener, app.into_make_service()).await.unwrap();
        }
    } else {
        pub fn main() {
            // the page hydrates from lib.rs; there is no client-side main
        }
    }
}
