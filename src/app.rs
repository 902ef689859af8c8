use leptos::prelude::*;
use leptos_meta::{provide_meta_context, MetaTags, Stylesheet, Title};
use leptos_router::{
    components::{Route, Router, Routes},
    hooks::use_navigate,
    path,
};

use crate::components::search::QueryBox;
use crate::components::search_page::SearchPage;

pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8" />
                <meta name="viewport" content="width=device-width, initial-scale=1" />
                <AutoReload options=options.clone() />
                <HydrationScripts options />
                <MetaTags />
            </head>
            <body>
                <App />
            </body>
        </html>
    }
}

#[component]
pub fn App() -> impl IntoView {
    // Provides context that manages stylesheets, titles, meta tags, etc.
    provide_meta_context();

    view! {
        // id=leptos means cargo-leptos will hot-reload this stylesheet
        <Stylesheet id="leptos" href="/pkg/imigpt.css" />
        <Title text="imiGPT" />

        <Router>
            <main>
                <Routes fallback=NotFound>
                    <Route path=path!("") view=HomePage />
                    <Route path=path!("/search") view=SearchPage />
                </Routes>
            </main>
        </Router>
    }
}

#[component]
fn HomePage() -> impl IntoView {
    let navigate = StoredValue::new_local(use_navigate());
    let on_search = Callback::new(move |query: String| {
        let url = format!("/search?q={}", urlencoding::encode(&query));
        navigate.with_value(|navigate| navigate(&url, Default::default()));
    });

    view! {
        <div class="min-h-screen w-full bg-gray-100 dark:bg-teal-900 pt-24 px-4">
            <h1 class="text-4xl text-center text-teal-600 dark:text-mint-400 font-bold mb-2">"imiGPT"</h1>
            <p class="text-center text-gray-600 dark:text-gray-400 mb-8">
                "Search, then keep asking follow-up questions."
            </p>
            <QueryBox on_search=on_search />
        </div>
    }
}

#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="p-8 text-center text-gray-600 dark:text-gray-400">
            <h1 class="text-2xl font-bold mb-2">"Not Found"</h1>
            <a href="/" class="text-seafoam-600 hover:underline">"back to search"</a>
        </div>
    }
}
