use leptos::prelude::*;
use leptos_router::components::A;

#[component]
pub fn Navbar(
    #[prop(into)] on_toggle_sources: Callback<()>,
    #[prop(into)] on_clear: Callback<()>,
) -> impl IntoView {
    view! {
        <div class="sticky top-0 z-10 flex justify-between items-center bg-white dark:bg-teal-800 border-b border-gray-200 dark:border-teal-700 px-6 py-4 shadow-sm">
            <div class="flex items-center gap-4">
                <A href="/" attr:class="text-sm text-teal-600 dark:text-mint-400 hover:text-teal-800 dark:hover:text-mint-300">
                    "back"
                </A>
                <h1 class="text-xl font-semibold text-gray-800 dark:text-gray-200">"imiGPT"</h1>
            </div>
            <div class="flex items-center gap-3">
                <button
                    class="px-3 py-1 text-sm bg-gray-500 hover:bg-gray-600 text-white rounded-md transition-colors"
                    on:click=move |_| on_clear.run(())
                >
                    "Clear Chat"
                </button>
                <button
                    class="px-3 py-1 text-sm rounded-md border border-teal-600 text-teal-600 dark:text-aqua-400 hover:text-seafoam-600"
                    on:click=move |_| on_toggle_sources.run(())
                >
                    "sources"
                </button>
            </div>
        </div>
    }
}
