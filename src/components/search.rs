use leptos::prelude::*;

/// Single-line query input used on the landing page.
#[component]
pub fn QueryBox(
    #[prop(into)] on_search: Callback<String>,
    #[prop(into, optional)] placeholder: Option<String>,
) -> impl IntoView {
    let (search_term, set_search_term) = signal(String::new());
    let placeholder = placeholder.unwrap_or_else(|| "Ask a question...".to_string());

    let submit = move || {
        let query = search_term.get_untracked().trim().to_string();
        if !query.is_empty() {
            on_search.run(query);
        }
    };

    let clear_search = move |_| set_search_term.set(String::new());

    view! {
        <div class="w-full max-w-2xl mx-auto mb-6">
            <div class="relative">
                <input
                    type="text"
                    placeholder=placeholder
                    prop:value=search_term
                    on:input=move |ev| set_search_term.set(event_target_value(&ev))
                    on:keydown=move |ev: web_sys::KeyboardEvent| {
                        if ev.key() == "Enter" {
                            ev.prevent_default();
                            submit();
                        }
                    }
                    class="w-full px-4 py-2 pr-10 text-gray-800 dark:text-gray-200
                    bg-white dark:bg-teal-800
                    border-2 border-teal-600 dark:border-seafoam-600
                    focus:border-seafoam-500 dark:focus:border-aqua-500
                    rounded-lg shadow-sm
                    focus:outline-none transition duration-0"
                />
                {move || {
                    (!search_term.get().is_empty())
                        .then(|| {
                            view! {
                                <button
                                    on:click=clear_search
                                    class="absolute right-3 top-1/2 -translate-y-1/2
                                    text-gray-400 hover:text-gray-600
                                    dark:text-gray-500 dark:hover:text-gray-300"
                                >
                                    <svg
                                        xmlns="http://www.w3.org/2000/svg"
                                        class="h-5 w-5"
                                        viewBox="0 0 20 20"
                                        fill="currentColor"
                                    >
                                        <path
                                            fill-rule="evenodd"
                                            d="M10 18a8 8 0 100-16 8 8 0 000 16zM8.707 7.293a1 1 0 00-1.414 1.414L8.586 10l-1.293 1.293a1 1 0 101.414 1.414L10 11.414l1.293 1.293a1 1 0 001.414-1.414L11.414 10l1.293-1.293a1 1 0 00-1.414-1.414L10 8.586 8.707 7.293z"
                                            clip-rule="evenodd"
                                        />
                                    </svg>
                                </button>
                            }
                        })
                }}
            </div>
            <button
                class="mt-3 px-4 py-1.5 text-sm rounded-md bg-seafoam-600 dark:bg-seafoam-500 text-white
                hover:bg-seafoam-700 dark:hover:bg-seafoam-600 transition-colors
                disabled:bg-gray-400 disabled:cursor-not-allowed"
                prop:disabled=move || search_term.get().trim().is_empty()
                on:click=move |_| submit()
            >
                "Search"
            </button>
        </div>
    }
}
