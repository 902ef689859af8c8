use leptos::prelude::*;

use crate::chat::Message;
use crate::components::markdown::MarkdownRenderer;

#[component]
pub fn MessageBubble(message: Message, #[prop(into)] on_speak: Callback<String>) -> impl IntoView {
    let is_user = message.is_user();
    let anchor = message
        .original_query
        .clone()
        .filter(|_| message.is_follow_up);
    let content = message.content;

    view! {
        <div class=format!("flex {}", if is_user { "justify-end" } else { "justify-start" })>
            <div class="max-w-2xl">
                {anchor
                    .map(|query| {
                        view! {
                            <div class="text-xs text-gray-500 dark:text-gray-400 mb-1">
                                {format!("Follow-up to: \"{}\"", query)}
                            </div>
                        }
                    })}
                <div class=format!(
                    "rounded-lg px-4 py-3 text-sm shadow-md {}",
                    if is_user {
                        "bg-seafoam-600 dark:bg-seafoam-500 text-white"
                    } else {
                        "bg-white dark:bg-teal-700 text-gray-800 dark:text-gray-200"
                    },
                )>
                    {if is_user {
                        view! { <div class="whitespace-pre-wrap text-left">{content.clone()}</div> }
                            .into_any()
                    } else {
                        view! { <MarkdownRenderer content=content.clone() class="text-left" /> }
                            .into_any()
                    }}
                </div>
                {(!is_user)
                    .then(|| {
                        view! {
                            <button
                                class="mt-1 text-xs text-gray-500 dark:text-gray-400 hover:text-seafoam-600"
                                title="Read aloud"
                                on:click=move |_| on_speak.run(content.clone())
                            >
                                "Listen"
                            </button>
                        }
                    })}
            </div>
        </div>
    }
}
