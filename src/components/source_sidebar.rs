use leptos::prelude::*;

use crate::chat::Message;
use crate::types::Source;

const EXCERPT_CHARS: usize = 50;

/// Sources of one bot message, as listed in the sidebar.
#[derive(Debug, Clone, PartialEq)]
pub struct SidebarEntry {
    pub excerpt: String,
    pub sources: Vec<Source>,
}

pub fn sidebar_entries(messages: &[Message]) -> Vec<SidebarEntry> {
    messages
        .iter()
        .filter(|message| message.has_sources())
        .map(|message| SidebarEntry {
            excerpt: format!(
                "{}...",
                message.content.chars().take(EXCERPT_CHARS).collect::<String>()
            ),
            sources: message.sources.clone().unwrap_or_default(),
        })
        .collect()
}

fn source_title(source: &Source, index: usize) -> String {
    source
        .title
        .clone()
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| format!("Source {}", index + 1))
}

#[component]
pub fn SourceSidebar(
    #[prop(into)] messages: Signal<Vec<Message>>,
    #[prop(into)] open: Signal<bool>,
    #[prop(into)] on_close: Callback<()>,
) -> impl IntoView {
    let entries = Memo::new(move |_| messages.with(|msgs| sidebar_entries(msgs)));

    move || {
        let entries = entries.get();
        (open.get() && !entries.is_empty()).then(|| {
            view! {
                <aside class="w-[300px] flex-shrink-0 h-full p-4 bg-gray-50 dark:bg-teal-900 border-l border-gray-200 dark:border-teal-700 overflow-y-auto">
                    <div class="flex justify-between items-center mb-4">
                        <h2 class="text-lg font-medium text-gray-800 dark:text-gray-200">"Sources"</h2>
                        <button
                            class="text-sm text-gray-600 dark:text-gray-300 hover:text-seafoam-600"
                            on:click=move |_| on_close.run(())
                        >
                            "Close"
                        </button>
                    </div>
                    {entries
                        .into_iter()
                        .map(|entry| {
                            view! {
                                <div class="mb-4">
                                    <p class="text-xs text-gray-500 dark:text-gray-400 mb-2">
                                        {entry.excerpt}
                                    </p>
                                    {entry
                                        .sources
                                        .iter()
                                        .enumerate()
                                        .map(|(index, source)| {
                                            let title = source_title(source, index);
                                            view! {
                                                <div class="bg-white dark:bg-teal-800 rounded-md p-2 mb-2 shadow-sm text-xs">
                                                    <p class="font-medium text-gray-800 dark:text-gray-200">
                                                        {title}
                                                    </p>
                                                    {source
                                                        .url
                                                        .clone()
                                                        .map(|url| {
                                                            view! {
                                                                <a
                                                                    href=url.clone()
                                                                    target="_blank"
                                                                    rel="noopener noreferrer"
                                                                    class="text-seafoam-600 dark:text-seafoam-400 hover:underline truncate block"
                                                                >
                                                                    {url.clone()}
                                                                </a>
                                                            }
                                                        })}
                                                </div>
                                            }
                                        })
                                        .collect_view()}
                                </div>
                            }
                        })
                        .collect_view()}
                </aside>
            }
        })
    }
}
