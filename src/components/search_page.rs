use cfg_if::cfg_if;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_query_map;

use crate::api::execute;
use crate::chat::{ChatState, Completion, Dispatch, Message, SeedTrigger};
use crate::components::message_bubble::MessageBubble;
use crate::components::navbar::Navbar;
use crate::components::source_sidebar::SourceSidebar;
use crate::error::ChatError;
use crate::platform::Platform;
use crate::voice::{SpeechInput, SpeechOutput};

// pushState, so the router does not treat our own search as navigation
fn reflect_in_url(url: &str) {
    cfg_if! {
        if #[cfg(feature = "hydrate")] {
            if let Some(history) = web_sys::window().and_then(|w| w.history().ok()) {
                if let Err(e) = history.push_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(url)) {
                    log::warn!("could not update the page url: {:?}", e);
                }
            }
        } else {
            let _ = url;
        }
    }
}

#[component]
pub fn SearchPage() -> impl IntoView {
    let chat = RwSignal::new(ChatState::default());
    let (current_input, set_current_input) = signal(String::new());
    let (notice, set_notice) = signal(Option::<String>::None);
    let (restored, set_restored) = signal(false);
    let opened_with_query = StoredValue::new(true);
    let platform = StoredValue::new_local(Platform::acquire());
    let messages_end = NodeRef::<leptos::html::Div>::new();
    let query = use_query_map();

    let messages = Memo::new(move |_| chat.with(|state| state.messages().to_vec()));
    let is_submitting = Memo::new(move |_| chat.with(|state| state.is_submitting()));
    let is_listening = Memo::new(move |_| chat.with(|state| state.is_listening()));
    let sidebar_open = Memo::new(move |_| chat.with(|state| state.sidebar_open()));

    // history lives in the browser, so it is restored after hydration
    Effect::new(move |_| {
        let stored = platform.with_value(|p| p.store.load());
        log::info!("restored {} messages", stored.len());
        chat.update(|state| state.restore(stored));
        set_restored.set(true);
    });

    Effect::new(move |_| {
        if !restored.get() {
            return;
        }
        messages.with(|msgs| {
            if let Err(e) = platform.with_value(|p| p.store.persist(msgs)) {
                log::error!("failed to persist conversation: {}", e);
            }
        });
        if let Some(end) = messages_end.get() {
            end.scroll_into_view();
        }
    });

    let run = move |dispatch: Dispatch| {
        if let Some(url) = dispatch.page_url() {
            reflect_in_url(&url);
        }
        let search = platform.with_value(|p| p.search);

        spawn_local(async move {
            let result = execute(&search, &dispatch).await;
            match chat.try_update(|state| state.complete(&dispatch, result)) {
                Some(Completion::Discarded) => {
                    log::info!("dropped a response for an abandoned session")
                }
                Some(_) => {}
                None => log::warn!("search page went away before the response arrived"),
            }
        });
    };

    // the first `q` seen after restoring comes from opening the page
    Effect::new(move |_| {
        let url_query = query.with(|params| params.get("q")).unwrap_or_default();
        if !restored.get() {
            return;
        }
        let trigger = if opened_with_query.get_value() {
            opened_with_query.set_value(false);
            SeedTrigger::Mount
        } else {
            SeedTrigger::Navigation
        };
        let dispatch = chat
            .try_update(|state| {
                if state.should_seed(&url_query, trigger) {
                    state.search(&url_query).ok()
                } else {
                    None
                }
            })
            .flatten();
        if let Some(dispatch) = dispatch {
            run(dispatch);
        }
    });

    let submit_text = move |text: String| match chat.try_update(|state| state.submit(&text)) {
        Some(Ok(dispatch)) => {
            set_current_input.set(String::new());
            run(dispatch);
        }
        Some(Err(ChatError::EmptyQuery)) | None => {}
        Some(Err(e)) => log::warn!("message not sent: {}", e),
    };

    let send_message = move || submit_text(current_input.get_untracked());

    let handle_key_press = move |ev: web_sys::KeyboardEvent| {
        if ev.key() == "Enter" && !ev.shift_key() {
            ev.prevent_default();
            send_message();
        }
    };

    let start_listening = move || {
        let available = platform.with_value(|p| SpeechInput::is_available(&p.speech_input));
        match chat.try_update(|state| state.begin_listening(available)) {
            Some(Ok(())) => {}
            Some(Err(e @ ChatError::SpeechUnavailable)) => {
                set_notice.set(Some(e.to_string()));
                return;
            }
            _ => return,
        }

        let started = platform.with_value(|p| {
            p.speech_input.listen(
                Box::new(move |transcript: String| {
                    set_current_input.set(transcript.clone());
                    match chat.try_update(|state| state.finish_listening(&transcript)) {
                        Some(Ok(dispatch)) => {
                            set_current_input.set(String::new());
                            run(dispatch);
                        }
                        Some(Err(e)) => log::warn!("transcript not sent: {}", e),
                        None => {}
                    }
                }),
                Box::new(move || {
                    chat.try_update(|state| state.cancel_listening());
                }),
            )
        });
        if let Err(e) = started {
            log::error!("could not start speech recognition: {}", e);
            chat.update(|state| state.cancel_listening());
            set_notice.set(Some(e.to_string()));
        }
    };

    let speak = Callback::new(move |text: String| {
        if let Err(e) = platform.with_value(|p| p.speech_output.speak(&text)) {
            log::warn!("could not read message aloud: {}", e);
            set_notice.set(Some(e.to_string()));
        }
    });

    let toggle_sources = Callback::new(move |_: ()| chat.update(|state| state.toggle_sidebar()));
    let close_sources = Callback::new(move |_: ()| {
        chat.update(|state| state.set_sidebar_open(false))
    });
    let clear_chat = Callback::new(move |_: ()| {
        chat.update(|state| state.clear());
        set_current_input.set(String::new());
    });

    view! {
        <div class="min-h-screen flex flex-col bg-gray-100 dark:bg-teal-900 text-gray-800 dark:text-gray-200">
            <Navbar on_toggle_sources=toggle_sources on_clear=clear_chat />

            {move || {
                notice
                    .get()
                    .map(|text| {
                        view! {
                            <div class="flex justify-between items-center px-6 py-2 text-sm bg-salmon-100 text-salmon-800">
                                <span>{text}</span>
                                <button on:click=move |_| set_notice.set(None)>"Dismiss"</button>
                            </div>
                        }
                    })
            }}

            <div class="flex flex-1 overflow-hidden">
                <div class="flex-1 overflow-y-auto p-4">
                    <div class="max-w-4xl mx-auto space-y-6">
                        {move || {
                            if messages.with(Vec::is_empty) && !is_submitting.get() {
                                view! {
                                    <div class="flex items-center justify-center min-h-[50vh] text-center">
                                        <div class="max-w-md space-y-4">
                                            <h2 class="text-2xl font-bold">"Welcome"</h2>
                                            <p class="text-gray-600 dark:text-gray-400">
                                                "Ask me anything, and I’ll provide helpful answers!"
                                            </p>
                                        </div>
                                    </div>
                                }
                                    .into_any()
                            } else {
                                view! {
                                    <For
                                        each=move || messages.get().into_iter().enumerate()
                                        key=|(index, message): &(usize, Message)| {
                                            (*index, message.role, message.content.clone())
                                        }
                                        children=move |(_, message)| {
                                            view! { <MessageBubble message=message on_speak=speak /> }
                                        }
                                    />
                                }
                                    .into_any()
                            }
                        }}
                        <div node_ref=messages_end></div>
                    </div>
                </div>

                <SourceSidebar messages=messages open=sidebar_open on_close=close_sources />
            </div>

            <div class="sticky bottom-0 z-10 p-4 border-t border-gray-200 dark:border-teal-700 bg-white dark:bg-teal-800 shadow-lg">
                <div class="max-w-4xl mx-auto flex items-end gap-2">
                    <button
                        class=move || {
                            format!(
                                "px-3 py-2 text-sm rounded-md border border-gray-300 dark:border-teal-600 {}",
                                if is_listening.get() { "bg-seafoam-100 dark:bg-teal-600" } else { "" },
                            )
                        }
                        title="Speak your question"
                        on:click=move |_| start_listening()
                        prop:disabled=move || is_submitting.get() || is_listening.get()
                    >
                        {move || if is_listening.get() { "Listening..." } else { "Mic" }}
                    </button>
                    <div class="relative flex-1">
                        <textarea
                            class="w-full p-3 border border-gray-300 dark:border-teal-600 rounded-lg
                            bg-white dark:bg-teal-700 text-gray-800 dark:text-gray-200
                            focus:outline-none focus:ring-2 focus:ring-seafoam-500 dark:focus:ring-aqua-400
                            resize-none placeholder-gray-400 dark:placeholder-gray-500"
                            placeholder="Ask a question... (Enter to send, Shift+Enter for new line)"
                            rows="1"
                            prop:value=current_input
                            on:input=move |ev| set_current_input.set(event_target_value(&ev))
                            on:keydown=handle_key_press
                            prop:disabled=move || is_submitting.get() || is_listening.get()
                        ></textarea>
                        {move || {
                            is_submitting
                                .get()
                                .then(|| {
                                    view! {
                                        <div class="absolute right-3 bottom-3 flex space-x-1">
                                            <div class="h-2 w-2 bg-seafoam-500 rounded-full animate-bounce"></div>
                                            <div class="h-2 w-2 bg-seafoam-500 rounded-full animate-bounce [animation-delay:200ms]"></div>
                                            <div class="h-2 w-2 bg-seafoam-500 rounded-full animate-bounce [animation-delay:400ms]"></div>
                                        </div>
                                    }
                                })
                        }}
                    </div>
                    <button
                        class="px-6 py-2 bg-seafoam-600 dark:bg-seafoam-500 text-white rounded-lg
                        hover:bg-seafoam-700 dark:hover:bg-seafoam-600 transition-colors
                        disabled:bg-gray-400 dark:disabled:bg-gray-600 disabled:cursor-not-allowed"
                        on:click=move |_| send_message()
                        prop:disabled=move || {
                            is_submitting.get() || is_listening.get()
                                || current_input.get().trim().is_empty()
                        }
                    >
                        "Send"
                    </button>
                </div>
            </div>
        </div>
    }
}
