//! Speech capabilities of the search page.
//!
//! Both directions are optional platform features. They are acquired once
//! when the page mounts and asked for availability before every use.

use cfg_if::cfg_if;

use crate::error::ChatError;

pub const SPEECH_LANG: &str = "en-IN";

/// Speech-to-text.
pub trait SpeechInput {
    fn is_available(&self) -> bool;

    /// Starts one recognition session. `on_transcript` receives the first
    /// result; `on_end` runs when the session ends, with or without one.
    fn listen(
        &self,
        on_transcript: Box<dyn FnOnce(String)>,
        on_end: Box<dyn FnOnce()>,
    ) -> Result<(), ChatError>;
}

/// Text-to-speech.
pub trait SpeechOutput {
    fn is_available(&self) -> bool;
    fn speak(&self, text: &str) -> Result<(), ChatError>;
}

/// No speech support at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSpeech;

impl SpeechInput for NoSpeech {
    fn is_available(&self) -> bool {
        false
    }

    fn listen(
        &self,
        _on_transcript: Box<dyn FnOnce(String)>,
        _on_end: Box<dyn FnOnce()>,
    ) -> Result<(), ChatError> {
        Err(ChatError::SpeechUnavailable)
    }
}

impl SpeechOutput for NoSpeech {
    fn is_available(&self) -> bool {
        false
    }

    fn speak(&self, _text: &str) -> Result<(), ChatError> {
        Err(ChatError::Speech("speech synthesis is not available".to_string()))
    }
}

cfg_if! {
    if #[cfg(feature = "hydrate")] {
        use js_sys::{Array, Function, Reflect};
        use wasm_bindgen::closure::Closure;
        use wasm_bindgen::{JsCast, JsValue};
        use web_sys::{SpeechSynthesis, SpeechSynthesisUtterance};

        /// `SpeechRecognition` (or the `webkit` prefixed one), reached
        /// through reflection so no unstable web-sys bindings are needed.
        #[derive(Debug, Clone)]
        pub struct BrowserSpeechInput {
            recognition: Option<JsValue>,
        }

        impl BrowserSpeechInput {
            pub fn acquire() -> Self {
                let recognition = web_sys::window().and_then(|window| {
                    ["SpeechRecognition", "webkitSpeechRecognition"]
                        .iter()
                        .filter_map(|name| Reflect::get(&window, &JsValue::from_str(name)).ok())
                        .find(|ctor| ctor.is_function())
                        .and_then(|ctor| {
                            Reflect::construct(ctor.unchecked_ref::<Function>(), &Array::new()).ok()
                        })
                });
                if recognition.is_none() {
                    log::info!("speech recognition is not supported here");
                }
                Self { recognition }
            }
        }

        fn speech_error(value: JsValue) -> ChatError {
            ChatError::Speech(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
        }

        fn first_transcript(event: &JsValue) -> Option<String> {
            let results = Reflect::get(event, &JsValue::from_str("results")).ok()?;
            let result = Reflect::get_u32(&results, 0).ok()?;
            let alternative = Reflect::get_u32(&result, 0).ok()?;
            Reflect::get(&alternative, &JsValue::from_str("transcript"))
                .ok()?
                .as_string()
        }

        impl SpeechInput for BrowserSpeechInput {
            fn is_available(&self) -> bool {
                self.recognition.is_some()
            }

            fn listen(
                &self,
                on_transcript: Box<dyn FnOnce(String)>,
                on_end: Box<dyn FnOnce()>,
            ) -> Result<(), ChatError> {
                let recognition = self.recognition.as_ref().ok_or(ChatError::SpeechUnavailable)?;

                Reflect::set(recognition, &JsValue::from_str("lang"), &JsValue::from_str(SPEECH_LANG))
                    .map_err(speech_error)?;

                let on_result = Closure::once_into_js(move |event: JsValue| {
                    match first_transcript(&event) {
                        Some(transcript) => on_transcript(transcript),
                        None => log::warn!("speech result without a transcript"),
                    }
                });
                let on_error = Closure::once_into_js(move |event: JsValue| {
                    let reason = Reflect::get(&event, &JsValue::from_str("error"))
                        .ok()
                        .and_then(|e| e.as_string())
                        .unwrap_or_default();
                    log::warn!("speech recognition error: {}", reason);
                });
                let on_end = Closure::once_into_js(move || on_end());

                Reflect::set(recognition, &JsValue::from_str("onresult"), &on_result).map_err(speech_error)?;
                Reflect::set(recognition, &JsValue::from_str("onerror"), &on_error).map_err(speech_error)?;
                Reflect::set(recognition, &JsValue::from_str("onend"), &on_end).map_err(speech_error)?;

                let start = Reflect::get(recognition, &JsValue::from_str("start"))
                    .map_err(speech_error)?
                    .dyn_into::<Function>()
                    .map_err(speech_error)?;
                start.call0(recognition).map_err(speech_error)?;
                Ok(())
            }
        }

        #[derive(Debug, Clone)]
        pub struct BrowserSpeechOutput {
            synth: Option<SpeechSynthesis>,
        }

        impl BrowserSpeechOutput {
            pub fn acquire() -> Self {
                let synth = web_sys::window().and_then(|w| w.speech_synthesis().ok());
                Self { synth }
            }
        }

        impl SpeechOutput for BrowserSpeechOutput {
            fn is_available(&self) -> bool {
                self.synth.is_some()
            }

            fn speak(&self, text: &str) -> Result<(), ChatError> {
                let synth = self
                    .synth
                    .as_ref()
                    .ok_or_else(|| ChatError::Speech("speech synthesis is not available".to_string()))?;
                let utterance = SpeechSynthesisUtterance::new_with_text(text).map_err(speech_error)?;
                utterance.set_lang(SPEECH_LANG);
                synth.speak(&utterance);
                Ok(())
            }
        }
    }
}
