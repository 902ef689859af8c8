use cfg_if::cfg_if;

use crate::storage::ConversationStore;

cfg_if! {
    if #[cfg(feature = "hydrate")] {
        pub type PlatformStorage = crate::storage::BrowserStorage;
        pub type PlatformSearch = crate::api::BrowserSearchClient;
        pub type PlatformSpeechInput = crate::voice::BrowserSpeechInput;
        pub type PlatformSpeechOutput = crate::voice::BrowserSpeechOutput;

        fn acquire_speech() -> (PlatformSpeechInput, PlatformSpeechOutput) {
            (
                crate::voice::BrowserSpeechInput::acquire(),
                crate::voice::BrowserSpeechOutput::acquire(),
            )
        }
    } else {
        pub type PlatformStorage = crate::storage::MemoryStorage;
        pub type PlatformSearch = crate::api::OfflineSearchClient;
        pub type PlatformSpeechInput = crate::voice::NoSpeech;
        pub type PlatformSpeechOutput = crate::voice::NoSpeech;

        fn acquire_speech() -> (PlatformSpeechInput, PlatformSpeechOutput) {
            (crate::voice::NoSpeech, crate::voice::NoSpeech)
        }
    }
}

/// Everything the search page needs from its host, acquired once on mount.
pub struct Platform {
    pub store: ConversationStore<PlatformStorage>,
    pub search: PlatformSearch,
    pub speech_input: PlatformSpeechInput,
    pub speech_output: PlatformSpeechOutput,
}

impl Platform {
    pub fn acquire() -> Self {
        let (speech_input, speech_output) = acquire_speech();
        Self {
            store: ConversationStore::new(PlatformStorage::default()),
            search: PlatformSearch::default(),
            speech_input,
            speech_output,
        }
    }
}
