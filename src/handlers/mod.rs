#[cfg(feature = "ssr")]
mod search_proxy;
#[cfg(feature = "ssr")]
pub use search_proxy::*;
