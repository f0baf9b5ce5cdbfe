use serde::{Deserialize, Serialize};

/// localStorage key holding the user's language choice.
pub const LOCALE_STORAGE_KEY: &str = "preferred-locale";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locale(String);

impl Default for Locale {
    fn default() -> Self {
        Locale("nl".to_string())
    }
}

impl Locale {
    pub fn new(tag: impl Into<String>) -> Self {
        let tag = tag.into();
        if tag.trim().is_empty() {
            Locale::default()
        } else {
            Locale(tag.trim().to_string())
        }
    }

    /// Two-letter prefix of a browser language tag, e.g. `en-GB` -> `en`.
    pub fn from_navigator(language: &str) -> Self {
        Locale::new(language.chars().take(2).collect::<String>())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `Accept-Language` value in the `xx-XX` form the backend expects.
    /// Tags that already carry a region are passed through.
    pub fn accept_language(&self) -> String {
        if self.0.contains('-') {
            self.0.clone()
        } else {
            format!("{}-{}", self.0, self.0.to_uppercase())
        }
    }

    /// Reads the persisted preference, falling back to the browser language.
    /// Called once at startup; the result is provided as context. Outside the
    /// browser this is always the default.
    #[cfg(target_arch = "wasm32")]
    pub fn load_preference() -> Self {
        let Some(window) = web_sys::window() else {
            return Locale::default();
        };
        let stored = window
            .local_storage()
            .ok()
            .flatten()
            .and_then(|storage| storage.get_item(LOCALE_STORAGE_KEY).ok().flatten());
        match stored {
            Some(tag) => Locale::new(tag),
            None => window
                .navigator()
                .language()
                .map(|lang| Locale::from_navigator(&lang))
                .unwrap_or_default(),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_preference() -> Self {
        Locale::default()
    }

    pub fn persist(&self) {
        if let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) {
            if let Err(e) = storage.set_item(LOCALE_STORAGE_KEY, &self.0) {
                log::warn!("Failed to persist locale: {e:?}");
            }
        }
    }
}
