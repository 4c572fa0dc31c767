//! Session configuration — display language

use mb_core::Language;

use crate::store::{KEY_LANGUAGE, SharedStore};

/// Owner of the persisted language choice
pub struct SessionConfig {
    language: Language,
    store: SharedStore,
}

impl SessionConfig {
    /// Load the stored language, defaulting to Korean
    pub fn load(store: SharedStore) -> Self {
        let language = match store.get(KEY_LANGUAGE) {
            Some(code) => code.parse::<Language>().unwrap_or_else(|e| {
                log::warn!("[Session] {}, using default", e);
                Language::default()
            }),
            None => Language::default(),
        };
        Self { language, store }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Switch language and persist the choice
    pub fn set_language(&mut self, language: Language) {
        self.language = language;
        if let Err(e) = self.store.set(KEY_LANGUAGE, language.code()) {
            log::warn!("[Session] Failed to persist language: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{KeyValueStore, MemoryStore};

    #[test]
    fn test_default_language() {
        let config = SessionConfig::load(MemoryStore::shared());
        assert_eq!(config.language(), Language::Kr);
    }

    #[test]
    fn test_language_persists() {
        let store = MemoryStore::shared();
        let mut config = SessionConfig::load(store.clone());
        config.set_language(Language::Ja);
        assert_eq!(store.get(KEY_LANGUAGE).as_deref(), Some("JA"));
        assert_eq!(SessionConfig::load(store).language(), Language::Ja);
    }

    #[test]
    fn test_unknown_code_falls_back() {
        let store = MemoryStore::shared();
        store.set(KEY_LANGUAGE, "XX").unwrap();
        assert_eq!(SessionConfig::load(store).language(), Language::Kr);
    }
}
