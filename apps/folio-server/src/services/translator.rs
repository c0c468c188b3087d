//! UI string translation.
//!
//! Holds a small built-in message table and the currently selected locale.
//! Lookups fall back to English, then to the message key itself, so a missing
//! translation never breaks a caller.

use parking_lot::RwLock;

const FALLBACK_LOCALE: &str = "en";

fn message(locale: &str, key: &str) -> Option<&'static str> {
    match (locale, key) {
        ("en", "catalog.title") => Some("Library"),
        ("en", "download.pending") => Some("Waiting to download"),
        ("en", "download.done") => Some("Downloaded"),
        ("fr", "catalog.title") => Some("Bibliothèque"),
        ("fr", "download.pending") => Some("En attente de téléchargement"),
        ("fr", "download.done") => Some("Téléchargé"),
        _ => None,
    }
}

pub struct Translator {
    locale: RwLock<String>,
}

impl Translator {
    pub fn new(locale: &str) -> Self {
        Self {
            locale: RwLock::new(locale.to_owned()),
        }
    }

    pub fn locale(&self) -> String {
        self.locale.read().clone()
    }

    pub fn set_locale(&self, locale: &str) {
        *self.locale.write() = locale.to_owned();
    }

    pub fn translate(&self, key: &str) -> String {
        let locale = self.locale.read();
        message(&locale, key)
            .or_else(|| message(FALLBACK_LOCALE, key))
            .map(str::to_owned)
            .unwrap_or_else(|| key.to_owned())
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::new(FALLBACK_LOCALE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_in_current_locale_with_fallback() {
        let translator = Translator::default();
        assert_eq!(translator.translate("catalog.title"), "Library");

        translator.set_locale("fr");
        assert_eq!(translator.locale(), "fr");
        assert_eq!(translator.translate("catalog.title"), "Bibliothèque");

        // Locale without a table falls back to English, unknown keys echo.
        translator.set_locale("de");
        assert_eq!(translator.translate("catalog.title"), "Library");
        assert_eq!(translator.translate("no.such.key"), "no.such.key");
    }
}
