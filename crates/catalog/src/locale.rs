//! Korean / English text selection.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    Ko,
    En,
}

impl Language {
    pub fn toggled(self) -> Self {
        match self {
            Language::Ko => Language::En,
            Language::En => Language::Ko,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Language::Ko => "ko",
            Language::En => "en",
        }
    }
}

/// A string with one variant per supported language.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Localized {
    pub ko: String,
    pub en: String,
}

impl Localized {
    pub fn new(ko: impl Into<String>, en: impl Into<String>) -> Self {
        Self { ko: ko.into(), en: en.into() }
    }

    /// Text for `lang`, falling back to the other language when empty.
    pub fn get(&self, lang: Language) -> &str {
        let (primary, fallback) = match lang {
            Language::Ko => (&self.ko, &self.en),
            Language::En => (&self.en, &self.ko),
        };
        if primary.is_empty() {
            fallback
        } else {
            primary
        }
    }
}

/// Pick between two literals by language.
pub fn t<'a>(lang: Language, ko: &'a str, en: &'a str) -> &'a str {
    match lang {
        Language::Ko => ko,
        Language::En => en,
    }
}
