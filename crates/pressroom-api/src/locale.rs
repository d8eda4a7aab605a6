use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ApiError;

/// Locale whose content lives directly on the `News` entity. Translations
/// are always relative to it and never stored under it.
pub const SOURCE_LOCALE: &str = "en";

/// Locales a `NewsTranslation` row may be stored under.
///
/// Must stay in sync between client and handler code; both consume this
/// constant.
pub const SUPPORTED_LOCALES: [Locale; 3] = [Locale::Pt, Locale::Es, Locale::Fr];

/// A supported translation locale (the source locale `en` is deliberately
/// not a variant; it is represented by the `News` row itself).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    Pt,
    Es,
    Fr,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::Pt => "pt",
            Locale::Es => "es",
            Locale::Fr => "fr",
        }
    }

    /// Parse a locale tag, rejecting anything outside the supported set.
    ///
    /// The source locale is not parseable here; callers that accept `en`
    /// check for it before the translation lookup.
    pub fn parse(tag: &str) -> Result<Self, ApiError> {
        match tag {
            "pt" => Ok(Locale::Pt),
            "es" => Ok(Locale::Es),
            "fr" => Ok(Locale::Fr),
            other => Err(ApiError::validation(format!(
                "Unsupported locale: {other}. Supported: {}",
                supported_tags().join(", ")
            ))),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn supported_tags() -> Vec<&'static str> {
    SUPPORTED_LOCALES.iter().map(|l| l.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_supported_locales() {
        assert_eq!(Locale::parse("pt").unwrap(), Locale::Pt);
        assert_eq!(Locale::parse("es").unwrap(), Locale::Es);
        assert_eq!(Locale::parse("fr").unwrap(), Locale::Fr);
    }

    #[test]
    fn rejects_source_and_unknown_locales() {
        assert!(matches!(
            Locale::parse("en"),
            Err(ApiError::Validation { .. })
        ));
        assert!(matches!(
            Locale::parse("de"),
            Err(ApiError::Validation { .. })
        ));
    }

    #[test]
    fn serializes_as_lowercase_tag() {
        assert_eq!(serde_json::to_string(&Locale::Pt).unwrap(), "\"pt\"");
        let back: Locale = serde_json::from_str("\"fr\"").unwrap();
        assert_eq!(back, Locale::Fr);
    }
}
