//! Content records returned by the upstream scripture API.
//!
//! These are pass-through DTOs: they are deserialized from upstream JSON and
//! never mutated locally. Field names follow the upstream camelCase shape.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Upstream response wrapper. Every endpoint answers `{ "data": ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn into_data(self) -> T {
        self.data
    }
}

/// Language a version is published in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
}

/// A scripture version (translation).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentVersion {
    pub id: String,
    pub name: String,
    pub language: Language,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abbreviation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ContentVersion {
    /// Case-insensitive match on the language display name.
    pub fn is_in_language(&self, name: &str) -> bool {
        self.language.name.eq_ignore_ascii_case(name.trim())
    }
}

/// A book within a version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    #[serde(default)]
    pub bible_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abbreviation: Option<String>,
}

/// A chapter within a book. `number` is a string upstream because intros
/// are listed as `"intro"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub id: String,
    #[serde(default)]
    pub bible_id: String,
    #[serde(default)]
    pub book_id: String,
    pub number: String,
    pub reference: String,
}

impl Chapter {
    /// Ordinal chapter number, or `None` for intros and other non-numeric entries.
    pub fn ordinal(&self) -> Option<u32> {
        self.number.trim().parse().ok()
    }
}

/// Chapter text as returned by the upstream API.
///
/// Only `content` is interpreted. Every other upstream field is kept as-is
/// in `extra` so a stored body reads back exactly as it was fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bible_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChapterBody {
    /// A body carrying only content.
    pub fn from_content(content: impl Into<String>) -> Self {
        Self {
            id: None,
            bible_id: None,
            book_id: None,
            reference: None,
            content: content.into(),
            copyright: None,
            extra: Map::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chapter_body_keeps_unknown_fields() {
        let raw = r#"{
            "id": "ENGKJV.JHN.1",
            "bibleId": "ENGKJV",
            "bookId": "JHN",
            "reference": "John 1",
            "content": "<p>In the beginning was the Word</p>",
            "verseCount": 51,
            "next": { "id": "JHN.2", "number": "2" }
        }"#;
        let body: ChapterBody = serde_json::from_str(raw).unwrap();
        assert_eq!(body.book_id.as_deref(), Some("JHN"));
        assert_eq!(body.extra.get("verseCount"), Some(&Value::from(51)));

        let again: ChapterBody =
            serde_json::from_str(&serde_json::to_string(&body).unwrap()).unwrap();
        assert_eq!(again, body);
    }

    #[test]
    fn test_chapter_body_content_only() {
        let body: ChapterBody =
            serde_json::from_str(r#"{"content":"<p>In the beginning...</p>"}"#).unwrap();
        assert_eq!(body, ChapterBody::from_content("<p>In the beginning...</p>"));
    }

    #[test]
    fn test_chapter_body_requires_content() {
        let result = serde_json::from_str::<ChapterBody>(r#"{"id":"JHN.1"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_version_envelope_list() {
        let raw = r#"{"data":[{
            "id": "de4e12af7f28f599-02",
            "name": "King James (Authorised) Version",
            "abbreviation": "engKJV",
            "language": { "id": "eng", "name": "English" }
        }]}"#;
        let envelope: Envelope<Vec<ContentVersion>> = serde_json::from_str(raw).unwrap();
        let versions = envelope.into_data();
        assert_eq!(versions.len(), 1);
        assert!(versions[0].is_in_language("english"));
        assert!(!versions[0].is_in_language("Spanish"));
    }

    #[test]
    fn test_chapter_ordinal() {
        let chapter = Chapter {
            id: "JHN.3".to_string(),
            bible_id: "ENGKJV".to_string(),
            book_id: "JHN".to_string(),
            number: "3".to_string(),
            reference: "John 3".to_string(),
        };
        assert_eq!(chapter.ordinal(), Some(3));

        let intro = Chapter {
            number: "intro".to_string(),
            ..chapter
        };
        assert_eq!(intro.ordinal(), None);
    }
}

#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_numeric_chapter_numbers_have_ordinals(n in any::<u32>()) {
            let chapter = Chapter {
                id: format!("JHN.{n}"),
                bible_id: String::new(),
                book_id: "JHN".to_string(),
                number: n.to_string(),
                reference: format!("John {n}"),
            };
            prop_assert_eq!(chapter.ordinal(), Some(n));
        }

        #[test]
        fn prop_content_survives_serialization(content in "\\PC{0,200}") {
            let body = ChapterBody::from_content(content.clone());
            let raw = serde_json::to_string(&body).expect("serialize should succeed");
            let back: ChapterBody = serde_json::from_str(&raw).expect("deserialize should succeed");
            prop_assert_eq!(back.content, content);
        }
    }
}
