//! Chapter cache keys.
//!
//! A key is `{prefix}{version}-{chapter}`. Upstream identifiers may contain
//! `-` themselves (`de4e12af7f28f599-02`), so each component escapes `%` as
//! `%25` and `-` as `%2D` before joining. The single unescaped `-` is then
//! always the separator and distinct pairs can never share a key.
//! Identifiers without either character are written verbatim, which keeps
//! keys like `bible-ENGKJV-JHN.1` unchanged.

use std::fmt;

const SEPARATOR: char = '-';

/// Storage key for one `(version, chapter)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChapterKey {
    encoded: String,
}

impl ChapterKey {
    /// Build the key for `version_id` / `chapter_id` under `prefix`.
    pub fn new(prefix: &str, version_id: &str, chapter_id: &str) -> Self {
        let mut encoded =
            String::with_capacity(prefix.len() + version_id.len() + chapter_id.len() + 1);
        encoded.push_str(prefix);
        escape_into(&mut encoded, version_id);
        encoded.push(SEPARATOR);
        escape_into(&mut encoded, chapter_id);
        Self { encoded }
    }

    /// The key as stored.
    pub fn as_str(&self) -> &str {
        &self.encoded
    }
}

impl fmt::Display for ChapterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encoded)
    }
}

fn escape_into(out: &mut String, component: &str) {
    for c in component.chars() {
        match c {
            '%' => out.push_str("%25"),
            '-' => out.push_str("%2D"),
            other => out.push(other),
        }
    }
}
