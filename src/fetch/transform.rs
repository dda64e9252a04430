//! ダウンロードした Markdown の変換
//!
//! リモートのドキュメントは最初の見出しの前にバッジなどを含むことが多い。
//! 最初の `#` より前を取り除き、表示用メタデータがあれば YAML フロントマターを先頭に付ける。

use crate::directive::ImportRequest;
use crate::error::Result;
use serde::Serialize;

/// 本文の前に出力するフロントマター
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrontMatter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hide: Vec<String>,
}

impl FrontMatter {
    /// 表示用メタデータがなければ None
    pub fn from_request(request: &ImportRequest) -> Option<Self> {
        request.has_front_matter().then(|| Self {
            icon: request.icon.clone(),
            hide: request.hide.clone(),
        })
    }

    /// `---` で囲んだブロック（末尾の空行を含む）
    pub fn render(&self) -> Result<String> {
        let yaml = serde_yaml::to_string(self)?;
        Ok(format!("---\n{yaml}---\n\n"))
    }
}

/// 最初の `#` より前を取り除く
///
/// `#` を含まない場合は空文字列。
pub fn strip_badges(text: &str) -> &str {
    text.find('#').map_or("", |start| &text[start..])
}

/// リモートから取得したテキストに適用する変換
pub fn apply(text: &str, request: &ImportRequest) -> Result<String> {
    let body = strip_badges(text);
    match FrontMatter::from_request(request) {
        Some(front_matter) => Ok(front_matter.render()? + body),
        None => Ok(body.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn request(icon: Option<&str>, hide: &[&str]) -> ImportRequest {
        ImportRequest {
            name: "Guide".to_string(),
            source: "https://example.com/doc.md".to_string(),
            destination: "guide/doc.md".to_string(),
            icon: icon.map(str::to_string),
            hide: hide.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_strip_badges_drops_preamble() {
        let text = "[![CI](https://img.shields.io/badge.svg)](https://ci)\n\n# Title\nBody #2";
        assert_eq!(strip_badges(text), "# Title\nBody #2");
    }

    #[test]
    fn test_strip_badges_without_hash_is_empty() {
        assert_eq!(strip_badges("no heading here"), "");
        assert_eq!(strip_badges(""), "");
    }

    #[test]
    fn test_strip_badges_hash_at_start() {
        assert_eq!(strip_badges("# Already clean"), "# Already clean");
    }

    #[test]
    fn test_apply_without_metadata_has_no_header() {
        let out = apply("badge\n# Title\n", &request(None, &[])).unwrap();
        assert_eq!(out, "# Title\n");
    }

    #[test]
    fn test_apply_with_icon_and_hide() {
        let out = apply("badge\n# Title\n", &request(Some("book"), &["toc", "nav"])).unwrap();

        let (header, body) = out
            .strip_prefix("---\n")
            .and_then(|rest| rest.split_once("---\n\n"))
            .unwrap();
        assert_eq!(body, "# Title\n");

        let lines: Vec<&str> = header.lines().collect();
        assert_eq!(lines[0], "icon: book");
        assert_eq!(lines[1], "hide:");
        assert_eq!(lines[2].trim_start(), "- toc");
        assert_eq!(lines[3].trim_start(), "- nav");
        assert_eq!(lines.len(), 4);

        let parsed: serde_yaml::Value = serde_yaml::from_str(header).unwrap();
        assert_eq!(parsed["icon"], serde_yaml::Value::from("book"));
        assert_eq!(
            parsed["hide"],
            serde_yaml::Value::Sequence(vec!["toc".into(), "nav".into()])
        );
    }

    #[test]
    fn test_apply_with_hide_only() {
        let out = apply("# Title", &request(None, &["toc"])).unwrap();
        assert!(out.starts_with("---\nhide:\n"));
        assert!(!out.contains("icon:"));
        assert!(out.ends_with("---\n\n# Title"));
    }

    #[test]
    fn test_apply_with_icon_only() {
        let out = apply("# Title", &request(Some("material/book"), &[])).unwrap();
        assert_eq!(out, "---\nicon: material/book\n---\n\n# Title");
    }

    proptest! {
        /// 結果は常に入力の最初の `#` から始まる末尾部分
        #[test]
        fn prop_strip_badges_is_suffix_from_first_hash(text in ".{0,200}") {
            let stripped = strip_badges(&text);
            prop_assert!(text.ends_with(stripped));
            match text.find('#') {
                Some(index) => prop_assert_eq!(stripped.len(), text.len() - index),
                None => prop_assert!(stripped.is_empty()),
            }
        }
    }
}
