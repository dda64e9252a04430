//! `!import` ディレクティブのパーサー
//!
//! ## 構文
//!
//! ```text
//! !import [url(<src>)|<bare-url>] [path(<dest>)] [icon(<name>)] [hide(<flag>[,<flag>...])]
//! ```
//!
//! - トークンは空白区切り
//! - `key(value)` 以外のトークンは `url(value)` の省略形として扱う
//! - 値はクォート（`"` / `'`）で囲んでもよい
//! - 未知のキーは無視する

use crate::error::{ImportError, Result};
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// ディレクティブのキーワード
pub const KEYWORD: &str = "!import";

static PARAM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z_][A-Za-z0-9_-]*)\((.*)\)$").expect("parameter pattern is valid")
});

/// インポート要求
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportRequest {
    /// ナビゲーション上のセクション名
    pub name: String,
    /// 取得元（URL またはローカルパス）
    pub source: String,
    /// サイトルートからの相対パス（`/` 区切り）
    pub destination: String,
    /// 表示アイコン
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// 非表示にする機能
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hide: Vec<String>,
}

impl ImportRequest {
    /// フロントマターが必要かどうか
    pub fn has_front_matter(&self) -> bool {
        self.icon.is_some() || !self.hide.is_empty()
    }
}

/// 文字列がディレクティブかどうか
pub fn is_directive(text: &str) -> bool {
    text.trim_start().starts_with(KEYWORD)
}

/// ディレクティブをパースして ImportRequest を返す
///
/// `parent_path` はセクションの親パス（トップレベルでは空文字列）。
/// `path(...)` が省略された場合の保存先は `<parent_path>/<name>.md` を正規化したもの。
/// サイトルートの外を指す場合は MalformedDirective。
pub fn parse(name: &str, text: &str, parent_path: &str) -> Result<ImportRequest> {
    let trimmed = text.trim();
    let args = trimmed
        .strip_prefix(KEYWORD)
        .ok_or_else(|| ImportError::malformed(text, format!("must start with '{KEYWORD}'")))?;

    if !args.is_empty() && !args.starts_with(char::is_whitespace) {
        return Err(ImportError::malformed(
            text,
            format!("'{KEYWORD}' must be followed by whitespace"),
        ));
    }

    let mut source: Option<String> = None;
    let mut destination: Option<String> = None;
    let mut icon: Option<String> = None;
    let mut hide: Vec<String> = Vec::new();

    for token in args.split_whitespace() {
        let Some(caps) = PARAM.captures(token) else {
            set_source(&mut source, unquote(token), text)?;
            continue;
        };

        let value = &caps[2];
        match &caps[1] {
            "url" => set_source(&mut source, unquote(value), text)?,
            "path" => {
                let dest = normalize_destination(unquote(value)).ok_or_else(|| {
                    ImportError::malformed(
                        text,
                        format!("path({value}) must be a non-empty relative path"),
                    )
                })?;
                destination = Some(dest);
            }
            "icon" => {
                let value = unquote(value);
                if !value.is_empty() {
                    icon = Some(value.to_string());
                }
            }
            "hide" => {
                hide = value
                    .split(',')
                    .map(|flag| unquote(flag.trim()))
                    .filter(|flag| !flag.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            other => {
                tracing::debug!(key = other, "ignoring unknown import parameter");
            }
        }
    }

    let source = source.ok_or_else(|| ImportError::malformed(text, "missing source URL"))?;
    let destination = match destination {
        Some(dest) => dest,
        None => default_destination(name, parent_path).ok_or_else(|| {
            ImportError::malformed(
                text,
                format!("section '{name}' does not map to a relative path; use path(...)"),
            )
        })?,
    };

    Ok(ImportRequest {
        name: name.to_string(),
        source,
        destination,
        icon,
        hide,
    })
}

fn set_source(slot: &mut Option<String>, value: &str, text: &str) -> Result<()> {
    if value.is_empty() {
        return Err(ImportError::malformed(text, "empty source URL"));
    }
    if slot.is_some() {
        return Err(ImportError::malformed(text, "more than one source URL"));
    }
    *slot = Some(value.to_string());
    Ok(())
}

/// 前後のクォートを除去
fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

/// 保存先パスを正規化（絶対パス・`..`・空は None）
fn normalize_destination(raw: &str) -> Option<String> {
    if raw.starts_with('/') {
        return None;
    }

    let parts: Vec<&str> = raw
        .split('/')
        .filter(|part| !part.is_empty() && *part != ".")
        .collect();

    if parts.is_empty() || parts.contains(&"..") {
        return None;
    }

    Some(parts.join("/"))
}

/// セクション名から保存先を組み立てる（`path(...)` と同じ正規化を通す）
fn default_destination(name: &str, parent_path: &str) -> Option<String> {
    if parent_path.is_empty() {
        normalize_destination(&format!("{name}.md"))
    } else {
        normalize_destination(&format!("{parent_path}/{name}.md"))
    }
}

#[cfg(test)]
#[path = "directive_test.rs"]
mod tests;

#[cfg(test)]
#[path = "directive_proptests.rs"]
mod proptests;
