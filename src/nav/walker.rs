//! ナビゲーションツリーの走査
//!
//! 深さ優先でツリーをたどり、`!import` ディレクティブを持つセクションを
//! [`PendingImport`] として集める。出力順は走査順と同じ。

use super::{NavHandle, NavNode, Navigation, SectionBody};
use crate::directive::{self, ImportRequest, KEYWORD};
use crate::error::{ImportError, Result};
use serde_yaml::Value;
use std::borrow::Cow;
use std::collections::HashMap;

/// 書き換えハンドルと紐づいたインポート要求
#[derive(Debug)]
pub struct PendingImport {
    pub request: ImportRequest,
    pub handle: NavHandle,
}

/// ツリーからインポート要求を収集
///
/// 保存先が重複する場合は取得を始める前にエラーにする。
pub fn collect_imports(nav: &Navigation) -> Result<Vec<PendingImport>> {
    let mut imports = Vec::new();
    walk(nav, &nav.root, "", &mut imports)?;
    ensure_unique_destinations(&imports)?;
    Ok(imports)
}

fn walk(
    nav: &Navigation,
    nodes: &[NavNode],
    parent_path: &str,
    imports: &mut Vec<PendingImport>,
) -> Result<()> {
    for node in nodes {
        let NavNode::Section(id) = node else {
            continue;
        };
        let section = &nav.sections[id.0];

        match &section.body {
            SectionBody::Children(children) => {
                let path = if parent_path.is_empty() {
                    section.title.clone()
                } else {
                    format!("{parent_path}/{}", section.title)
                };
                walk(nav, children, &path, imports)?;
            }
            SectionBody::Value(value) => {
                let Some(text) = directive_text(value) else {
                    continue;
                };
                let request = directive::parse(&section.title, &text, parent_path)?;
                tracing::debug!(
                    section = %section.title,
                    source = %request.source,
                    destination = %request.destination,
                    "found import directive"
                );
                imports.push(PendingImport {
                    request,
                    handle: NavHandle { section: *id },
                });
            }
        }
    }
    Ok(())
}

/// セクション値からディレクティブ文字列を取り出す
///
/// クォートされた `"!import ..."` と、YAML タグとして読まれた
/// `!import ...` の両方を受け付ける。
fn directive_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(text) if directive::is_directive(text) => Some(Cow::Borrowed(text.as_str())),
        Value::Tagged(tagged) if tagged.tag == KEYWORD => match &tagged.value {
            Value::String(args) => Some(Cow::Owned(format!("{KEYWORD} {args}"))),
            _ => Some(Cow::Borrowed(KEYWORD)),
        },
        _ => None,
    }
}

fn ensure_unique_destinations(imports: &[PendingImport]) -> Result<()> {
    let mut seen: HashMap<&str, &str> = HashMap::new();
    for import in imports {
        let request = &import.request;
        if let Some(first) = seen.insert(&request.destination, &request.name) {
            return Err(ImportError::DuplicateDestination {
                destination: request.destination.clone(),
                first: first.to_string(),
                second: request.name.clone(),
            });
        }
    }
    Ok(())
}
