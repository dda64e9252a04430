//! ナビゲーションツリー
//!
//! `mkdocs.yml` の `nav` をアリーナ形式で保持する。
//! 各セクション（単一キーのマッピング）は [`SectionId`] で参照され、
//! インポート完了時には [`NavHandle`] 経由でその値を書き換える。

pub mod walker;

pub use walker::{collect_imports, PendingImport};

use crate::error::{ImportError, Result};
use serde_yaml::{Mapping, Value};

/// セクションの識別子（アリーナ内のインデックス）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SectionId(usize);

/// セクション値の書き換えハンドル
///
/// Clone できないため、1 つのハンドルで書き換えられるのは 1 回だけ。
#[derive(Debug, PartialEq, Eq)]
pub struct NavHandle {
    section: SectionId,
}

impl NavHandle {
    pub fn section(&self) -> SectionId {
        self.section
    }
}

#[derive(Debug, Clone)]
enum NavNode {
    /// プレーンな値（`- index.md` など）
    Item(Value),
    Section(SectionId),
}

#[derive(Debug, Clone)]
struct Section {
    title: String,
    body: SectionBody,
}

#[derive(Debug, Clone)]
enum SectionBody {
    Children(Vec<NavNode>),
    Value(Value),
}

/// ナビゲーションツリー
#[derive(Debug, Clone, Default)]
pub struct Navigation {
    root: Vec<NavNode>,
    sections: Vec<Section>,
}

impl Navigation {
    /// YAML 値からツリーを構築
    ///
    /// - トップレベルはシーケンスであること
    /// - マッピングはキーを 1 つだけ持つこと
    pub fn from_yaml(value: Value) -> Result<Self> {
        let Value::Sequence(entries) = value else {
            return Err(ImportError::InvalidNavigationEntry(format!(
                "navigation must be a sequence, got {}",
                describe(&value)
            )));
        };

        let mut nav = Navigation::default();
        nav.root = nav.build_nodes(entries)?;
        Ok(nav)
    }

    fn build_nodes(&mut self, entries: Vec<Value>) -> Result<Vec<NavNode>> {
        let mut nodes = Vec::with_capacity(entries.len());

        for entry in entries {
            let Value::Mapping(mapping) = entry else {
                nodes.push(NavNode::Item(entry));
                continue;
            };

            if mapping.len() != 1 {
                return Err(ImportError::InvalidNavigationEntry(format!(
                    "expected exactly one key per entry, found {} ({})",
                    mapping.len(),
                    describe_keys(&mapping)
                )));
            }

            let Some((key, value)) = mapping.into_iter().next() else {
                continue;
            };
            let Value::String(title) = key else {
                return Err(ImportError::InvalidNavigationEntry(format!(
                    "section name must be a string, got {}",
                    describe(&key)
                )));
            };

            let body = match value {
                Value::Sequence(children) => SectionBody::Children(self.build_nodes(children)?),
                other => SectionBody::Value(other),
            };

            let id = SectionId(self.sections.len());
            self.sections.push(Section { title, body });
            nodes.push(NavNode::Section(id));
        }

        Ok(nodes)
    }

    /// YAML 値に戻す
    pub fn to_yaml(&self) -> Value {
        Value::Sequence(self.nodes_to_yaml(&self.root))
    }

    fn nodes_to_yaml(&self, nodes: &[NavNode]) -> Vec<Value> {
        nodes
            .iter()
            .map(|node| match node {
                NavNode::Item(value) => value.clone(),
                NavNode::Section(id) => {
                    let section = &self.sections[id.0];
                    let value = match &section.body {
                        SectionBody::Children(children) => {
                            Value::Sequence(self.nodes_to_yaml(children))
                        }
                        SectionBody::Value(value) => value.clone(),
                    };
                    let mut mapping = Mapping::new();
                    mapping.insert(Value::String(section.title.clone()), value);
                    Value::Mapping(mapping)
                }
            })
            .collect()
    }

    /// セクション名
    pub fn title(&self, id: SectionId) -> Option<&str> {
        self.sections.get(id.0).map(|s| s.title.as_str())
    }

    /// セクションの値（ネストしたセクションは None）
    pub fn value(&self, id: SectionId) -> Option<&Value> {
        match &self.sections.get(id.0)?.body {
            SectionBody::Value(value) => Some(value),
            SectionBody::Children(_) => None,
        }
    }

    /// ハンドルが指すセクションの値を書き換える
    pub fn rewrite(&mut self, handle: NavHandle, value: impl Into<String>) {
        if let Some(section) = self.sections.get_mut(handle.section.0) {
            section.body = SectionBody::Value(Value::String(value.into()));
        }
    }

    /// セクション数
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("'{s}'"),
        Value::Sequence(_) => "a sequence".to_string(),
        Value::Mapping(_) => "a mapping".to_string(),
        Value::Tagged(tagged) => format!("a value tagged {}", tagged.tag),
    }
}

fn describe_keys(mapping: &Mapping) -> String {
    let keys: Vec<String> = mapping.keys().map(describe).collect();
    if keys.is_empty() {
        "empty mapping".to_string()
    } else {
        format!("keys {}", keys.join(", "))
    }
}

#[cfg(test)]
#[path = "nav_test.rs"]
mod tests;
