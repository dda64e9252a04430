//! ホスト側のファイルコレクション
//!
//! サイトルートからの相対 URI（`/` 区切り）をキーとする、ドキュメントファイルの集合。

use crate::error::Result;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// サイトを構成する 1 ファイル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteFile {
    /// サイトルートからの相対 URI
    pub src_uri: String,
    /// 実ファイルの絶対パス
    pub abs_src_path: PathBuf,
}

impl SiteFile {
    pub fn new(src_uri: impl Into<String>, abs_src_path: impl Into<PathBuf>) -> Self {
        Self {
            src_uri: src_uri.into(),
            abs_src_path: abs_src_path.into(),
        }
    }
}

/// ファイルコレクション
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Files {
    files: BTreeMap<String, SiteFile>,
}

impl Files {
    pub fn new() -> Self {
        Self::default()
    }

    /// ディレクトリ以下のファイルを収集
    ///
    /// - ドットで始まるファイル・ディレクトリは除外
    /// - ディレクトリが存在しない場合は空のコレクション
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let mut files = Self::new();
        if !dir.is_dir() {
            return Ok(files);
        }

        let walker = WalkDir::new(dir)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry.file_name()));

        for entry in walker {
            let entry = entry.map_err(std::io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(dir) else {
                continue;
            };
            files.insert(SiteFile::new(to_uri(relative), entry.path()));
        }

        Ok(files)
    }

    /// ファイルを追加（同じ URI は置き換え）
    pub fn insert(&mut self, file: SiteFile) {
        self.files.insert(file.src_uri.clone(), file);
    }

    pub fn get(&self, src_uri: &str) -> Option<&SiteFile> {
        self.files.get(src_uri)
    }

    pub fn contains(&self, src_uri: &str) -> bool {
        self.files.contains_key(src_uri)
    }

    /// URI 順に列挙
    pub fn iter(&self) -> impl Iterator<Item = &SiteFile> {
        self.files.values()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// ファイル内容を読み込む
    pub fn read(&self, src_uri: &str) -> Result<Vec<u8>> {
        let file = self.get(src_uri).ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{src_uri} is not part of the file collection"),
            )
        })?;
        Ok(std::fs::read(&file.abs_src_path)?)
    }
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

/// 相対パスを `/` 区切りの URI に変換
fn to_uri(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_from_dir_collects_nested_files() {
        let temp = TempDir::new().unwrap();
        let docs = temp.path();
        fs::create_dir_all(docs.join("guide")).unwrap();
        fs::write(docs.join("index.md"), "# Home").unwrap();
        fs::write(docs.join("guide").join("install.md"), "# Install").unwrap();

        let files = Files::from_dir(docs).unwrap();

        let uris: Vec<&str> = files.iter().map(|f| f.src_uri.as_str()).collect();
        assert_eq!(uris, vec!["guide/install.md", "index.md"]);
        assert_eq!(files.read("index.md").unwrap(), b"# Home");
    }

    #[test]
    fn test_from_dir_skips_hidden_entries() {
        let temp = TempDir::new().unwrap();
        let docs = temp.path();
        fs::create_dir_all(docs.join(".git")).unwrap();
        fs::write(docs.join(".git").join("HEAD"), "ref").unwrap();
        fs::write(docs.join(".hidden.md"), "x").unwrap();
        fs::write(docs.join("visible.md"), "y").unwrap();

        let files = Files::from_dir(docs).unwrap();

        assert_eq!(files.len(), 1);
        assert!(files.contains("visible.md"));
    }

    #[test]
    fn test_from_missing_dir_is_empty() {
        let temp = TempDir::new().unwrap();
        let files = Files::from_dir(&temp.path().join("nope")).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_read_unknown_uri() {
        let files = Files::new();
        assert!(files.read("missing.md").is_err());
    }
}
