//! ドキュメントの取得
//!
//! インポート元をローカルファイルかリモート URL かに分類し、
//! 取得した内容をステージングファイルセットへ書き込む。
//!
//! - ローカル: バイト列をそのままコピー
//! - リモート: HTTP GET → UTF-8 デコード → [`transform::apply`]

pub mod transform;

use crate::directive::ImportRequest;
use crate::error::{FetchCause, ImportError, Result};
use crate::http::Downloader;
use crate::staging::StagedFiles;
use reqwest::Url;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// インポート元の種別
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Local(PathBuf),
    Remote(String),
}

impl Source {
    /// インポート元を分類する
    ///
    /// スキームが空または `file` で、かつ評価時点でパスが存在すればローカル。
    /// 相対パスは `base_dir` からの相対として解決する。
    pub fn classify(raw: &str, base_dir: &Path) -> Self {
        let candidate = match Url::parse(raw) {
            Ok(url) if url.scheme() == "file" => url.to_file_path().ok(),
            Ok(_) => None,
            Err(_) => Some(base_dir.join(raw)),
        };

        match candidate {
            Some(path) if path.exists() => Source::Local(path),
            _ => Source::Remote(raw.to_string()),
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Source::Local(_))
    }
}

/// 変換済みのファイル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializedFile {
    /// サイトルートからの相対パス
    pub path: String,
    pub content: Vec<u8>,
}

/// ドキュメント取得器
#[derive(Clone)]
pub struct Fetcher {
    downloader: Arc<dyn Downloader>,
    base_dir: PathBuf,
}

impl std::fmt::Debug for Fetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fetcher")
            .field("base_dir", &self.base_dir)
            .finish_non_exhaustive()
    }
}

impl Fetcher {
    pub fn new(downloader: Arc<dyn Downloader>, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            downloader,
            base_dir: base_dir.into(),
        }
    }

    /// 要求のインポート元を分類
    pub fn classify(&self, request: &ImportRequest) -> Source {
        Source::classify(&request.source, &self.base_dir)
    }

    /// 分類してから取得する
    pub async fn fetch(&self, request: &ImportRequest, staged: &StagedFiles) -> Result<MaterializedFile> {
        let source = self.classify(request);
        self.fetch_source(request, &source, staged).await
    }

    /// 分類済みのインポート元から取得し、ステージ領域に書き込む
    pub async fn fetch_source(
        &self,
        request: &ImportRequest,
        source: &Source,
        staged: &StagedFiles,
    ) -> Result<MaterializedFile> {
        let content = match source {
            Source::Local(path) => {
                tracing::debug!(path = %path.display(), "copying local document");
                tokio::fs::read(path)
                    .await
                    .map_err(|e| fetch_error(request, e.into()))?
            }
            Source::Remote(url) => {
                tracing::debug!(url = %url, "downloading remote document");
                let bytes = self
                    .downloader
                    .get(url)
                    .await
                    .map_err(|cause| fetch_error(request, cause))?;
                let text = String::from_utf8(bytes).map_err(|e| fetch_error(request, e.into()))?;
                transform::apply(&text, request)?.into_bytes()
            }
        };

        staged.write(&request.destination, &content)?;

        Ok(MaterializedFile {
            path: request.destination.clone(),
            content,
        })
    }
}

fn fetch_error(request: &ImportRequest, cause: FetchCause) -> ImportError {
    ImportError::Fetch {
        origin: request.source.clone(),
        cause,
    }
}

#[cfg(test)]
#[path = "fetch_test.rs"]
mod tests;
