//! HTTP ダウンロード
//!
//! リモートのドキュメントを取得する処理を [`Downloader`] trait で抽象化する。
//! テスト時は MockDownloader を注入する。

use crate::config::HttpConfig;
use crate::error::{FetchCause, Result};
use reqwest::Client;
use std::future::Future;
use std::pin::Pin;

/// ダウンロード結果
pub type DownloadResult = std::result::Result<Vec<u8>, FetchCause>;

/// リモートコンテンツの取得を抽象化する trait
pub trait Downloader: Send + Sync {
    /// URL を GET して本文を返す
    ///
    /// - リダイレクトは追従する
    /// - 2xx 以外のステータスは `FetchCause::Status`
    fn get<'a>(&'a self, url: &'a str) -> Pin<Box<dyn Future<Output = DownloadResult> + Send + 'a>>;
}

/// reqwest による本番実装
#[derive(Debug, Clone)]
pub struct HttpDownloader {
    client: Client,
}

impl HttpDownloader {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        Ok(Self {
            client: config.build_client()?,
        })
    }
}

impl Downloader for HttpDownloader {
    fn get<'a>(&'a self, url: &'a str) -> Pin<Box<dyn Future<Output = DownloadResult> + Send + 'a>> {
        Box::pin(async move {
            let response = self.client.get(url).send().await?;
            let status = response.status();

            if !status.is_success() {
                tracing::debug!(url, status = status.as_u16(), "download failed");
                return Err(FetchCause::Status {
                    status: status.as_u16(),
                });
            }

            let bytes = response.bytes().await?;
            tracing::debug!(url, bytes = bytes.len(), "downloaded");
            Ok(bytes.to_vec())
        })
    }
}

#[cfg(test)]
pub mod mock;
