//! テスト用モックダウンローダー

use super::*;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;
use std::time::Duration;

/// テスト用モックダウンローダー
///
/// 登録されていない URL は接続拒否として扱う。
pub struct MockDownloader {
    responses: RwLock<HashMap<String, MockResponse>>,
    calls: AtomicUsize,
}

#[derive(Clone)]
enum MockBody {
    Ok(Vec<u8>),
    Status(u16),
}

#[derive(Clone)]
struct MockResponse {
    body: MockBody,
    delay: Duration,
}

impl MockDownloader {
    pub fn new() -> Self {
        Self {
            responses: RwLock::new(HashMap::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// 本文を返す URL を追加
    pub fn add_body(&self, url: &str, body: &str) {
        self.add_bytes(url, body.as_bytes());
    }

    /// バイナリ本文を返す URL を追加
    pub fn add_bytes(&self, url: &str, body: &[u8]) {
        self.insert(url, MockBody::Ok(body.to_vec()), Duration::ZERO);
    }

    /// 応答までに遅延のある URL を追加
    pub fn add_delayed(&self, url: &str, body: &str, delay: Duration) {
        self.insert(url, MockBody::Ok(body.as_bytes().to_vec()), delay);
    }

    /// エラーステータスを返す URL を追加
    pub fn add_status(&self, url: &str, status: u16) {
        self.insert(url, MockBody::Status(status), Duration::ZERO);
    }

    /// get が呼ばれた回数
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn insert(&self, url: &str, body: MockBody, delay: Duration) {
        self.responses
            .write()
            .unwrap()
            .insert(url.to_string(), MockResponse { body, delay });
    }
}

impl Default for MockDownloader {
    fn default() -> Self {
        Self::new()
    }
}

impl Downloader for MockDownloader {
    fn get<'a>(&'a self, url: &'a str) -> Pin<Box<dyn Future<Output = DownloadResult> + Send + 'a>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let response = self.responses.read().unwrap().get(url).cloned();

        Box::pin(async move {
            let Some(response) = response else {
                return Err(FetchCause::Io(std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    format!("connection refused: {url}"),
                )));
            };

            if !response.delay.is_zero() {
                tokio::time::sleep(response.delay).await;
            }

            match response.body {
                MockBody::Ok(bytes) => Ok(bytes),
                MockBody::Status(status) => Err(FetchCause::Status { status }),
            }
        })
    }
}
