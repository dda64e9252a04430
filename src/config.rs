//! サイト設定とプラグインオプション
//!
//! `mkdocs.yml` から `docs_dir`・`nav`・`plugins` の import オプションを読み込む。
//!
//! ```yaml
//! plugins:
//!   - search
//!   - import:
//!       timeout: 10
//!       max_redirects: 5
//! ```

use crate::error::{ImportError, Result};
use reqwest::redirect::Policy;
use reqwest::Client;
use serde::Deserialize;
use serde_yaml::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// プラグイン名（`plugins` のキー）
pub const PLUGIN_NAME: &str = "import";

/// `docs_dir` の既定値
pub const DEFAULT_DOCS_DIR: &str = "docs";

/// HTTP設定
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// タイムアウト
    pub timeout: Option<Duration>,
    /// User-Agent
    pub user_agent: String,
    /// リダイレクトの最大回数
    pub max_redirects: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(30)),
            user_agent: "mkimport".to_string(),
            max_redirects: 10,
        }
    }
}

impl HttpConfig {
    /// reqwest::Client を構築
    pub fn build_client(&self) -> Result<Client> {
        let mut builder = Client::builder()
            .user_agent(&self.user_agent)
            .redirect(Policy::limited(self.max_redirects));

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        builder
            .build()
            .map_err(|e| ImportError::Config(format!("failed to build HTTP client: {e}")))
    }
}

/// `plugins` の import オプション
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImportOptions {
    /// タイムアウト（秒、0 で無制限）
    pub timeout: u64,
    pub user_agent: String,
    pub max_redirects: usize,
    /// 一時領域を作成するディレクトリ（未指定ならシステムの一時ディレクトリ）
    pub staging_dir: Option<PathBuf>,
    /// 進捗表示を抑制
    pub quiet: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        let http = HttpConfig::default();
        Self {
            timeout: http.timeout.map(|t| t.as_secs()).unwrap_or(0),
            user_agent: http.user_agent,
            max_redirects: http.max_redirects,
            staging_dir: None,
            quiet: false,
        }
    }
}

impl ImportOptions {
    pub fn http_config(&self) -> HttpConfig {
        HttpConfig {
            timeout: (self.timeout > 0).then(|| Duration::from_secs(self.timeout)),
            user_agent: self.user_agent.clone(),
            max_redirects: self.max_redirects,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawSiteConfig {
    #[serde(default)]
    docs_dir: Option<PathBuf>,
    #[serde(default)]
    nav: Option<Value>,
    #[serde(default)]
    plugins: Option<Value>,
}

/// 読み込んだ `mkdocs.yml`
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// 設定ファイルのあるディレクトリ
    pub base_dir: PathBuf,
    /// `docs_dir`（base_dir からの相対パスは解決済み）
    pub docs_dir: PathBuf,
    pub nav: Option<Value>,
    pub import: ImportOptions,
    raw: Value,
}

impl SiteConfig {
    /// 設定ファイルを読み込む
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ImportError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        let base_dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        Self::parse(&text, base_dir)
    }

    /// YAML 文字列から設定を構築
    pub fn parse(text: &str, base_dir: &Path) -> Result<Self> {
        let raw: Value = serde_yaml::from_str(text)?;
        let parsed: RawSiteConfig = if raw.is_null() {
            RawSiteConfig::default()
        } else {
            serde_yaml::from_value(raw.clone())?
        };

        let docs_dir = base_dir.join(
            parsed
                .docs_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DOCS_DIR)),
        );
        let import = match parsed.plugins.as_ref().and_then(find_plugin_options) {
            Some(options) if !options.is_null() => serde_yaml::from_value(options.clone())
                .map_err(|e| {
                    ImportError::Config(format!("invalid '{PLUGIN_NAME}' plugin options: {e}"))
                })?,
            _ => ImportOptions::default(),
        };

        Ok(Self {
            base_dir: base_dir.to_path_buf(),
            docs_dir,
            nav: parsed.nav,
            import,
            raw,
        })
    }

    /// nav と docs_dir を差し替えた設定を返す
    ///
    /// `nav` が `None` の場合は元の設定の nav（未定義ならなし）を残す。
    pub fn rewritten(&self, nav: Option<Value>, docs_dir: &str) -> Value {
        let mut raw = match &self.raw {
            Value::Mapping(mapping) => mapping.clone(),
            _ => serde_yaml::Mapping::new(),
        };
        raw.insert(Value::from("docs_dir"), Value::from(docs_dir));
        if let Some(nav) = nav {
            raw.insert(Value::from("nav"), nav);
        }
        Value::Mapping(raw)
    }
}

/// `plugins` から import プラグインのオプションを探す
///
/// シーケンス形式（`- import: {...}`）とマッピング形式（`import: {...}`）の両方に対応。
/// オプションなしで列挙されている場合は `Value::Null` を返す。
fn find_plugin_options(plugins: &Value) -> Option<&Value> {
    const NO_OPTIONS: &Value = &Value::Null;

    match plugins {
        Value::Sequence(entries) => entries.iter().find_map(|entry| match entry {
            Value::String(name) if name == PLUGIN_NAME => Some(NO_OPTIONS),
            Value::Mapping(mapping) => mapping.get(PLUGIN_NAME),
            _ => None,
        }),
        Value::Mapping(mapping) => mapping.get(PLUGIN_NAME),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
