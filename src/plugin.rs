//! インポートプラグイン
//!
//! 1 回のビルドで行う処理をまとめたエントリーポイント。
//!
//! ```text
//! StagedFiles 作成
//!   └─ nav 解析 → ディレクティブ収集 → バッチ取得 → 統合ビュー → consume
//! StagedFiles 解放（成功・失敗にかかわらず必ず実行）
//! ```

use crate::batch::{run_batch, BatchOptions};
use crate::config::{ImportOptions, SiteConfig};
use crate::error::Result;
use crate::fetch::Fetcher;
use crate::files::Files;
use crate::http::HttpDownloader;
use crate::nav::{collect_imports, Navigation};
use crate::staging::StagedFiles;
use serde_yaml::Value;
use std::sync::Arc;

/// ホストに渡す統合ビュー
#[derive(Debug)]
pub struct BuildOutput<'a> {
    /// 書き換え済みのナビゲーション
    pub nav: &'a Navigation,
    /// ステージしたファイルを重ねたファイルコレクション
    pub files: &'a Files,
    /// インポートしたファイル数
    pub imported: usize,
}

/// インポートプラグイン
#[derive(Debug, Clone)]
pub struct ImportPlugin {
    fetcher: Fetcher,
    options: ImportOptions,
}

impl ImportPlugin {
    pub fn new(fetcher: Fetcher, options: ImportOptions) -> Self {
        Self { fetcher, options }
    }

    /// サイト設定から HTTP クライアント付きで構築
    pub fn from_config(config: &SiteConfig) -> Result<Self> {
        let downloader = HttpDownloader::new(&config.import.http_config())?;
        let fetcher = Fetcher::new(Arc::new(downloader), config.base_dir.clone());
        Ok(Self::new(fetcher, config.import.clone()))
    }

    /// インポートを実行し、統合ビューを `consume` に渡す
    ///
    /// 一時領域は `consume` が戻った後に解放される。
    /// 途中で失敗した場合も解放してからエラーを返す。
    pub async fn build<T, F>(&self, nav: Value, files: &Files, consume: F) -> Result<T>
    where
        F: FnOnce(BuildOutput<'_>) -> Result<T>,
    {
        let staged = match &self.options.staging_dir {
            Some(dir) => StagedFiles::new_in(dir)?,
            None => StagedFiles::new()?,
        };

        let outcome = self.run(nav, files, &staged, consume).await;
        let released = staged.release();

        match (outcome, released) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(err)) => Err(err),
            (Err(err), released) => {
                if let Err(release_err) = released {
                    tracing::warn!(error = %release_err, "failed to release staging area");
                }
                Err(err)
            }
        }
    }

    async fn run<T, F>(&self, nav: Value, files: &Files, staged: &StagedFiles, consume: F) -> Result<T>
    where
        F: FnOnce(BuildOutput<'_>) -> Result<T>,
    {
        let mut navigation = Navigation::from_yaml(nav)?;
        let imports = collect_imports(&navigation)?;

        let options = BatchOptions {
            quiet: self.options.quiet,
        };
        let report = run_batch(imports, &mut navigation, staged, &self.fetcher, options).await?;
        let merged = staged.resolve(files)?;

        consume(BuildOutput {
            nav: &navigation,
            files: &merged,
            imported: report.len(),
        })
    }
}

#[cfg(test)]
#[path = "plugin_test.rs"]
mod tests;
