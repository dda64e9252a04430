//! mkimport build コマンド
//!
//! ディレクティブを解決し、統合したファイル群と書き換えた `mkdocs.yml` を
//! 出力ディレクトリに書き出す。
//!
//! ```text
//! <out>/
//! ├── mkdocs.yml   # nav 書き換え済み、docs_dir: docs
//! └── docs/        # docs_dir の内容 + インポートしたファイル
//! ```

use crate::output::CommandSummary;
use clap::Parser;
use mkimport::config::{SiteConfig, DEFAULT_DOCS_DIR};
use mkimport::files::Files;
use mkimport::{ImportError, ImportPlugin, Result};
use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Parser)]
pub struct Args {
    /// mkdocs の設定ファイル
    #[arg(short = 'f', long = "config-file", default_value = "mkdocs.yml")]
    pub config_file: PathBuf,

    /// 解決済みのサイトソースを書き出すディレクトリ
    #[arg(short, long, default_value = "build")]
    pub output: PathBuf,

    /// 進捗バーを表示しない
    #[arg(short, long)]
    pub quiet: bool,
}

/// ビルド結果の件数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildCounts {
    pub imported: usize,
    pub written: usize,
}

pub async fn run(args: Args) -> Result<()> {
    let counts = build_site(&args).await?;

    let summary = CommandSummary::format(counts.imported, counts.written);
    println!("{} {}", summary.prefix, summary.message);
    println!("Output: {}", args.output.display());

    Ok(())
}

/// 設定を読み込み、インポートを実行して出力ディレクトリに書き出す
pub async fn build_site(args: &Args) -> Result<BuildCounts> {
    let mut config = SiteConfig::load(&args.config_file)?;
    if args.quiet {
        config.import.quiet = true;
    }

    let docs_out = args.output.join(DEFAULT_DOCS_DIR);
    ensure_distinct(&config.docs_dir, &docs_out)?;

    let host = Files::from_dir(&config.docs_dir)?;
    debug!(files = host.len(), docs_dir = %config.docs_dir.display(), "loaded site files");

    let plugin = ImportPlugin::from_config(&config)?;
    let nav = config
        .nav
        .clone()
        .unwrap_or_else(|| Value::Sequence(Vec::new()));
    let has_nav = config.nav.is_some();

    // 一時領域が解放される前にすべて書き出す
    plugin
        .build(nav, &host, |out| {
            let written = write_files(out.files, &docs_out)?;
            let nav = has_nav.then(|| out.nav.to_yaml());
            let site = config.rewritten(nav, DEFAULT_DOCS_DIR);
            fs::write(args.output.join("mkdocs.yml"), serde_yaml::to_string(&site)?)?;

            Ok(BuildCounts {
                imported: out.imported,
                written,
            })
        })
        .await
}

/// 統合ビューのファイルを `dest` 以下にコピー
pub fn write_files(files: &Files, dest: &Path) -> Result<usize> {
    fs::create_dir_all(dest)?;

    for file in files.iter() {
        let target = dest.join(&file.src_uri);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(&file.abs_src_path, &target)?;
    }

    Ok(files.len())
}

/// 出力先が入力の docs_dir と同じでないことを確認
fn ensure_distinct(docs_dir: &Path, docs_out: &Path) -> Result<()> {
    let same = match (fs::canonicalize(docs_dir), fs::canonicalize(docs_out)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    };

    if same {
        return Err(ImportError::Config(format!(
            "output directory {} would overwrite docs_dir",
            docs_out.display()
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "build_test.rs"]
mod tests;
