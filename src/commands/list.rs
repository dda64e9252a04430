//! mkimport list コマンド
//!
//! ナビゲーション中の `!import` ディレクティブを取得せずに一覧表示する。

use clap::Parser;
use comfy_table::{presets::UTF8_FULL, Table};
use mkimport::config::SiteConfig;
use mkimport::directive::ImportRequest;
use mkimport::fetch::Source;
use mkimport::nav::{collect_imports, Navigation};
use mkimport::Result;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Parser)]
pub struct Args {
    /// mkdocs の設定ファイル
    #[arg(short = 'f', long = "config-file", default_value = "mkdocs.yml")]
    pub config_file: PathBuf,

    /// JSON 形式で出力
    #[arg(long)]
    pub json: bool,
}

/// 取得元の種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum SourceKind {
    Local,
    Remote,
}

impl SourceKind {
    fn as_str(self) -> &'static str {
        match self {
            SourceKind::Local => "local",
            SourceKind::Remote => "remote",
        }
    }
}

/// 出力用の 1 行
#[derive(Debug, Clone, Serialize)]
struct ListEntry {
    #[serde(flatten)]
    request: ImportRequest,
    kind: SourceKind,
}

pub fn run(args: Args) -> Result<()> {
    let config = SiteConfig::load(&args.config_file)?;
    let entries = collect_entries(&config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        print_table(&entries);
    }

    Ok(())
}

fn collect_entries(config: &SiteConfig) -> Result<Vec<ListEntry>> {
    let Some(nav) = config.nav.clone() else {
        return Ok(Vec::new());
    };

    let navigation = Navigation::from_yaml(nav)?;
    let entries = collect_imports(&navigation)?
        .into_iter()
        .map(|pending| {
            let kind = match Source::classify(&pending.request.source, &config.base_dir) {
                Source::Local(_) => SourceKind::Local,
                Source::Remote(_) => SourceKind::Remote,
            };
            ListEntry {
                request: pending.request,
                kind,
            }
        })
        .collect();

    Ok(entries)
}

fn print_table(entries: &[ListEntry]) {
    if entries.is_empty() {
        println!("No imports found");
        return;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Name", "Source", "Kind", "Destination", "Front matter"]);

    for entry in entries {
        table.add_row(vec![
            entry.request.name.as_str(),
            entry.request.source.as_str(),
            entry.kind.as_str(),
            entry.request.destination.as_str(),
            &front_matter_cell(&entry.request),
        ]);
    }

    println!("{table}");
    println!("{} import(s)", entries.len());
}

/// フロントマター列の表示（`icon: book, hide: toc,nav` 形式）
fn front_matter_cell(request: &ImportRequest) -> String {
    let mut parts = Vec::new();
    if let Some(icon) = &request.icon {
        parts.push(format!("icon: {icon}"));
    }
    if !request.hide.is_empty() {
        parts.push(format!("hide: {}", request.hide.join(",")));
    }

    if parts.is_empty() {
        "-".to_string()
    } else {
        parts.join(", ")
    }
}

#[cfg(test)]
#[path = "list_test.rs"]
mod tests;
