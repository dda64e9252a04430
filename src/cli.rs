use clap::{Parser, Subcommand};

use crate::commands::{build, list};

#[derive(Debug, Parser)]
#[command(name = "mkimport", version)]
#[command(about = "Import remote and local documents into an mkdocs site", long_about = None)]
pub struct Cli {
    /// デバッグログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// ディレクティブを解決してサイトのソースを書き出す
    Build(build::Args),

    /// ナビゲーション中のディレクティブ一覧
    List(list::Args),
}
