//! mkdocs のナビゲーションに書かれた `!import` ディレクティブを解決し、
//! 取得したドキュメントを一時領域にステージするライブラリ。

pub mod batch;
pub mod config;
pub mod directive;
pub mod error;
pub mod fetch;
pub mod files;
pub mod http;
pub mod nav;
pub mod plugin;
pub mod staging;

pub use error::{ImportError, Result};
pub use plugin::{BuildOutput, ImportPlugin};
