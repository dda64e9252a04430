//! バッチ進捗表示

use crate::fetch::Source;
use indicatif::{ProgressBar, ProgressStyle};

/// 1 件の完了結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Downloaded,
    Copied,
    Failed,
}

impl Outcome {
    pub fn succeeded(source: &Source) -> Self {
        if source.is_local() {
            Outcome::Copied
        } else {
            Outcome::Downloaded
        }
    }

    fn prefix(self) -> &'static str {
        match self {
            Outcome::Downloaded => "✅ Downloaded",
            Outcome::Copied => "✅ Copied",
            Outcome::Failed => "❌ Failed",
        }
    }
}

/// 進捗ラベル（パディングなし）
pub fn label(outcome: Outcome, origin: &str) -> String {
    format!("{} {}", outcome.prefix(), origin)
}

/// 取りうるラベルの最大幅（文字数）
pub fn label_width<'a>(entries: impl IntoIterator<Item = (&'a Source, &'a str)>) -> usize {
    entries
        .into_iter()
        .flat_map(|(source, origin)| {
            [Outcome::succeeded(source), Outcome::Failed]
                .map(|outcome| label(outcome, origin).chars().count())
        })
        .max()
        .unwrap_or(0)
}

/// 完了件数 / 総数と直近の完了ラベルを表示する進捗バー
#[derive(Debug)]
pub struct BatchProgress {
    bar: ProgressBar,
    width: usize,
}

impl BatchProgress {
    pub fn new(total: usize, width: usize, quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            let bar = ProgressBar::new(total as u64);
            bar.set_style(
                ProgressStyle::default_bar()
                    .template("{msg} [{bar:40.cyan/blue}] {pos}/{len}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("#>-"),
            );
            bar
        };
        bar.set_message(" ".repeat(width));

        Self { bar, width }
    }

    /// 1 件完了
    pub fn advance(&self, outcome: Outcome, origin: &str) {
        self.bar.set_message(self.padded(&label(outcome, origin)));
        self.bar.inc(1);
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// 表示を残したまま終了
    pub fn finish(&self) {
        self.bar.finish();
    }

    /// 致命的エラーで中断
    pub fn abandon(&self) {
        self.bar.abandon();
    }

    fn padded(&self, label: &str) -> String {
        format!("{label:<width$}", width = self.width)
    }
}
