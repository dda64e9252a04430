//! バッチ実行
//!
//! すべてのインポート要求を並行に取得し、完了した順に
//! 進捗表示の更新とナビゲーションの書き換えを行う。
//!
//! - 書き換えは各要求の取得が成功した時だけ、1 回だけ行う
//! - 取得エラーは集約し、残りの取得がすべて終わってから返す
//! - ステージ領域の I/O エラーは即座に返す

pub mod progress;

use crate::error::{ImportError, Result};
use crate::fetch::{Fetcher, MaterializedFile};
use crate::nav::{Navigation, PendingImport};
use crate::staging::StagedFiles;
use futures::stream::{FuturesUnordered, StreamExt};
use progress::{BatchProgress, Outcome};
use tracing::{info, warn};

/// バッチの実行結果
#[derive(Debug, Default)]
pub struct BatchReport {
    /// 取得に成功したファイル（完了順）
    pub imported: Vec<MaterializedFile>,
}

impl BatchReport {
    pub fn len(&self) -> usize {
        self.imported.len()
    }

    pub fn is_empty(&self) -> bool {
        self.imported.is_empty()
    }
}

/// バッチ実行オプション
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchOptions {
    /// 進捗表示を抑制
    pub quiet: bool,
}

/// インポート要求をまとめて実行
pub async fn run_batch(
    imports: Vec<PendingImport>,
    nav: &mut Navigation,
    staged: &StagedFiles,
    fetcher: &Fetcher,
    options: BatchOptions,
) -> Result<BatchReport> {
    if imports.is_empty() {
        return Ok(BatchReport::default());
    }

    let mut handles = Vec::with_capacity(imports.len());
    let mut requests = Vec::with_capacity(imports.len());
    for import in imports {
        let source = fetcher.classify(&import.request);
        requests.push((import.request, source));
        handles.push(Some(import.handle));
    }

    let width = progress::label_width(
        requests
            .iter()
            .map(|(request, source)| (source, request.source.as_str())),
    );
    let progress = BatchProgress::new(requests.len(), width, options.quiet);
    info!(count = requests.len(), "importing documents");

    let requests = &requests;
    let mut pending: FuturesUnordered<_> = requests
        .iter()
        .enumerate()
        .map(|(index, (request, source))| async move {
            (index, fetcher.fetch_source(request, source, staged).await)
        })
        .collect();

    let mut report = BatchReport::default();
    let mut errors = Vec::new();

    while let Some((index, result)) = pending.next().await {
        let (request, source) = &requests[index];

        match result {
            Ok(file) => {
                if let Some(handle) = handles[index].take() {
                    nav.rewrite(handle, request.destination.clone());
                }
                progress.advance(Outcome::succeeded(source), &request.source);
                info!(source = %request.source, destination = %file.path, "imported");
                report.imported.push(file);
            }
            Err(err @ ImportError::Fetch { .. }) => {
                progress.advance(Outcome::Failed, &request.source);
                warn!(source = %request.source, error = %err, "import failed");
                errors.push(err);
            }
            Err(err) => {
                progress.abandon();
                return Err(err);
            }
        }
    }

    progress.finish();

    match errors.len() {
        0 => Ok(report),
        1 => Err(errors.remove(0)),
        _ => Err(ImportError::Batch(errors)),
    }
}

#[cfg(test)]
#[path = "batch_test.rs"]
mod tests;
