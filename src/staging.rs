//! ステージングファイルセット
//!
//! 取得したドキュメントを一時ディレクトリに書き込み、ホスト側の
//! [`Files`] に重ねた統合ビューとして公開する。
//!
//! - 同じ URI への書き込みは最後のものが有効
//! - 一時ディレクトリは `release()` で削除（冪等）。呼ばれなかった場合も Drop で削除
//! - release 後の書き込み・解決はエラー

use crate::error::{ImportError, Result};
use crate::files::{Files, SiteFile};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Component, Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tempfile::TempDir;

const TEMP_PREFIX: &str = "mkimport-";

/// ステージングファイルセット
#[derive(Debug)]
pub struct StagedFiles {
    dir: Mutex<Option<TempDir>>,
    root: PathBuf,
    staged: Mutex<BTreeSet<String>>,
}

impl StagedFiles {
    /// システムの一時ディレクトリに作成
    pub fn new() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .tempdir()
            .map_err(ImportError::Staging)?;
        Ok(Self::from_temp_dir(dir))
    }

    /// 指定ディレクトリの下に作成（ディレクトリがなければ作成する）
    pub fn new_in(parent: &Path) -> Result<Self> {
        std::fs::create_dir_all(parent).map_err(ImportError::Staging)?;
        let dir = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .tempdir_in(parent)
            .map_err(ImportError::Staging)?;
        Ok(Self::from_temp_dir(dir))
    }

    fn from_temp_dir(dir: TempDir) -> Self {
        tracing::debug!(path = %dir.path().display(), "created staging area");
        Self {
            root: dir.path().to_path_buf(),
            dir: Mutex::new(Some(dir)),
            staged: Mutex::new(BTreeSet::new()),
        }
    }

    /// 一時ディレクトリのパス
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 書き込み用ストリームを開く
    ///
    /// 書き込んだ内容は [`StagedWriter::finish`] を呼ぶまで解決結果に含まれない。
    pub fn open(&self, uri: &str) -> Result<StagedWriter<'_>> {
        self.ensure_active()?;
        let path = self.path_for(uri)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ImportError::Staging)?;
        }
        let file = File::create(&path).map_err(ImportError::Staging)?;

        Ok(StagedWriter {
            set: self,
            uri: uri.to_string(),
            file: BufWriter::new(file),
        })
    }

    /// 内容をまとめて書き込む
    pub fn write(&self, uri: &str, content: &[u8]) -> Result<()> {
        let mut writer = self.open(uri)?;
        writer.write_all(content).map_err(ImportError::Staging)?;
        writer.finish()
    }

    /// ステージ済みの URI 一覧
    pub fn staged_uris(&self) -> Vec<String> {
        lock(&self.staged).iter().cloned().collect()
    }

    /// ホスト側のコレクションに重ねた統合ビューを返す
    ///
    /// URI が衝突した場合はステージ側が優先。
    pub fn resolve(&self, host: &Files) -> Result<Files> {
        self.ensure_active()?;

        let mut merged = host.clone();
        for uri in lock(&self.staged).iter() {
            if merged.contains(uri) {
                tracing::debug!(uri = %uri, "staged file overrides host file");
            }
            merged.insert(SiteFile::new(uri.clone(), self.root.join(uri)));
        }
        Ok(merged)
    }

    /// 一時ディレクトリを削除
    ///
    /// 何度呼んでもよい。2 回目以降は何もしない。
    pub fn release(&self) -> Result<()> {
        let dir = lock(&self.dir).take();
        lock(&self.staged).clear();

        match dir {
            Some(dir) => {
                tracing::debug!(path = %self.root.display(), "releasing staging area");
                dir.close().map_err(ImportError::Staging)
            }
            None => Ok(()),
        }
    }

    pub fn is_released(&self) -> bool {
        lock(&self.dir).is_none()
    }

    fn ensure_active(&self) -> Result<()> {
        if self.is_released() {
            return Err(ImportError::Staging(io::Error::other(
                "staging area has already been released",
            )));
        }
        Ok(())
    }

    fn path_for(&self, uri: &str) -> Result<PathBuf> {
        let relative = Path::new(uri);
        let is_safe = !uri.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));

        if !is_safe {
            return Err(ImportError::Staging(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("'{uri}' is not a relative file path"),
            )));
        }
        Ok(self.root.join(relative))
    }

    fn register(&self, uri: String) {
        lock(&self.staged).insert(uri);
    }
}

/// ステージ領域への書き込みストリーム
#[derive(Debug)]
pub struct StagedWriter<'a> {
    set: &'a StagedFiles,
    uri: String,
    file: BufWriter<File>,
}

impl StagedWriter<'_> {
    /// 書き込みを確定し、URI を登録する
    pub fn finish(mut self) -> Result<()> {
        self.file.flush().map_err(ImportError::Staging)?;
        self.set.register(self.uri);
        Ok(())
    }
}

impl Write for StagedWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
#[path = "staging_test.rs"]
mod tests;
