use thiserror::Error;

/// インポート処理の統一エラー型
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Malformed import directive '{directive}': {reason}")]
    MalformedDirective { directive: String, reason: String },

    #[error("Invalid navigation entry: {0}")]
    InvalidNavigationEntry(String),

    #[error("Duplicate import destination '{destination}' (used by '{first}' and '{second}')")]
    DuplicateDestination {
        destination: String,
        first: String,
        second: String,
    },

    #[error("Failed to import {origin}: {cause}")]
    Fetch {
        origin: String,
        #[source]
        cause: FetchCause,
    },

    #[error("Staging error: {0}")]
    Staging(#[source] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{} imports failed", .0.len())]
    Batch(Vec<ImportError>),
}

/// 取得失敗の原因
#[derive(Debug, Error)]
pub enum FetchCause {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status}")]
    Status { status: u16 },

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("response is not valid UTF-8: {0}")]
    Decode(#[from] std::string::FromUtf8Error),
}

pub type Result<T> = std::result::Result<T, ImportError>;

impl ImportError {
    /// 取得処理を開始する前に検出されるエラーかどうか
    pub fn is_parse_time(&self) -> bool {
        matches!(
            self,
            ImportError::MalformedDirective { .. }
                | ImportError::InvalidNavigationEntry(_)
                | ImportError::DuplicateDestination { .. }
        )
    }

    /// 失敗したインポート元（URL またはパス）を列挙
    pub fn failed_origins(&self) -> Vec<&str> {
        match self {
            ImportError::Fetch { origin, .. } => vec![origin.as_str()],
            ImportError::Batch(errors) => errors.iter().flat_map(|e| e.failed_origins()).collect(),
            _ => Vec::new(),
        }
    }

    pub(crate) fn malformed(directive: &str, reason: impl Into<String>) -> Self {
        ImportError::MalformedDirective {
            directive: directive.to_string(),
            reason: reason.into(),
        }
    }
}
