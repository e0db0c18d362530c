// 媒体库客户端错误类型定义
//
// 校验类错误（过滤器、排序、媒体类型）在任何网络请求之前抛出；
// 传输与解析错误原样向调用方传播，不做重试。

use thiserror::Error;

/// 媒体库操作的统一错误类型
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("Unknown filter category: {0}")]
    InvalidFilterCategory(String),

    #[error("Unknown sort column: {0}")]
    InvalidSortColumn(String),

    #[error("Unknown sort dir: {0}")]
    InvalidSortDirection(String),

    #[error("Unknown libtype: {0}")]
    UnknownLibType(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// 服务器返回了无法识别的条目类型（调用方通常只记录并跳过）
    #[error("Unknown item type: {0}")]
    UnknownItemType(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl LibraryError {
    /// 是否属于“错误请求”类错误（在发送请求之前即可判定）
    pub fn is_bad_request(&self) -> bool {
        matches!(
            self,
            LibraryError::InvalidFilterCategory(_)
                | LibraryError::InvalidSortColumn(_)
                | LibraryError::InvalidSortDirection(_)
                | LibraryError::UnknownLibType(_)
                | LibraryError::BadRequest(_)
        )
    }
}

// 实现从 reqwest::Error 到 LibraryError 的转换
impl From<reqwest::Error> for LibraryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LibraryError::Transport("request timed out".to_string())
        } else if let Some(status) = err.status() {
            LibraryError::Transport(format!("HTTP status {}", status.as_u16()))
        } else {
            LibraryError::Transport(err.to_string())
        }
    }
}

impl From<quick_xml::Error> for LibraryError {
    fn from(err: quick_xml::Error) -> Self {
        LibraryError::Parse(err.to_string())
    }
}

/// Result类型别名
pub type LibraryResult<T> = Result<T, LibraryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = LibraryError::InvalidSortColumn("bogus".to_string());
        assert_eq!(error.to_string(), "Unknown sort column: bogus");

        let error = LibraryError::NotFound("Invalid library section: Anime".to_string());
        assert_eq!(error.to_string(), "Not found: Invalid library section: Anime");
    }

    #[test]
    fn test_bad_request_grouping() {
        assert!(LibraryError::InvalidFilterCategory("mood".into()).is_bad_request());
        assert!(LibraryError::InvalidSortDirection("sideways".into()).is_bad_request());
        assert!(LibraryError::UnknownLibType("comic".into()).is_bad_request());
        assert!(!LibraryError::NotFound("x".into()).is_bad_request());
        assert!(!LibraryError::Transport("refused".into()).is_bad_request());
    }
}
