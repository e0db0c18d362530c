use crate::error::{LibraryError, LibraryResult};

/// 排序方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn parse(dir: &str) -> LibraryResult<Self> {
        match dir.to_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(LibraryError::InvalidSortDirection(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// 校验并规范化 `column:direction` 排序表达式
///
/// 列名与方向均不区分大小写，输出使用词表中的列名写法；省略方向时为 `asc`。
pub fn normalize_sort(expr: &str, allowed_sorts: &[&str]) -> LibraryResult<String> {
    let (column, direction) = match expr.split_once(':') {
        Some((column, direction)) => (column, direction),
        None => (expr, "asc"),
    };

    let column = column.to_lowercase();
    let canonical = allowed_sorts
        .iter()
        .find(|allowed| allowed.to_lowercase() == column)
        .ok_or_else(|| LibraryError::InvalidSortColumn(column.clone()))?;
    let direction = SortDirection::parse(direction)?;

    Ok(format!("{}:{}", canonical, direction.as_str()))
}
