use serde::{Deserialize, Serialize};

use super::item::{MediaItem, MediaTag};

/// 调用方给出的过滤值
///
/// 可以是字符串、数字 ID、带标签对象的引用、布尔值，或它们的列表。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Bool(bool),
    Number(i64),
    Text(String),
    Tag(MediaTag),
    List(Vec<FilterValue>),
}

impl FilterValue {
    /// 布尔型过滤器的真值判定
    pub fn is_truthy(&self) -> bool {
        match self {
            FilterValue::Bool(b) => *b,
            FilterValue::Number(n) => *n != 0,
            FilterValue::Text(s) => {
                let s = s.trim().to_lowercase();
                !(s.is_empty() || s == "0" || s == "false" || s == "no")
            }
            FilterValue::Tag(_) => true,
            // 列表取任一元素为真；`["0"]` 与 `"0"` 同义
            FilterValue::List(values) => values.iter().any(FilterValue::is_truthy),
        }
    }

    /// 展开为单值列表（嵌套列表被拍平）
    pub fn flatten(&self) -> Vec<&FilterValue> {
        match self {
            FilterValue::List(values) => values.iter().flat_map(|v| v.flatten()).collect(),
            other => vec![other],
        }
    }

    /// 单值的规范字符串形式；标签引用取其 ID
    pub fn as_raw_string(&self) -> String {
        match self {
            FilterValue::Bool(true) => "1".to_string(),
            FilterValue::Bool(false) => "0".to_string(),
            FilterValue::Number(n) => n.to_string(),
            FilterValue::Text(s) => s.clone(),
            FilterValue::Tag(tag) => tag.id.clone(),
            FilterValue::List(values) => values
                .iter()
                .map(|v| v.as_raw_string())
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Bool(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Number(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

impl From<MediaTag> for FilterValue {
    fn from(value: MediaTag) -> Self {
        FilterValue::Tag(value)
    }
}

impl<T: Into<FilterValue>> From<Vec<T>> for FilterValue {
    fn from(values: Vec<T>) -> Self {
        FilterValue::List(values.into_iter().map(Into::into).collect())
    }
}

/// 分区搜索请求
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub title: Option<String>,
    pub lib_type: Option<String>,
    pub sort: Option<String>,
    /// 保持插入顺序的过滤条件
    #[serde(default)]
    pub filters: Vec<(String, FilterValue)>,
    /// 结果上限；None 表示不设上限（直到服务器返回空页）
    pub max_results: Option<usize>,
}

impl SearchRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn lib_type(mut self, lib_type: impl Into<String>) -> Self {
        self.lib_type = Some(lib_type.into());
        self
    }

    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// 添加过滤条件；同名类别会覆盖之前的值但保留原位置
    pub fn filter(mut self, category: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        let category = category.into();
        let value = value.into();
        match self.filters.iter_mut().find(|(c, _)| *c == category) {
            Some(entry) => entry.1 = value,
            None => self.filters.push((category, value)),
        }
        self
    }

    pub fn max_results(mut self, max_results: usize) -> Self {
        self.max_results = Some(max_results);
        self
    }
}

/// 非致命诊断信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// 过滤值未能与服务器选项匹配，按原值发送
    UnresolvedFilterValue { category: String, value: String },
    /// 服务器返回了无法识别的条目类型，已跳过
    UnknownItemType { type_tag: String },
}

/// 搜索结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResults {
    pub items: Vec<MediaItem>,
    pub diagnostics: Vec<Diagnostic>,
}

impl SearchResults {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn titles(&self) -> Vec<&str> {
        self.items.iter().map(|i| i.title.as_str()).collect()
    }
}
