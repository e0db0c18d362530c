// 远程协作方：发送查询并返回一页原始元素
//
// - Element：服务器响应中的原始元素
// - LibraryRemote：查询接口（HTTP 实现或内存实现）
// - xml：响应解析

pub mod http;
pub mod memory;
pub mod xml;

use async_trait::async_trait;
use std::collections::BTreeMap;

use crate::error::LibraryResult;

pub use http::HttpRemote;
pub use memory::MemoryRemote;

/// 服务器响应中的原始元素
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}

/// 媒体服务器查询接口
///
/// 每次调用是一次完整的请求；返回响应容器的直接子元素。
/// 实现方负责超时与取消，本库不做重试。
#[async_trait]
pub trait LibraryRemote: Send + Sync {
    async fn query(&self, path: &str) -> LibraryResult<Vec<Element>>;
}
