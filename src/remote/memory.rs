use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use super::{Element, LibraryRemote};
use crate::error::{LibraryError, LibraryResult};
use crate::query::{CONTAINER_SIZE, CONTAINER_START};

/// 内存中的媒体服务器（离线数据 / 测试替身）
///
/// 按路径（不含查询串）返回预置元素；带分页参数的请求按
/// start/size 切片返回。所有请求按顺序记录。
#[derive(Debug, Default)]
pub struct MemoryRemote {
    routes: HashMap<String, Vec<Element>>,
    failures: Vec<String>,
    calls: Mutex<Vec<String>>,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_route(mut self, path: impl Into<String>, elements: Vec<Element>) -> Self {
        self.routes.insert(path.into(), elements);
        self
    }

    /// 对该路径的请求返回传输错误
    pub fn with_failure(mut self, path: impl Into<String>) -> Self {
        self.failures.push(path.into());
        self
    }

    /// 已发出的全部请求（含查询串）
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or(0)
    }

    /// 路径以 `prefix` 开头的请求数
    pub fn calls_to(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }
}

#[async_trait]
impl LibraryRemote for MemoryRemote {
    async fn query(&self, path: &str) -> LibraryResult<Vec<Element>> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(path.to_string());
        }

        let (route, query) = path.split_once('?').unwrap_or((path, ""));
        if self.failures.iter().any(|f| f == route) {
            return Err(LibraryError::Transport(format!("{} unreachable", route)));
        }

        let elements = self
            .routes
            .get(route)
            .ok_or_else(|| LibraryError::Transport(format!("{} returned HTTP 404", route)))?;

        let mut start = None;
        let mut size = None;
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            if key == CONTAINER_START {
                start = value.parse::<usize>().ok();
            } else if key == CONTAINER_SIZE {
                size = value.parse::<usize>().ok();
            }
        }

        match (start, size) {
            (Some(start), Some(size)) => Ok(elements.iter().skip(start).take(size).cloned().collect()),
            _ => Ok(elements.clone()),
        }
    }
}
