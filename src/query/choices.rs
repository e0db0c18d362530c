// 过滤值解析
//
// 将调用方给出的宽松过滤值（字符串、数字 ID、标签引用、布尔值）
// 解析为服务器认可的规范键。选项列表按 (类别, libtype) 懒加载并缓存，
// 在所属分区对象的生命周期内不会失效，需要新数据时调用 `clear`。

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::builder::SectionQueryBuilder;
use crate::error::{LibraryError, LibraryResult};
use crate::models::{Diagnostic, FilterChoice, FilterValue, SectionDescriptor};
use crate::remote::LibraryRemote;

/// 单个类别的解析结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// 逗号连接的规范键
    pub value: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// 选项列表缓存，由分区对象独占
#[derive(Debug, Default)]
pub struct ChoiceCache {
    entries: RwLock<HashMap<(String, Option<String>), Arc<Vec<FilterChoice>>>>,
}

impl ChoiceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, category: &str, lib_type: Option<&str>) -> Option<Arc<Vec<FilterChoice>>> {
        let entries = self.entries.read().await;
        entries
            .get(&(category.to_string(), lib_type.map(str::to_string)))
            .cloned()
    }

    pub async fn insert(&self, category: &str, lib_type: Option<&str>, choices: Vec<FilterChoice>) -> Arc<Vec<FilterChoice>> {
        let choices = Arc::new(choices);
        let mut entries = self.entries.write().await;
        entries.insert(
            (category.to_string(), lib_type.map(str::to_string)),
            choices.clone(),
        );
        choices
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

/// 将单个原始值与选项列表匹配，结果追加到 `keys`
///
/// 匹配顺序（先命中者为准）：
/// 1. 已是规范键
/// 2. 与某个选项标题完全相同（不区分大小写）
/// 3. 是一个或多个标题的子串，收集全部命中的键
/// 4. 均未命中，按原值使用并返回诊断信息
fn match_single(
    category: &str,
    raw: &str,
    choices: &[FilterChoice],
    keys: &mut Vec<String>,
) -> Option<Diagnostic> {
    let needle = raw.to_lowercase();

    if let Some(choice) = choices.iter().find(|c| c.key.to_lowercase() == needle) {
        push_unique(keys, &choice.key);
        return None;
    }

    if let Some(choice) = choices.iter().find(|c| c.title.to_lowercase() == needle) {
        push_unique(keys, &choice.key);
        return None;
    }

    let mut matched = false;
    for choice in choices.iter().filter(|c| c.title.to_lowercase().contains(&needle)) {
        push_unique(keys, &choice.key);
        matched = true;
    }
    if matched {
        return None;
    }

    tracing::warn!(
        "Filter value not listed, using raw item value: {}={}",
        category,
        raw
    );
    push_unique(keys, raw);
    Some(Diagnostic::UnresolvedFilterValue {
        category: category.to_string(),
        value: raw.to_string(),
    })
}

fn push_unique(keys: &mut Vec<String>, key: &str) {
    if !keys.iter().any(|k| k == key) {
        keys.push(key.to_string());
    }
}

/// 针对固定的选项快照解析过滤值（纯函数，结果确定）
pub fn resolve_against(category: &str, value: &FilterValue, choices: &[FilterChoice]) -> Resolution {
    let mut keys = Vec::new();
    let mut diagnostics = Vec::new();

    for single in value.flatten() {
        let raw = single.as_raw_string();
        if raw.is_empty() {
            continue;
        }
        if let Some(diagnostic) = match_single(category, &raw, choices, &mut keys) {
            diagnostics.push(diagnostic);
        }
    }

    Resolution {
        value: keys.join(","),
        diagnostics,
    }
}

/// 分区范围内的过滤值解析器
pub struct ChoiceResolver<'a> {
    section_path: &'a str,
    descriptor: &'static SectionDescriptor,
    remote: &'a dyn LibraryRemote,
    cache: &'a ChoiceCache,
}

impl<'a> ChoiceResolver<'a> {
    pub fn new(
        section_path: &'a str,
        descriptor: &'static SectionDescriptor,
        remote: &'a dyn LibraryRemote,
        cache: &'a ChoiceCache,
    ) -> Self {
        Self {
            section_path,
            descriptor,
            remote,
            cache,
        }
    }

    pub fn check_category(&self, category: &str) -> LibraryResult<()> {
        if self.descriptor.allows_filter(category) {
            Ok(())
        } else {
            Err(LibraryError::InvalidFilterCategory(category.to_string()))
        }
    }

    /// 选项列表查询路径
    pub fn choices_query(&self, category: &str) -> SectionQueryBuilder {
        SectionQueryBuilder::new(format!("{}/{}", self.section_path, category))
    }

    /// 获取（并缓存）某个类别的选项列表
    pub async fn choices(&self, category: &str, lib_type: Option<&str>) -> LibraryResult<Arc<Vec<FilterChoice>>> {
        if let Some(cached) = self.cache.get(category, lib_type).await {
            return Ok(cached);
        }

        let query = self.choices_query(category).with_lib_type(lib_type)?.build();
        let elements = self.remote.query(&query).await?;
        let choices: Vec<FilterChoice> = elements
            .iter()
            .filter_map(|elem| FilterChoice::from_element(category, elem))
            .collect();

        tracing::debug!("Cached {} choices for {}/{}", choices.len(), self.section_path, category);
        Ok(self.cache.insert(category, lib_type, choices).await)
    }

    /// 解析单个类别的过滤值
    pub async fn resolve(&self, category: &str, value: &FilterValue, lib_type: Option<&str>) -> LibraryResult<Resolution> {
        self.check_category(category)?;

        if self.descriptor.is_boolean_filter(category) {
            let value = if value.is_truthy() { "1" } else { "0" };
            return Ok(Resolution {
                value: value.to_string(),
                diagnostics: Vec::new(),
            });
        }

        let choices = self.choices(category, lib_type).await?;
        Ok(resolve_against(category, value, &choices))
    }

    /// 解析全部过滤条件
    ///
    /// 先校验所有类别，任何一个非法都不会触发网络请求。
    pub async fn resolve_all(
        &self,
        filters: &[(String, FilterValue)],
        lib_type: Option<&str>,
    ) -> LibraryResult<(Vec<(String, String)>, Vec<Diagnostic>)> {
        for (category, _) in filters {
            self.check_category(category)?;
        }

        let mut resolved = Vec::with_capacity(filters.len());
        let mut diagnostics = Vec::new();
        for (category, value) in filters {
            let resolution = self.resolve(category, value, lib_type).await?;
            resolved.push((category.clone(), resolution.value));
            diagnostics.extend(resolution.diagnostics);
        }

        Ok((resolved, diagnostics))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MediaTag;

    fn genres() -> Vec<FilterChoice> {
        vec![
            FilterChoice::new("genre", "28", "Action"),
            FilterChoice::new("genre", "35", "Comedy"),
            FilterChoice::new("genre", "99", "Documentary"),
        ]
    }

    #[test]
    fn test_canonical_key_passes_through() {
        let resolution = resolve_against("genre", &FilterValue::from("35"), &genres());
        assert_eq!(resolution.value, "35");
        assert!(resolution.diagnostics.is_empty());

        let resolution = resolve_against("genre", &FilterValue::from(28i64), &genres());
        assert_eq!(resolution.value, "28");
    }

    #[test]
    fn test_exact_title_case_insensitive() {
        assert_eq!(resolve_against("genre", &"Action".into(), &genres()).value, "28");
        assert_eq!(resolve_against("genre", &"action".into(), &genres()).value, "28");
        assert_eq!(resolve_against("genre", &"COMEDY".into(), &genres()).value, "35");
    }

    #[test]
    fn test_substring_collects_every_match() {
        assert_eq!(resolve_against("genre", &"co".into(), &genres()).value, "35");

        // "Comedy" 和 "Documentary" 都包含 "m"
        let resolution = resolve_against("genre", &"m".into(), &genres());
        assert_eq!(resolution.value, "35,99");
        assert!(resolution.diagnostics.is_empty());
    }

    #[test]
    fn test_unresolved_value_passes_through_verbatim() {
        let resolution = resolve_against("genre", &"Sci-Fi-Noir".into(), &genres());
        assert_eq!(resolution.value, "Sci-Fi-Noir");
        assert_eq!(
            resolution.diagnostics,
            vec![Diagnostic::UnresolvedFilterValue {
                category: "genre".to_string(),
                value: "Sci-Fi-Noir".to_string(),
            }]
        );
    }

    #[test]
    fn test_list_union_without_duplicates() {
        let value = FilterValue::from(vec!["Action", "28", "comedy", "act"]);
        assert_eq!(resolve_against("genre", &value, &genres()).value, "28,35");
    }

    #[test]
    fn test_tag_reference_uses_id() {
        let value = FilterValue::from(MediaTag::new("99", "Docs"));
        assert_eq!(resolve_against("genre", &value, &genres()).value, "99");
    }

    #[test]
    fn test_empty_list_resolves_to_empty() {
        let value = FilterValue::List(Vec::new());
        let resolution = resolve_against("genre", &value, &genres());
        assert!(resolution.value.is_empty());
        assert!(resolution.diagnostics.is_empty());
    }

    #[tokio::test]
    async fn test_cache_insert_and_clear() {
        let cache = ChoiceCache::new();
        assert!(cache.get("genre", None).await.is_none());

        cache.insert("genre", None, genres()).await;
        assert_eq!(cache.get("genre", None).await.unwrap().len(), 3);
        // libtype 不同视为不同的列表
        assert!(cache.get("genre", Some("episode")).await.is_none());

        cache.clear().await;
        assert_eq!(cache.len().await, 0);
    }
}
