use std::collections::BTreeMap;
use std::sync::Arc;

use super::{find_item, list_items};
use crate::error::{LibraryError, LibraryResult};
use crate::models::{
    search_type, FilterChoice, FilterValue, MediaItem, SearchRequest, SearchResults, SectionKind,
};
use crate::query::{normalize_sort, ChoiceCache, ChoiceResolver, PaginatedSearch, SectionQueryBuilder};
use crate::remote::{Element, LibraryRemote};

/// 媒体库分区
///
/// 分区类型在构造时由服务器返回的 `type` 属性确定，过滤 / 排序词表随之固定。
/// 过滤选项列表缓存归分区独占，首次使用时加载，之后不会自动刷新。
pub struct LibrarySection {
    remote: Arc<dyn LibraryRemote>,
    kind: SectionKind,
    key: String,
    title: String,
    attrs: BTreeMap<String, String>,
    batch_size: usize,
    choices: ChoiceCache,
}

impl std::fmt::Debug for LibrarySection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LibrarySection")
            .field("kind", &self.kind)
            .field("key", &self.key)
            .field("title", &self.title)
            .field("batch_size", &self.batch_size)
            .finish()
    }
}

impl LibrarySection {
    pub fn new(
        remote: Arc<dyn LibraryRemote>,
        kind: SectionKind,
        key: impl Into<String>,
        title: impl Into<String>,
        batch_size: usize,
    ) -> Self {
        Self {
            remote,
            kind,
            key: key.into(),
            title: title.into(),
            attrs: BTreeMap::new(),
            batch_size,
            choices: ChoiceCache::new(),
        }
    }

    /// 从 `/library/sections` 的 `Directory` 元素构建；未知分区类型返回 None
    pub fn from_element(remote: Arc<dyn LibraryRemote>, elem: &Element, batch_size: usize) -> Option<Self> {
        let kind = SectionKind::from_type_tag(elem.attr("type")?)?;
        let key = elem.attr("key")?;
        let mut section = Self::new(remote, kind, key, elem.attr("title").unwrap_or_default(), batch_size);
        section.attrs = elem.attributes.clone();
        Some(section)
    }

    pub fn kind(&self) -> SectionKind {
        self.kind
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    /// 分区的基础路径；key 已经是绝对路径时直接使用
    pub fn path(&self) -> String {
        if self.key.starts_with('/') {
            self.key.clone()
        } else {
            format!("/library/sections/{}", self.key)
        }
    }

    fn resolver<'a>(&'a self, path: &'a str) -> ChoiceResolver<'a> {
        ChoiceResolver::new(path, self.kind.descriptor(), self.remote.as_ref(), &self.choices)
    }

    pub async fn get(&self, title: &str) -> LibraryResult<MediaItem> {
        find_item(self.remote.as_ref(), &format!("{}/all", self.path()), title).await
    }

    pub async fn all(&self) -> LibraryResult<Vec<MediaItem>> {
        list_items(self.remote.as_ref(), &format!("{}/all", self.path())).await
    }

    pub async fn on_deck(&self) -> LibraryResult<Vec<MediaItem>> {
        list_items(self.remote.as_ref(), &format!("{}/onDeck", self.path())).await
    }

    pub async fn analyze(&self) -> LibraryResult<()> {
        self.maintenance("analyze").await
    }

    pub async fn empty_trash(&self) -> LibraryResult<()> {
        self.maintenance("emptyTrash").await
    }

    pub async fn refresh(&self) -> LibraryResult<()> {
        self.maintenance("refresh").await
    }

    async fn maintenance(&self, action: &str) -> LibraryResult<()> {
        let path = format!("{}/{}", self.path(), action);
        tracing::info!("Section '{}': {}", self.title, action);
        self.remote.query(&path).await?;
        Ok(())
    }

    /// 丢弃已缓存的过滤选项，下次解析时重新加载
    pub async fn refresh_choices(&self) {
        self.choices.clear().await;
    }

    /// 列出某个过滤类别的可选值
    ///
    /// `narrowing` 中的过滤条件会像搜索条件一样被解析，用于把选项缩小到当前上下文；
    /// 不允许包含被列出的类别本身。不带缩小条件的结果会被缓存。
    pub async fn list_choices(
        &self,
        category: &str,
        lib_type: Option<&str>,
        narrowing: &[(String, FilterValue)],
    ) -> LibraryResult<Vec<FilterChoice>> {
        let path = self.path();
        let resolver = self.resolver(&path);
        resolver.check_category(category)?;
        if narrowing.iter().any(|(c, _)| c == category) {
            return Err(LibraryError::BadRequest(format!(
                "Narrowing filter cannot target the listed category: {}",
                category
            )));
        }
        if let Some(lib_type) = lib_type {
            search_type(lib_type)?;
        }

        if narrowing.is_empty() {
            return Ok(resolver.choices(category, lib_type).await?.as_ref().clone());
        }

        let (resolved, _) = resolver.resolve_all(narrowing, lib_type).await?;
        let query = resolver
            .choices_query(category)
            .with_filters(&resolved)
            .with_lib_type(lib_type)?
            .build();
        let elements = self.remote.query(&query).await?;

        Ok(elements
            .iter()
            .filter_map(|elem| FilterChoice::from_element(category, elem))
            .collect())
    }

    /// 在分区内搜索
    ///
    /// 过滤类别、排序表达式与 libtype 全部校验通过后才会发出请求；
    /// 之后解析过滤值（可能加载选项列表），再逐页获取结果直到上限或空页。
    pub async fn search(&self, request: &SearchRequest) -> LibraryResult<SearchResults> {
        let path = self.path();
        let resolver = self.resolver(&path);
        let descriptor = self.kind.descriptor();

        for (category, _) in &request.filters {
            resolver.check_category(category)?;
        }
        let sort = request
            .sort
            .as_deref()
            .map(|expr| normalize_sort(expr, descriptor.allowed_sorts))
            .transpose()?;
        let lib_type = request.lib_type.as_deref();
        if let Some(lib_type) = lib_type {
            search_type(lib_type)?;
        }

        let (resolved, mut diagnostics) = resolver.resolve_all(&request.filters, lib_type).await?;

        let query = SectionQueryBuilder::new(format!("{}/all", path))
            .with_filters(&resolved)
            .with_title(request.title.as_deref())
            .with_sort(sort.as_deref())
            .with_lib_type(lib_type)?;

        let mut results =
            PaginatedSearch::new(self.remote.as_ref(), query, self.batch_size, request.max_results)
                .run()
                .await?;
        diagnostics.append(&mut results.diagnostics);
        results.diagnostics = diagnostics;
        Ok(results)
    }

    /// 以指定条目类型搜索；该类型必须属于本分区
    pub async fn search_lib_type(&self, lib_type: &str, request: SearchRequest) -> LibraryResult<SearchResults> {
        if !self.kind.searchable_lib_types().contains(&lib_type) {
            return Err(LibraryError::BadRequest(format!(
                "{} sections cannot search {}",
                self.kind.type_tag(),
                lib_type
            )));
        }
        self.search(&request.lib_type(lib_type)).await
    }

    pub async fn search_shows(&self, request: SearchRequest) -> LibraryResult<SearchResults> {
        self.search_lib_type("show", request).await
    }

    pub async fn search_episodes(&self, request: SearchRequest) -> LibraryResult<SearchResults> {
        self.search_lib_type("episode", request).await
    }

    pub async fn search_artists(&self, request: SearchRequest) -> LibraryResult<SearchResults> {
        self.search_lib_type("artist", request).await
    }

    pub async fn search_albums(&self, request: SearchRequest) -> LibraryResult<SearchResults> {
        self.search_lib_type("album", request).await
    }

    pub async fn search_tracks(&self, request: SearchRequest) -> LibraryResult<SearchResults> {
        self.search_lib_type("track", request).await
    }
}
