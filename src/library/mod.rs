// 媒体库门面
//
// 对外提供分区列表、条目浏览、搜索与维护操作。
// 浏览类操作直接委托给远程协作方；分区内搜索由 LibrarySection 完成。

pub mod hub;
pub mod playlist;
pub mod section;

use std::sync::Arc;

pub use hub::Hub;
pub use playlist::Playlist;
pub use section::LibrarySection;

use crate::config::ClientConfig;
use crate::error::{LibraryError, LibraryResult};
use crate::models::{build_items, ItemKind, MediaItem};
use crate::query::SectionQueryBuilder;
use crate::remote::{HttpRemote, LibraryRemote};

/// 请求路径并构建条目，无法识别的条目被跳过
pub(crate) async fn list_items(remote: &dyn LibraryRemote, path: &str) -> LibraryResult<Vec<MediaItem>> {
    let elements = remote.query(path).await?;
    let (items, _) = build_items(&elements);
    Ok(items)
}

/// 按标题（不区分大小写）查找条目
pub(crate) async fn find_item(remote: &dyn LibraryRemote, path: &str, title: &str) -> LibraryResult<MediaItem> {
    let wanted = title.to_lowercase();
    list_items(remote, path)
        .await?
        .into_iter()
        .find(|item| item.title.to_lowercase() == wanted)
        .ok_or_else(|| LibraryError::NotFound(format!("Unable to find item: {}", title)))
}

/// 媒体库
#[derive(Clone)]
pub struct Library {
    remote: Arc<dyn LibraryRemote>,
    batch_size: usize,
}

impl std::fmt::Debug for Library {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Library")
            .field("batch_size", &self.batch_size)
            .finish()
    }
}

impl Library {
    /// `batch_size` 为分页搜索时每页请求的条目数
    pub fn new(remote: Arc<dyn LibraryRemote>, batch_size: usize) -> Self {
        Self {
            remote,
            batch_size: batch_size.max(1),
        }
    }

    /// 使用 HTTP 客户端连接服务器
    pub fn connect(config: &ClientConfig) -> LibraryResult<Self> {
        let remote = HttpRemote::new(config)?;
        Ok(Self::new(Arc::new(remote), config.container_size))
    }

    pub fn remote(&self) -> &dyn LibraryRemote {
        self.remote.as_ref()
    }

    /// 列出全部分区，未知类型的分区被忽略
    pub async fn sections(&self) -> LibraryResult<Vec<LibrarySection>> {
        let elements = self.remote.query("/library/sections").await?;
        let sections = elements
            .iter()
            .filter_map(|elem| {
                let section = LibrarySection::from_element(self.remote.clone(), elem, self.batch_size);
                if section.is_none() {
                    tracing::debug!("Ignoring section of unknown type: {:?}", elem.attr("type"));
                }
                section
            })
            .collect();
        Ok(sections)
    }

    /// 按标题获取分区（精确匹配）
    pub async fn section(&self, title: &str) -> LibraryResult<LibrarySection> {
        self.sections()
            .await?
            .into_iter()
            .find(|section| section.title() == title)
            .ok_or_else(|| LibraryError::NotFound(format!("Invalid library section: {}", title)))
    }

    pub async fn all(&self) -> LibraryResult<Vec<MediaItem>> {
        list_items(self.remote.as_ref(), "/library/all").await
    }

    pub async fn on_deck(&self) -> LibraryResult<Vec<MediaItem>> {
        list_items(self.remote.as_ref(), "/library/onDeck").await
    }

    pub async fn recently_added(&self) -> LibraryResult<Vec<MediaItem>> {
        list_items(self.remote.as_ref(), "/library/recentlyAdded").await
    }

    pub async fn get(&self, title: &str) -> LibraryResult<MediaItem> {
        find_item(self.remote.as_ref(), "/library/all", title).await
    }

    /// 按 ratingKey 或完整 key 获取条目
    pub async fn get_by_key(&self, key: &str) -> LibraryResult<MediaItem> {
        let path = if key.starts_with('/') {
            key.to_string()
        } else {
            format!("/library/metadata/{}", key)
        };
        list_items(self.remote.as_ref(), &path)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| LibraryError::NotFound(format!("Unable to find key: {}", key)))
    }

    /// 全库搜索
    ///
    /// 不校验过滤词表，也不分页；`extra` 原样附加为查询参数。
    /// 分区内搜索能力更强，能用时优先使用 `LibrarySection::search`。
    pub async fn search(
        &self,
        title: Option<&str>,
        lib_type: Option<&str>,
        extra: &[(&str, &str)],
    ) -> LibraryResult<Vec<MediaItem>> {
        let mut query = SectionQueryBuilder::new("/library/all")
            .with_title(title)
            .with_lib_type(lib_type)?;
        for (key, value) in extra {
            query = query.with_arg(key, value);
        }
        list_items(self.remote.as_ref(), &query.build()).await
    }

    pub async fn clean_bundles(&self) -> LibraryResult<()> {
        tracing::info!("Cleaning bundles");
        self.remote.query("/library/clean/bundles").await?;
        Ok(())
    }

    /// 清空每个分区的回收站
    pub async fn empty_trash(&self) -> LibraryResult<()> {
        for section in self.sections().await? {
            section.empty_trash().await?;
        }
        Ok(())
    }

    pub async fn optimize(&self) -> LibraryResult<()> {
        tracing::info!("Optimizing library database");
        self.remote.query("/library/optimize").await?;
        Ok(())
    }

    pub async fn refresh(&self) -> LibraryResult<()> {
        tracing::info!("Refreshing all sections");
        self.remote.query("/library/sections/all/refresh").await?;
        Ok(())
    }

    /// 首页推荐分组
    pub async fn hubs(&self) -> LibraryResult<Vec<Hub>> {
        let elements = self.remote.query("/hubs").await?;
        Ok(elements
            .iter()
            .filter(|elem| elem.tag == "Hub")
            .map(Hub::from_element)
            .collect())
    }

    /// 全部播放列表
    pub async fn playlists(&self) -> LibraryResult<Vec<Playlist>> {
        let items = list_items(self.remote.as_ref(), "/playlists").await?;
        Ok(items
            .into_iter()
            .filter(|item| item.kind == ItemKind::Playlist)
            .map(|item| Playlist::new(self.remote.clone(), item))
            .collect())
    }

    /// 按 ratingKey 直接读取播放列表条目
    pub async fn playlist_items(&self, rating_key: &str) -> LibraryResult<Vec<MediaItem>> {
        list_items(self.remote.as_ref(), &format!("/playlists/{}/items", rating_key)).await
    }
}
