use std::sync::Arc;
use tokio::sync::OnceCell;

use super::list_items;
use crate::error::{LibraryError, LibraryResult};
use crate::models::MediaItem;
use crate::remote::LibraryRemote;

/// 播放列表；条目在首次访问时加载并缓存
pub struct Playlist {
    remote: Arc<dyn LibraryRemote>,
    item: MediaItem,
    items: OnceCell<Vec<MediaItem>>,
}

impl std::fmt::Debug for Playlist {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Playlist")
            .field("title", &self.item.title)
            .field("rating_key", &self.item.rating_key)
            .finish()
    }
}

impl Playlist {
    pub fn new(remote: Arc<dyn LibraryRemote>, item: MediaItem) -> Self {
        Self {
            remote,
            item,
            items: OnceCell::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.item.title
    }

    pub fn item(&self) -> &MediaItem {
        &self.item
    }

    /// 默认封面：播放列表使用拼合图
    pub fn default_thumb(&self) -> Option<&str> {
        self.item.attrs.get("composite").map(String::as_str)
    }

    pub async fn items(&self) -> LibraryResult<&[MediaItem]> {
        let rating_key = self
            .item
            .rating_key
            .as_deref()
            .ok_or_else(|| LibraryError::NotFound(format!("Playlist without ratingKey: {}", self.item.title)))?;

        let items = self
            .items
            .get_or_try_init(|| async {
                list_items(self.remote.as_ref(), &format!("/playlists/{}/items", rating_key)).await
            })
            .await?;
        Ok(items.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::Library;
    use crate::remote::{Element, MemoryRemote};

    fn server() -> MemoryRemote {
        MemoryRemote::new()
            .with_route(
                "/playlists",
                vec![Element::new("Playlist")
                    .with_attr("type", "playlist")
                    .with_attr("ratingKey", "77")
                    .with_attr("title", "Road Trip")
                    .with_attr("composite", "/playlists/77/composite/1")],
            )
            .with_route(
                "/playlists/77/items",
                vec![
                    Element::new("Track").with_attr("type", "track").with_attr("title", "Roadrunner"),
                    Element::new("Track").with_attr("type", "track").with_attr("title", "Radar Love"),
                ],
            )
    }

    #[tokio::test]
    async fn test_playlist_items_loaded_once() {
        let remote = Arc::new(server());
        let library = Library::new(remote.clone(), 50);

        let playlists = library.playlists().await.unwrap();
        assert_eq!(playlists.len(), 1);
        let playlist = &playlists[0];
        assert_eq!(playlist.title(), "Road Trip");
        assert_eq!(playlist.default_thumb(), Some("/playlists/77/composite/1"));

        assert_eq!(playlist.items().await.unwrap().len(), 2);
        assert_eq!(playlist.items().await.unwrap()[1].title, "Radar Love");
        assert_eq!(remote.calls_to("/playlists/77/items"), 1);
    }

    #[tokio::test]
    async fn test_library_playlist_items_by_key() {
        let library = Library::new(Arc::new(server()), 50);
        let items = library.playlist_items("77").await.unwrap();
        let titles: Vec<&str> = items.iter().map(|item| item.title.as_str()).collect();
        assert_eq!(titles, vec!["Roadrunner", "Radar Love"]);
    }

    #[tokio::test]
    async fn test_playlist_without_rating_key() {
        let remote: Arc<dyn LibraryRemote> = Arc::new(MemoryRemote::new());
        let item = MediaItem {
            kind: crate::models::ItemKind::Playlist,
            rating_key: None,
            key: None,
            title: "Broken".to_string(),
            year: None,
            added_at: None,
            attrs: Default::default(),
        };
        let playlist = Playlist::new(remote, item);
        assert!(matches!(playlist.items().await, Err(LibraryError::NotFound(_))));
    }
}
