use crate::models::{build_items, Diagnostic, MediaItem};
use crate::remote::Element;

/// 推荐分组（`/hubs` 下的 `Hub` 元素），条目随响应一起返回
#[derive(Debug, Clone, PartialEq)]
pub struct Hub {
    pub hub_identifier: String,
    pub title: String,
    pub hub_type: Option<String>,
    pub items: Vec<MediaItem>,
    /// 构建条目时跳过的未知类型
    pub skipped: Vec<Diagnostic>,
}

impl Hub {
    pub fn from_element(elem: &Element) -> Self {
        let (items, skipped) = build_items(&elem.children);
        Self {
            hub_identifier: elem.attr("hubIdentifier").unwrap_or_default().to_string(),
            title: elem.attr("title").unwrap_or_default().to_string(),
            hub_type: elem.attr("type").map(str::to_string),
            items,
            skipped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ItemKind;

    #[test]
    fn test_hub_skips_unknown_items() {
        let elem = Element::new("Hub")
            .with_attr("hubIdentifier", "home.ondeck")
            .with_attr("title", "On Deck")
            .with_attr("type", "mixed")
            .with_child(Element::new("Video").with_attr("type", "episode").with_attr("title", "Pilot"))
            .with_child(Element::new("Directory").with_attr("type", "podcast").with_attr("title", "Talk"))
            .with_child(Element::new("Video").with_attr("type", "movie").with_attr("title", "Heat"));

        let hub = Hub::from_element(&elem);
        assert_eq!(hub.hub_identifier, "home.ondeck");
        assert_eq!(hub.items.len(), 2);
        assert_eq!(hub.items[0].kind, ItemKind::Episode);
        assert_eq!(hub.items[1].title, "Heat");
        assert_eq!(
            hub.skipped,
            vec![Diagnostic::UnknownItemType { type_tag: "podcast".to_string() }]
        );
    }

    #[tokio::test]
    async fn test_library_hubs() {
        use crate::library::Library;
        use crate::remote::MemoryRemote;
        use std::sync::Arc;

        let remote = MemoryRemote::new().with_route(
            "/hubs",
            vec![
                Element::new("Hub")
                    .with_attr("hubIdentifier", "movie.recentlyadded")
                    .with_attr("title", "Recently Added Movies")
                    .with_child(Element::new("Video").with_attr("type", "movie").with_attr("title", "Heat")),
                Element::new("Directory").with_attr("title", "not a hub"),
            ],
        );
        let library = Library::new(Arc::new(remote), 50);

        let hubs = library.hubs().await.unwrap();
        assert_eq!(hubs.len(), 1);
        assert_eq!(hubs[0].title, "Recently Added Movies");
        assert_eq!(hubs[0].items[0].title, "Heat");
    }
}
