use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::search::Diagnostic;
use crate::error::{LibraryError, LibraryResult};
use crate::remote::Element;

/// 条目类型（对应元素的 `type` 属性）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Movie,
    Show,
    Season,
    Episode,
    Artist,
    Album,
    Track,
    Photo,
    PhotoAlbum,
    Clip,
    Playlist,
}

impl ItemKind {
    pub fn from_type_tag(tag: &str) -> Option<Self> {
        match tag {
            "movie" => Some(ItemKind::Movie),
            "show" => Some(ItemKind::Show),
            "season" => Some(ItemKind::Season),
            "episode" => Some(ItemKind::Episode),
            "artist" => Some(ItemKind::Artist),
            "album" => Some(ItemKind::Album),
            "track" => Some(ItemKind::Track),
            "photo" => Some(ItemKind::Photo),
            "photoalbum" => Some(ItemKind::PhotoAlbum),
            "clip" => Some(ItemKind::Clip),
            "playlist" => Some(ItemKind::Playlist),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Movie => "movie",
            ItemKind::Show => "show",
            ItemKind::Season => "season",
            ItemKind::Episode => "episode",
            ItemKind::Artist => "artist",
            ItemKind::Album => "album",
            ItemKind::Track => "track",
            ItemKind::Photo => "photo",
            ItemKind::PhotoAlbum => "photoalbum",
            ItemKind::Clip => "clip",
            ItemKind::Playlist => "playlist",
        }
    }
}

/// 搜索用的数字类型码
///
/// 未知的 libtype 在发送请求前即返回 `UnknownLibType`。
pub fn search_type(lib_type: &str) -> LibraryResult<u32> {
    let code = match lib_type {
        "movie" => 1,
        "show" => 2,
        "season" => 3,
        "episode" => 4,
        "trailer" => 5,
        "artist" => 8,
        "album" => 9,
        "track" => 10,
        "clip" => 12,
        "photo" => 13,
        "photoalbum" => 14,
        "playlist" => 15,
        _ => return Err(LibraryError::UnknownLibType(lib_type.to_string())),
    };
    Ok(code)
}

/// 媒体条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    pub kind: ItemKind,
    pub rating_key: Option<String>,
    pub key: Option<String>,
    pub title: String,
    pub year: Option<i32>,
    pub added_at: Option<DateTime<Utc>>,
    /// 原始属性（未映射到字段的也保留）
    pub attrs: BTreeMap<String, String>,
}

impl MediaItem {
    /// 从原始元素构建条目，未知类型返回 `UnknownItemType`
    pub fn from_element(elem: &Element) -> LibraryResult<Self> {
        Self::build(elem).map_err(|type_tag| LibraryError::UnknownItemType(type_tag.to_string()))
    }

    // 唯一的失败情形是无法识别的类型，错误值即该类型标签
    fn build(elem: &Element) -> Result<Self, &str> {
        let type_tag = elem.attr("type").unwrap_or(elem.tag.as_str());
        let kind = ItemKind::from_type_tag(type_tag).ok_or(type_tag)?;

        Ok(Self {
            kind,
            rating_key: elem.attr("ratingKey").map(str::to_string),
            key: elem.attr("key").map(str::to_string),
            title: elem.attr("title").unwrap_or_default().to_string(),
            year: elem.attr("year").and_then(|y| y.parse().ok()),
            added_at: elem
                .attr("addedAt")
                .and_then(|ts| ts.parse::<i64>().ok())
                .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
            attrs: elem.attributes.clone(),
        })
    }
}

/// 批量构建条目，跳过无法识别的类型
///
/// 单个异常条目不会中断整页，跳过的条目以诊断信息返回。
pub fn build_items(elements: &[Element]) -> (Vec<MediaItem>, Vec<Diagnostic>) {
    let mut items = Vec::with_capacity(elements.len());
    let mut diagnostics = Vec::new();

    for elem in elements {
        match MediaItem::build(elem) {
            Ok(item) => items.push(item),
            Err(type_tag) => {
                tracing::debug!("Skipping unknown item type({}): <{}>", type_tag, elem.tag);
                diagnostics.push(Diagnostic::UnknownItemType {
                    type_tag: type_tag.to_string(),
                });
            }
        }
    }

    (items, diagnostics)
}

/// 指向带标签的领域对象（类型、演员、导演等）的引用
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaTag {
    pub id: String,
    pub tag: String,
}

impl MediaTag {
    pub fn new(id: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tag: tag.into(),
        }
    }
}

/// 服务器声明的过滤选项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterChoice {
    pub category: String,
    pub key: String,
    pub title: String,
}

impl FilterChoice {
    pub fn new(category: impl Into<String>, key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            key: key.into(),
            title: title.into(),
        }
    }

    /// 从 `Directory` 元素解析选项；缺少 key 的元素返回 None
    pub fn from_element(category: &str, elem: &Element) -> Option<Self> {
        let key = elem.attr("key")?;
        Some(Self::new(category, key, elem.attr("title").unwrap_or_default()))
    }
}
