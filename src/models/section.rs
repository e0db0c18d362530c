use serde::{Deserialize, Serialize};

/// 所有分区共享的布尔型过滤器
pub const BOOLEAN_FILTERS: &[&str] = &["unwatched", "duplicate"];

/// 分区的过滤 / 排序词表
///
/// 每种分区类型对应一个静态实例，运行时不会修改。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionDescriptor {
    pub type_tag: &'static str,
    pub allowed_filters: &'static [&'static str],
    pub allowed_sorts: &'static [&'static str],
    pub boolean_filters: &'static [&'static str],
}

impl SectionDescriptor {
    pub fn allows_filter(&self, category: &str) -> bool {
        self.allowed_filters.contains(&category)
    }

    pub fn is_boolean_filter(&self, category: &str) -> bool {
        self.boolean_filters.contains(&category)
    }
}

const MOVIE: SectionDescriptor = SectionDescriptor {
    type_tag: "movie",
    allowed_filters: &[
        "unwatched", "duplicate", "year", "decade", "genre", "contentRating", "collection",
        "director", "actor", "country", "studio", "resolution",
    ],
    allowed_sorts: &[
        "addedAt", "originallyAvailableAt", "lastViewedAt", "titleSort", "rating",
        "mediaHeight", "duration",
    ],
    boolean_filters: BOOLEAN_FILTERS,
};

const SHOW: SectionDescriptor = SectionDescriptor {
    type_tag: "show",
    allowed_filters: &["unwatched", "year", "genre", "contentRating", "network", "collection"],
    allowed_sorts: &["addedAt", "lastViewedAt", "originallyAvailableAt", "titleSort", "rating", "unwatched"],
    boolean_filters: BOOLEAN_FILTERS,
};

const MUSIC: SectionDescriptor = SectionDescriptor {
    type_tag: "artist",
    allowed_filters: &["genre", "country", "collection"],
    allowed_sorts: &["addedAt", "lastViewedAt", "viewCount", "titleSort"],
    boolean_filters: BOOLEAN_FILTERS,
};

const PHOTO: SectionDescriptor = SectionDescriptor {
    type_tag: "photo",
    allowed_filters: &[],
    allowed_sorts: &["addedAt", "lastViewedAt", "viewCount", "titleSort"],
    boolean_filters: BOOLEAN_FILTERS,
};

/// 分区类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Movie,
    Show,
    Music,
    Photo,
}

impl SectionKind {
    /// 根据服务器返回的 `type` 属性选择分区类型
    pub fn from_type_tag(tag: &str) -> Option<Self> {
        match tag {
            "movie" => Some(SectionKind::Movie),
            "show" => Some(SectionKind::Show),
            "artist" => Some(SectionKind::Music),
            "photo" => Some(SectionKind::Photo),
            _ => None,
        }
    }

    pub fn descriptor(&self) -> &'static SectionDescriptor {
        match self {
            SectionKind::Movie => &MOVIE,
            SectionKind::Show => &SHOW,
            SectionKind::Music => &MUSIC,
            SectionKind::Photo => &PHOTO,
        }
    }

    pub fn type_tag(&self) -> &'static str {
        self.descriptor().type_tag
    }

    /// 该分区内可单独搜索的条目类型
    pub fn searchable_lib_types(&self) -> &'static [&'static str] {
        match self {
            SectionKind::Movie => &["movie"],
            SectionKind::Show => &["show", "season", "episode"],
            SectionKind::Music => &["artist", "album", "track"],
            SectionKind::Photo => &["photoalbum", "photo"],
        }
    }
}
