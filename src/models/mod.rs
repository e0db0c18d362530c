// 领域模型：分区词表、媒体条目、搜索请求

pub mod item;
pub mod search;
pub mod section;

pub use item::{build_items, search_type, FilterChoice, ItemKind, MediaItem, MediaTag};
pub use search::{Diagnostic, FilterValue, SearchRequest, SearchResults};
pub use section::{SectionDescriptor, SectionKind, BOOLEAN_FILTERS};
