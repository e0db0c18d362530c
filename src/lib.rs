// 媒体库客户端
//
// 本库提供远程媒体库的浏览与搜索功能，包括：
// - 分区列表与条目浏览
// - 过滤值解析（与服务器声明的选项匹配）
// - 排序校验
// - 分页搜索
// - 维护操作（刷新、清空回收站、优化等）

pub mod config;
pub mod error;
pub mod library;
pub mod models;
pub mod query;
pub mod remote;

pub use config::ClientConfig;
pub use error::{LibraryError, LibraryResult};
pub use library::{Hub, Library, LibrarySection, Playlist};
pub use models::{
    Diagnostic, FilterChoice, FilterValue, ItemKind, MediaItem, MediaTag, SearchRequest,
    SearchResults, SectionKind,
};
pub use remote::{Element, HttpRemote, LibraryRemote, MemoryRemote};
