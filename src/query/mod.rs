// 查询子系统
//
// - choices：过滤值解析与选项缓存
// - sort：排序表达式校验
// - builder：查询参数构建
// - paginator：分页搜索执行

pub mod builder;
pub mod choices;
pub mod paginator;
pub mod sort;

pub use builder::{QueryArgs, SectionQueryBuilder, CONTAINER_SIZE, CONTAINER_START};
pub use choices::{resolve_against, ChoiceCache, ChoiceResolver, Resolution};
pub use paginator::PaginatedSearch;
pub use sort::{normalize_sort, SortDirection};
