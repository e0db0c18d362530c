use crate::error::LibraryResult;
use crate::models::search_type;

/// 分页起始偏移参数
pub const CONTAINER_START: &str = "X-Plex-Container-Start";
/// 分页大小参数
pub const CONTAINER_SIZE: &str = "X-Plex-Container-Size";

/// 有序查询参数
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryArgs {
    args: Vec<(String, String)>,
}

impl QueryArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置参数；已存在的键原位替换
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.args.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.args.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.args
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.args.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// 生成 `?k=v&k2=v2` 形式的查询串
    ///
    /// 值为空的参数整个省略：部分服务器把空参数当作“不匹配任何条目”。
    pub fn to_query_string(&self) -> String {
        let joined = self
            .args
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        if joined.is_empty() {
            String::new()
        } else {
            format!("?{}", joined)
        }
    }
}

/// 单页查询构建器
///
/// 参数顺序：已解析的过滤条件、title、sort、type，最后是分页参数。
#[derive(Debug, Clone)]
pub struct SectionQueryBuilder {
    path: String,
    args: QueryArgs,
}

impl SectionQueryBuilder {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            args: QueryArgs::new(),
        }
    }

    pub fn with_filters<'a, I>(mut self, resolved: I) -> Self
    where
        I: IntoIterator<Item = &'a (String, String)>,
    {
        for (category, value) in resolved {
            self.args.set(category.as_str(), value.as_str());
        }
        self
    }

    pub fn with_title(mut self, title: Option<&str>) -> Self {
        if let Some(title) = title {
            self.args.set("title", title);
        }
        self
    }

    pub fn with_sort(mut self, sort: Option<&str>) -> Self {
        if let Some(sort) = sort {
            self.args.set("sort", sort);
        }
        self
    }

    pub fn with_lib_type(mut self, lib_type: Option<&str>) -> LibraryResult<Self> {
        if let Some(lib_type) = lib_type {
            self.args.set("type", search_type(lib_type)?.to_string());
        }
        Ok(self)
    }

    /// 附加任意参数（不做词表校验）
    pub fn with_arg(mut self, key: &str, value: &str) -> Self {
        self.args.set(key, value);
        self
    }

    pub fn with_pagination(mut self, start: usize, size: usize) -> Self {
        self.args.set(CONTAINER_START, start.to_string());
        self.args.set(CONTAINER_SIZE, size.to_string());
        self
    }

    pub fn args(&self) -> &QueryArgs {
        &self.args
    }

    pub fn build(&self) -> String {
        format!("{}{}", self.path, self.args.to_query_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_search_query() {
        let filters = vec![("genre".to_string(), "28".to_string())];
        let query = SectionQueryBuilder::new("/library/sections/1/all")
            .with_filters(&filters)
            .with_title(Some("Kung Fu"))
            .with_sort(Some("rating:desc"))
            .with_lib_type(Some("movie"))
            .unwrap()
            .with_pagination(0, 50)
            .build();

        assert_eq!(
            query,
            "/library/sections/1/all?genre=28&title=Kung%20Fu&sort=rating%3Adesc&type=1\
             &X-Plex-Container-Start=0&X-Plex-Container-Size=50"
        );
    }

    #[test]
    fn test_empty_values_omitted() {
        let filters = vec![
            ("genre".to_string(), String::new()),
            ("year".to_string(), "1999".to_string()),
        ];
        let query = SectionQueryBuilder::new("/library/all")
            .with_filters(&filters)
            .with_title(Some(""))
            .build();
        assert_eq!(query, "/library/all?year=1999");
    }

    #[test]
    fn test_no_args_no_question_mark() {
        assert_eq!(SectionQueryBuilder::new("/library/all").build(), "/library/all");
    }

    #[test]
    fn test_pagination_replaces_cursor_in_place() {
        let builder = SectionQueryBuilder::new("/library/sections/2/all")
            .with_title(Some("Lost"))
            .with_pagination(0, 10)
            .with_pagination(10, 10);

        assert_eq!(builder.args().get(CONTAINER_START), Some("10"));
        assert_eq!(
            builder.build(),
            "/library/sections/2/all?title=Lost&X-Plex-Container-Start=10&X-Plex-Container-Size=10"
        );
    }

    #[test]
    fn test_multi_value_filter_encoded() {
        let filters = vec![("genre".to_string(), "28,35".to_string())];
        let query = SectionQueryBuilder::new("/library/sections/1/all")
            .with_filters(&filters)
            .build();
        assert_eq!(query, "/library/sections/1/all?genre=28%2C35");
    }

    #[test]
    fn test_unknown_lib_type() {
        let result = SectionQueryBuilder::new("/library/sections/1/all").with_lib_type(Some("comic"));
        assert!(result.is_err());
    }
}
