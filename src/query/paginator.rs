use super::builder::SectionQueryBuilder;
use crate::error::LibraryResult;
use crate::models::{build_items, SearchResults};
use crate::remote::LibraryRemote;

/// 分页状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageState {
    Fetching { offset: usize },
    Done,
}

/// 分页搜索执行器
///
/// 逐页顺序请求，直到收到空页或达到结果上限。后一页的偏移依赖前一页，
/// 因此不会并发请求。结果保持服务器返回的顺序。
///
/// 不足一页的结果不会结束循环：未达上限时总会多请求一次空页来确认结束，
/// 所以总数小于上限时请求次数为 `ceil(total / page) + 1`。
pub struct PaginatedSearch<'a> {
    remote: &'a dyn LibraryRemote,
    query: SectionQueryBuilder,
    batch_size: usize,
    max_results: usize,
}

impl<'a> PaginatedSearch<'a> {
    /// `max_results` 为 None 时不设上限，仅依赖空页终止
    pub fn new(
        remote: &'a dyn LibraryRemote,
        query: SectionQueryBuilder,
        batch_size: usize,
        max_results: Option<usize>,
    ) -> Self {
        Self {
            remote,
            query,
            batch_size: batch_size.max(1),
            max_results: max_results.unwrap_or(usize::MAX),
        }
    }

    pub fn page_size(&self) -> usize {
        self.batch_size.min(self.max_results)
    }

    pub async fn run(self) -> LibraryResult<SearchResults> {
        let mut results = SearchResults::default();
        let page_size = self.page_size();
        let mut state = if self.max_results == 0 {
            PageState::Done
        } else {
            PageState::Fetching { offset: 0 }
        };

        while let PageState::Fetching { offset } = state {
            let path = self.query.clone().with_pagination(offset, page_size).build();
            tracing::debug!("Fetching page: {}", path);

            let elements = self.remote.query(&path).await?;
            let (items, diagnostics) = build_items(&elements);
            results.diagnostics.extend(diagnostics);

            let remaining = self.max_results - results.items.len();
            results.items.extend(items.into_iter().take(remaining));

            // 空页以原始元素数为准：整页都被跳过时仍继续翻页
            state = if elements.is_empty() || results.items.len() >= self.max_results {
                PageState::Done
            } else {
                PageState::Fetching {
                    offset: offset + page_size,
                }
            };
        }

        tracing::debug!("Search collected {} items", results.items.len());
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::{Element, MemoryRemote};
    use proptest::prelude::*;

    const PATH: &str = "/library/sections/1/all";

    fn movies(n: usize) -> Vec<Element> {
        (0..n)
            .map(|i| Element::new("Video").with_attr("type", "movie").with_attr("title", format!("M{}", i)))
            .collect()
    }

    async fn run(total: usize, batch: usize, max: Option<usize>) -> (SearchResults, MemoryRemote) {
        let remote = MemoryRemote::new().with_route(PATH, movies(total));
        let results = PaginatedSearch::new(&remote, SectionQueryBuilder::new(PATH), batch, max)
            .run()
            .await
            .unwrap();
        (results, remote)
    }

    #[tokio::test]
    async fn test_cap_reached_stops_without_empty_page() {
        let (results, remote) = run(20, 5, Some(5)).await;
        assert_eq!(results.len(), 5);
        assert_eq!(
            remote.calls(),
            vec![format!("{}?X-Plex-Container-Start=0&X-Plex-Container-Size=5", PATH)]
        );
    }

    #[tokio::test]
    async fn test_unbounded_stops_on_empty_page() {
        let (results, remote) = run(12, 5, None).await;
        assert_eq!(results.len(), 12);
        // 5 + 5 + 2，再加一次空页
        assert_eq!(remote.call_count(), 4);
        let titles = results.titles();
        assert_eq!(titles.first(), Some(&"M0"));
        assert_eq!(titles.last(), Some(&"M11"));
    }

    #[tokio::test]
    async fn test_cap_truncates_final_page() {
        let (results, remote) = run(20, 5, Some(7)).await;
        assert_eq!(results.titles(), vec!["M0", "M1", "M2", "M3", "M4", "M5", "M6"]);
        assert_eq!(remote.call_count(), 2);
    }

    #[tokio::test]
    async fn test_zero_cap_issues_no_fetch() {
        let (results, remote) = run(3, 5, Some(0)).await;
        assert!(results.is_empty());
        assert_eq!(remote.call_count(), 0);
    }

    #[tokio::test]
    async fn test_offsets_increase_by_page_size() {
        let (_, remote) = run(9, 4, None).await;
        let starts: Vec<String> = remote
            .calls()
            .iter()
            .map(|c| c.split("X-Plex-Container-Start=").nth(1).unwrap().split('&').next().unwrap().to_string())
            .collect();
        assert_eq!(starts, vec!["0", "4", "8", "12"]);
    }

    #[tokio::test]
    async fn test_unknown_types_skipped_without_ending_pagination() {
        let mut elements = movies(2);
        elements.insert(1, Element::new("Directory").with_attr("type", "hologram"));
        let remote = MemoryRemote::new().with_route(PATH, elements);

        let results = PaginatedSearch::new(&remote, SectionQueryBuilder::new(PATH), 1, None)
            .run()
            .await
            .unwrap();
        assert_eq!(results.titles(), vec!["M0", "M1"]);
        assert_eq!(results.diagnostics.len(), 1);
        assert_eq!(remote.call_count(), 4);
    }

    #[tokio::test]
    async fn test_transport_failure_propagates() {
        let remote = MemoryRemote::new().with_route(PATH, movies(3)).with_failure(PATH);
        let result = PaginatedSearch::new(&remote, SectionQueryBuilder::new(PATH), 5, None)
            .run()
            .await;
        assert!(matches!(result, Err(crate::error::LibraryError::Transport(_))));
    }

    proptest! {
        #[test]
        fn prop_count_and_fetches(total in 0usize..60, batch in 1usize..12, cap in proptest::option::of(0usize..70)) {
            let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let (results, remote) = rt.block_on(run(total, batch, cap));

            let limit = cap.unwrap_or(usize::MAX);
            let expected = total.min(limit);
            prop_assert_eq!(results.len(), expected);

            let page = batch.min(limit).max(1);
            let expected_fetches = if limit == 0 {
                0
            } else if total < limit {
                // 取完后还需一次空页才能确认结束
                (total + page - 1) / page + 1
            } else {
                (limit + page - 1) / page
            };
            prop_assert_eq!(remote.call_count(), expected_fetches);

            let titles: Vec<String> = results.items.iter().map(|i| i.title.clone()).collect();
            let expected_titles: Vec<String> = (0..expected).map(|i| format!("M{}", i)).collect();
            prop_assert_eq!(titles, expected_titles);
        }
    }
}
