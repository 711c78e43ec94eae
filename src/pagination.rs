//! Page bookkeeping shared by every list view.

use serde::{Deserialize, Serialize};

pub const DEFAULT_ITEMS_PER_PAGE: usize = 10;

/// Page links for a pager over `total_pages` pages, with `None` marking a gap.
///
/// The first `left_edge` and last `right_edge` pages are always listed. Around
/// `current_page` the window reaches `left_current` pages back and
/// `right_current` pages forward. Overlapping runs are merged, so small page
/// counts come out without gaps.
fn get_pages(
    total_pages: usize,
    current_page: usize,
    left_edge: usize,
    left_current: usize,
    right_current: usize,
    right_edge: usize,
) -> Vec<Option<usize>> {
    let last_page = total_pages;

    if last_page == 0 {
        return vec![];
    }

    let mut pages = Vec::new();

    let left_end = (1 + left_edge).min(last_page + 1);
    pages.extend((1..left_end).map(Some));

    let mid_start = left_end.max(current_page.saturating_sub(left_current));
    let mid_end = (current_page + right_current + 1).min(last_page + 1);

    if mid_start > left_end {
        pages.push(None);
    }
    pages.extend((mid_start..mid_end).map(Some));

    let right_start = mid_end.max(last_page.saturating_sub(right_edge) + 1);

    if right_start > mid_end {
        pages.push(None);
    }
    pages.extend((right_start..=last_page).map(Some));

    pages
}

/// Paging metadata reported by the server alongside a page of rows.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub total_records: usize,
    #[serde(default)]
    pub total_pages: Option<usize>,
    #[serde(default)]
    pub current_page: Option<usize>,
    #[serde(default)]
    pub page_size: Option<usize>,
}

/// One page of rows together with its paging metadata.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "RawEnvelope<T>",
    bound(deserialize = "T: Deserialize<'de>", serialize = "T: Serialize")
)]
pub struct Envelope<T> {
    pub data: Vec<T>,
    pub pagination: PageInfo,
}

impl<T> Envelope<T> {
    pub fn new(data: Vec<T>, pagination: PageInfo) -> Self {
        Self { data, pagination }
    }
}

/// Accepts both the nested `pagination` object used by inventory and history
/// listings and the flat counters used by the user directory.
#[derive(Deserialize)]
struct RawEnvelope<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
    #[serde(default)]
    pagination: Option<PageInfo>,
    #[serde(default)]
    total: Option<usize>,
    #[serde(default)]
    page: Option<usize>,
    #[serde(default)]
    page_size: Option<usize>,
    #[serde(default)]
    total_pages: Option<usize>,
}

impl<T> From<RawEnvelope<T>> for Envelope<T> {
    fn from(raw: RawEnvelope<T>) -> Self {
        let pagination = raw.pagination.unwrap_or(PageInfo {
            total_records: raw.total.unwrap_or(0),
            total_pages: raw.total_pages,
            current_page: raw.page,
            page_size: raw.page_size,
        });
        Self {
            data: raw.data,
            pagination,
        }
    }
}

/// Current position of a list view within its result set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PaginationState {
    page: usize,
    page_size: usize,
    total_records: usize,
    total_pages: usize,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::new(DEFAULT_ITEMS_PER_PAGE)
    }
}

impl PaginationState {
    /// Starts on page 1 of an empty result set.
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            total_records: 0,
            total_pages: 1,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_records(&self) -> usize {
        self.total_records
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Moves to `page`, clamped into `[1, total_pages]`. Returns whether the
    /// page changed.
    pub fn set_page(&mut self, page: usize) -> bool {
        let clamped = page.clamp(1, self.total_pages);
        let changed = clamped != self.page;
        self.page = clamped;
        changed
    }

    /// Changes the page size and always returns to the first page.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page = 1;
    }

    /// Returns to the first page, keeping the page size.
    pub fn reset_page(&mut self) {
        self.page = 1;
    }

    /// Records the totals reported by the server. The page only moves when it
    /// now lies past the last page.
    pub fn apply_result(&mut self, info: &PageInfo) {
        self.total_records = info.total_records;
        self.total_pages = info
            .total_pages
            .unwrap_or_else(|| info.total_records.div_ceil(self.page_size))
            .max(1);
        if self.page > self.total_pages {
            self.page = self.total_pages;
        }
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// Number of rows preceding the current page.
    pub fn offset(&self) -> usize {
        (self.page - 1) * self.page_size
    }

    /// 1-based indices of the first and last row on the current page, or
    /// `None` when nothing is shown.
    pub fn showing_range(&self) -> Option<(usize, usize)> {
        let first = self.offset() + 1;
        let last = (self.page * self.page_size).min(self.total_records);
        (first <= last).then_some((first, last))
    }

    /// Page links around the current page; `None` marks a gap.
    pub fn page_window(&self) -> Vec<Option<usize>> {
        get_pages(self.total_pages, self.page, 2, 2, 4, 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn state(page: usize, page_size: usize, total_records: usize) -> PaginationState {
        let mut state = PaginationState::new(page_size);
        state.apply_result(&PageInfo {
            total_records,
            ..PageInfo::default()
        });
        state.set_page(page);
        state
    }

    #[test]
    fn starts_on_first_page_of_empty_set() {
        let state = PaginationState::new(25);
        assert_eq!(state.page(), 1);
        assert_eq!(state.total_pages(), 1);
        assert_eq!(state.total_records(), 0);
        assert!(!state.has_next());
        assert!(!state.has_previous());
    }

    #[test]
    fn changing_page_size_returns_to_first_page() {
        let mut state = state(3, 10, 25);
        assert_eq!(state.page(), 3);

        state.set_page_size(25);
        state.apply_result(&PageInfo {
            total_records: 25,
            ..PageInfo::default()
        });

        assert_eq!(state.page(), 1);
        assert_eq!(state.page_size(), 25);
        assert_eq!(state.total_records(), 25);
        assert_eq!(state.total_pages(), 1);
    }

    #[test]
    fn total_pages_never_drops_below_one() {
        let mut state = PaginationState::new(10);
        state.apply_result(&PageInfo {
            total_records: 0,
            total_pages: Some(0),
            ..PageInfo::default()
        });
        assert_eq!(state.total_pages(), 1);

        state.apply_result(&PageInfo::default());
        assert_eq!(state.total_pages(), 1);
    }

    #[test]
    fn set_page_is_clamped() {
        let mut state = state(1, 10, 35);
        assert!(state.set_page(9));
        assert_eq!(state.page(), 4);
        assert!(state.set_page(0));
        assert_eq!(state.page(), 1);
        assert!(!state.set_page(1));
    }

    #[test]
    fn shrinking_result_clamps_page_down() {
        let mut state = state(5, 10, 50);
        state.apply_result(&PageInfo {
            total_records: 12,
            total_pages: Some(2),
            ..PageInfo::default()
        });
        assert_eq!(state.page(), 2);

        state.apply_result(&PageInfo {
            total_records: 40,
            ..PageInfo::default()
        });
        assert_eq!(state.page(), 2);
    }

    #[test]
    fn showing_range_covers_partial_last_page() {
        let state = state(3, 10, 25);
        assert_eq!(state.showing_range(), Some((21, 25)));
        assert_eq!(PaginationState::new(10).showing_range(), None);
    }

    #[test]
    fn page_window_marks_gaps() {
        let state = state(10, 10, 200);
        assert_eq!(
            state.page_window(),
            vec![
                Some(1),
                Some(2),
                None,
                Some(8),
                Some(9),
                Some(10),
                Some(11),
                Some(12),
                Some(13),
                Some(14),
                None,
                Some(19),
                Some(20)
            ]
        );
    }

    #[test]
    fn window_edges_and_reach_are_independent() {
        assert_eq!(
            get_pages(10, 5, 1, 1, 1, 1),
            vec![Some(1), None, Some(4), Some(5), Some(6), None, Some(10)]
        );
        assert_eq!(
            get_pages(10, 1, 0, 0, 2, 3),
            vec![Some(1), Some(2), Some(3), None, Some(8), Some(9), Some(10)]
        );
        assert_eq!(get_pages(3, 2, 1, 1, 1, 1), vec![Some(1), Some(2), Some(3)]);
        assert!(get_pages(0, 1, 2, 2, 4, 2).is_empty());
    }

    #[test]
    fn envelope_reads_nested_pagination() {
        let envelope: Envelope<u32> = serde_json::from_value(json!({
            "data": [1, 2],
            "pagination": {
                "total_records": 12,
                "total_pages": 2,
                "current_page": 1,
                "page_size": 10,
                "has_next": true,
                "has_previous": false
            }
        }))
        .unwrap();

        assert_eq!(envelope.data, vec![1, 2]);
        assert_eq!(envelope.pagination.total_records, 12);
        assert_eq!(envelope.pagination.total_pages, Some(2));
    }

    #[test]
    fn envelope_reads_flat_counters() {
        let envelope: Envelope<u32> = serde_json::from_value(json!({
            "data": [7],
            "total": 41,
            "page": 3,
            "page_size": 20,
            "total_pages": 3
        }))
        .unwrap();

        assert_eq!(
            envelope.pagination,
            PageInfo {
                total_records: 41,
                total_pages: Some(3),
                current_page: Some(3),
                page_size: Some(20),
            }
        );
    }
}
