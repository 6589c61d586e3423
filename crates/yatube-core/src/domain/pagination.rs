//! Page-number pagination for post feeds.

use serde::Serialize;

/// Number of posts on one feed page.
pub const PAGE_SIZE: u64 = 10;

/// A requested 1-based page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest(u64);

impl PageRequest {
    pub fn first() -> Self {
        Self(1)
    }

    /// Parse the raw `page` query value. Anything that is not a positive
    /// integer falls back to the first page.
    pub fn parse(raw: Option<&str>) -> Self {
        raw.and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|n| *n >= 1)
            .map(Self)
            .unwrap_or_else(Self::first)
    }

    pub fn number(&self) -> u64 {
        self.0
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first()
    }
}

/// Splits `count` items into pages of `per_page`.
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    count: u64,
    per_page: u64,
}

impl Paginator {
    pub fn new(count: u64, per_page: u64) -> Self {
        Self {
            count,
            per_page: per_page.max(1),
        }
    }

    /// Total number of pages. An empty listing still has one (empty) page.
    pub fn num_pages(&self) -> u64 {
        if self.count == 0 {
            1
        } else {
            self.count.div_ceil(self.per_page)
        }
    }

    /// Index of the first item on the requested page.
    pub fn offset(&self, request: PageRequest) -> u64 {
        (request.number() - 1).saturating_mul(self.per_page)
    }

    pub fn limit(&self) -> u64 {
        self.per_page
    }

    /// `(offset, limit)` to fetch for `request`, or `None` when the page lies
    /// past the last item and there is nothing to load.
    pub fn window(&self, request: PageRequest) -> Option<(u64, u64)> {
        let offset = self.offset(request);
        (offset < self.count).then_some((offset, self.per_page))
    }

    /// Wrap the items fetched for `request` into a page.
    pub fn page<T>(&self, request: PageRequest, items: Vec<T>) -> Page<T> {
        let number = request.number();
        let num_pages = self.num_pages();
        let has_next = number < num_pages;
        let has_previous = number > 1;

        Page {
            object_list: items,
            number,
            num_pages,
            count: self.count,
            has_next,
            has_previous,
            next_page_number: has_next.then(|| number + 1),
            previous_page_number: has_previous.then(|| number - 1),
            page_range: (1..=num_pages).collect(),
        }
    }
}

/// One page of a feed, shaped for the templates.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub object_list: Vec<T>,
    pub number: u64,
    pub num_pages: u64,
    pub count: u64,
    pub has_next: bool,
    pub has_previous: bool,
    pub next_page_number: Option<u64>,
    pub previous_page_number: Option<u64>,
    pub page_range: Vec<u64>,
}

impl<T> Page<T> {
    pub fn len(&self) -> usize {
        self.object_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.object_list.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.object_list.iter()
    }

    /// Replace the items while keeping the page metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            object_list: self.object_list.into_iter().map(f).collect(),
            number: self.number,
            num_pages: self.num_pages,
            count: self.count,
            has_next: self.has_next,
            has_previous: self.has_previous,
            next_page_number: self.next_page_number,
            previous_page_number: self.previous_page_number,
            page_range: self.page_range,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page_request() {
        assert_eq!(PageRequest::parse(None).number(), 1);
        assert_eq!(PageRequest::parse(Some("2")).number(), 2);
        assert_eq!(PageRequest::parse(Some(" 3 ")).number(), 3);
        assert_eq!(PageRequest::parse(Some("0")).number(), 1);
        assert_eq!(PageRequest::parse(Some("-4")).number(), 1);
        assert_eq!(PageRequest::parse(Some("last")).number(), 1);
    }

    #[test]
    fn test_num_pages() {
        assert_eq!(Paginator::new(0, PAGE_SIZE).num_pages(), 1);
        assert_eq!(Paginator::new(10, PAGE_SIZE).num_pages(), 1);
        assert_eq!(Paginator::new(13, PAGE_SIZE).num_pages(), 2);
        assert_eq!(Paginator::new(20, PAGE_SIZE).num_pages(), 2);
        assert_eq!(Paginator::new(21, PAGE_SIZE).num_pages(), 3);
    }

    #[test]
    fn test_offsets_cover_every_item_once() {
        for count in [0u64, 1, 9, 10, 11, 13, 30] {
            let paginator = Paginator::new(count, PAGE_SIZE);
            let mut seen = 0;
            for number in 1..=paginator.num_pages() + 1 {
                let offset = paginator.offset(PageRequest(number));
                let on_page = count.saturating_sub(offset).min(paginator.limit());
                seen += on_page;
            }
            assert_eq!(seen, count);
        }
    }

    #[test]
    fn test_page_metadata() {
        let paginator = Paginator::new(13, PAGE_SIZE);

        let first = paginator.page(PageRequest::first(), vec![0; 10]);
        assert!(first.has_next);
        assert!(!first.has_previous);
        assert_eq!(first.next_page_number, Some(2));
        assert_eq!(first.page_range, vec![1, 2]);

        let second = paginator.page(PageRequest::parse(Some("2")), vec![0; 3]);
        assert!(!second.has_next);
        assert_eq!(second.previous_page_number, Some(1));
        assert_eq!(second.len(), 3);
    }

    #[test]
    fn test_window_stops_at_last_item() {
        let paginator = Paginator::new(13, PAGE_SIZE);

        assert_eq!(paginator.window(PageRequest::first()), Some((0, 10)));
        assert_eq!(paginator.window(PageRequest::parse(Some("2"))), Some((10, 10)));
        assert_eq!(paginator.window(PageRequest::parse(Some("3"))), None);
        assert_eq!(Paginator::new(0, PAGE_SIZE).window(PageRequest::first()), None);
    }

    #[test]
    fn test_huge_page_number_has_no_window() {
        let paginator = Paginator::new(13, PAGE_SIZE);
        for raw in ["922337203685477582", "18446744073709551615"] {
            let request = PageRequest::parse(Some(raw));
            assert_eq!(paginator.window(request), None, "page {raw}");
        }
    }
}
