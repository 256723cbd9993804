pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;
/// Highest page whose offset still fits in an `i64` at `MAX_LIMIT`.
pub const MAX_PAGE: i64 = i64::MAX / MAX_LIMIT;

/// Page window after clamping the caller supplied values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: i64,
    pub limit: i64,
}

impl PageWindow {
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        let page = page
            .filter(|p| *p > 0)
            .unwrap_or(DEFAULT_PAGE)
            .min(MAX_PAGE);
        let limit = match limit {
            Some(l) if l > 0 => l.min(MAX_LIMIT),
            _ => DEFAULT_LIMIT,
        };
        Self { page, limit }
    }

    pub fn offset(&self) -> i64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }

    pub fn total_pages(&self, total: i64) -> i64 {
        total / self.limit + i64::from(total % self.limit != 0)
    }
}

/// Trims the search term and drops it when empty.
pub fn search_term(search: &Option<String>) -> Option<String> {
    search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_and_clamping() {
        assert_eq!(PageWindow::new(None, None), PageWindow { page: 1, limit: 10 });
        assert_eq!(PageWindow::new(Some(0), Some(500)), PageWindow { page: 1, limit: 100 });
        assert_eq!(PageWindow::new(Some(3), Some(-2)), PageWindow { page: 3, limit: 10 });
    }

    #[test]
    fn offset_and_total_pages() {
        let window = PageWindow::new(Some(3), Some(20));
        assert_eq!(window.offset(), 40);
        assert_eq!(window.total_pages(0), 0);
        assert_eq!(window.total_pages(41), 3);
        assert_eq!(window.total_pages(40), 2);
    }

    #[test]
    fn huge_page_does_not_overflow() {
        let window = PageWindow::new(Some(i64::MAX), Some(100));
        assert_eq!(window.page, MAX_PAGE);
        assert!(window.offset() > 0);
        assert_eq!(window.offset(), (MAX_PAGE - 1) * 100);

        let window = PageWindow::new(Some(i64::MAX), None);
        assert!(window.offset() > 0);
        assert_eq!(window.total_pages(i64::MAX), i64::MAX / 10 + 1);
    }

    #[test]
    fn blank_search_is_ignored() {
        assert_eq!(search_term(&Some("   ".to_string())), None);
        assert_eq!(search_term(&Some(" java ".to_string())), Some("java".to_string()));
        assert_eq!(search_term(&None), None);
    }
}
