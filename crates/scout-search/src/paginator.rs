//! Length-aware pagination of search matches.

/// One page of items together with the total they were taken from.
#[derive(Debug, Clone, PartialEq)]
pub struct Paginator<T> {
    /// Items on the current page.
    items: Vec<T>,
    /// Total number of items across all pages.
    total: u64,
    /// Page size.
    per_page: usize,
    /// Current page, starting at 1.
    current_page: usize,
    /// Name of the page query parameter.
    page_name: String,
}

impl<T> Paginator<T> {
    /// Creates a paginator.
    pub fn new(
        items: Vec<T>,
        total: u64,
        per_page: usize,
        current_page: usize,
        page_name: impl Into<String>,
    ) -> Self {
        Self {
            items,
            total,
            per_page,
            current_page,
            page_name: page_name.into(),
        }
    }

    /// Returns the items on the current page.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consumes the paginator, returning its items.
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Returns the total number of items across all pages.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Returns the page size.
    pub fn per_page(&self) -> usize {
        self.per_page
    }

    /// Returns the current page number, starting at 1.
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Returns the name of the page query parameter.
    pub fn page_name(&self) -> &str {
        &self.page_name
    }

    /// Returns the number of the last page; at least 1.
    pub fn last_page(&self) -> usize {
        if self.per_page == 0 {
            return 1;
        }
        let pages = self.total.div_ceil(self.per_page as u64);
        usize::try_from(pages).unwrap_or(usize::MAX).max(1)
    }

    /// Whether pages exist after the current one.
    pub fn has_more_pages(&self) -> bool {
        self.current_page < self.last_page()
    }

    /// Whether the current page is the first one.
    pub fn on_first_page(&self) -> bool {
        self.current_page <= 1
    }

    /// Returns the 1-based position of the first item on the page, if any.
    pub fn first_item(&self) -> Option<u64> {
        if self.items.is_empty() {
            return None;
        }
        Some(self.offset() + 1)
    }

    /// Returns the 1-based position of the last item on the page, if any.
    pub fn last_item(&self) -> Option<u64> {
        if self.items.is_empty() {
            return None;
        }
        Some(self.offset() + self.items.len() as u64)
    }

    /// Number of items on the current page.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the current page is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Maps the items, keeping the page metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginator<U> {
        Paginator {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            per_page: self.per_page,
            current_page: self.current_page,
            page_name: self.page_name,
        }
    }

    /// Number of items before the current page.
    fn offset(&self) -> u64 {
        (self.current_page.saturating_sub(1) as u64) * self.per_page as u64
    }
}
