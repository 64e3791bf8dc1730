use std::ops::Range;

/// One entry of the page-link strip under a paginated list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageLink {
    Page { number: usize, active: bool },
    Ellipsis,
}

/// Slice-based pagination over `total_items`, pages numbered from 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    pub total_items: usize,
    pub per_page: usize,
    pub current: usize,
}

impl Pagination {
    /// Page numbers below 1 are treated as 1; a zero page size as 1.
    pub fn new(total_items: usize, per_page: usize, current: usize) -> Self {
        Self {
            total_items,
            per_page: per_page.max(1),
            current: current.max(1),
        }
    }

    pub fn total_pages(&self) -> usize {
        self.total_items.div_ceil(self.per_page)
    }

    /// Index range of the current page, clamped to the item count.
    pub fn range(&self) -> Range<usize> {
        let start = (self.current - 1)
            .saturating_mul(self.per_page)
            .min(self.total_items);
        let end = self
            .current
            .saturating_mul(self.per_page)
            .min(self.total_items);
        start..end
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let r = self.range();
        &items[r.start.min(items.len())..r.end.min(items.len())]
    }

    pub fn has_previous(&self) -> bool {
        self.current > 1
    }

    pub fn has_next(&self) -> bool {
        self.current < self.total_pages()
    }

    /// Controls are only worth showing with more than one page.
    pub fn is_visible(&self) -> bool {
        self.total_pages() > 1
    }

    /// First, last and neighbours of the current page; pages two away collapse
    /// into an ellipsis and the rest are left out.
    pub fn links(&self) -> Vec<PageLink> {
        let total = self.total_pages();
        let mut links = Vec::new();

        for number in 1..=total {
            let distance = number.abs_diff(self.current);
            if number == 1 || number == total || distance <= 1 {
                links.push(PageLink::Page {
                    number,
                    active: number == self.current,
                });
            } else if distance == 2 {
                links.push(PageLink::Ellipsis);
            }
        }
        links
    }

    /// "Showing a-b of N".
    pub fn summary(&self) -> String {
        let r = self.range();
        if r.is_empty() {
            return format!("Showing 0 of {}", self.total_items);
        }
        format!("Showing {}-{} of {}", r.start + 1, r.end, self.total_items)
    }
}
