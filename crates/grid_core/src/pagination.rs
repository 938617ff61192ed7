//! Pagination window: bounded, block-aligned page links with ellipsis jumps.

pub const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    pub number: u32,
    pub label: String,
    pub is_active: bool,
}

impl PageLink {
    fn page(number: u32, current_page: u32) -> Self {
        Self {
            number,
            label: number.to_string(),
            is_active: number == current_page,
        }
    }

    fn ellipsis(number: u32) -> Self {
        Self {
            number,
            label: ELLIPSIS.to_string(),
            is_active: false,
        }
    }

    pub fn is_ellipsis(&self) -> bool {
        self.label == ELLIPSIS
    }
}

/// Page count for `total_items`, never less than 1.
pub fn calculate_total_pages(total_items: u64, items_per_page: usize) -> u32 {
    let per_page = items_per_page.max(1) as u64;
    let pages = total_items.div_ceil(per_page);
    u32::try_from(pages).unwrap_or(u32::MAX).max(1)
}

/// Visible page links for `current_page` out of `total_pages`.
///
/// With `max_size` smaller than the page count, pages are bucketed into blocks
/// of `max_size` and the window jumps block by block.
pub fn page_window(current_page: u32, total_pages: u32, max_size: Option<u32>) -> Vec<PageLink> {
    let total_pages = total_pages.max(1);
    let max_size = max_size.filter(|size| *size > 0 && *size < total_pages);

    let (start_page, end_page) = match max_size {
        Some(size) => {
            let anchor = current_page.clamp(1, total_pages);
            let start = (anchor.div_ceil(size) - 1) * size + 1;
            (start, (start + size - 1).min(total_pages))
        }
        None => (1, total_pages),
    };

    let mut pages = Vec::with_capacity((end_page.saturating_sub(start_page) + 3) as usize);
    if max_size.is_some() && start_page > 1 {
        pages.push(PageLink::ellipsis(start_page - 1));
    }
    pages.extend((start_page..=end_page).map(|number| PageLink::page(number, current_page)));
    if max_size.is_some() && end_page < total_pages {
        pages.push(PageLink::ellipsis(end_page + 1));
    }
    pages
}

/// True when `target` is a page selection that changes anything.
pub fn is_selectable(target: u32, current_page: u32, total_pages: u32) -> bool {
    target != current_page && target >= 1 && target <= total_pages.max(1)
}
