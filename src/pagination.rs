//! Fixed-size paging over an in-memory slice. Pages are 1-based.

/// `ceil(len / page_size)`; zero when there is nothing to show.
pub fn total_pages(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    len.div_ceil(page_size)
}

/// Items of `page`, i.e. `items[(page-1)*size .. page*size]` cut to bounds.
/// A page past the end is empty rather than an error.
pub fn page_slice<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    if page == 0 || page_size == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// `min(page, max(1, total_pages))`, never below 1.
pub fn clamp_page(page: usize, len: usize, page_size: usize) -> usize {
    page.clamp(1, total_pages(len, page_size).max(1))
}
