use serde::{Deserialize, Serialize};

/// Размер страницы по умолчанию
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Варианты размера страницы для селектора
pub const PAGE_SIZE_OPTIONS: [usize; 4] = [50, 100, 200, 500];

/// Запрос страницы (page начинается с 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: usize,
    pub page_size: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    pub fn new(page: usize, page_size: usize) -> Self {
        Self { page, page_size }
    }

    pub fn effective_page_size(&self) -> usize {
        if self.page_size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            self.page_size
        }
    }
}

/// Одна страница результата
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total_count: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn has_more(&self) -> bool {
        self.page + 1 < self.total_pages
    }
}

/// Количество страниц для `total` элементов
pub fn total_pages(total: usize, page_size: usize) -> usize {
    let size = if page_size == 0 { DEFAULT_PAGE_SIZE } else { page_size };
    total.div_ceil(size)
}

/// Вырезает страницу из списка. Номер за пределами списка
/// прижимается к последней странице.
pub fn paginate<T: Clone>(items: &[T], request: PageRequest) -> Page<T> {
    let page_size = request.effective_page_size();
    let total_count = items.len();
    let total_pages = total_pages(total_count, page_size);
    let page = request.page.min(total_pages.saturating_sub(1));

    let start = page * page_size;
    let end = (start + page_size).min(total_count);
    let items = if start < end {
        items[start..end].to_vec()
    } else {
        Vec::new()
    };

    Page {
        items,
        page,
        page_size,
        total_count,
        total_pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_middle_and_last_page() {
        let data: Vec<u32> = (1..=120).collect();
        let page = paginate(&data, PageRequest::new(1, 50));
        assert_eq!(page.items.first(), Some(&51));
        assert_eq!(page.items.len(), 50);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_more());

        let last = paginate(&data, PageRequest::new(2, 50));
        assert_eq!(last.items, (101..=120).collect::<Vec<_>>());
        assert!(!last.has_more());
    }

    #[test]
    fn test_page_past_end_is_clamped() {
        let data: Vec<u32> = (1..=120).collect();
        let page = paginate(&data, PageRequest::new(10, 50));
        assert_eq!(page.page, 2);
        assert_eq!(page.items.len(), 20);
    }

    #[test]
    fn test_empty_input() {
        let data: Vec<u32> = Vec::new();
        let page = paginate(&data, PageRequest::new(3, 50));
        assert_eq!(page.page, 0);
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.total_count, 0);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_zero_page_size_uses_default() {
        let data: Vec<u32> = (0..75).collect();
        let page = paginate(&data, PageRequest::new(0, 0));
        assert_eq!(page.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(page.items.len(), DEFAULT_PAGE_SIZE);
        assert_eq!(page.total_pages, 2);
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 50), 0);
        assert_eq!(total_pages(50, 50), 1);
        assert_eq!(total_pages(51, 50), 2);
    }
}
