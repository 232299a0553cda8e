/// Splits `total_count` rows into pages of `page_size`.
/// An empty listing still has one (empty) page.
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    total_count: u64,
    page_size: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: u64,
    pub size: u64,
    pub total_pages: u64,
    pub offset: u64,
}

impl Page {
    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }
}

impl Paginator {
    pub fn new(total_count: u64, page_size: u64) -> Self {
        Self {
            total_count,
            page_size: page_size.max(1),
        }
    }

    pub fn num_pages(&self) -> u64 {
        if self.total_count == 0 {
            1
        } else {
            self.total_count.div_ceil(self.page_size)
        }
    }

    /// Resolve a raw `?page=` value. Missing or non-numeric input gives the
    /// first page; numbers outside `1..=num_pages` give the last page.
    pub fn get_page(&self, raw: Option<&str>) -> Page {
        match parse_page_number(raw) {
            None => self.page_at(1),
            Some(n) if n >= 1 && (n as u64) <= self.num_pages() => self.page_at(n as u64),
            Some(_) => self.page_at(self.num_pages()),
        }
    }

    /// Page `number`, clamped into `1..=num_pages`.
    pub fn page_at(&self, number: u64) -> Page {
        let last = self.num_pages();
        let number = number.clamp(1, last);
        Page {
            number,
            size: self.page_size,
            total_pages: last,
            offset: (number - 1) * self.page_size,
        }
    }
}

fn parse_page_number(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|r| r.trim().parse().ok())
}

/// Offset of the page a raw `?page=` value asks for, before the row count is
/// known. Anything that is not a positive number asks for the first page.
pub fn requested_offset(raw: Option<&str>, page_size: u64) -> u64 {
    match parse_page_number(raw) {
        Some(n) if n >= 1 => (n as u64 - 1).saturating_mul(page_size.max(1)),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_twenty_five_rows_make_three_pages() {
        let paginator = Paginator::new(25, 10);
        assert_eq!(paginator.num_pages(), 3);

        let last = paginator.get_page(Some("3"));
        assert_eq!(last.offset, 20);
        assert!(!last.has_next());
        assert!(last.has_previous());
    }

    #[test]
    fn test_empty_listing_has_one_page() {
        let page = Paginator::new(0, 10).get_page(None);
        assert_eq!(page, Page { number: 1, size: 10, total_pages: 1, offset: 0 });
        assert!(!page.has_next());
        assert!(!page.has_previous());
    }

    #[test]
    fn test_non_numeric_page_falls_back_to_first() {
        let paginator = Paginator::new(25, 10);
        assert_eq!(paginator.get_page(Some("abc")).number, 1);
        assert_eq!(paginator.get_page(Some("")).number, 1);
        assert_eq!(paginator.get_page(None).number, 1);
    }

    #[test]
    fn test_out_of_range_page_goes_to_last() {
        let paginator = Paginator::new(25, 10);
        assert_eq!(paginator.get_page(Some("99")).number, 3);
        assert_eq!(paginator.get_page(Some("0")).number, 3);
        assert_eq!(paginator.get_page(Some("-2")).number, 3);
    }

    #[test]
    fn test_zero_page_size_is_clamped() {
        let paginator = Paginator::new(3, 0);
        assert_eq!(paginator.num_pages(), 3);
        assert_eq!(paginator.get_page(Some("2")).offset, 1);
    }

    #[test]
    fn test_page_at_clamps() {
        let paginator = Paginator::new(25, 10);
        assert_eq!(paginator.page_at(0).number, 1);
        assert_eq!(paginator.page_at(7).number, 3);
        assert_eq!(paginator.page_at(2).offset, 10);
    }

    #[test]
    fn test_requested_offset() {
        assert_eq!(requested_offset(Some("3"), 10), 20);
        assert_eq!(requested_offset(Some("abc"), 10), 0);
        assert_eq!(requested_offset(Some("-1"), 10), 0);
        assert_eq!(requested_offset(None, 10), 0);
        assert_eq!(requested_offset(Some("9223372036854775807"), 10), u64::MAX);
    }
}
