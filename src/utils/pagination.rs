/// Turns 1-based `page`/`limit` query params into a `(limit, offset)` pair.
/// Limit is clamped to 1..=100; the offset is computed in i64 so a huge page
/// number cannot overflow.
pub fn page_window(page: Option<i32>, limit: Option<i32>, default_limit: i32) -> (i64, i64) {
    let page = i64::from(page.unwrap_or(1).max(1));
    let limit = i64::from(limit.unwrap_or(default_limit).clamp(1, 100));
    (limit, (page - 1) * limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_the_first_page() {
        assert_eq!(page_window(None, None, 20), (20, 0));
        assert_eq!(page_window(Some(0), Some(0), 20), (1, 0));
        assert_eq!(page_window(Some(3), Some(500), 20), (100, 200));
    }

    #[test]
    fn largest_page_does_not_overflow() {
        let (limit, offset) = page_window(Some(i32::MAX), Some(100), 20);
        assert_eq!(limit, 100);
        assert_eq!(offset, (i32::MAX as i64 - 1) * 100);
    }
}
