use serde::Serialize;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;

/// 1-indexed page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    /// Builds a request from raw query values. Each value is coerced with
    /// [`coerce_int`]; missing, non-numeric or non-positive values fall back to
    /// the defaults and `limit` is capped at `max_limit`.
    pub fn from_query(page: Option<&str>, limit: Option<&str>, max_limit: u32) -> Self {
        let page = page
            .and_then(coerce_int)
            .filter(|value| *value >= 1)
            .map(|value| value.min(u32::MAX as i64) as u32)
            .unwrap_or(DEFAULT_PAGE);
        let limit = limit
            .and_then(coerce_int)
            .filter(|value| *value >= 1)
            .map(|value| value.min(max_limit.max(1) as i64) as u32)
            .unwrap_or_else(|| DEFAULT_LIMIT.min(max_limit.max(1)));
        Self::new(page, limit)
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.limit as u64
    }

    /// Applies the window to an already filtered and ordered sequence.
    pub fn window<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        items
            .into_iter()
            .skip(self.offset() as usize)
            .take(self.limit as usize)
            .collect()
    }
}

/// Leading-integer parse: optional surrounding whitespace and sign, then as
/// many digits as are present. `"12abc"` is 12, `"abc"` is `None`.
pub fn coerce_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let value = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -value } else { value })
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
    pub has_prev_page: bool,
    pub has_next_page: bool,
    pub prev_page: Option<u32>,
    pub next_page: Option<u32>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total_count: u64, request: PageRequest) -> Self {
        let limit = request.limit() as u64;
        let total_pages = total_count.div_ceil(limit).max(1).min(u32::MAX as u64) as u32;
        let page = request.page();
        let has_prev_page = page > 1;
        let has_next_page = page < total_pages;

        Self {
            items,
            total_count,
            page,
            limit: request.limit(),
            total_pages,
            has_prev_page,
            has_next_page,
            prev_page: has_prev_page.then(|| page - 1),
            next_page: has_next_page.then(|| page + 1),
        }
    }
}
