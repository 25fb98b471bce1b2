use crate::validate::FieldError;

pub const DEFAULT_LIMIT: i64 = 15;
pub const MAX_LIMIT: i64 = 100;

/// A bounded page window expressed as limit/offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationWindow {
    pub limit: i64,
    pub offset: i64,
}

impl Default for PaginationWindow {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

/// Largest page size tried when looking for a single page that covers a window.
const MAX_PAGE_SIZE: u64 = 2 * MAX_LIMIT as u64;

/// One page-based request plus the local slice that recovers the window from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: u64,
    /// Page size sent as `limit`.
    pub size: u64,
    /// Items to drop from the front of the returned page.
    pub skip: usize,
}

impl PageRequest {
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("page", self.page.to_string()),
            ("limit", self.size.to_string()),
        ]
    }
}

impl PaginationWindow {
    /// Translate the window into the Forge API's page/limit parameters.
    ///
    /// Picks the smallest page size whose page boundaries contain all of
    /// `offset..offset + limit`, so a single request returns every item of the
    /// window; the caller trims with [`PaginationWindow::slice`].
    pub fn page_request(&self) -> PageRequest {
        let offset = self.offset.max(0) as u64;
        let limit = self.limit.clamp(1, MAX_LIMIT) as u64;
        let size = (limit..=MAX_PAGE_SIZE)
            .find(|size| offset % size + limit <= *size)
            .unwrap_or(offset + limit);
        PageRequest {
            page: offset / size + 1,
            size,
            skip: usize::try_from(offset % size).unwrap_or(usize::MAX),
        }
    }

    /// Cut the window out of the page fetched for [`PaginationWindow::page_request`].
    pub fn slice<T>(&self, page: Vec<T>) -> Vec<T> {
        let limit = usize::try_from(self.limit).unwrap_or(0);
        page.into_iter()
            .skip(self.page_request().skip)
            .take(limit)
            .collect()
    }
}

/// Interpret raw limit/offset inputs.
///
/// An absent or non-positive limit falls back to [`DEFAULT_LIMIT`]; a limit above
/// [`MAX_LIMIT`] is rejected rather than clamped. Negative offsets are rejected.
pub fn normalize(
    raw_limit: Option<i64>,
    raw_offset: Option<i64>,
) -> Result<PaginationWindow, Vec<FieldError>> {
    let mut errors = Vec::new();

    let limit = match raw_limit {
        Some(l) if l > MAX_LIMIT => {
            errors.push(FieldError::new(
                "limit",
                format!("must be no greater than {MAX_LIMIT}"),
            ));
            DEFAULT_LIMIT
        }
        Some(l) if l >= 1 => l,
        _ => DEFAULT_LIMIT,
    };

    let offset = match raw_offset {
        Some(o) if o < 0 => {
            errors.push(FieldError::new("offset", "must be no less than 0"));
            0
        }
        Some(o) => o,
        None => 0,
    };

    if errors.is_empty() {
        Ok(PaginationWindow { limit, offset })
    } else {
        Err(errors)
    }
}
