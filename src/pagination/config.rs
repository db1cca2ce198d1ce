use crate::config::LedgerSettings;

/// Page request after defaults and bounds have been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationConfig {
    pub limit: usize,
    pub page: usize,
    pub window: usize,
}

impl PaginationConfig {
    pub fn new(settings: &LedgerSettings) -> Self {
        Self {
            limit: settings.page_size,
            page: 1,
            window: settings.page_window,
        }
    }

    pub fn with_limit(mut self, limit: Option<i64>, max: usize) -> Self {
        if let Some(limit) = limit {
            self.limit = (limit.max(1) as usize).min(max.max(1));
        }
        self
    }

    pub fn with_page(mut self, page: Option<i64>) -> Self {
        if let Some(page) = page {
            self.page = page.max(1) as usize;
        }
        self
    }

    /// Rows to skip. `None` when the page lies past anything storage can address.
    pub fn offset(&self) -> Option<usize> {
        (self.page - 1)
            .checked_mul(self.limit)
            .filter(|offset| i64::try_from(*offset).is_ok())
    }

    pub fn page_count(&self, item_count: usize) -> usize {
        item_count.div_ceil(self.limit)
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self::new(&LedgerSettings::default())
    }
}
