//! Page-window arithmetic shared by every listing endpoint.
//!
//! Page `n` (1-based) covers rows `[(n - 1) * per_page, n * per_page)`.

use serde::Deserialize;

use crate::deserializers::deserialize_lenient_page;

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default, deserialize_with = "deserialize_lenient_page")]
    pub page: Option<i64>,
}

impl PageQuery {
    pub fn number(&self) -> i64 {
        self.page.unwrap_or(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: i64,
    pub per_page: i64,
}

impl Page {
    pub fn new(number: i64, per_page: i64) -> Self {
        Self { number, per_page }
    }

    /// `(limit, offset)` for SQL, or `None` when the page cannot contain rows.
    pub fn window(&self) -> Option<(i64, i64)> {
        if self.number < 1 || self.per_page < 1 {
            return None;
        }
        let offset = (self.number - 1).checked_mul(self.per_page)?;
        Some((self.per_page, offset))
    }
}
