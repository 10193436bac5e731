//! Offset pagination for list endpoints

use serde::Deserialize;

/// Default page size
pub const DEFAULT_LIMIT: i64 = 100;

/// Largest page a client may request
pub const MAX_LIMIT: i64 = 1000;

/// `?skip=&limit=` query parameters
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl ListParams {
    /// `(offset, limit)` with negative values raised to zero and the limit capped
    ///
    /// # Examples
    /// ```
    /// use alchemy_api::pagination::ListParams;
    ///
    /// assert_eq!(ListParams { skip: 20, limit: 10 }.bounds(), (20, 10));
    /// assert_eq!(ListParams { skip: -5, limit: 5000 }.bounds(), (0, 1000));
    /// assert_eq!(ListParams { skip: 0, limit: -1 }.bounds(), (0, 0));
    /// ```
    pub fn bounds(&self) -> (i64, i64) {
        (self.skip.max(0), self.limit.clamp(0, MAX_LIMIT))
    }
}
