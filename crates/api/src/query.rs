//! Query parameter types shared by several handler modules.

use chrono::NaiveDate;
use serde::Deserialize;

/// `?as_of=YYYY-MM-DD`, the reference day for streak computations.
#[derive(Debug, Default, Deserialize)]
pub struct AsOfParams {
    pub as_of: Option<NaiveDate>,
}

impl AsOfParams {
    /// The requested day, or today in UTC.
    pub fn resolve(&self) -> NaiveDate {
        self.as_of.unwrap_or_else(|| chrono::Utc::now().date_naive())
    }
}
