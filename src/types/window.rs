use std::fmt;

use crate::types::price::Price;

/// First and last slot of a contiguous span of prices.
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    pub start_label: String,
    pub end_label: String,
    pub total: Price,
}

impl fmt::Display for Window {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}..{}", self.start_label, self.end_label)
    }
}
