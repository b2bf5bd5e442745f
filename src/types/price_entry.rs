use serde::Deserialize;

use crate::types::price::Price;

/// One priced slot as published by the feed, e.g.
/// `{"date": "15-01-2024", "hour": "14-15", "is-cheap": false, "price": 98.3, ...}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PriceEntry {
    /// Overwritten with the table key when the entry is loaded through [`PriceTable`].
    ///
    /// [`PriceTable`]: crate::types::price_table::PriceTable
    #[serde(default, rename = "hour")]
    pub slot_label: String,

    pub price: Price,

    #[serde(default)]
    pub date: String,

    #[serde(default)]
    pub market: String,

    #[serde(default)]
    pub units: String,

    #[serde(default)]
    pub is_cheap: bool,

    #[serde(default, rename = "is-under-avg")]
    pub is_under_average: bool,
}

#[cfg(test)]
impl PriceEntry {
    pub fn new(slot_label: impl Into<String>, price: Price) -> Self {
        Self {
            slot_label: slot_label.into(),
            price,
            date: String::new(),
            market: String::new(),
            units: String::new(),
            is_cheap: false,
            is_under_average: false,
        }
    }
}
