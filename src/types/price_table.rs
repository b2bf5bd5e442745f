use std::collections::BTreeMap;

use serde::Deserialize;

use crate::types::price_entry::PriceEntry;

/// A single day of prices keyed by slot label.
///
/// Labels are expected to sort lexicographically in chronological order
/// (`"00-01"` < `"01-02"` < ... < `"23-24"`), so the map order is the
/// chronological order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "BTreeMap<String, PriceEntry>")]
pub struct PriceTable {
    entries: BTreeMap<String, PriceEntry>,
}

impl PriceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any entry with the same label.
    pub fn insert(&mut self, entry: PriceEntry) {
        self.entries.insert(entry.slot_label.clone(), entry);
    }

    #[cfg(test)]
    pub fn get(&self, slot_label: &str) -> Option<&PriceEntry> {
        self.entries.get(slot_label)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn chronological(&self) -> impl Iterator<Item = &PriceEntry> {
        self.entries.values()
    }
}

impl From<BTreeMap<String, PriceEntry>> for PriceTable {
    fn from(entries: BTreeMap<String, PriceEntry>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(slot_label, mut entry)| {
                entry.slot_label.clone_from(&slot_label);
                (slot_label, entry)
            })
            .collect();

        Self { entries }
    }
}

impl FromIterator<PriceEntry> for PriceTable {
    fn from_iter<I: IntoIterator<Item = PriceEntry>>(iter: I) -> Self {
        let mut table = Self::new();
        for entry in iter {
            table.insert(entry);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::price::Price;

    #[test]
    fn parses_feed_payload_and_keys_by_label() {
        let raw = r#"{
            "01-02": {"date": "15-01-2024", "hour": "01-02", "is-cheap": true, "is-under-avg": true, "market": "PVPC", "price": 87.5, "units": "€/MWh"},
            "00-01": {"date": "15-01-2024", "hour": "00-01", "is-cheap": false, "is-under-avg": false, "market": "PVPC", "price": 101.25, "units": "€/MWh"}
        }"#;

        let table: PriceTable = serde_json::from_str(raw).unwrap();

        assert_eq!(table.len(), 2);
        let labels: Vec<&str> = table.chronological().map(|e| e.slot_label.as_str()).collect();
        assert_eq!(labels, ["00-01", "01-02"]);

        let entry = table.get("01-02").unwrap();
        assert_eq!(entry.price, Price::new(87.5).unwrap());
        assert_eq!(entry.market, "PVPC");
        assert_eq!(entry.units, "€/MWh");
        assert!(entry.is_cheap);
        assert!(entry.is_under_average);
    }

    #[test]
    fn map_key_wins_over_hour_field() {
        let raw = r#"{"14-15": {"hour": "bogus", "price": 1.0}}"#;

        let table: PriceTable = serde_json::from_str(raw).unwrap();

        assert_eq!(table.get("14-15").unwrap().slot_label, "14-15");
    }

    #[test]
    fn rejects_entries_without_price() {
        let raw = r#"{"14-15": {"hour": "14-15"}}"#;

        assert!(serde_json::from_str::<PriceTable>(raw).is_err());
    }

    #[test]
    fn orders_entries_regardless_of_insertion_order() {
        let table: PriceTable = ["02-03", "00-01", "01-02"]
            .into_iter()
            .map(|label| PriceEntry::new(label, Price::ZERO))
            .collect();

        let labels: Vec<&str> = table.chronological().map(|e| e.slot_label.as_str()).collect();
        assert_eq!(labels, ["00-01", "01-02", "02-03"]);
    }
}
