use std::num::NonZeroUsize;

use crate::errors::ScheduleError;
use crate::types::{price::Price, price_entry::PriceEntry, price_table::PriceTable, window::Window};

pub const DEFAULT_WINDOW_SLOTS: NonZeroUsize = NonZeroUsize::new(3).unwrap();

/// Picks the cheapest run of consecutive slots of a fixed length.
#[derive(Debug, Clone, Copy)]
pub struct WindowFinder {
    slots: NonZeroUsize,
}

impl Default for WindowFinder {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_SLOTS)
    }
}

impl WindowFinder {
    pub fn new(slots: NonZeroUsize) -> Self {
        Self { slots }
    }

    pub fn slots(&self) -> usize {
        self.slots.get()
    }

    /// Ties keep the earliest window: a later span only wins with a strictly
    /// smaller total.
    pub fn find(&self, table: &PriceTable) -> Result<Window, ScheduleError> {
        let slots = self.slots.get();
        let entries: Vec<&PriceEntry> = table.chronological().collect();

        if entries.len() < slots {
            return Err(ScheduleError::InsufficientData {
                found: entries.len(),
                required: slots,
            });
        }

        let mut best_start = 0;
        let mut best_total: Option<Price> = None;

        for (start, span) in entries.windows(slots).enumerate() {
            let total: Price = span.iter().map(|entry| entry.price).sum();

            if best_total.is_none_or(|best| total < best) {
                best_start = start;
                best_total = Some(total);
            }
        }

        let total = best_total.ok_or(ScheduleError::InsufficientData {
            found: entries.len(),
            required: slots,
        })?;

        Ok(Window {
            start_label: entries[best_start].slot_label.clone(),
            end_label: entries[best_start + slots - 1].slot_label.clone(),
            total,
        })
    }
}
