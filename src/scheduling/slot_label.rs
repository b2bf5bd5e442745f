use std::str::FromStr;

use crate::errors::ScheduleError;

/// Parsed `"HH-HH"` slot label. The exclusive end hour is validated to lie on
/// the same day but only the start hour is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotLabel {
    pub start_hour: u32,
}

impl FromStr for SlotLabel {
    type Err = ScheduleError;

    fn from_str(label: &str) -> Result<Self, ScheduleError> {
        let (start, end) = label
            .split_once('-')
            .ok_or_else(|| ScheduleError::malformed_label(label, "expected `HH-HH`"))?;

        let start_hour = parse_hour(start)
            .ok_or_else(|| ScheduleError::malformed_label(label, "start hour is not a number"))?;
        let end_hour = parse_hour(end)
            .ok_or_else(|| ScheduleError::malformed_label(label, "end hour is not a number"))?;

        if start_hour > 23 {
            return Err(ScheduleError::malformed_label(label, "start hour is out of range"));
        }
        if end_hour > 24 {
            return Err(ScheduleError::malformed_label(label, "end hour is out of range"));
        }
        if end_hour <= start_hour {
            return Err(ScheduleError::malformed_label(label, "slot wraps past midnight"));
        }

        Ok(Self { start_hour })
    }
}

fn parse_hour(raw: &str) -> Option<u32> {
    if raw.is_empty() || raw.len() > 2 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    raw.parse().ok()
}
