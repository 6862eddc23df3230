use chrono::NaiveTime;
use common::TIME_FORMAT;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid time '{0}', expected HH:MM or HH:MM:SS")]
pub struct TimeFormatError(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotError {
    #[error(transparent)]
    Format(#[from] TimeFormatError),
    #[error("End time must be after start time")]
    EndNotAfterStart,
}

/// Normalizes `HH:MM` or `HH:MM:SS` to `HH:MM:SS`.
pub fn normalize_time(raw: &str) -> Result<String, TimeFormatError> {
    let trimmed = raw.trim();
    if !TIME_FORMAT.is_match(trimmed) {
        return Err(TimeFormatError(raw.to_owned()));
    }
    if trimmed.len() == 5 {
        Ok(format!("{trimmed}:00"))
    } else {
        Ok(trimmed.to_owned())
    }
}

pub fn parse_time(raw: &str) -> Result<NaiveTime, TimeFormatError> {
    let normalized = normalize_time(raw)?;
    NaiveTime::parse_from_str(&normalized, "%H:%M:%S").map_err(|_| TimeFormatError(raw.to_owned()))
}

/// A half-open `[start, end)` interval within one day. `end > start` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlot {
    start: NaiveTime,
    end: NaiveTime,
}

impl TimeSlot {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, SlotError> {
        if end <= start {
            return Err(SlotError::EndNotAfterStart);
        }
        Ok(Self { start, end })
    }

    pub fn parse(start: &str, end: &str) -> Result<Self, SlotError> {
        Self::new(parse_time(start)?, parse_time(end)?)
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_minutes_get_zero_seconds() {
        assert_eq!(normalize_time("09:00").unwrap(), "09:00:00");
        assert_eq!(normalize_time(" 23:59:30 ").unwrap(), "23:59:30");
    }

    #[test]
    fn rejects_malformed_times() {
        for bad in ["9:00", "24:00", "12:60", "12:00:60", "noon", ""] {
            assert!(normalize_time(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn slot_requires_end_after_start() {
        assert_eq!(TimeSlot::parse("10:00", "10:00"), Err(SlotError::EndNotAfterStart));
        assert_eq!(TimeSlot::parse("11:00", "10:00"), Err(SlotError::EndNotAfterStart));
        assert!(matches!(TimeSlot::parse("xx", "10:00"), Err(SlotError::Format(_))));

        let slot = TimeSlot::parse("09:00", "10:30:00").unwrap();
        assert_eq!(slot.start(), NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(slot.end(), NaiveTime::from_hms_opt(10, 30, 0).unwrap());
    }
}
