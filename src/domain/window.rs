// Time window used to filter issues by creation time
use crate::error::ValidationError;
use chrono::{DateTime, Duration, Utc};

const MAX_WINDOW_DAYS: i64 = 100 * 365;

/// Inclusive time range; a missing bound is open on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeWindow {
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
}

impl TimeWindow {
    pub fn new(
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Self, ValidationError> {
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(ValidationError::InvertedWindow { start, end });
            }
        }
        Ok(Self { start, end })
    }

    pub fn last_days(days: i64, now: DateTime<Utc>) -> Self {
        Self {
            start: Some(now - Duration::days(days.clamp(0, MAX_WINDOW_DAYS))),
            end: Some(now),
        }
    }

    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.start
    }

    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.end
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start.is_none_or(|start| at >= start) && self.end.is_none_or(|end| at <= end)
    }
}
