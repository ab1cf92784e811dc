use time::{Date, OffsetDateTime, UtcOffset};

/// Source of the gym's local "now".
pub trait Clock: Send + Sync {
    fn now(&self) -> OffsetDateTime;

    fn offset(&self) -> UtcOffset {
        self.now().offset()
    }

    fn today(&self) -> Date {
        self.now().date()
    }

    /// Calendar date of `instant` on the gym's wall clock.
    fn local_date(&self, instant: OffsetDateTime) -> Date {
        instant.to_offset(self.offset()).date()
    }
}

/// Wall clock pinned to a fixed UTC offset.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: UtcOffset,
}

impl SystemClock {
    pub fn new(offset: UtcOffset) -> Self {
        Self { offset }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc().to_offset(self.offset)
    }

    fn offset(&self) -> UtcOffset {
        self.offset
    }
}

#[cfg(test)]
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub OffsetDateTime);

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.0
    }
}
