use chrono::{DateTime, Utc};

///
/// The clock every cooldown and expiry decision reads from.
///
/// Tests pin it to a fixed instant and time-travel instead of sleeping; in
/// production it delegates to the system clock.
///
#[derive(Debug)]
pub enum TimeProvider {
    System,
    Fixed(DateTime<Utc>),
}

impl Default for TimeProvider {
    fn default() -> Self {
        TimeProvider::System
    }
}

impl TimeProvider {
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            TimeProvider::System => Utc::now(),
            TimeProvider::Fixed(instant) => *instant,
        }
    }

    pub fn fix(&mut self, fixed: Option<DateTime<Utc>>) {
        *self = match fixed {
            Some(instant) => TimeProvider::Fixed(instant),
            None => TimeProvider::System,
        };
    }
}
