use std::sync::Arc;

use chrono::DateTime;
use chrono::Utc;

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Default)]
pub struct SystemClock {}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        return Utc::now();
    }
}

pub type ClockRef = Arc<dyn Clock + Send + Sync>;
