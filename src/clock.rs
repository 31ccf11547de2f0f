use chrono::{DateTime, Duration, Utc};
use tokio::time::Instant;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time derived from a single UTC reading plus the monotonic time
/// elapsed since it was taken. Built on `tokio::time::Instant`, so it follows
/// the runtime's clock (including paused time).
#[derive(Debug, Clone)]
pub struct AnchoredClock {
    wall: DateTime<Utc>,
    anchor: Instant,
}

impl AnchoredClock {
    pub fn new() -> Self {
        Self::starting_at(Utc::now())
    }

    pub fn starting_at(wall: DateTime<Utc>) -> Self {
        Self {
            wall,
            anchor: Instant::now(),
        }
    }
}

impl Default for AnchoredClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for AnchoredClock {
    fn now(&self) -> DateTime<Utc> {
        let elapsed =
            Duration::from_std(self.anchor.elapsed()).unwrap_or_else(|_| Duration::zero());
        self.wall + elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[tokio::test(start_paused = true)]
    async fn follows_runtime_time() {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        let clock = AnchoredClock::starting_at(start);
        assert_eq!(clock.now(), start);

        tokio::time::advance(std::time::Duration::from_secs(90)).await;
        assert_eq!(clock.now(), start + Duration::seconds(90));
    }
}
