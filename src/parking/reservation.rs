use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::SpotId;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: Uuid,
    /// Back-reference into the spot registry; the reservation does not own the spot.
    pub spot_id: SpotId,
    pub city: String,
    pub mall: String,
    pub duration_minutes: u32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl Reservation {
    pub fn new(
        spot_id: SpotId,
        city: String,
        mall: String,
        duration_minutes: u32,
        start_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            spot_id,
            city,
            mall,
            duration_minutes,
            start_time,
            end_time: start_time + Duration::minutes(i64::from(duration_minutes)),
        }
    }

    /// Milliseconds until `end_time`; zero or negative once due.
    pub fn remaining_ms(&self, now: DateTime<Utc>) -> i64 {
        (self.end_time - now).num_milliseconds()
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        now >= self.end_time
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ReleaseReason {
    Cancelled,
    Expired,
}

/// Outcome of ending the active reservation.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Release {
    pub reason: ReleaseReason,
    pub spot_id: SpotId,
    pub reservation: Reservation,
}
