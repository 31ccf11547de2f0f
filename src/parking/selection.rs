use serde::{Deserialize, Serialize};

use super::SpotId;

/// What the user has picked so far. Fields fill in one at a time as the
/// user works through the form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub city: Option<String>,
    pub mall: Option<String>,
    pub spot_id: Option<SpotId>,
    pub duration_minutes: Option<u32>,
}

impl Selection {
    /// Booking is offered only once city, mall and spot are all chosen.
    pub fn is_ready(&self) -> bool {
        let filled = |value: &Option<String>| {
            value.as_deref().is_some_and(|v| !v.trim().is_empty())
        };
        filled(&self.city) && filled(&self.mall) && self.spot_id.is_some()
    }

    pub fn city(&self) -> &str {
        self.city.as_deref().unwrap_or_default()
    }

    pub fn mall(&self) -> &str {
        self.mall.as_deref().unwrap_or_default()
    }
}
