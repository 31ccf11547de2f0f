use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct SpotId(pub u32);

impl fmt::Display for SpotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SpotStatus {
    Free,
    Busy,
}

impl Default for SpotStatus {
    fn default() -> Self {
        SpotStatus::Free
    }
}

impl SpotStatus {
    /// Label shown next to a spot on the map.
    pub fn label(&self) -> &'static str {
        match self {
            SpotStatus::Free => "متاح",
            SpotStatus::Busy => "مشغول",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Spot {
    pub id: SpotId,
    pub name: String,
    /// Meters from the mall entrance. Cosmetic only.
    pub distance: u32,
    pub status: SpotStatus,
}

impl Spot {
    pub fn new(id: SpotId, distance: u32, status: SpotStatus) -> Self {
        Self {
            id,
            name: spot_name(id),
            distance,
            status,
        }
    }

    pub fn is_free(&self) -> bool {
        self.status == SpotStatus::Free
    }

    /// `P-3 — 120 متر`, the text used in spot pickers.
    pub fn option_label(&self) -> String {
        format!("{} — {} متر", self.name, self.distance)
    }
}

pub fn spot_name(id: SpotId) -> String {
    format!("P-{}", id.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_follows_id() {
        let spot = Spot::new(SpotId(7), 42, SpotStatus::Busy);
        assert_eq!(spot.name, "P-7");
        assert_eq!(spot.option_label(), "P-7 — 42 متر");
        assert!(!spot.is_free());
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&SpotStatus::Busy).unwrap();
        assert_eq!(json, "\"busy\"");
        let spot = Spot::new(SpotId(1), 20, SpotStatus::Free);
        let value = serde_json::to_value(&spot).unwrap();
        assert_eq!(value["id"], 1);
        assert_eq!(value["status"], "free");
    }
}
