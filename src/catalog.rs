//! Static selection data: which malls exist in which city and which
//! reservation lengths can be picked.

use serde::Serialize;

pub const DEFAULT_DURATION_MINUTES: u32 = 30;

const DURATION_OPTIONS: &[u32] = &[15, 30, 60, 120, 180];

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct City {
    pub id: String,
    pub label: String,
    pub malls: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    cities: Vec<City>,
    durations: Vec<u32>,
    default_duration: u32,
}

impl Default for Catalog {
    fn default() -> Self {
        let city = |id: &str, label: &str, malls: &[&str]| City {
            id: id.to_string(),
            label: label.to_string(),
            malls: malls.iter().map(|m| m.to_string()).collect(),
        };

        Self {
            cities: vec![
                city(
                    "khamis",
                    "خميس مشيط",
                    &["موجان بارك", "خميس أفنيو", "أصداف مول"],
                ),
                city("abha", "أبها", &["الراشد مول", "أبها مول", "لافندا بارك"]),
            ],
            durations: DURATION_OPTIONS.to_vec(),
            default_duration: DEFAULT_DURATION_MINUTES,
        }
    }
}

impl Catalog {
    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    pub fn city(&self, id: &str) -> Option<&City> {
        self.cities.iter().find(|city| city.id == id)
    }

    /// Malls in display order; empty for an unknown city.
    pub fn malls_for(&self, city: &str) -> &[String] {
        self.city(city).map(|c| c.malls.as_slice()).unwrap_or(&[])
    }

    pub fn is_valid_mall(&self, city: &str, mall: &str) -> bool {
        self.malls_for(city).iter().any(|m| m == mall)
    }

    pub fn durations(&self) -> &[u32] {
        &self.durations
    }

    pub fn is_valid_duration(&self, minutes: u32) -> bool {
        self.durations.contains(&minutes)
    }

    pub fn default_duration(&self) -> u32 {
        self.default_duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malls_are_scoped_to_their_city() {
        let catalog = Catalog::default();
        assert_eq!(catalog.malls_for("khamis")[0], "موجان بارك");
        assert!(catalog.is_valid_mall("abha", "أبها مول"));
        assert!(!catalog.is_valid_mall("abha", "موجان بارك"));
        assert!(catalog.malls_for("riyadh").is_empty());
    }

    #[test]
    fn default_duration_is_offered() {
        let catalog = Catalog::default();
        assert!(catalog.is_valid_duration(catalog.default_duration()));
        assert!(!catalog.is_valid_duration(45));
        assert!(!catalog.is_valid_duration(0));
    }
}
