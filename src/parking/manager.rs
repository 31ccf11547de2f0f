use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{catalog::Catalog, error::BookingError};

use super::{Release, ReleaseReason, Reservation, Spot, SpotId, SpotRegistry, SpotStatus};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SlotState {
    Empty,
    Active,
}

/// Owns the spot registry and the single reservation slot. Every status
/// change of a spot goes through here so the registry and the slot can
/// never disagree.
#[derive(Debug, Clone)]
pub struct ReservationManager {
    registry: SpotRegistry,
    catalog: Arc<Catalog>,
    current: Option<Reservation>,
}

impl ReservationManager {
    pub fn new(registry: SpotRegistry, catalog: Arc<Catalog>) -> Self {
        Self {
            registry,
            catalog,
            current: None,
        }
    }

    pub fn state(&self) -> SlotState {
        match self.current {
            Some(_) => SlotState::Active,
            None => SlotState::Empty,
        }
    }

    pub fn current(&self) -> Option<&Reservation> {
        self.current.as_ref()
    }

    pub fn registry(&self) -> &SpotRegistry {
        &self.registry
    }

    pub fn spots(&self) -> &[Spot] {
        self.registry.spots()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn book(
        &mut self,
        city: &str,
        mall: &str,
        spot_id: SpotId,
        duration_minutes: u32,
        now: DateTime<Utc>,
    ) -> Result<Reservation, BookingError> {
        let city = city.trim();
        let mall = mall.trim();
        if city.is_empty() || mall.is_empty() {
            return Err(BookingError::MissingSelection);
        }
        if self.catalog.city(city).is_none() {
            return Err(BookingError::UnknownCity(city.to_string()));
        }
        if !self.catalog.is_valid_mall(city, mall) {
            return Err(BookingError::UnknownMall {
                city: city.to_string(),
                mall: mall.to_string(),
            });
        }
        if !self.catalog.is_valid_duration(duration_minutes) {
            return Err(BookingError::UnsupportedDuration(duration_minutes));
        }
        if let Some(active) = &self.current {
            return Err(BookingError::ReservationActive(active.spot_id));
        }
        match self.registry.get(spot_id) {
            Some(spot) if spot.is_free() => {}
            _ => return Err(BookingError::SpotUnavailable(spot_id)),
        }

        let reservation = Reservation::new(
            spot_id,
            city.to_string(),
            mall.to_string(),
            duration_minutes,
            now,
        );
        self.registry.set_status(spot_id, SpotStatus::Busy);
        self.current = Some(reservation.clone());

        info!(
            "reserved spot {} at {} / {} until {}",
            spot_id, reservation.city, reservation.mall, reservation.end_time
        );
        Ok(reservation)
    }

    pub fn cancel(&mut self, _now: DateTime<Utc>) -> Result<Release, BookingError> {
        self.release(ReleaseReason::Cancelled)
            .ok_or(BookingError::NoActiveReservation)
    }

    /// Ends the reservation once `now` has reached its end time. Returns `None`
    /// when nothing is active or the reservation is not yet due, so a late or
    /// duplicate tick is harmless.
    pub fn expire(&mut self, now: DateTime<Utc>) -> Option<Release> {
        match &self.current {
            Some(active) if active.is_due(now) => self.release(ReleaseReason::Expired),
            Some(active) => {
                debug!(
                    "expire called {}ms early for reservation {}",
                    active.remaining_ms(now),
                    active.id
                );
                None
            }
            None => {
                debug!("expire called with no active reservation");
                None
            }
        }
    }

    /// Installs a new registry. Any active reservation points into the old
    /// one, so it is dropped and returned.
    pub fn reset(&mut self, registry: SpotRegistry) -> Option<Reservation> {
        self.registry = registry;
        self.current.take()
    }

    fn release(&mut self, reason: ReleaseReason) -> Option<Release> {
        let reservation = self.current.take()?;
        self.registry.set_status(reservation.spot_id, SpotStatus::Free);

        info!(
            "released spot {} ({:?}) for reservation {}",
            reservation.spot_id, reason, reservation.id
        );

        Some(Release {
            reason,
            spot_id: reservation.spot_id,
            reservation,
        })
    }
}
