//! Ticket payload handed to whatever renders the scannable code.

use chrono::{DateTime, Local, Utc};
use serde::Serialize;

use crate::parking::{Reservation, Spot};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub city: String,
    pub mall: String,
    pub spot_name: String,
    pub ends_at: DateTime<Utc>,
}

impl Ticket {
    pub fn for_reservation(reservation: &Reservation, spot: &Spot) -> Self {
        Self {
            city: reservation.city.clone(),
            mall: reservation.mall.clone(),
            spot_name: spot.name.clone(),
            ends_at: reservation.end_time,
        }
    }
}

pub trait TicketEncoder: Send + Sync {
    fn encode(&self, ticket: &Ticket) -> String;
}

/// Multi-line text payload, suitable for feeding a QR generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextTicketEncoder;

impl TicketEncoder for TextTicketEncoder {
    fn encode(&self, ticket: &Ticket) -> String {
        let ends_at = ticket.ends_at.with_timezone(&Local);
        format!(
            "🚗 Mauqifi Ticket\nالمدينة: {}\nالمول: {}\nرمز الموقف: {}\nانتهاء الحجز: {}",
            ticket.city,
            ticket.mall,
            ticket.spot_name,
            ends_at.format("%Y-%m-%d %H:%M:%S")
        )
    }
}
