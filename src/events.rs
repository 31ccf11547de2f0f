use log::debug;
use serde::Serialize;
use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

use crate::{booking::ParkingSnapshot, notice::Notice, parking::SpotId};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "phase", rename_all = "camelCase")]
pub enum CountdownEvent {
    #[serde(rename_all = "camelCase")]
    Tick {
        reservation_id: Uuid,
        remaining_ms: i64,
        display: String,
    },
    #[serde(rename_all = "camelCase")]
    Expired {
        reservation_id: Uuid,
        spot_id: SpotId,
    },
}

/// Everything the presentation layer is told about.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "payload", rename_all = "camelCase")]
pub enum ParkingEvent {
    StateChanged(ParkingSnapshot),
    Countdown(CountdownEvent),
    Notice(Notice),
}

impl ParkingEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ParkingEvent::StateChanged(_) => "parking-state-changed",
            ParkingEvent::Countdown(_) => "reservation-countdown",
            ParkingEvent::Notice(_) => "parking-notice",
        }
    }
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: ParkingEvent);
}

impl EventSink for UnboundedSender<ParkingEvent> {
    fn emit(&self, event: ParkingEvent) {
        let name = event.name();
        if self.send(event).is_err() {
            debug!("dropping {name}: no listener");
        }
    }
}
