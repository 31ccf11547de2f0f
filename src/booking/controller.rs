use std::{ops::ControlFlow, sync::Arc};

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use rand::{rngs::StdRng, SeedableRng};
use serde::Serialize;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    catalog::Catalog,
    clock::{AnchoredClock, Clock},
    error::BookingError,
    events::{CountdownEvent, EventSink, ParkingEvent},
    notice::Notice,
    parking::{
        spot::spot_name, Release, Reservation, ReservationManager, Selection, SlotState, Spot,
        SpotGeneration, SpotId, SpotRegistry, SpotStatus,
    },
    settings::ParkingSettings,
    ticket::{TextTicketEncoder, Ticket, TicketEncoder},
};

use super::{countdown::format_remaining, scheduler::CountdownScheduler};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationView {
    pub reservation: Reservation,
    pub spot_name: String,
    pub spot_distance: u32,
    pub remaining_ms: i64,
    pub ticket: String,
}

/// Everything a renderer needs to redraw the map and the details panel.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkingSnapshot {
    pub state: SlotState,
    pub spots: Vec<Spot>,
    pub free_count: usize,
    pub reservation: Option<ReservationView>,
}

struct ParkingState {
    manager: ReservationManager,
    generation: SpotGeneration,
    rng: StdRng,
}

#[derive(Clone)]
pub struct ParkingController {
    state: Arc<Mutex<ParkingState>>,
    scheduler: CountdownScheduler,
    events: Arc<dyn EventSink>,
    clock: Arc<dyn Clock>,
    tickets: Arc<dyn TicketEncoder>,
    notice_ms: u64,
}

impl ParkingController {
    pub fn new(
        settings: &ParkingSettings,
        catalog: Arc<Catalog>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self::with_clock(settings, catalog, events, Arc::new(AnchoredClock::new()))
    }

    pub fn with_clock(
        settings: &ParkingSettings,
        catalog: Arc<Catalog>,
        events: Arc<dyn EventSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let mut rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let generation = settings.spot_generation();
        let registry = SpotRegistry::generate(&generation, &mut rng);

        info!(
            "parking lot ready: {} spots, {} free",
            registry.len(),
            registry.free_count()
        );

        Self {
            state: Arc::new(Mutex::new(ParkingState {
                manager: ReservationManager::new(registry, catalog),
                generation,
                rng,
            })),
            scheduler: CountdownScheduler::new(settings.tick_interval()),
            events,
            clock,
            tickets: Arc::new(TextTicketEncoder),
            notice_ms: settings.notice_duration_ms,
        }
    }

    pub fn with_ticket_encoder(mut self, tickets: Arc<dyn TicketEncoder>) -> Self {
        self.tickets = tickets;
        self
    }

    pub async fn snapshot(&self) -> ParkingSnapshot {
        let state = self.state.lock().await;
        self.snapshot_of(&state.manager, self.clock.now())
    }

    pub async fn free_spots(&self) -> Vec<Spot> {
        let state = self.state.lock().await;
        state.manager.registry().list_free().cloned().collect()
    }

    pub fn is_counting_down(&self) -> bool {
        self.scheduler.is_armed()
    }

    pub async fn book(&self, selection: &Selection) -> Result<Reservation, BookingError> {
        let now = self.clock.now();
        let mut state = self.state.lock().await;

        let outcome = match selection.spot_id {
            None => Err(BookingError::MissingSelection),
            Some(spot_id) => {
                let duration = selection
                    .duration_minutes
                    .unwrap_or_else(|| state.manager.catalog().default_duration());
                state
                    .manager
                    .book(selection.city(), selection.mall(), spot_id, duration, now)
            }
        };

        let reservation = match outcome {
            Ok(reservation) => reservation,
            Err(err) => {
                drop(state);
                debug!("booking rejected: {err}");
                self.emit(ParkingEvent::Notice(Notice::rejected(&err, self.notice_ms)));
                return Err(err);
            }
        };

        let snapshot = self.snapshot_of(&state.manager, now);
        self.arm_countdown(reservation.id);
        drop(state);

        self.emit(ParkingEvent::StateChanged(snapshot));
        self.emit(ParkingEvent::Notice(Notice::booked(self.notice_ms)));
        Ok(reservation)
    }

    pub async fn cancel(&self) -> Result<Release, BookingError> {
        let now = self.clock.now();
        let mut state = self.state.lock().await;

        let outcome = state.manager.cancel(now);
        let release = match outcome {
            Ok(release) => release,
            Err(err) => {
                drop(state);
                self.emit(ParkingEvent::Notice(Notice::rejected(&err, self.notice_ms)));
                return Err(err);
            }
        };

        self.scheduler.disarm();
        let snapshot = self.snapshot_of(&state.manager, now);
        drop(state);

        self.emit(ParkingEvent::StateChanged(snapshot));
        self.emit(ParkingEvent::Notice(Notice::released(&release, self.notice_ms)));
        Ok(release)
    }

    /// Rebuilds the whole lot. An active reservation is dropped with it.
    pub async fn regenerate(&self) -> ParkingSnapshot {
        let now = self.clock.now();
        let mut state = self.state.lock().await;

        self.scheduler.disarm();
        let ParkingState {
            manager,
            generation,
            rng,
        } = &mut *state;
        let registry = SpotRegistry::generate(generation, rng);
        if let Some(dropped) = manager.reset(registry) {
            warn!(
                "regenerating spots dropped active reservation {} on spot {}",
                dropped.id, dropped.spot_id
            );
        }

        let snapshot = self.snapshot_of(&state.manager, now);
        drop(state);

        info!("regenerated {} spots", snapshot.spots.len());
        self.emit(ParkingEvent::StateChanged(snapshot.clone()));
        snapshot
    }

    /// Stops any countdown. Used on shutdown.
    pub fn shutdown(&self) {
        self.scheduler.disarm();
    }

    fn arm_countdown(&self, reservation_id: Uuid) {
        let controller = self.clone();
        self.scheduler.arm(reservation_id, move || {
            let controller = controller.clone();
            async move { controller.countdown_tick(reservation_id).await }
        });
    }

    async fn countdown_tick(&self, reservation_id: Uuid) -> ControlFlow<()> {
        let now = self.clock.now();
        let mut state = self.state.lock().await;

        let remaining = state
            .manager
            .current()
            .filter(|active| active.id == reservation_id)
            .map(|active| (active.remaining_ms(now), active.is_due(now)));
        let Some((remaining, due)) = remaining else {
            debug!("stale countdown tick for {reservation_id}");
            drop(state);
            self.scheduler.retire(reservation_id);
            return ControlFlow::Break(());
        };

        // Same exact-time check as `expire`; `remaining` is truncated to ms.
        if !due {
            drop(state);
            self.emit(ParkingEvent::Countdown(CountdownEvent::Tick {
                reservation_id,
                remaining_ms: remaining.max(0),
                display: format_remaining(remaining).unwrap_or_else(|| "0:00".to_string()),
            }));
            return ControlFlow::Continue(());
        }

        let Some(release) = state.manager.expire(now) else {
            warn!("reservation {reservation_id} was due but did not expire");
            return ControlFlow::Continue(());
        };
        let snapshot = self.snapshot_of(&state.manager, now);
        drop(state);
        self.scheduler.retire(reservation_id);

        self.emit(ParkingEvent::Countdown(CountdownEvent::Expired {
            reservation_id,
            spot_id: release.spot_id,
        }));
        self.emit(ParkingEvent::StateChanged(snapshot));
        self.emit(ParkingEvent::Notice(Notice::released(&release, self.notice_ms)));
        ControlFlow::Break(())
    }

    fn snapshot_of(&self, manager: &ReservationManager, now: DateTime<Utc>) -> ParkingSnapshot {
        let registry = manager.registry();
        let reservation = manager.current().map(|reservation| {
            let spot = registry
                .get(reservation.spot_id)
                .cloned()
                .unwrap_or_else(|| Spot {
                    id: reservation.spot_id,
                    name: spot_name(reservation.spot_id),
                    distance: 0,
                    status: SpotStatus::Busy,
                });
            ReservationView {
                ticket: self.tickets.encode(&Ticket::for_reservation(reservation, &spot)),
                remaining_ms: reservation.remaining_ms(now).max(0),
                spot_name: spot.name,
                spot_distance: spot.distance,
                reservation: reservation.clone(),
            }
        });

        ParkingSnapshot {
            state: manager.state(),
            spots: registry.spots().to_vec(),
            free_count: registry.free_count(),
            reservation,
        }
    }

    fn emit(&self, event: ParkingEvent) {
        self.events.emit(event);
    }
}
