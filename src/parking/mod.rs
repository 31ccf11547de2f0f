pub mod manager;
pub mod registry;
pub mod reservation;
pub mod selection;
pub mod spot;

pub use manager::{ReservationManager, SlotState};
pub use registry::{SpotGeneration, SpotRegistry};
pub use reservation::{Release, ReleaseReason, Reservation};
pub use selection::Selection;
pub use spot::{Spot, SpotId, SpotStatus};
