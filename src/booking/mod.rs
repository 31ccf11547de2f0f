pub mod commands;
pub mod controller;
pub mod countdown;
pub mod scheduler;

pub use controller::{ParkingController, ParkingSnapshot, ReservationView};
pub use countdown::format_remaining;
pub use scheduler::CountdownScheduler;
