use thiserror::Error;

use crate::parking::SpotId;

/// Rejections from the reservation state machine. None of these are fatal;
/// each leaves state untouched and is surfaced to the user as a notice.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    #[error("city and mall must both be selected")]
    MissingSelection,

    #[error("unknown city '{0}'")]
    UnknownCity(String),

    #[error("mall '{mall}' is not offered in '{city}'")]
    UnknownMall { city: String, mall: String },

    #[error("{0} minutes is not an offered duration")]
    UnsupportedDuration(u32),

    #[error("spot {0} is not available")]
    SpotUnavailable(SpotId),

    #[error("a reservation is already active on spot {0}")]
    ReservationActive(SpotId),

    #[error("no active reservation")]
    NoActiveReservation,
}

impl BookingError {
    /// Text shown to the user for this rejection.
    pub fn notice_message(&self) -> &'static str {
        match self {
            BookingError::MissingSelection
            | BookingError::UnknownCity(_)
            | BookingError::UnknownMall { .. } => "يرجى اختيار المدينة والمول.",
            BookingError::UnsupportedDuration(_) => "مدة الحجز غير متاحة.",
            BookingError::SpotUnavailable(_) => "الموقف غير متاح.",
            BookingError::ReservationActive(_) => "لديك حجز نشط بالفعل.",
            BookingError::NoActiveReservation => "لا يوجد حجز لإلغائه.",
        }
    }
}
