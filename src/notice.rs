use serde::Serialize;

use crate::{
    error::BookingError,
    parking::{Release, ReleaseReason},
};

pub const DEFAULT_NOTICE_MS: u64 = 3000;

const BOOKED: &str = "✅ تم تأكيد الحجز بنجاح!";
const CANCELLED: &str = "❌ تم إلغاء الحجز بنجاح.";
const EXPIRED: &str = "انتهت مدة الحجز، الموقف أصبح متاحًا.";
pub const NO_AVAILABILITY: &str = "لا توجد مواقف متاحة حالياً";

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum NoticeKind {
    Booked,
    Cancelled,
    Expired,
    Rejected,
}

/// Short transient message for the user.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub duration_ms: u64,
}

impl Notice {
    fn new(kind: NoticeKind, message: &str, duration_ms: u64) -> Self {
        Self {
            kind,
            message: message.to_string(),
            duration_ms,
        }
    }

    pub fn booked(duration_ms: u64) -> Self {
        Self::new(NoticeKind::Booked, BOOKED, duration_ms)
    }

    pub fn released(release: &Release, duration_ms: u64) -> Self {
        match release.reason {
            ReleaseReason::Cancelled => Self::new(NoticeKind::Cancelled, CANCELLED, duration_ms),
            ReleaseReason::Expired => Self::new(NoticeKind::Expired, EXPIRED, duration_ms),
        }
    }

    pub fn rejected(err: &BookingError, duration_ms: u64) -> Self {
        Self::new(NoticeKind::Rejected, err.notice_message(), duration_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parking::SpotId;

    #[test]
    fn errors_map_to_messages() {
        let notice = Notice::rejected(&BookingError::SpotUnavailable(SpotId(2)), DEFAULT_NOTICE_MS);
        assert_eq!(notice.kind, NoticeKind::Rejected);
        assert_eq!(notice.message, "الموقف غير متاح.");

        let notice = Notice::rejected(&BookingError::NoActiveReservation, 1500);
        assert_eq!(notice.message, "لا يوجد حجز لإلغائه.");
        assert_eq!(notice.duration_ms, 1500);

        let notice = Notice::rejected(&BookingError::MissingSelection, DEFAULT_NOTICE_MS);
        assert_eq!(notice.message, "يرجى اختيار المدينة والمول.");
    }
}
