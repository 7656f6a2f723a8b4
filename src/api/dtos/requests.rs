use crate::domain::models::booking::BookingFilter;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct RegisterTherapistRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub password2: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

#[derive(Deserialize)]
pub struct PasswordResetRequest {
    pub email: Option<String>,
}

#[derive(Deserialize)]
pub struct PasswordResetConfirmRequest {
    pub token: Option<String>,
    pub new_password: Option<String>,
    pub confirm_new_password: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateCabinRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub capacity: Option<i32>,
}

#[derive(Deserialize)]
pub struct UpdateCabinRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub capacity: Option<i32>,
}

#[derive(Deserialize)]
pub struct CreateSlotRequest {
    pub cabin: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub price: Option<Decimal>,
}

#[derive(Deserialize)]
pub struct UpdateRolesRequest {
    pub is_therapist: Option<bool>,
    pub is_admin: Option<bool>,
}

// Query strings. Dates are `YYYY-MM-DD` in UTC; unparsable values are ignored.

#[derive(Deserialize, Default)]
pub struct AdminSlotQuery {
    pub cabin_id: Option<String>,
    pub date: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct TherapistSlotQuery {
    pub cabin_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct MyBookingsQuery {
    pub status: Option<String>,
    pub period: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct AllBookingsQuery {
    pub cabin_id: Option<String>,
    pub therapist_id: Option<String>,
    pub date: Option<String>,
    pub status: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Midnight-to-midnight UTC bounds of a `YYYY-MM-DD` day.
pub fn day_bounds(raw: &str) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()?;
    let start = date.and_hms_opt(0, 0, 0)?.and_utc();
    Some((start, start + Duration::days(1)))
}

impl AdminSlotQuery {
    pub fn into_filter(self) -> BookingFilter {
        let day = self.date.as_deref().and_then(day_bounds);
        BookingFilter {
            cabin_id: non_empty(self.cabin_id),
            start_from: day.map(|(start, _)| start),
            start_before: day.map(|(_, end)| end),
            ..BookingFilter::default()
        }
    }
}

impl TherapistSlotQuery {
    /// `start_date` bounds the slot start from below, `end_date` bounds the slot end from above (inclusive day).
    pub fn into_filter(self) -> BookingFilter {
        BookingFilter {
            cabin_id: non_empty(self.cabin_id),
            start_from: self.start_date.as_deref().and_then(day_bounds).map(|(start, _)| start),
            end_before: self.end_date.as_deref().and_then(day_bounds).map(|(_, end)| end),
            ..BookingFilter::default()
        }
    }
}

impl MyBookingsQuery {
    pub fn into_filter(self, now: DateTime<Utc>) -> BookingFilter {
        let mut filter = BookingFilter {
            status: non_empty(self.status),
            ..BookingFilter::default()
        };
        match self.period.as_deref() {
            Some("upcoming") => filter.start_from = Some(now),
            Some("past") => filter.end_before = Some(now),
            _ => {}
        }
        filter
    }
}

impl AllBookingsQuery {
    pub fn into_filter(self) -> BookingFilter {
        let day = self.date.as_deref().and_then(day_bounds);
        BookingFilter {
            cabin_id: non_empty(self.cabin_id),
            therapist_id: non_empty(self.therapist_id),
            status: non_empty(self.status),
            start_from: day.map(|(start, _)| start),
            start_before: day.map(|(_, end)| end),
            ..BookingFilter::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_day_bounds() {
        let (start, end) = day_bounds("2030-03-15").unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2030, 3, 15, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2030, 3, 16, 0, 0, 0).unwrap());
        assert!(day_bounds("15/03/2030").is_none());
    }

    #[test]
    fn test_invalid_date_is_ignored() {
        let filter = AdminSlotQuery { cabin_id: Some("c1".into()), date: Some("not-a-date".into()) }.into_filter();
        assert_eq!(filter.cabin_id.as_deref(), Some("c1"));
        assert!(filter.start_from.is_none());
        assert!(filter.start_before.is_none());
    }

    #[test]
    fn test_period_filters() {
        let now = Utc.with_ymd_and_hms(2030, 1, 1, 12, 0, 0).unwrap();
        let upcoming = MyBookingsQuery { status: None, period: Some("upcoming".into()) }.into_filter(now);
        assert_eq!(upcoming.start_from, Some(now));
        assert!(upcoming.end_before.is_none());

        let past = MyBookingsQuery { status: Some("booked".into()), period: Some("past".into()) }.into_filter(now);
        assert_eq!(past.end_before, Some(now));
        assert_eq!(past.status.as_deref(), Some("booked"));

        let other = MyBookingsQuery { status: Some("".into()), period: Some("someday".into()) }.into_filter(now);
        assert!(other.start_from.is_none() && other.end_before.is_none() && other.status.is_none());
    }
}
