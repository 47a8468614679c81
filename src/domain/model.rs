use crate::utils::error::{RentalError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

pub type VehicleId = u64;
pub type CustomerId = u64;
pub type AdminId = u64;
pub type BookingId = u64;

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parses a calendar date at day precision.
///
/// Accepts `YYYY-MM-DD`, a full ISO datetime (`T` or space separated, optional offset)
/// truncated to its date, and RFC 2822 timestamps as emitted by some JSON encoders.
/// Anything else after the date is rejected.
pub fn parse_calendar_date(field: &str, raw: &str) -> Result<NaiveDate> {
    let trimmed = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    for format in DATETIME_FORMATS {
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(timestamp.date());
        }
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(timestamp.date_naive());
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc2822(trimmed) {
        return Ok(timestamp.date_naive());
    }

    Err(RentalError::InvalidDate {
        field: field.to_string(),
        value: raw.to_string(),
    })
}

/// Closed calendar-day interval, both bounds inclusive. `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

/// A span during which a vehicle is held by a booking.
pub type ReservationInterval = DateRange;

/// The span a renter asks for.
pub type RequestedRange = DateRange;

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(RentalError::InvalidRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    pub fn parse(start: &str, end: &str) -> Result<Self> {
        let start = parse_calendar_date("start date", start)?;
        let end = parse_calendar_date("end date", end)?;
        Self::new(start, end)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of calendar days covered, counting both ends.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Inclusive overlap: sharing a single boundary day counts.
    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.overlaps_with(other, BoundaryPolicy::Inclusive)
    }

    pub fn overlaps_with(&self, other: &DateRange, boundary: BoundaryPolicy) -> bool {
        match boundary {
            BoundaryPolicy::Inclusive => self.start <= other.end && other.start <= self.end,
            BoundaryPolicy::SameDayTurnover => self.start < other.end && other.start < self.end,
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// How a shared boundary day between a reservation and a request is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryPolicy {
    /// A reservation ending on day D blocks a request starting on D.
    #[default]
    Inclusive,
    /// Return and new rental may happen on the same day.
    SameDayTurnover,
}

impl BoundaryPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoundaryPolicy::Inclusive => "inclusive",
            BoundaryPolicy::SameDayTurnover => "same_day_turnover",
        }
    }
}

impl FromStr for BoundaryPolicy {
    type Err = RentalError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inclusive" => Ok(BoundaryPolicy::Inclusive),
            "same_day_turnover" => Ok(BoundaryPolicy::SameDayTurnover),
            other => Err(RentalError::InvalidConfigValueError {
                field: "availability.boundary".to_string(),
                value: other.to_string(),
                reason: "Valid values: inclusive, same_day_turnover".to_string(),
            }),
        }
    }
}

/// Which reservations take part in the overlap test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusPolicy {
    /// `Booked` and status-less reservations block, terminal ones are ignored.
    #[default]
    ActiveOnly,
    /// Every reservation blocks; for feeds that already drop terminal bookings.
    AllReservations,
}

impl StatusPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusPolicy::ActiveOnly => "active_only",
            StatusPolicy::AllReservations => "all_reservations",
        }
    }
}

impl FromStr for StatusPolicy {
    type Err = RentalError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active_only" => Ok(StatusPolicy::ActiveOnly),
            "all_reservations" => Ok(StatusPolicy::AllReservations),
            other => Err(RentalError::InvalidConfigValueError {
                field: "availability.status_policy".to_string(),
                value: other.to_string(),
                reason: "Valid values: active_only, all_reservations".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookingStatus {
    Booked,
    Completed,
    Cancelled,
    CancelledByCustomer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingAction {
    Complete,
    Cancel,
    CancelByCustomer,
}

impl fmt::Display for BookingAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BookingAction::Complete => "complete",
            BookingAction::Cancel => "cancel",
            BookingAction::CancelByCustomer => "cancel by customer",
        };
        f.write_str(label)
    }
}

impl BookingStatus {
    /// Wire representation used by the backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Booked => "booked",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::CancelledByCustomer => "canceled by customer",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, BookingStatus::Booked)
    }

    pub fn blocks_availability(&self) -> bool {
        matches!(self, BookingStatus::Booked)
    }

    pub fn apply(self, action: BookingAction) -> Result<BookingStatus> {
        match (self, action) {
            (BookingStatus::Booked, BookingAction::Complete) => Ok(BookingStatus::Completed),
            (BookingStatus::Booked, BookingAction::Cancel) => Ok(BookingStatus::Cancelled),
            (BookingStatus::Booked, BookingAction::CancelByCustomer) => {
                Ok(BookingStatus::CancelledByCustomer)
            }
            (from, action) => Err(RentalError::InvalidTransition {
                from: from.to_string(),
                action: action.to_string(),
            }),
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = RentalError;

    fn from_str(s: &str) -> Result<Self> {
        // 後端同時出現 cancelled / canceled 兩種拼法
        let normalized = s.trim().to_ascii_lowercase().replace("cancelled", "canceled");
        match normalized.as_str() {
            "booked" => Ok(BookingStatus::Booked),
            "completed" => Ok(BookingStatus::Completed),
            "canceled" => Ok(BookingStatus::Cancelled),
            "canceled by customer" => Ok(BookingStatus::CancelledByCustomer),
            _ => Err(RentalError::UnknownStatus {
                value: s.to_string(),
            }),
        }
    }
}

/// Status of a booking row as the backend reported it.
///
/// Unrecognised text is kept so a listing still shows the row, but no transition
/// is allowed from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportedStatus {
    Known(BookingStatus),
    Unrecognized(String),
}

impl ReportedStatus {
    pub fn known(&self) -> Result<BookingStatus> {
        match self {
            ReportedStatus::Known(status) => Ok(*status),
            ReportedStatus::Unrecognized(raw) => Err(RentalError::UnknownStatus { value: raw.clone() }),
        }
    }

    /// Whether the booking can still be completed or cancelled.
    pub fn is_open(&self) -> bool {
        matches!(self, ReportedStatus::Known(status) if !status.is_terminal())
    }
}

impl From<BookingStatus> for ReportedStatus {
    fn from(status: BookingStatus) -> Self {
        ReportedStatus::Known(status)
    }
}

impl fmt::Display for ReportedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportedStatus::Known(status) => fmt::Display::fmt(status, f),
            ReportedStatus::Unrecognized(raw) => f.write_str(raw),
        }
    }
}

impl Serialize for ReportedStatus {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            ReportedStatus::Known(status) => status.serialize(serializer),
            ReportedStatus::Unrecognized(raw) => serializer.serialize_str(raw),
        }
    }
}

impl<'de> Deserialize<'de> for ReportedStatus {
    fn deserialize<D>(deserializer: D) -> std::result::Result<ReportedStatus, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.parse::<BookingStatus>() {
            Ok(status) => ReportedStatus::Known(status),
            Err(_) => {
                tracing::warn!("⚠️ Booking row with unknown status '{}'", raw);
                ReportedStatus::Unrecognized(raw)
            }
        })
    }
}

impl Serialize for BookingStatus {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BookingStatus {
    fn deserialize<D>(deserializer: D) -> std::result::Result<BookingStatus, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A reservation held against a vehicle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reservation {
    pub interval: ReservationInterval,
    /// `None` when the feed carried no usable status.
    pub status: Option<BookingStatus>,
}

impl Reservation {
    pub fn new(interval: ReservationInterval, status: Option<BookingStatus>) -> Self {
        Self { interval, status }
    }

    pub fn blocks(&self, policy: StatusPolicy) -> bool {
        match policy {
            StatusPolicy::AllReservations => true,
            StatusPolicy::ActiveOnly => self.status.map_or(true, |s| s.blocks_availability()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Vehicle {
    pub id: VehicleId,
    pub reservations: Vec<Reservation>,
}

impl Vehicle {
    pub fn new(id: VehicleId) -> Self {
        Self {
            id,
            reservations: Vec::new(),
        }
    }

    pub fn with_reservation(mut self, interval: ReservationInterval, status: Option<BookingStatus>) -> Self {
        self.reservations.push(Reservation::new(interval, status));
        self
    }
}

/// Raw date range as typed by a user; either side may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeInput {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl RangeInput {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: Some(start.into()),
            end: Some(end.into()),
        }
    }

    pub fn unset() -> Self {
        Self::default()
    }

    pub fn resolve(&self) -> Result<RequestedRange> {
        let start = required_date("start date", &self.start)?;
        let end = required_date("end date", &self.end)?;
        DateRange::parse(start, end)
    }
}

fn required_date<'a>(field: &str, value: &'a Option<String>) -> Result<&'a str> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(RentalError::ValidationError {
            message: format!("{} is required", field),
        }),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Car {
    pub id: VehicleId,
    pub model: String,
    pub brand: String,
    pub price_per_day: f64,
    #[serde(default = "default_true")]
    pub available: bool,
}

fn default_true() -> bool {
    true
}

/// Reservation as it arrives from the catalog feed, before validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawReservation {
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Entry of `GET /cars_with_bookings`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarListing {
    #[serde(flatten)]
    pub car: Car,
    #[serde(default)]
    pub bookings: Vec<RawReservation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    #[serde(default)]
    pub customer_id: Option<CustomerId>,
    #[serde(default)]
    pub car_id: Option<VehicleId>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_mobile: Option<String>,
    pub model: String,
    pub brand: String,
    pub start_date: String,
    pub end_date: String,
    pub status: ReportedStatus,
}

impl Booking {
    pub fn period(&self) -> Result<DateRange> {
        DateRange::parse(&self.start_date, &self.end_date)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub customer_id: CustomerId,
    pub car_id: VehicleId,
    pub start_date: String,
    pub end_date: String,
}

impl BookingRequest {
    pub fn new(customer_id: CustomerId, car_id: VehicleId, range: &RequestedRange) -> Self {
        Self {
            customer_id,
            car_id,
            start_date: range.start().to_string(),
            end_date: range.end().to_string(),
        }
    }
}

/// Generic `{message}` / `{error}` reply of the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub admin_id: Option<AdminId>,
    #[serde(default)]
    pub customer_id: Option<CustomerId>,
    #[serde(default)]
    pub mobile: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCar {
    pub model: String,
    pub brand: String,
    pub price_per_day: f64,
}

#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Serialize)]
pub struct NewAdmin {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Clone, Serialize)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
    pub password: String,
    pub mobile: String,
}

// 密碼不可出現在日誌
macro_rules! debug_without_password {
    ($ty:ident { $($field:ident),* }) => {
        impl fmt::Debug for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($ty))
                    $(.field(stringify!($field), &self.$field))*
                    .field("password", &"***")
                    .finish()
            }
        }
    };
}

debug_without_password!(Credentials { email });
debug_without_password!(NewAdmin { name, email });
debug_without_password!(NewCustomer { name, email, mobile });
