use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

// ── Calendar types ───────────────────────────────────────────────

/// A guest stay: calendar date range, inclusive of both endpoints.
///
/// `check_in < check_out` must hold for any stay accepted into the system;
/// it is enforced at request creation and not re-validated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stay {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

impl Stay {
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Self {
        debug_assert!(check_in < check_out, "check-in must be before check-out");
        Self { check_in, check_out }
    }

    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    /// A date counts as occupied on both boundary days.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.check_in <= date && date <= self.check_out
    }

    pub fn overlaps(&self, other: &Stay) -> bool {
        self.check_in <= other.check_out && other.check_in <= self.check_out
    }
}

/// A calendar month, the unit of availability navigation.
///
/// Navigation always normalizes to the 1st of the month, so shifting by one
/// month is total and regenerating a grid from the same `Month` is pure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Month {
    year: i32,
    /// 1-based, January = 1.
    month: u32,
}

impl Month {
    /// Fields stay private so every `Month` in circulation went through this
    /// range check; `first_day`/`last_day` rely on it.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if !(1..=12).contains(&month) {
            return None;
        }
        if !(crate::limits::MIN_VALID_YEAR..=crate::limits::MAX_VALID_YEAR).contains(&year) {
            return None;
        }
        Some(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .expect("month validated at construction")
    }

    pub fn last_day(&self) -> NaiveDate {
        let next_first = NaiveDate::from_ymd_opt(
            if self.month == 12 { self.year + 1 } else { self.year },
            if self.month == 12 { 1 } else { self.month + 1 },
            1,
        )
        .expect("month validated at construction");
        next_first - Days::new(1)
    }

    pub fn prev(&self) -> Self {
        if self.month == 1 {
            Self { year: self.year - 1, month: 12 }
        } else {
            Self { year: self.year, month: self.month - 1 }
        }
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self { year: self.year + 1, month: 1 }
        } else {
            Self { year: self.year, month: self.month + 1 }
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

// ── Domain records ───────────────────────────────────────────────

/// A bookable rental property. Field names follow the external store's
/// camelCase record shape; `amenities` and the coordinates default when the
/// store omits them rather than failing deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Villa {
    pub id: Ulid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    /// Currency units per night, positive.
    pub price_per_night: u32,
    pub max_guests: u32,
    #[serde(default)]
    pub amenities: Vec<String>,
    /// Only needed for map display; irrelevant to filtering and availability.
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Declined,
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestStatus::Pending => write!(f, "pending"),
            RequestStatus::Accepted => write!(f, "accepted"),
            RequestStatus::Declined => write!(f, "declined"),
        }
    }
}

/// A guest-submitted intent to reserve a villa for a stay, subject to host
/// approval. Never deleted; only its status moves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub id: Ulid,
    pub villa_id: Ulid,
    /// Display cache of the villa's title — never used as a join key.
    pub villa_title: String,
    #[serde(flatten)]
    pub stay: Stay,
    pub guests: u32,
    #[serde(default)]
    pub guest_name: Option<String>,
    pub status: RequestStatus,
}

/// Resolved booking state for one villa on one calendar date.
/// Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateStatus {
    Available,
    Pending,
    Booked,
}

/// Guest-supplied search constraints. All fields are always present;
/// "unconstrained" is explicit (full price range, `None`, empty set).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    /// `(min, max)` in currency units. A transiently swapped pair from a UI
    /// slider is normalized, never rejected.
    pub price_range: (u32, u32),
    /// Minimum sleeping capacity a villa must offer. `None` = unconstrained.
    pub max_guests: Option<u32>,
    /// Required amenities, conjunctive, case-sensitive. Empty = unconstrained.
    #[serde(default)]
    pub amenities: Vec<String>,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            price_range: (0, u32::MAX),
            max_guests: None,
            amenities: Vec::new(),
        }
    }
}

impl FilterCriteria {
    /// Price bounds with min/max swapped into order if needed.
    pub fn price_bounds(&self) -> (u32, u32) {
        let (min, max) = self.price_range;
        if min <= max { (min, max) } else { (max, min) }
    }
}

// ── Engine state ─────────────────────────────────────────────────

/// One villa plus its booking requests, kept sorted by check-in date.
#[derive(Debug, Clone)]
pub struct VillaState {
    pub villa: Villa,
    pub requests: Vec<BookingRequest>,
}

impl VillaState {
    pub fn new(villa: Villa) -> Self {
        Self {
            villa,
            requests: Vec::new(),
        }
    }

    /// Insert a request maintaining sort order by `stay.check_in`.
    pub fn insert_request(&mut self, request: BookingRequest) {
        let pos = self
            .requests
            .binary_search_by_key(&request.stay.check_in, |r| r.stay.check_in)
            .unwrap_or_else(|e| e);
        self.requests.insert(pos, request);
    }

    pub fn request(&self, id: Ulid) -> Option<&BookingRequest> {
        self.requests.iter().find(|r| r.id == id)
    }

    pub fn request_mut(&mut self, id: Ulid) -> Option<&mut BookingRequest> {
        self.requests.iter_mut().find(|r| r.id == id)
    }
}

/// Change events, broadcast per villa after every applied mutation. These are
/// what a UI layer refreshes from after its optimistic local update.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    VillaCreated {
        villa: Villa,
    },
    VillaUpdated {
        villa: Villa,
    },
    VillaDeleted {
        id: Ulid,
    },
    RequestCreated {
        request: BookingRequest,
    },
    RequestStatusChanged {
        id: Ulid,
        villa_id: Ulid,
        from: RequestStatus,
        to: RequestStatus,
    },
}

// ── Query result types ───────────────────────────────────────────

/// One cell of the availability grid. `in_month` is false for the leading and
/// trailing padding days pulled in from adjacent months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayCell {
    pub date: NaiveDate,
    pub in_month: bool,
    pub status: DateStatus,
}

/// A full calendar month for one villa, padded to complete weeks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthView {
    pub month: Month,
    pub days: Vec<DayCell>,
}
