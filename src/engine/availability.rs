use chrono::{Datelike, Days, NaiveDate};

use crate::model::{BookingRequest, DateStatus, Month, RequestStatus, Villa};

// ── Availability Algorithm ────────────────────────────────────────

/// Lazy, finite sequence of consecutive calendar dates covering a month's
/// display grid. Regenerating from the same `Month` yields the identical
/// sequence; the iterator carries no state beyond its cursor.
#[derive(Debug, Clone)]
pub struct MonthGrid {
    cursor: Option<NaiveDate>,
    end: NaiveDate,
}

impl Iterator for MonthGrid {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let date = self.cursor?;
        self.cursor = if date < self.end { date.succ_opt() } else { None };
        Some(date)
    }
}

/// Display grid for a month: starts on the Sunday on or before the 1st, ends
/// on the Saturday on or after the last day. Always a whole number of weeks.
pub fn month_grid(month: Month) -> MonthGrid {
    let first = month.first_day();
    let last = month.last_day();
    let lead = first.weekday().num_days_from_sunday() as u64;
    let trail = 6 - last.weekday().num_days_from_sunday() as u64;
    MonthGrid {
        cursor: Some(first - Days::new(lead)),
        end: last + Days::new(trail),
    }
}

/// Resolve one villa's booking state on one date.
///
/// Requests are matched by villa id only — the denormalized title is a
/// display cache, never a join key — and a date is covered when it falls on
/// any day of the stay, boundary days included.
///
/// An `accepted` match always wins over a `pending` one, regardless of which
/// request was created later: a pending inquiry must never visually hide a
/// confirmed booking. Declined requests never affect status.
pub fn date_status(villa: &Villa, requests: &[BookingRequest], date: NaiveDate) -> DateStatus {
    let mut status = DateStatus::Available;
    for request in requests {
        if request.villa_id != villa.id || !request.stay.contains(date) {
            continue;
        }
        match request.status {
            RequestStatus::Accepted => return DateStatus::Booked,
            RequestStatus::Pending => status = DateStatus::Pending,
            RequestStatus::Declined => {}
        }
    }
    status
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Stay;
    use chrono::Weekday;
    use ulid::Ulid;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn make_villa(title: &str) -> Villa {
        Villa {
            id: Ulid::new(),
            title: title.into(),
            description: String::new(),
            location: String::new(),
            price_per_night: 300,
            max_guests: 4,
            amenities: Vec::new(),
            latitude: None,
            longitude: None,
        }
    }

    fn request(
        villa: &Villa,
        check_in: NaiveDate,
        check_out: NaiveDate,
        status: RequestStatus,
    ) -> BookingRequest {
        BookingRequest {
            id: Ulid::new(),
            villa_id: villa.id,
            villa_title: villa.title.clone(),
            stay: Stay::new(check_in, check_out),
            guests: 2,
            guest_name: None,
            status,
        }
    }

    // ── month_grid ────────────────────────────────────────

    #[test]
    fn grid_is_whole_weeks_bounded_by_sunday_and_saturday() {
        for (year, month) in [(2024, 1), (2024, 2), (2024, 6), (2025, 2), (2026, 3)] {
            let days: Vec<NaiveDate> = month_grid(Month::new(year, month).unwrap()).collect();
            assert_eq!(days.len() % 7, 0, "{year}-{month}");
            assert_eq!(days.first().unwrap().weekday(), Weekday::Sun);
            assert_eq!(days.last().unwrap().weekday(), Weekday::Sat);
        }
    }

    #[test]
    fn grid_covers_the_whole_month_consecutively() {
        let month = Month::new(2024, 6).unwrap();
        let days: Vec<NaiveDate> = month_grid(month).collect();
        assert!(days.contains(&d(2024, 6, 1)));
        assert!(days.contains(&d(2024, 6, 30)));
        for pair in days.windows(2) {
            assert_eq!(pair[0].succ_opt().unwrap(), pair[1]);
        }
    }

    #[test]
    fn grid_pads_with_adjacent_month_days() {
        // June 2024 starts on a Saturday: six leading days from May.
        let days: Vec<NaiveDate> = month_grid(Month::new(2024, 6).unwrap()).collect();
        assert_eq!(days[0], d(2024, 5, 26));
        assert_eq!(*days.last().unwrap(), d(2024, 7, 6));
    }

    #[test]
    fn grid_starts_on_the_first_when_month_begins_on_sunday() {
        // September 2024 runs Sunday the 1st through Monday the 30th.
        let days: Vec<NaiveDate> = month_grid(Month::new(2024, 9).unwrap()).collect();
        assert_eq!(days[0], d(2024, 9, 1));
        assert_eq!(days.len(), 35);
    }

    #[test]
    fn grid_is_restartable() {
        let month = Month::new(2024, 2).unwrap();
        let a: Vec<NaiveDate> = month_grid(month).collect();
        let b: Vec<NaiveDate> = month_grid(month).collect();
        assert_eq!(a, b);
    }

    // ── date_status ───────────────────────────────────────

    #[test]
    fn accepted_stay_marks_dates_booked_inclusive_of_both_boundaries() {
        let villa = make_villa("Villa Azul");
        let requests = vec![request(
            &villa,
            d(2024, 6, 10),
            d(2024, 6, 15),
            RequestStatus::Accepted,
        )];
        assert_eq!(date_status(&villa, &requests, d(2024, 6, 10)), DateStatus::Booked);
        assert_eq!(date_status(&villa, &requests, d(2024, 6, 12)), DateStatus::Booked);
        assert_eq!(date_status(&villa, &requests, d(2024, 6, 15)), DateStatus::Booked);
        assert_eq!(date_status(&villa, &requests, d(2024, 6, 16)), DateStatus::Available);
        assert_eq!(date_status(&villa, &requests, d(2024, 6, 9)), DateStatus::Available);
    }

    #[test]
    fn pending_stay_marks_dates_pending() {
        let villa = make_villa("Villa Azul");
        let requests = vec![request(
            &villa,
            d(2024, 6, 10),
            d(2024, 6, 15),
            RequestStatus::Pending,
        )];
        assert_eq!(date_status(&villa, &requests, d(2024, 6, 12)), DateStatus::Pending);
    }

    #[test]
    fn accepted_overrides_pending_on_the_same_date() {
        let villa = make_villa("Villa Azul");
        // Pending request created after the accepted one — recency is irrelevant.
        let requests = vec![
            request(&villa, d(2024, 6, 10), d(2024, 6, 15), RequestStatus::Accepted),
            request(&villa, d(2024, 6, 12), d(2024, 6, 20), RequestStatus::Pending),
        ];
        assert_eq!(date_status(&villa, &requests, d(2024, 6, 12)), DateStatus::Booked);
        assert_eq!(date_status(&villa, &requests, d(2024, 6, 14)), DateStatus::Booked);
        // Past the accepted stay, only the pending one covers.
        assert_eq!(date_status(&villa, &requests, d(2024, 6, 18)), DateStatus::Pending);
    }

    #[test]
    fn accepted_wins_regardless_of_slice_order() {
        let villa = make_villa("Villa Azul");
        let mut requests = vec![
            request(&villa, d(2024, 6, 10), d(2024, 6, 15), RequestStatus::Pending),
            request(&villa, d(2024, 6, 10), d(2024, 6, 15), RequestStatus::Accepted),
        ];
        assert_eq!(date_status(&villa, &requests, d(2024, 6, 12)), DateStatus::Booked);
        requests.reverse();
        assert_eq!(date_status(&villa, &requests, d(2024, 6, 12)), DateStatus::Booked);
    }

    #[test]
    fn declined_requests_never_affect_status() {
        let villa = make_villa("Villa Azul");
        let requests = vec![request(
            &villa,
            d(2024, 6, 10),
            d(2024, 6, 15),
            RequestStatus::Declined,
        )];
        assert_eq!(date_status(&villa, &requests, d(2024, 6, 12)), DateStatus::Available);
    }

    #[test]
    fn no_requests_means_every_date_available() {
        let villa = make_villa("Villa Azul");
        let mut month = Month::new(2024, 6).unwrap();
        // Three months of navigation, all available.
        for _ in 0..3 {
            for date in month_grid(month) {
                assert_eq!(date_status(&villa, &[], date), DateStatus::Available);
            }
            month = month.next();
        }
    }

    #[test]
    fn requests_for_other_villas_are_ignored() {
        let villa = make_villa("Villa Azul");
        let other = make_villa("Villa Roja");
        let requests = vec![request(
            &other,
            d(2024, 6, 10),
            d(2024, 6, 15),
            RequestStatus::Accepted,
        )];
        assert_eq!(date_status(&villa, &requests, d(2024, 6, 12)), DateStatus::Available);
    }

    #[test]
    fn duplicate_titles_do_not_cross_match() {
        // Two villas sharing a title: only the id decides.
        let villa = make_villa("Beach House");
        let twin = make_villa("Beach House");
        let requests = vec![request(
            &twin,
            d(2024, 6, 10),
            d(2024, 6, 15),
            RequestStatus::Accepted,
        )];
        assert_eq!(date_status(&villa, &requests, d(2024, 6, 12)), DateStatus::Available);
        assert_eq!(date_status(&twin, &requests, d(2024, 6, 12)), DateStatus::Booked);
    }
}
