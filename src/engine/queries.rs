use chrono::NaiveDate;
use ulid::Ulid;

use crate::model::*;
use crate::observability;

use super::{availability, filter, Engine, EngineError, SharedVillaState};

impl Engine {
    /// All villas in a stable listing order. Ulids sort by creation time at
    /// millisecond granularity, so sorting by id gives a deterministic,
    /// broadly chronological order independent of map iteration.
    pub async fn list_villas(&self) -> Vec<Villa> {
        let states: Vec<SharedVillaState> =
            self.state.iter().map(|e| e.value().clone()).collect();
        let mut villas = Vec::with_capacity(states.len());
        for rs in states {
            villas.push(rs.read().await.villa.clone());
        }
        villas.sort_by_key(|v| v.id);
        villas
    }

    /// Stable filter over the villa listing; see `filter::apply` for the
    /// predicate semantics.
    pub async fn filter_villas(&self, criteria: &FilterCriteria) -> Vec<Villa> {
        let start = std::time::Instant::now();
        let villas = self.list_villas().await;
        let result = filter::apply(&villas, criteria);
        metrics::histogram!(observability::FILTER_DURATION_SECONDS)
            .record(start.elapsed().as_secs_f64());
        result
    }

    pub async fn get_villa(&self, id: &Ulid) -> Option<Villa> {
        let rs = self.get_villa_state(id)?;
        let guard = rs.read().await;
        Some(guard.villa.clone())
    }

    /// A villa's requests, sorted by check-in date. Unknown villa → empty.
    pub async fn booking_requests(&self, villa_id: Ulid) -> Vec<BookingRequest> {
        match self.get_villa_state(&villa_id) {
            Some(rs) => rs.read().await.requests.clone(),
            None => Vec::new(),
        }
    }

    /// Every request across all villas, in a stable id order.
    pub async fn list_booking_requests(&self) -> Vec<BookingRequest> {
        let states: Vec<SharedVillaState> =
            self.state.iter().map(|e| e.value().clone()).collect();
        let mut requests = Vec::new();
        for rs in states {
            requests.extend_from_slice(&rs.read().await.requests);
        }
        requests.sort_by_key(|r| r.id);
        requests
    }

    pub async fn get_request(&self, id: Ulid) -> Option<BookingRequest> {
        let villa_id = self.villa_for_request(&id)?;
        let rs = self.get_villa_state(&villa_id)?;
        let guard = rs.read().await;
        guard.request(id).cloned()
    }

    /// The calendar view for a selected villa: the padded month grid with a
    /// resolved status per day. No selection is an explicit error, never an
    /// empty grid.
    pub async fn month_view(
        &self,
        villa_id: Option<Ulid>,
        month: Month,
    ) -> Result<MonthView, EngineError> {
        let villa_id = villa_id.ok_or(EngineError::NoSelection)?;
        let rs = self
            .get_villa_state(&villa_id)
            .ok_or(EngineError::NotFound(villa_id))?;
        let guard = rs.read().await;

        let days = availability::month_grid(month)
            .map(|date| DayCell {
                date,
                in_month: month.contains(date),
                status: availability::date_status(&guard.villa, &guard.requests, date),
            })
            .collect();
        Ok(MonthView { month, days })
    }

    pub async fn date_status_for(
        &self,
        villa_id: Ulid,
        date: NaiveDate,
    ) -> Result<DateStatus, EngineError> {
        let rs = self
            .get_villa_state(&villa_id)
            .ok_or(EngineError::NotFound(villa_id))?;
        let guard = rs.read().await;
        Ok(availability::date_status(&guard.villa, &guard.requests, date))
    }
}
