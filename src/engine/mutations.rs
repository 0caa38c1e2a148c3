use std::sync::Arc;

use chrono::Datelike;
use dashmap::mapref::entry::Entry;
use tokio::sync::RwLock;
use ulid::Ulid;

use crate::limits::*;
use crate::model::*;
use crate::observability;

use super::lifecycle::{self, Actor};
use super::{Engine, EngineError};

pub(super) fn validate_villa(villa: &Villa) -> Result<(), EngineError> {
    if villa.title.is_empty() {
        return Err(EngineError::Invalid("villa title required"));
    }
    if villa.title.len() > MAX_TITLE_LEN {
        return Err(EngineError::LimitExceeded("villa title too long"));
    }
    if villa.location.len() > MAX_LOCATION_LEN {
        return Err(EngineError::LimitExceeded("location too long"));
    }
    if villa.description.len() > MAX_DESCRIPTION_LEN {
        return Err(EngineError::LimitExceeded("description too long"));
    }
    if villa.price_per_night == 0 {
        return Err(EngineError::Invalid("price per night must be positive"));
    }
    if villa.max_guests == 0 {
        return Err(EngineError::Invalid("max guests must be positive"));
    }
    if villa.amenities.len() > MAX_AMENITIES {
        return Err(EngineError::LimitExceeded("too many amenities"));
    }
    if villa.amenities.iter().any(|a| a.len() > MAX_AMENITY_LEN) {
        return Err(EngineError::LimitExceeded("amenity name too long"));
    }
    Ok(())
}

pub(super) fn validate_stay(stay: &Stay) -> Result<(), EngineError> {
    if stay.check_in >= stay.check_out {
        return Err(EngineError::InvalidStay {
            check_in: stay.check_in,
            check_out: stay.check_out,
        });
    }
    if stay.check_in.year() < MIN_VALID_YEAR || stay.check_out.year() > MAX_VALID_YEAR {
        return Err(EngineError::LimitExceeded("date out of range"));
    }
    if stay.nights() > MAX_STAY_NIGHTS {
        return Err(EngineError::LimitExceeded("stay too long"));
    }
    Ok(())
}

impl Engine {
    pub async fn create_villa(&self, villa: Villa) -> Result<(), EngineError> {
        validate_villa(&villa)?;
        if self.state.len() >= MAX_VILLAS {
            return Err(EngineError::LimitExceeded("too many villas"));
        }

        let id = villa.id;
        let event = Event::VillaCreated { villa: villa.clone() };
        // Existence check and insert under one shard lock; a racing create
        // with the same id must not replace this state.
        match self.state.entry(id) {
            Entry::Occupied(_) => return Err(EngineError::AlreadyExists(id)),
            Entry::Vacant(slot) => {
                slot.insert(Arc::new(RwLock::new(VillaState::new(villa))));
            }
        }
        metrics::gauge!(observability::VILLAS_ACTIVE).increment(1.0);
        self.notify.send(id, &event);
        tracing::info!("created villa {id}");
        Ok(())
    }

    pub async fn update_villa(&self, villa: Villa) -> Result<(), EngineError> {
        validate_villa(&villa)?;
        let rs = self
            .get_villa_state(&villa.id)
            .ok_or(EngineError::NotFound(villa.id))?;
        let mut guard = rs.write().await;

        let id = villa.id;
        let event = Event::VillaUpdated { villa };
        self.apply_and_notify(id, &mut guard, &event);
        Ok(())
    }

    /// Drops the villa's state wholesale, including its requests and its
    /// notify channel.
    pub async fn delete_villa(&self, id: Ulid) -> Result<(), EngineError> {
        let (_, rs) = self
            .state
            .remove(&id)
            .ok_or(EngineError::NotFound(id))?;
        let guard = rs.read().await;
        for request in &guard.requests {
            self.request_index.remove(&request.id);
        }
        drop(guard);

        metrics::gauge!(observability::VILLAS_ACTIVE).decrement(1.0);
        self.notify.send(id, &Event::VillaDeleted { id });
        self.notify.remove(&id);
        tracing::info!("deleted villa {id}");
        Ok(())
    }

    /// Guest-side action. Always creates the request `pending`; the villa
    /// title is denormalized here as a display cache.
    pub async fn create_booking_request(
        &self,
        id: Ulid,
        villa_id: Ulid,
        stay: Stay,
        guests: u32,
        guest_name: Option<String>,
    ) -> Result<BookingRequest, EngineError> {
        validate_stay(&stay)?;
        if guests == 0 {
            return Err(EngineError::Invalid("guest count must be positive"));
        }
        if let Some(ref name) = guest_name
            && name.len() > MAX_GUEST_NAME_LEN {
                return Err(EngineError::LimitExceeded("guest name too long"));
            }
        if self.request_index.contains_key(&id) {
            return Err(EngineError::AlreadyExists(id));
        }

        let rs = self
            .get_villa_state(&villa_id)
            .ok_or(EngineError::NotFound(villa_id))?;
        let mut guard = rs.write().await;
        if guard.requests.len() >= MAX_REQUESTS_PER_VILLA {
            return Err(EngineError::LimitExceeded("too many requests on villa"));
        }

        let request = BookingRequest {
            id,
            villa_id,
            villa_title: guard.villa.title.clone(),
            stay,
            guests,
            guest_name,
            status: RequestStatus::Pending,
        };
        let event = Event::RequestCreated { request: request.clone() };
        self.apply_and_notify(villa_id, &mut guard, &event);
        metrics::counter!(observability::REQUESTS_CREATED_TOTAL).increment(1);
        Ok(request)
    }

    /// Host-side moderation. The lifecycle only permits `pending → accepted`
    /// and `pending → declined`; everything else is rejected before any state
    /// is touched.
    pub async fn update_request_status(
        &self,
        id: Ulid,
        to: RequestStatus,
        actor: Actor,
    ) -> Result<(), EngineError> {
        lifecycle::authorize_transition(actor)?;
        let (villa_id, mut guard) = self.resolve_request_write(&id).await?;
        let from = guard
            .request(id)
            .ok_or(EngineError::NotFound(id))?
            .status;
        lifecycle::check_transition(from, to)?;

        let event = Event::RequestStatusChanged { id, villa_id, from, to };
        self.apply_and_notify(villa_id, &mut guard, &event);
        metrics::counter!(
            observability::REQUEST_TRANSITIONS_TOTAL,
            "to" => observability::status_label(to)
        )
        .increment(1);
        tracing::info!("request {id} moved {from} -> {to}");
        Ok(())
    }
}
