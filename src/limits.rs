//! Hard limits on inbound data. Everything here surfaces as
//! `EngineError::LimitExceeded` rather than a panic.

pub const MAX_VILLAS: usize = 10_000;
pub const MAX_REQUESTS_PER_VILLA: usize = 10_000;

pub const MAX_TITLE_LEN: usize = 256;
pub const MAX_LOCATION_LEN: usize = 256;
pub const MAX_DESCRIPTION_LEN: usize = 8_192;
pub const MAX_GUEST_NAME_LEN: usize = 256;

pub const MAX_AMENITIES: usize = 64;
pub const MAX_AMENITY_LEN: usize = 64;

/// Longest stay a single request may cover.
pub const MAX_STAY_NIGHTS: i64 = 365;

/// Calendar window the engine accepts dates in.
pub const MIN_VALID_YEAR: i32 = 1970;
pub const MAX_VALID_YEAR: i32 = 2200;
