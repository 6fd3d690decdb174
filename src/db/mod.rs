//! Booking status model and the migration SQL.
//!
//! Layout:
//! - `models.rs`: typed booking statuses and the legacy value mapping
//! - `schema.rs`: the SQL script submitted to the remote service

pub mod models;
pub mod schema;

pub use models::{BookingStatus, LegacyStatus, backfill_status};
pub use schema::{BOOKINGS_TABLE, STATUS_CONSTRAINT_FIX, STATUS_CONSTRAINT_NAME};
