//! Supabase REST access: stateless endpoint calls plus the client that
//! binds them to one project and secret.

mod endpoints;

pub mod client;

pub use client::{SqlExecutor, SupabaseClient};
