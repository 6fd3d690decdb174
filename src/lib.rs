pub mod config;
pub mod db;
pub mod error;
pub mod service;
pub mod supabase;

pub use config::Config;
pub use error::{ErrorKind, FixerError};
pub use supabase::{SqlExecutor, SupabaseClient};
