use std::time::Duration;

pub mod error;
pub mod key;
pub mod store;
pub mod testing;

pub use error::StateError;
pub use store::StateStore;

/// Default TTL a backend applies to values written through
/// [`StateStore::set`] when the caller leaves it unspecified — the
/// idempotency marker, chiefly. Chosen as a bound on plausible client retry
/// horizons. Both bundled backends default to this; a backend may accept a
/// longer override but should not go shorter.
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);
