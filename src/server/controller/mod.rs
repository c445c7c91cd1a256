pub(crate) mod error;
pub(crate) mod menu;
pub(crate) mod orders;
pub(crate) mod restaurants;

/// upper bound for both pool acquisition and a single database operation
pub(crate) const DB_TIMEOUT_SECONDS: u64 = 5;
