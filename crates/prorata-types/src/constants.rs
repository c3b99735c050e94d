//! System-wide constants for the Pro-Rata distribution engine.

/// Domain name bound into vesting delegation digests.
pub const VESTING_DOMAIN_NAME: &str = "ProRataVesting";

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "ProRata";
