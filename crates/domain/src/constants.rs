//! Domain-wide constants

use std::time::Duration;

/// Safety margin subtracted from a cached token's expiry when deciding
/// whether it is still usable (a token is refreshed 5 minutes early).
pub const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(300);

/// Maximum number of screening sources accepted per request
pub const MAX_SCREENING_SOURCES: usize = 3;

/// Default per-call timeout for outbound screening requests
pub const DEFAULT_SCREENING_TIMEOUT: Duration = Duration::from_secs(60);

/// Default maximum retry count for the screening transport
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default base delay for exponential backoff (first retry after 2s)
pub const DEFAULT_BACKOFF_BASE: Duration = Duration::from_secs(2);

/// Default consecutive-failure threshold before the circuit opens
pub const DEFAULT_BREAKER_THRESHOLD: u64 = 5;

/// Default cool-down the circuit stays open before allowing a trial call
pub const DEFAULT_BREAKER_COOLDOWN: Duration = Duration::from_secs(30);
