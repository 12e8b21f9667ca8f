//! Centralized default constants for noteplex.
//!
//! **This module is the single source of truth** for all shared default
//! values. All crates should reference these constants instead of
//! defining their own magic numbers.
//!
//! Organized by domain area. When adding new constants, place them in
//! the appropriate section and document the rationale for the chosen
//! value.

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Length of public note identifiers.
pub const PUBLIC_ID_LENGTH: usize = 10;

/// Length of invitation hashes. Matches public ids so regenerated
/// hashes are indistinguishable in shape from the values they replace.
pub const INVITATION_HASH_LENGTH: usize = 10;

/// Length of file access keys. Longer than note ids because file keys
/// are the only guard for files not bound to a note.
pub const FILE_KEY_LENGTH: usize = 21;

/// Length of raw bearer tokens.
pub const AUTH_TOKEN_LENGTH: usize = 48;

// =============================================================================
// ACCESS RESOLUTION
// =============================================================================

/// Ceiling on the parent-chain walk during effective-team resolution.
/// Nesting this deep is already pathological; past it the resolver
/// treats the chain as corrupt and denies access.
pub const MAX_ANCESTOR_DEPTH: usize = 64;

// =============================================================================
// SERVER
// =============================================================================

/// Default HTTP server port.
pub const SERVER_PORT: u16 = 3000;

/// Default rate limit: max requests per period.
pub const RATE_LIMIT_REQUESTS: u64 = 100;

/// Default rate limit: period in seconds.
pub const RATE_LIMIT_PERIOD_SECS: u64 = 60;

/// Default event bus broadcast channel capacity.
pub const EVENT_BUS_CAPACITY: usize = 256;

/// Default CORS max-age in seconds (1 hour).
pub const CORS_MAX_AGE_SECS: u64 = 3600;

/// Maximum request body size in bytes (16 MB). Uploads arrive as
/// base64 inside JSON bodies, so this bounds file size too.
pub const MAX_BODY_SIZE_BYTES: usize = 16 * 1024 * 1024;

/// Maximum decoded file upload size in bytes (10 MB).
pub const MAX_UPLOAD_SIZE_BYTES: usize = 10 * 1024 * 1024;
