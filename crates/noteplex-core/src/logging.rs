//! Structured logging schema and field name constants for noteplex.
//!
//! All crates use these constants for consistent structured logging
//! fields, so log aggregation tools can query by standardized field
//! names across every subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events (startup, shutdown), operation completions |
//! | DEBUG | Decision points, intermediate values, config choices |
//! | TRACE | Per-item iteration, high-volume data |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation ID propagated across a request's sub-calls.
/// Format: UUIDv7 (time-ordered).
pub const REQUEST_ID: &str = "request_id";

/// Subsystem originating the log event.
/// Values: "api", "access", "db"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "resolver", "policy", "invitations", "pool"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "resolve_effective_team", "join", "evaluate"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Internal note id being operated on.
pub const NOTE_ID: &str = "note_id";

/// Public note id from the request path.
pub const NOTE_PUBLIC_ID: &str = "note_public_id";

/// User id of the acting principal.
pub const USER_ID: &str = "user_id";

/// Member role involved in a team mutation.
pub const ROLE: &str = "role";

// ─── Access-control fields ─────────────────────────────────────────────────

/// Policy name being evaluated.
pub const POLICY: &str = "policy";

/// Outcome status code of a policy denial.
pub const DENY_STATUS: &str = "deny_status";

/// Number of parent-chain hops taken during team resolution.
pub const CLIMB_DEPTH: &str = "climb_depth";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of results returned by a query.
pub const RESULT_COUNT: &str = "result_count";

// ─── Database fields ───────────────────────────────────────────────────────

/// Number of active connections in the pool.
pub const POOL_SIZE: &str = "pool_size";

/// Number of idle connections in the pool.
pub const POOL_IDLE: &str = "pool_idle";

/// Database table or entity affected.
pub const DB_TABLE: &str = "db_table";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
