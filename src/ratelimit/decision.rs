//! Rate limit decision type.

/// The outcome of one rate limit evaluation.
///
/// The quota fields are populated on every decision, allowed or not,
/// so adapters can render `RateLimit-Limit`, `RateLimit-Remaining` and
/// `RateLimit-Reset` headers regardless of the outcome. Only
/// [`allowed`](Self::allowed) should gate the response code; an
/// adapter is expected to map `allowed = false` to HTTP 429 with
/// [`message`](Self::message) as the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    /// Whether the request is within the configured limit.
    pub allowed: bool,
    /// The configured limit.
    pub limit: u64,
    /// Requests left in the current window, never negative.
    pub remaining: u64,
    /// Whole seconds until the client's window resets, rounded up.
    pub reset_seconds: u64,
    /// Message for the client when the request is rejected.
    pub message: String,
}
