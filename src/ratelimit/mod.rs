//! Rate limiting logic and decision rendering.

mod decision;
mod limiter;

pub use decision::Decision;
pub use limiter::RateLimiter;
