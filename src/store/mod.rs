//! Self-cleaning windowed key/value storage.

mod generation;
mod windowed;

pub use generation::{CounterRecord, Generation};
pub use windowed::WindowedStore;
