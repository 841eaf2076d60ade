pub mod ring;

pub use ring::{RingBuffer, RingConfig, RingError};
