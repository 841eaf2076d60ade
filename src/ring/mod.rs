pub mod buffer;
pub mod config;
pub mod maintenance;
pub mod ring_error;
pub mod socket;
pub mod transfer;

pub use buffer::RingBuffer;
pub use config::*;
pub use ring_error::*;
