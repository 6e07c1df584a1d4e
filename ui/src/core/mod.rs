pub mod aggregate;
pub mod config;
pub mod driver;
pub mod error;
pub mod format;
pub mod knowledge;
pub mod pipeline;
pub mod records;
pub mod resolver;
pub mod session;
pub mod waveform;
