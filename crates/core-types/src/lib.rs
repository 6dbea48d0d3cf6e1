pub mod enums;
pub mod error;
pub mod numeric;
pub mod trade;

// Re-export the core types to provide a clean public API.
pub use enums::{Direction, Outcome, Session, SharpeConvention};
pub use error::CoreError;
pub use trade::{Trade, TradeRecord};
