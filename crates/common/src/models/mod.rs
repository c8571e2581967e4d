pub mod market;
pub mod signal;

pub use market::{MarketDatum, TradeSide};
pub use signal::{Direction, Signal, Strength, UNKNOWN_ASSET};
