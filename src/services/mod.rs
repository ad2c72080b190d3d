pub mod market;
pub mod signals;

pub use market::MarketService;
pub use signals::{SignalError, SignalService};
