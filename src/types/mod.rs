pub mod market;
pub mod price;
pub mod request;
pub mod signals;

pub use market::*;
pub use price::*;
pub use request::*;
pub use signals::*;
