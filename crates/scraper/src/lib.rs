pub mod browser;
pub mod error;
pub mod extract;
pub mod remote;
pub mod scan;
pub mod session;
pub mod traits;

pub use error::ScrapeError;
