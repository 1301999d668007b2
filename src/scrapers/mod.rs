pub mod cwlagos;
pub mod extract;
pub mod traits;
pub mod types;

pub use cwlagos::CwLagosScraper;
pub use traits::ScraperTrait;
