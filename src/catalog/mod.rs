//! Read-side catalog queries: subtree resolution and price aggregation.

mod error;
mod pricing;
mod resolver;

pub use error::CatalogError;
pub use pricing::{mean_price, CategoryPriceSummary, PriceAggregator};
pub use resolver::CategoryTreeResolver;
