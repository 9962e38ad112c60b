pub mod aggregate;
pub mod ordinal;

pub use aggregate::{UnitAggregator, NO_DATA_VERDICT};
pub use ordinal::OrdinalScorer;
