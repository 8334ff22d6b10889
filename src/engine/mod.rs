pub mod estimator;
pub mod listing;
pub mod pipeline;
pub mod predict;
pub mod reconcile;
pub mod schema;
pub mod value;

pub use estimator::{Estimate, PriceEstimator};
pub use listing::{ListingInput, RoomType};
pub use value::{FeatureRecord, FeatureValue};
