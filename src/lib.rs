mod compile;
mod error;
mod handle;
mod resolve;
mod trace;
mod types;

pub use error::TierpriceError;
pub use handle::IndexHandle;
pub use trace::TracingObserver;
pub use types::{
    all_match, feature, Buyer, Context, Feature, FeatureName, LoadError, Offer, OfferBuilder,
    Product, ProductBuilder, ResolutionReport, ResolveObserver, RuleIndex, RuleTable,
    RuleTableBuilder, Segment, TierKey, Transparency, Value, Winner, TRANSPARENCY,
};
