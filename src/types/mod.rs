mod context;
mod error;
mod feature;
mod index;
mod observer;
mod report;
mod table;
mod tier;
mod value;

pub use context::Context;
pub use error::LoadError;
pub use feature::{all_match, feature, Feature, FeatureName};
pub use index::{OfferBuilder, ProductBuilder, RuleIndex, RuleTableBuilder};
pub use observer::ResolveObserver;
pub use report::{ResolutionReport, Winner};
pub use table::{Buyer, Offer, Product, RuleTable, Segment, Transparency, TRANSPARENCY};
pub(crate) use report::ReportRecorder;
pub(crate) use tier::{CompiledBuyer, CompiledOffer, CompiledProduct, Tier};
pub use tier::TierKey;
pub use value::Value;
