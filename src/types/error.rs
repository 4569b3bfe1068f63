use thiserror::Error;

/// Structural problems found while compiling a [`RuleTable`](super::RuleTable).
///
/// Raised once, at load time. Resolution itself never fails.
#[derive(Debug, Error, PartialEq)]
pub enum LoadError {
    #[error("duplicate buyer name '{name}'")]
    DuplicateBuyer { name: String },

    #[error("duplicate buyer segment name '{name}'")]
    DuplicateSegment { name: String },

    #[error("duplicate product name '{name}'")]
    DuplicateProduct { name: String },

    #[error("undefined buyer '{buyer}' in segment '{segment}'")]
    UndefinedBuyer { segment: String, buyer: String },

    #[error("undefined buyer segment '{segment}' in offer {offer} of product '{product}'")]
    UndefinedSegment {
        product: String,
        offer: usize,
        segment: String,
    },

    #[error("invalid priority {priority} on product '{product}': expected a non-negative integer")]
    InvalidPriority { product: String, priority: String },

    #[error("invalid price {price} in offer {offer} of product '{product}'")]
    InvalidPrice {
        product: String,
        offer: usize,
        price: f64,
    },
}
