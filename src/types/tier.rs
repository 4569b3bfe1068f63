use std::fmt;

use super::{Feature, Transparency};

/// Ordering key of a tier. The derived `Ord` compares `priority` first and
/// `specificity` second; tiers are visited in descending key order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TierKey {
    pub priority: u32,
    pub specificity: usize,
}

impl TierKey {
    #[must_use]
    pub fn new(priority: u32, specificity: usize) -> Self {
        Self {
            priority,
            specificity,
        }
    }
}

impl fmt::Display for TierKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(priority {}, specificity {})",
            self.priority, self.specificity
        )
    }
}

/// A buyer descriptor with its name kept for diagnostics.
#[derive(Debug, Clone)]
pub(crate) struct CompiledBuyer {
    pub(crate) name: String,
    pub(crate) features: Vec<Feature>,
}

impl CompiledBuyer {
    pub(crate) fn specificity(&self) -> usize {
        self.features.len()
    }
}

/// An offer whose segment references have been flattened into indices of
/// the index's buyer list, de-duplicated.
#[derive(Debug, Clone)]
pub(crate) struct CompiledOffer {
    pub(crate) price: Option<f64>,
    pub(crate) transparency: Transparency,
    pub(crate) buyers: Vec<usize>,
}

#[derive(Debug, Clone)]
pub(crate) struct CompiledProduct {
    pub(crate) name: String,
    pub(crate) features: Vec<Feature>,
    pub(crate) offers: Vec<CompiledOffer>,
}

/// All products sharing one [`TierKey`]. Products keep table order, which
/// is never observable through the resolved price.
#[derive(Debug, Clone)]
pub(crate) struct Tier {
    pub(crate) key: TierKey,
    pub(crate) products: Vec<CompiledProduct>,
}
