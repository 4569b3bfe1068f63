use std::fmt;

use super::{Context, Feature, Value};

/// Context key the impression uses to carry its transparency.
pub const TRANSPARENCY: &str = "transparency";

/// How much of the seller's identity is disclosed to the buyer.
/// Offers match an impression on exact equality only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Transparency {
    Blind,
    Open,
}

impl Transparency {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Transparency::Blind => "blind",
            Transparency::Open => "open",
        }
    }

    /// Compare against the impression's [`TRANSPARENCY`] value. A missing or
    /// non-string value never matches.
    #[must_use]
    pub fn matches(self, impression: &Context) -> bool {
        impression
            .get(TRANSPARENCY)
            .and_then(Value::as_str)
            .is_some_and(|observed| observed == self.as_str())
    }
}

impl fmt::Display for Transparency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named buyer descriptor: every feature must match the buyer's request
/// features for the descriptor to match.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Buyer {
    pub name: String,
    pub features: Vec<Feature>,
}

/// A named group of buyers. Offers reference segments, never buyers directly.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Segment {
    pub name: String,
    pub buyers: Vec<String>,
}

/// A priced leaf under a [`Product`], gated by transparency and buyer
/// segment membership. Offers without a price never win.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Offer {
    #[cfg_attr(feature = "serde", serde(default))]
    pub price: Option<f64>,
    pub transparency: Transparency,
    #[cfg_attr(feature = "serde", serde(rename = "buyer-segments"))]
    pub segments: Vec<String>,
}

/// A priced rule. `priority` is validated at compile time; absent means 0.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Product {
    pub name: String,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub priority: Option<Value>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub product_features: Vec<Feature>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub offers: Vec<Offer>,
}

impl Product {
    /// Number of product feature predicates.
    #[must_use]
    pub fn specificity(&self) -> usize {
        self.product_features.len()
    }
}

/// The raw, unvalidated rule table. Compile it into a
/// [`RuleIndex`](super::RuleIndex) before resolving prices.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RuleTable {
    #[cfg_attr(feature = "serde", serde(default))]
    pub buyers: Vec<Buyer>,
    #[cfg_attr(feature = "serde", serde(default, rename = "buyer-segments"))]
    pub segments: Vec<Segment>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub products: Vec<Product>,
}
