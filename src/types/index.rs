use std::fmt;

use super::context::Context;
use super::error::LoadError;
use super::feature::Feature;
use super::observer::ResolveObserver;
use super::report::ResolutionReport;
use super::table::{Buyer, Offer, Product, RuleTable, Segment, Transparency};
use super::tier::{CompiledBuyer, Tier, TierKey};
use super::value::Value;

/// Builder for constructing a [`RuleTable`] and compiling it into a
/// [`RuleIndex`].
///
/// # Example
///
/// ```
/// use tierprice::{feature, Context, RuleTableBuilder, Transparency};
///
/// let index = RuleTableBuilder::new()
///     .buyer("metrigo", [feature("dsp").eq(1_i64)])
///     .segment("adwords", ["metrigo"])
///     .product("rule", |p| {
///         p.when(feature("adformat").eq("460x100"))
///             .offer(Transparency::Blind, |o| o.price(1.3).segment("adwords"))
///     })
///     .compile()
///     .unwrap();
///
/// let impression = Context::new()
///     .set("adformat", "460x100")
///     .set("transparency", "blind");
/// let buyer = Context::new().set("dsp", 1_i64);
/// assert_eq!(index.resolve(&impression, &buyer), Some(1.3));
/// ```
#[derive(Debug, Default)]
pub struct RuleTableBuilder {
    table: RuleTable,
}

/// Intermediate builder passed to the product definition closure.
#[derive(Debug)]
pub struct ProductBuilder {
    priority: Option<Value>,
    features: Vec<Feature>,
    offers: Vec<Offer>,
}

/// Intermediate builder passed to the offer definition closure.
#[derive(Debug)]
pub struct OfferBuilder {
    offer: Offer,
}

impl RuleTableBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a buyer descriptor from the features that must all match.
    #[must_use]
    pub fn buyer(mut self, name: &str, features: impl IntoIterator<Item = Feature>) -> Self {
        self.table.buyers.push(Buyer {
            name: name.to_owned(),
            features: features.into_iter().collect(),
        });
        self
    }

    /// Define a buyer segment grouping the named buyers.
    #[must_use]
    pub fn segment<'a>(mut self, name: &str, buyers: impl IntoIterator<Item = &'a str>) -> Self {
        self.table.segments.push(Segment {
            name: name.to_owned(),
            buyers: buyers.into_iter().map(str::to_owned).collect(),
        });
        self
    }

    /// Define a product. The closure adds product features and offers.
    #[must_use]
    pub fn product(mut self, name: &str, f: impl FnOnce(ProductBuilder) -> ProductBuilder) -> Self {
        let builder = f(ProductBuilder {
            priority: None,
            features: Vec::new(),
            offers: Vec::new(),
        });
        self.table.products.push(Product {
            name: name.to_owned(),
            priority: builder.priority,
            product_features: builder.features,
            offers: builder.offers,
        });
        self
    }

    /// Finish building without validating.
    #[must_use]
    pub fn into_table(self) -> RuleTable {
        self.table
    }

    /// Compile the table into an immutable `RuleIndex`.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if validation fails.
    pub fn compile(self) -> Result<RuleIndex, LoadError> {
        crate::compile::compile(&self.table)
    }
}

impl ProductBuilder {
    /// Set the product priority. Validated at compile time.
    #[must_use]
    pub fn priority(mut self, priority: impl Into<Value>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    /// Add a product feature predicate.
    #[must_use]
    pub fn when(mut self, feature: Feature) -> Self {
        self.features.push(feature);
        self
    }

    #[must_use]
    pub fn offer(
        mut self,
        transparency: Transparency,
        f: impl FnOnce(OfferBuilder) -> OfferBuilder,
    ) -> Self {
        let builder = f(OfferBuilder {
            offer: Offer {
                price: None,
                transparency,
                segments: Vec::new(),
            },
        });
        self.offers.push(builder.offer);
        self
    }
}

impl OfferBuilder {
    #[must_use]
    pub fn price(mut self, price: f64) -> Self {
        self.offer.price = Some(price);
        self
    }

    /// Reference a buyer segment by name.
    #[must_use]
    pub fn segment(mut self, name: &str) -> Self {
        self.offer.segments.push(name.to_owned());
        self
    }
}

impl RuleTable {
    /// Validate and compile this table.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] on dangling references, duplicate names,
    /// malformed priorities or malformed prices.
    pub fn compile(&self) -> Result<RuleIndex, LoadError> {
        crate::compile::compile(self)
    }
}

/// A compiled, immutable rule index. Thread-safe and designed to live
/// behind `Arc`; to change rules, compile a new index and swap it in.
#[derive(Debug)]
pub struct RuleIndex {
    /// Sorted by descending [`TierKey`].
    pub(crate) tiers: Vec<Tier>,
    pub(crate) buyers: Vec<CompiledBuyer>,
}

impl RuleIndex {
    /// Compile a raw table. Same as [`RuleTable::compile`].
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if validation fails.
    pub fn compile(table: &RuleTable) -> Result<Self, LoadError> {
        crate::compile::compile(table)
    }

    /// Resolve the price for an impression and a buyer.
    ///
    /// Returns the best price of the highest tier that produces one, or
    /// `None` if no product and offer match.
    #[must_use]
    pub fn resolve(&self, impression: &Context, buyer: &Context) -> Option<f64> {
        crate::resolve::resolve(self, impression, buyer, &mut ())
    }

    /// Resolve while reporting decision points to `observer`.
    pub fn resolve_with<O>(
        &self,
        impression: &Context,
        buyer: &Context,
        observer: &mut O,
    ) -> Option<f64>
    where
        O: ResolveObserver + ?Sized,
    {
        crate::resolve::resolve(self, impression, buyer, observer)
    }

    /// Resolve with diagnostics: winning product and tier, visited tiers,
    /// matched products and timing.
    pub fn resolve_detailed(&self, impression: &Context, buyer: &Context) -> ResolutionReport {
        crate::resolve::resolve_detailed(self, impression, buyer)
    }

    /// Tier keys in the order resolution visits them.
    #[must_use]
    pub fn tier_order(&self) -> Vec<TierKey> {
        self.tiers.iter().map(|t| t.key).collect()
    }

    /// Names of the products in the tier with the given key.
    ///
    /// Returns `None` if no such tier exists.
    #[must_use]
    pub fn products_in(&self, key: TierKey) -> Option<Vec<&str>> {
        self.tiers
            .iter()
            .find(|t| t.key == key)
            .map(|t| t.products.iter().map(|p| p.name.as_str()).collect())
    }

    /// Names of the buyers defined in the table, in table order.
    #[must_use]
    pub fn buyer_names(&self) -> Vec<&str> {
        self.buyers.iter().map(|b| b.name.as_str()).collect()
    }

    /// Total number of products across all tiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiers.iter().map(|t| t.products.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }
}

#[cfg(feature = "serde")]
impl RuleIndex {
    /// Parse a JSON rule table and compile it.
    ///
    /// # Errors
    ///
    /// Returns [`TierpriceError`](crate::TierpriceError) on parse or load failure.
    pub fn from_json(input: &str) -> Result<Self, crate::TierpriceError> {
        let table: RuleTable = serde_json::from_str(input)?;
        Ok(crate::compile::compile(&table)?)
    }

    /// Read a JSON rule table from a file and compile it.
    ///
    /// # Errors
    ///
    /// Returns [`TierpriceError`](crate::TierpriceError) on I/O, parse or load failure.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, crate::TierpriceError> {
        let input = std::fs::read_to_string(path)?;
        Self::from_json(&input)
    }
}

impl fmt::Display for RuleIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RuleIndex({} products, {} tiers, {} buyers)",
            self.len(),
            self.tiers.len(),
            self.buyers.len(),
        )
    }
}
