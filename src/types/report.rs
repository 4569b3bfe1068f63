use std::fmt;
use std::time::Duration;

use super::observer::ResolveObserver;
use super::tier::TierKey;

/// The product and offer that produced a resolved price.
#[derive(Debug, Clone, PartialEq)]
pub struct Winner {
    pub product: String,
    pub tier: TierKey,
    pub offer: usize,
    pub buyer_spec: usize,
}

/// Detailed resolution report returned by
/// [`RuleIndex::resolve_detailed()`](super::RuleIndex::resolve_detailed).
#[derive(Debug, Clone)]
#[must_use]
pub struct ResolutionReport {
    price: Option<f64>,
    winner: Option<Winner>,
    visited: Vec<TierKey>,
    matched: Vec<String>,
    duration: Duration,
}

impl ResolutionReport {
    pub(crate) fn new(
        price: Option<f64>,
        winner: Option<Winner>,
        visited: Vec<TierKey>,
        matched: Vec<String>,
        duration: Duration,
    ) -> Self {
        Self {
            price,
            winner,
            visited,
            matched,
            duration,
        }
    }

    /// The resolved price, same as [`RuleIndex::resolve()`](super::RuleIndex::resolve).
    #[must_use]
    pub fn price(&self) -> Option<f64> {
        self.price
    }

    #[must_use]
    pub fn winner(&self) -> Option<&Winner> {
        self.winner.as_ref()
    }

    /// Tiers evaluated, in visit order. The last one produced the price.
    #[must_use]
    pub fn visited(&self) -> &[TierKey] {
        &self.visited
    }

    /// Products whose features matched the impression, in visit order.
    #[must_use]
    pub fn matched(&self) -> &[String] {
        &self.matched
    }

    /// Wall-clock duration of the resolution.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl fmt::Display for ResolutionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.price, &self.winner) {
            (Some(p), Some(w)) => write!(f, "price: {p} from '{}' {}", w.product, w.tier)?,
            (Some(p), None) => write!(f, "price: {p}")?,
            (None, _) => write!(f, "price: none")?,
        }
        write!(f, ", matched: [{}]", self.matched.join(", "))?;
        write!(f, ", duration: {:?}", self.duration)?;
        Ok(())
    }
}

/// Observer that accumulates the data of a [`ResolutionReport`].
#[derive(Debug, Default)]
pub(crate) struct ReportRecorder {
    pub(crate) visited: Vec<TierKey>,
    pub(crate) matched: Vec<String>,
    pub(crate) winner: Option<Winner>,
    current: Option<(Winner, f64)>,
}

impl ResolveObserver for ReportRecorder {
    fn tier_entered(&mut self, key: TierKey) {
        self.visited.push(key);
        self.current = None;
    }

    fn product_matched(&mut self, _key: TierKey, product: &str) {
        self.matched.push(product.to_owned());
    }

    fn offer_selected(
        &mut self,
        product: &str,
        offer: usize,
        price: Option<f64>,
        buyer_spec: usize,
    ) {
        let Some(price) = price else {
            return;
        };
        // Mirrors the resolver: the first product reaching the tier maximum wins.
        if self.current.as_ref().is_some_and(|(_, best)| price <= *best) {
            return;
        }
        let tier = self.visited.last().copied().unwrap_or(TierKey::new(0, 0));
        self.current = Some((
            Winner {
                product: product.to_owned(),
                tier,
                offer,
                buyer_spec,
            },
            price,
        ));
    }

    fn tier_resolved(&mut self, _key: TierKey, price: Option<f64>) {
        if price.is_some() {
            self.winner = self.current.take().map(|(w, _)| w);
        }
    }
}
