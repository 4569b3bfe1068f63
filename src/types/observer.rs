use super::tier::TierKey;

/// Hook invoked by the resolver at its decision points.
///
/// Every method has an empty default, so implementors only override the
/// events they care about. Observers see the decision path; they cannot
/// influence the resolved price.
pub trait ResolveObserver {
    /// A tier is about to be evaluated.
    fn tier_entered(&mut self, _key: TierKey) {}

    /// A product's features all matched the impression.
    fn product_matched(&mut self, _key: TierKey, _product: &str) {}

    /// The best offer of a matched product was chosen.
    /// `offer` is the offer's position within the product; `price` is `None`
    /// when the winning offer is unpriced, leaving the product without a price.
    fn offer_selected(
        &mut self,
        _product: &str,
        _offer: usize,
        _price: Option<f64>,
        _buyer_spec: usize,
    ) {
    }

    /// A tier finished; `price` is the best price it produced, if any.
    fn tier_resolved(&mut self, _key: TierKey, _price: Option<f64>) {}
}

/// Silent observer used by [`RuleIndex::resolve`](super::RuleIndex::resolve).
impl ResolveObserver for () {}
