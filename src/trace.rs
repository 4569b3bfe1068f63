use crate::{ResolveObserver, TierKey};

/// Observer that emits each decision point as a `tracing` event.
///
/// Tier outcomes are logged at `debug`, per-product and per-offer detail at
/// `trace`. Nothing is emitted unless a subscriber is installed.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl TracingObserver {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ResolveObserver for TracingObserver {
    fn tier_entered(&mut self, key: TierKey) {
        tracing::trace!(
            priority = key.priority,
            specificity = key.specificity,
            "entering tier"
        );
    }

    fn product_matched(&mut self, key: TierKey, product: &str) {
        tracing::trace!(
            priority = key.priority,
            specificity = key.specificity,
            product,
            "product features matched impression"
        );
    }

    fn offer_selected(
        &mut self,
        product: &str,
        offer: usize,
        price: Option<f64>,
        buyer_spec: usize,
    ) {
        match price {
            Some(price) => tracing::trace!(product, offer, price, buyer_spec, "selected offer"),
            None => tracing::trace!(product, offer, buyer_spec, "selected unpriced offer"),
        }
    }

    fn tier_resolved(&mut self, key: TierKey, price: Option<f64>) {
        match price {
            Some(price) => tracing::debug!(
                priority = key.priority,
                specificity = key.specificity,
                price,
                "tier produced a price, stopping"
            ),
            None => tracing::debug!(
                priority = key.priority,
                specificity = key.specificity,
                "no matching offer in tier"
            ),
        }
    }
}
