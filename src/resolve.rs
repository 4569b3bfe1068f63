use std::time::Instant;

use crate::types::{all_match, CompiledOffer, CompiledProduct, ReportRecorder, Tier};
use crate::{Context, ResolutionReport, ResolveObserver, RuleIndex};

#[derive(Debug, Clone, Copy)]
struct Selection {
    offer: usize,
    price: Option<f64>,
    buyer_spec: usize,
}

impl Selection {
    /// Buyer specificity first, then price. An unpriced offer wins on
    /// specificity alone and never on price.
    fn beats(&self, other: &Selection) -> bool {
        if self.buyer_spec != other.buyer_spec {
            return self.buyer_spec > other.buyer_spec;
        }
        match (self.price, other.price) {
            (Some(price), Some(best)) => price > best,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }
}

pub(crate) fn resolve<O>(
    index: &RuleIndex,
    impression: &Context,
    buyer: &Context,
    observer: &mut O,
) -> Option<f64>
where
    O: ResolveObserver + ?Sized,
{
    // Tiers are pre-sorted by descending (priority, specificity).
    for tier in &index.tiers {
        observer.tier_entered(tier.key);
        let price = best_price_in_tier(index, tier, impression, buyer, observer);
        observer.tier_resolved(tier.key, price);
        if price.is_some() {
            return price;
        }
    }
    None
}

pub(crate) fn resolve_detailed(
    index: &RuleIndex,
    impression: &Context,
    buyer: &Context,
) -> ResolutionReport {
    let start = Instant::now();
    let mut recorder = ReportRecorder::default();
    let price = resolve(index, impression, buyer, &mut recorder);
    let duration = start.elapsed();
    ResolutionReport::new(
        price,
        recorder.winner,
        recorder.visited,
        recorder.matched,
        duration,
    )
}

fn best_price_in_tier<O>(
    index: &RuleIndex,
    tier: &Tier,
    impression: &Context,
    buyer: &Context,
    observer: &mut O,
) -> Option<f64>
where
    O: ResolveObserver + ?Sized,
{
    let mut best: Option<f64> = None;
    for product in &tier.products {
        if !all_match(&product.features, impression) {
            continue;
        }
        observer.product_matched(tier.key, &product.name);
        if let Some(selection) = select_offer(index, product, impression, buyer) {
            observer.offer_selected(
                &product.name,
                selection.offer,
                selection.price,
                selection.buyer_spec,
            );
            if let Some(price) = selection.price {
                if best.map_or(true, |b| price > b) {
                    best = Some(price);
                }
            }
        }
    }
    best
}

fn select_offer(
    index: &RuleIndex,
    product: &CompiledProduct,
    impression: &Context,
    buyer: &Context,
) -> Option<Selection> {
    let mut best: Option<Selection> = None;
    for (i, offer) in product.offers.iter().enumerate() {
        if !offer.transparency.matches(impression) {
            continue;
        }
        let Some(buyer_spec) = buyer_spec(index, offer, buyer) else {
            continue;
        };
        let candidate = Selection {
            offer: i,
            price: offer.price,
            buyer_spec,
        };
        if best.as_ref().map_or(true, |b| candidate.beats(b)) {
            best = Some(candidate);
        }
    }
    best
}

/// Specificity of the most specific buyer descriptor of `offer` that
/// matches, or `None` when none does.
fn buyer_spec(index: &RuleIndex, offer: &CompiledOffer, buyer: &Context) -> Option<usize> {
    offer
        .buyers
        .iter()
        .map(|&idx| &index.buyers[idx])
        .filter(|b| all_match(&b.features, buyer))
        .map(|b| b.specificity())
        .max()
}
