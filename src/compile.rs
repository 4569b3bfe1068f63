use std::collections::{BTreeMap, HashMap, HashSet};

use crate::types::{CompiledBuyer, CompiledOffer, CompiledProduct, Tier, TierKey};
use crate::{LoadError, Product, RuleIndex, RuleTable, Value};

pub(crate) fn compile(table: &RuleTable) -> Result<RuleIndex, LoadError> {
    check_duplicates(table)?;

    let buyer_indices: HashMap<&str, usize> = table
        .buyers
        .iter()
        .enumerate()
        .map(|(i, b)| (b.name.as_str(), i))
        .collect();

    let segments = resolve_segments(table, &buyer_indices)?;

    let mut grouped: BTreeMap<TierKey, Vec<CompiledProduct>> = BTreeMap::new();
    for product in &table.products {
        let key = TierKey::new(check_priority(product)?, product.specificity());
        let compiled = compile_product(product, &segments)?;
        grouped.entry(key).or_default().push(compiled);
    }

    // BTreeMap iterates ascending; tiers are visited highest key first.
    let tiers: Vec<Tier> = grouped
        .into_iter()
        .rev()
        .map(|(key, products)| Tier { key, products })
        .collect();

    for tier in &tiers {
        tracing::trace!(
            priority = tier.key.priority,
            specificity = tier.key.specificity,
            products = tier.products.len(),
            "built tier"
        );
    }
    tracing::debug!(
        products = table.products.len(),
        tiers = tiers.len(),
        buyers = table.buyers.len(),
        "compiled rule index"
    );

    let buyers = table
        .buyers
        .iter()
        .map(|b| CompiledBuyer {
            name: b.name.clone(),
            features: b.features.clone(),
        })
        .collect();

    Ok(RuleIndex { tiers, buyers })
}

fn check_duplicates(table: &RuleTable) -> Result<(), LoadError> {
    let mut seen = HashSet::new();
    for buyer in &table.buyers {
        if !seen.insert(buyer.name.as_str()) {
            return Err(LoadError::DuplicateBuyer {
                name: buyer.name.clone(),
            });
        }
    }

    let mut seen = HashSet::new();
    for segment in &table.segments {
        if !seen.insert(segment.name.as_str()) {
            return Err(LoadError::DuplicateSegment {
                name: segment.name.clone(),
            });
        }
    }

    let mut seen = HashSet::new();
    for product in &table.products {
        if !seen.insert(product.name.as_str()) {
            return Err(LoadError::DuplicateProduct {
                name: product.name.clone(),
            });
        }
    }
    Ok(())
}

/// Maps each segment name to the buyer indices of its members.
fn resolve_segments<'a>(
    table: &'a RuleTable,
    buyer_indices: &HashMap<&str, usize>,
) -> Result<HashMap<&'a str, Vec<usize>>, LoadError> {
    let mut segments = HashMap::with_capacity(table.segments.len());
    for segment in &table.segments {
        let members = segment
            .buyers
            .iter()
            .map(|buyer| {
                buyer_indices
                    .get(buyer.as_str())
                    .copied()
                    .ok_or_else(|| LoadError::UndefinedBuyer {
                        segment: segment.name.clone(),
                        buyer: buyer.clone(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        segments.insert(segment.name.as_str(), members);
    }
    Ok(segments)
}

/// Absent priority is 0. Integral floats are accepted; anything negative,
/// fractional, non-numeric or above `u32::MAX` is rejected.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn check_priority(product: &Product) -> Result<u32, LoadError> {
    let invalid = |value: &Value| LoadError::InvalidPriority {
        product: product.name.clone(),
        priority: value.to_string(),
    };
    match &product.priority {
        None => Ok(0),
        Some(value @ Value::Int(n)) => u32::try_from(*n).map_err(|_| invalid(value)),
        Some(value @ Value::Float(f)) => {
            if f.is_finite() && f.fract() == 0.0 && *f >= 0.0 && *f <= f64::from(u32::MAX) {
                Ok(*f as u32)
            } else {
                Err(invalid(value))
            }
        }
        Some(value) => Err(invalid(value)),
    }
}

fn compile_product(
    product: &Product,
    segments: &HashMap<&str, Vec<usize>>,
) -> Result<CompiledProduct, LoadError> {
    let offers = product
        .offers
        .iter()
        .enumerate()
        .map(|(i, offer)| {
            if let Some(price) = offer.price {
                if !price.is_finite() || price < 0.0 {
                    return Err(LoadError::InvalidPrice {
                        product: product.name.clone(),
                        offer: i,
                        price,
                    });
                }
            }

            let mut buyers = Vec::new();
            for segment in &offer.segments {
                let members =
                    segments
                        .get(segment.as_str())
                        .ok_or_else(|| LoadError::UndefinedSegment {
                            product: product.name.clone(),
                            offer: i,
                            segment: segment.clone(),
                        })?;
                for &idx in members {
                    if !buyers.contains(&idx) {
                        buyers.push(idx);
                    }
                }
            }

            Ok(CompiledOffer {
                price: offer.price,
                transparency: offer.transparency,
                buyers,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CompiledProduct {
        name: product.name.clone(),
        features: product.product_features.clone(),
        offers,
    })
}
