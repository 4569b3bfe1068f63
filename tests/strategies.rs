use proptest::prelude::*;
use tierprice::{feature, Context, Feature, RuleIndex, RuleTableBuilder, Transparency, Value};

// --- Fixed feature schema ---
// impression: adformat, country, device (strings), transparency ("blind" | "open")
// buyer:      dsp (1..=3), agency (1..=3)
//
// Buyers are fixed: "dsp{d}" matches on dsp alone, "dsp{d}_agency{a}" on both.
// Every buyer has a segment of the same name prefixed with "seg_".

pub const ADFORMATS: &[&str] = &["460x100", "300x250", "728x90"];
pub const COUNTRIES: &[&str] = &["DE", "CZ", "FR"];
pub const DEVICES: &[&str] = &["mobile", "desktop"];
pub const PRODUCT_FEATURES: &[(&str, &[&str])] = &[
    ("adformat", ADFORMATS),
    ("country", COUNTRIES),
    ("device", DEVICES),
];

pub fn buyer_names() -> Vec<String> {
    let mut names = Vec::new();
    for d in 1..=3 {
        names.push(format!("dsp{d}"));
        for a in 1..=3 {
            names.push(format!("dsp{d}_agency{a}"));
        }
    }
    names
}

fn buyer_features(name: &str) -> Vec<Feature> {
    let mut features = Vec::new();
    for part in name.split('_') {
        if let Some(d) = part.strip_prefix("dsp") {
            features.push(feature("dsp").eq(d.parse::<i64>().unwrap()));
        } else if let Some(a) = part.strip_prefix("agency") {
            features.push(feature("agency").eq(a.parse::<i64>().unwrap()));
        }
    }
    features
}

fn transparency_str(t: Transparency) -> &'static str {
    match t {
        Transparency::Blind => "blind",
        Transparency::Open => "open",
    }
}

#[derive(Debug, Clone)]
pub struct GenOffer {
    pub price: Option<f64>,
    pub transparency: Transparency,
    pub buyer: String,
}

#[derive(Debug, Clone)]
pub struct GenProduct {
    pub name: String,
    pub priority: u32,
    pub features: Vec<Feature>,
    pub offers: Vec<GenOffer>,
}

#[derive(Debug, Clone)]
pub struct GenTable {
    pub products: Vec<GenProduct>,
}

#[derive(Debug, Clone)]
pub struct GenRequest {
    pub impression: Context,
    pub buyer: Context,
}

impl GenTable {
    /// Compile into an actual `RuleIndex`.
    ///
    /// # Panics
    ///
    /// Panics if the generated table fails to compile (should not happen
    /// with valid generators).
    #[must_use]
    pub fn compile(&self) -> RuleIndex {
        let mut builder = RuleTableBuilder::new();
        for name in buyer_names() {
            builder = builder
                .buyer(&name, buyer_features(&name))
                .segment(&format!("seg_{name}"), [name.as_str()]);
        }
        for product in &self.products {
            let product = product.clone();
            let name = product.name.clone();
            builder = builder.product(&name, move |mut p| {
                p = p.priority(product.priority);
                for f in product.features {
                    p = p.when(f);
                }
                for offer in product.offers {
                    let segment = format!("seg_{}", offer.buyer);
                    p = p.offer(offer.transparency, |o| {
                        let o = o.segment(&segment);
                        match offer.price {
                            Some(price) => o.price(price),
                            None => o,
                        }
                    });
                }
                p
            });
        }
        builder.compile().expect("generated table should compile")
    }

    #[must_use]
    pub fn with(&self, product: GenProduct) -> GenTable {
        let mut products = self.products.clone();
        products.push(product);
        GenTable { products }
    }

    #[must_use]
    pub fn max_priority(&self) -> u32 {
        self.products.iter().map(|p| p.priority).max().unwrap_or(0)
    }
}

/// Independent brute-force reference for the resolved price.
#[must_use]
pub fn oracle(table: &GenTable, req: &GenRequest) -> Option<f64> {
    let mut best: Option<((u32, usize), f64)> = None;
    for product in &table.products {
        if !product.features.iter().all(|f| f.matches(&req.impression)) {
            continue;
        }
        let mut chosen: Option<(usize, Option<f64>)> = None;
        for offer in &product.offers {
            let transparency_ok = req.impression.get("transparency")
                == Some(&Value::from(transparency_str(offer.transparency)));
            let features = buyer_features(&offer.buyer);
            if !transparency_ok || !features.iter().all(|f| f.matches(&req.buyer)) {
                continue;
            }
            let candidate = (features.len(), offer.price);
            let replaces = match chosen {
                None => true,
                Some((spec, _)) if candidate.0 != spec => candidate.0 > spec,
                Some((_, held)) => match (candidate.1, held) {
                    (Some(p), Some(h)) => p > h,
                    (Some(_), None) => true,
                    (None, _) => false,
                },
            };
            if replaces {
                chosen = Some(candidate);
            }
        }
        if let Some((_, Some(price))) = chosen {
            let key = (product.priority, product.features.len());
            best = match best {
                Some((k, p)) if k > key || (k == key && p >= price) => Some((k, p)),
                _ => Some((key, price)),
            };
        }
    }
    best.map(|(_, price)| price)
}

/// Mostly priced; roughly one offer in six carries no price.
fn arb_price() -> impl Strategy<Value = Option<f64>> {
    prop::option::weighted(0.85, (0_u32..=1000).prop_map(|cents| f64::from(cents) / 100.0))
}

fn arb_transparency() -> impl Strategy<Value = Transparency> {
    prop_oneof![Just(Transparency::Blind), Just(Transparency::Open)]
}

pub fn arb_offer() -> impl Strategy<Value = GenOffer> {
    (arb_price(), arb_transparency(), prop::sample::select(buyer_names())).prop_map(
        |(price, transparency, buyer)| GenOffer {
            price,
            transparency,
            buyer,
        },
    )
}

/// A subset of the product features, each allowing a non-empty subset of
/// its values.
fn arb_product_features() -> impl Strategy<Value = Vec<Feature>> {
    prop::sample::subsequence(PRODUCT_FEATURES.to_vec(), 0..=PRODUCT_FEATURES.len()).prop_flat_map(
        |chosen| {
            chosen
                .into_iter()
                .map(|(name, values)| {
                    prop::sample::subsequence(values.to_vec(), 1..=values.len())
                        .prop_map(move |allowed| feature(name).is_in(allowed))
                })
                .collect::<Vec<_>>()
        },
    )
}

pub fn arb_product(name: String) -> impl Strategy<Value = GenProduct> {
    (
        0_u32..3,
        arb_product_features(),
        prop::collection::vec(arb_offer(), 0..=4),
    )
        .prop_map(move |(priority, features, offers)| GenProduct {
            name: name.clone(),
            priority,
            features,
            offers,
        })
}

pub fn arb_table() -> impl Strategy<Value = GenTable> {
    (1_usize..=8).prop_flat_map(|n| {
        (0..n)
            .map(|i| arb_product(format!("product_{i}")))
            .collect::<Vec<_>>()
            .prop_map(|products| GenTable { products })
    })
}

pub fn arb_request() -> impl Strategy<Value = GenRequest> {
    (
        prop::sample::select(ADFORMATS),
        prop::sample::select(COUNTRIES),
        prop::sample::select(DEVICES),
        arb_transparency(),
        1_i64..=3,
        prop::option::of(1_i64..=3),
    )
        .prop_map(|(adformat, country, device, transparency, dsp, agency)| {
            let impression = Context::new()
                .set("adformat", adformat)
                .set("country", country)
                .set("device", device)
                .set("transparency", transparency_str(transparency));
            let mut buyer = Context::new().set("dsp", dsp);
            if let Some(agency) = agency {
                buyer = buyer.set("agency", agency);
            }
            GenRequest { impression, buyer }
        })
}

/// The name of a one-feature buyer matched by `req`.
#[must_use]
pub fn matching_buyer(req: &GenRequest) -> String {
    match req.buyer.get("dsp") {
        Some(Value::Int(d)) => format!("dsp{d}"),
        _ => unreachable!("generated buyers always carry a dsp"),
    }
}

#[must_use]
pub fn impression_transparency(req: &GenRequest) -> Transparency {
    match req.impression.get("transparency").and_then(Value::as_str) {
        Some("open") => Transparency::Open,
        _ => Transparency::Blind,
    }
}

/// Product features not constrained by `product`, paired with the value the
/// impression carries for them.
#[must_use]
pub fn unconstrained_features(product: &GenProduct, req: &GenRequest) -> Vec<Feature> {
    PRODUCT_FEATURES
        .iter()
        .filter(|(name, _)| !product.features.iter().any(|f| f.name == *name))
        .filter_map(|(name, _)| {
            req.impression
                .get(name)
                .map(|v| feature(name).is_in([v.clone()]))
        })
        .collect()
}
