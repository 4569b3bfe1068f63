#![cfg(feature = "serde")]

use tierprice::{
    Context, LoadError, RuleIndex, RuleTable, TierKey, TierpriceError, Transparency, Value,
};

const MARKETPLACE: &str = r#"{
    "buyers": [
        { "name": "metrigo", "features": [ { "feature": "dsp", "in": [1] } ] },
        { "name": "other", "features": [
            { "feature": "agency", "in": [2] },
            { "feature": "dsp", "in": [1] }
        ] }
    ],
    "buyer-segments": [
        { "name": "adwords", "buyers": ["metrigo"] },
        { "name": "other", "buyers": ["other"] }
    ],
    "products": [
        {
            "name": "rule",
            "product_features": [ { "feature": "adformat", "in": ["460x100"] } ],
            "offers": [
                { "price": 1.3, "transparency": "blind", "buyer-segments": ["adwords"] }
            ]
        },
        {
            "name": "rule2",
            "product_features": [
                { "feature": "adformat", "in": ["460x100"] },
                { "feature": "country", "in": ["DE"] }
            ],
            "offers": [
                { "price": 3.4, "transparency": "blind", "buyer-segments": ["adwords"] },
                { "price": 4.4, "transparency": "open", "buyer-segments": ["adwords"] },
                { "price": 4.3, "transparency": "open", "buyer-segments": ["other"] }
            ]
        },
        {
            "name": "czech",
            "priority": 2,
            "product_features": [
                { "feature": "adformat", "in": ["460x100"] },
                { "feature": "country", "in": ["CZ"] }
            ],
            "offers": [
                { "price": 2.2, "transparency": "blind", "buyer-segments": ["adwords"] },
                { "price": null, "transparency": "open", "buyer-segments": ["adwords"] }
            ]
        }
    ]
}"#;

fn impression(transparency: &str, country: Option<&str>) -> Context {
    let ctx = Context::new()
        .set("adformat", "460x100")
        .set("transparency", transparency);
    match country {
        Some(c) => ctx.set("country", c),
        None => ctx,
    }
}

#[test]
fn parses_table_shape() {
    let table: RuleTable = serde_json::from_str(MARKETPLACE).unwrap();
    assert_eq!(table.buyers.len(), 2);
    assert_eq!(table.buyers[1].features[0].allowed, vec![Value::Int(2)]);
    assert_eq!(table.segments[0].buyers, vec!["metrigo".to_owned()]);
    assert_eq!(table.products[2].priority, Some(Value::Int(2)));
    assert_eq!(table.products[0].priority, None);
    assert_eq!(table.products[1].offers[1].transparency, Transparency::Open);
    assert_eq!(table.products[2].offers[1].price, None);
}

#[test]
fn resolves_scenarios_from_json() {
    let index = RuleIndex::from_json(MARKETPLACE).unwrap();
    let dsp = Context::new().set("dsp", 1_i64);
    let dsp_agency = Context::new().set("dsp", 1_i64).set("agency", 2_i64);

    assert_eq!(index.resolve(&impression("blind", None), &dsp), Some(1.3));
    assert_eq!(index.resolve(&impression("blind", Some("DE")), &dsp), Some(3.4));
    assert_eq!(index.resolve(&impression("open", Some("DE")), &dsp), Some(4.4));
    assert_eq!(index.resolve(&impression("open", Some("DE")), &dsp_agency), Some(4.3));
    assert_eq!(index.resolve(&impression("blind", Some("CZ")), &dsp), Some(2.2));
    assert_eq!(index.tier_order()[0], TierKey::new(2, 2));
}

#[test]
fn unpriced_offer_in_priority_tier_falls_back() {
    let index = RuleIndex::from_json(MARKETPLACE).unwrap();
    let dsp = Context::new().set("dsp", 1_i64);
    // The open CZ offer has no price, so the one-feature tier answers; it only
    // sells blind inventory, leaving nothing.
    assert_eq!(index.resolve(&impression("open", Some("CZ")), &dsp), None);
}

#[test]
fn serialize_round_trip_preserves_resolution() {
    let table: RuleTable = serde_json::from_str(MARKETPLACE).unwrap();
    let json = serde_json::to_string(&table).unwrap();
    let reparsed: RuleTable = serde_json::from_str(&json).unwrap();
    assert_eq!(table, reparsed);
}

#[test]
fn dangling_segment_is_load_error() {
    let input = r#"{
        "products": [
            { "name": "p", "offers": [
                { "price": 1.0, "transparency": "open", "buyer-segments": ["nope"] }
            ] }
        ]
    }"#;
    let err = RuleIndex::from_json(input).unwrap_err();
    assert!(matches!(
        err,
        TierpriceError::Load(LoadError::UndefinedSegment { ref segment, .. }) if segment == "nope"
    ));
}

#[test]
fn fractional_priority_is_load_error() {
    let input = r#"{ "products": [ { "name": "p", "priority": 1.5 } ] }"#;
    let err = RuleIndex::from_json(input).unwrap_err();
    assert!(matches!(
        err,
        TierpriceError::Load(LoadError::InvalidPriority { .. })
    ));
}

#[test]
fn string_priority_is_load_error() {
    let input = r#"{ "products": [ { "name": "p", "priority": "high" } ] }"#;
    let err = RuleIndex::from_json(input).unwrap_err();
    assert!(matches!(
        err,
        TierpriceError::Load(LoadError::InvalidPriority { .. })
    ));
}

#[test]
fn unknown_transparency_is_parse_error() {
    let input = r#"{ "products": [ { "name": "p", "offers": [
        { "price": 1.0, "transparency": "translucent", "buyer-segments": [] }
    ] } ] }"#;
    let err = RuleIndex::from_json(input).unwrap_err();
    assert!(matches!(err, TierpriceError::Json(_)));
    assert!(err.to_string().starts_with("malformed rule table"));
}

#[test]
fn missing_file_is_io_error() {
    let err = RuleIndex::from_file("/nonexistent/rules.json").unwrap_err();
    assert!(matches!(err, TierpriceError::Io(_)));
}

#[test]
fn from_file_reads_table() {
    let path = std::env::temp_dir().join(format!("tierprice-{}.json", std::process::id()));
    std::fs::write(&path, MARKETPLACE).unwrap();
    let index = RuleIndex::from_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(index.len(), 3);
}
