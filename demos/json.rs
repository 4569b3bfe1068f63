use tierprice::{Context, RuleIndex};

const RULES: &str = r#"{
    "buyers": [ { "name": "metrigo", "features": [ { "feature": "dsp", "in": [1] } ] } ],
    "buyer-segments": [ { "name": "adwords", "buyers": ["metrigo"] } ],
    "products": [
        {
            "name": "rule",
            "product_features": [ { "feature": "adformat", "in": ["460x100"] } ],
            "offers": [ { "price": 1.3, "transparency": "blind", "buyer-segments": ["adwords"] } ]
        }
    ]
}"#;

fn main() {
    let index = RuleIndex::from_json(RULES).expect("failed to load rule table");

    let impression = Context::new()
        .set("adformat", "460x100")
        .set("transparency", "blind");
    let buyer = Context::new().set("dsp", 1_i64);
    println!("{index}: {:?}", index.resolve(&impression, &buyer));

    match RuleIndex::from_json(r#"{ "products": [ { "name": "p", "priority": -1 } ] }"#) {
        Ok(_) => println!("unexpectedly loaded"),
        Err(err) => println!("rejected: {err}"),
    }
}
