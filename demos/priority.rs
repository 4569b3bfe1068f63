use tierprice::{feature, Context, RuleTableBuilder, Transparency};

fn main() {
    // Priority outranks specificity: the priority-2 rule is consulted before
    // the more specific priority-1 rule.
    let index = RuleTableBuilder::new()
        .buyer("metrigo", [feature("dsp").eq(1_i64)])
        .segment("adwords", ["metrigo"])
        .product("czech_campaign", |p| {
            p.priority(2_i64)
                .when(feature("adformat").eq("460x100"))
                .when(feature("country").eq("CZ"))
                .offer(Transparency::Blind, |o| o.price(2.2).segment("adwords"))
        })
        .product("czech_mobile", |p| {
            p.priority(1_i64)
                .when(feature("adformat").eq("460x100"))
                .when(feature("country").eq("CZ"))
                .when(feature("device").eq("mobile"))
                .offer(Transparency::Blind, |o| o.price(9.9).segment("adwords"))
        })
        .compile()
        .expect("failed to compile rule table");

    for key in index.tier_order() {
        println!("tier {key}: {:?}", index.products_in(key).unwrap_or_default());
    }

    let impression = Context::new()
        .set("adformat", "460x100")
        .set("transparency", "blind")
        .set("country", "CZ")
        .set("device", "mobile");
    let buyer = Context::new().set("dsp", 1_i64);

    match index.resolve(&impression, &buyer) {
        Some(price) => println!("Czech mobile impression: {price}"),
        None => println!("Czech mobile impression: no applicable rule"),
    }
}
