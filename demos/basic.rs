use tierprice::{feature, Context, RuleTableBuilder, Transparency};

fn main() {
    // Define buyers, segments and priced products
    let index = RuleTableBuilder::new()
        .buyer("metrigo", [feature("dsp").eq(1_i64)])
        .segment("adwords", ["metrigo"])
        .product("banner", |p| {
            p.when(feature("adformat").eq("460x100"))
                .offer(Transparency::Blind, |o| o.price(1.3).segment("adwords"))
        })
        .product("banner_de", |p| {
            p.when(feature("adformat").eq("460x100"))
                .when(feature("country").eq("DE"))
                .offer(Transparency::Blind, |o| o.price(3.4).segment("adwords"))
        })
        .compile()
        .expect("failed to compile rule table");

    println!("{index}");

    let buyer = Context::new().set("dsp", 1_i64);
    for country in ["DE", "FR"] {
        let impression = Context::new()
            .set("adformat", "460x100")
            .set("transparency", "blind")
            .set("country", country);

        match index.resolve(&impression, &buyer) {
            Some(price) => println!("{country}: {price}"),
            None => println!("{country}: no applicable rule"),
        }
    }
}
