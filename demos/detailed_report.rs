use tierprice::{feature, Context, RuleTableBuilder, TracingObserver, Transparency};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tierprice=trace")),
        )
        .init();

    let index = RuleTableBuilder::new()
        .buyer("metrigo", [feature("dsp").eq(1_i64)])
        .buyer("other", [feature("agency").eq(2_i64), feature("dsp").eq(1_i64)])
        .segment("adwords", ["metrigo"])
        .segment("other", ["other"])
        .product("rule", |p| {
            p.when(feature("adformat").eq("460x100"))
                .offer(Transparency::Blind, |o| o.price(1.3).segment("adwords"))
        })
        .product("rule2", |p| {
            p.when(feature("adformat").eq("460x100"))
                .when(feature("country").eq("DE"))
                .offer(Transparency::Blind, |o| o.price(3.4).segment("adwords"))
                .offer(Transparency::Open, |o| o.price(4.4).segment("adwords"))
                .offer(Transparency::Open, |o| o.price(4.3).segment("other"))
        })
        .compile()
        .expect("failed to compile rule table");

    let impression = Context::new()
        .set("adformat", "460x100")
        .set("transparency", "open")
        .set("country", "DE");
    let buyer = Context::new().set("dsp", 1_i64).set("agency", 2_i64);

    // Decision path as tracing events
    let price = index.resolve_with(&impression, &buyer, &mut TracingObserver::new());
    println!("Traced price: {price:?}");

    let report = index.resolve_detailed(&impression, &buyer);
    println!("{report}");
    println!();
    println!("Visited tiers: {:?}", report.visited());
    println!("Matched products: {:?}", report.matched());
    println!("Winner: {:?}", report.winner());
    println!("Duration: {:?}", report.duration());
}
