use std::sync::Arc;
use std::thread;

use tierprice::{feature, Context, IndexHandle, RuleIndex, RuleTableBuilder, Transparency};

fn rules(price: f64) -> RuleIndex {
    RuleTableBuilder::new()
        .buyer("metrigo", [feature("dsp").eq(1_i64)])
        .segment("adwords", ["metrigo"])
        .product("banner", |p| {
            p.when(feature("adformat").eq("460x100"))
                .offer(Transparency::Open, |o| o.price(price).segment("adwords"))
        })
        .compile()
        .expect("failed to compile rule table")
}

fn main() {
    let handle = Arc::new(IndexHandle::new(rules(1.0)));

    let workers: Vec<_> = (0..4)
        .map(|i| {
            let handle = Arc::clone(&handle);
            thread::spawn(move || {
                let impression = Context::new()
                    .set("adformat", "460x100")
                    .set("transparency", "open");
                let buyer = Context::new().set("dsp", 1_i64);
                let price = handle.load().resolve(&impression, &buyer);
                println!("Worker {i}: {price:?}");
            })
        })
        .collect();

    // Reload: publish a freshly compiled index; workers holding the old
    // snapshot finish against it.
    handle.publish(rules(1.5));

    for w in workers {
        w.join().unwrap();
    }
    println!("After reload: {}", handle.load());
}
