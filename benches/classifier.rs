use criterion::{black_box, criterion_group, criterion_main, Criterion};
use walletwatch::event::classify;

fn bench_classify(c: &mut Criterion) {
    let progress = r#"{"type":"progress","processed":42,"total":100,"percentage":42,"wallet_address":"0x1234567890abcdef","purchases_found":3}"#;
    let alert = r#"{"type":"alert","alert":{"priority":"high","title":"Whale move","message":"Large buy detected","wallet":"0xfeed"}}"#;
    let unknown = r#"{"type":"heartbeat","uptime":1200}"#;
    let malformed = "not json at all";

    c.bench_function("classify_progress", |b| {
        b.iter(|| classify(black_box(progress)))
    });
    c.bench_function("classify_alert", |b| b.iter(|| classify(black_box(alert))));
    c.bench_function("classify_unknown", |b| {
        b.iter(|| classify(black_box(unknown)))
    });
    c.bench_function("classify_malformed", |b| {
        b.iter(|| classify(black_box(malformed)))
    });
}

criterion_group!(benches, bench_classify);
criterion_main!(benches);
