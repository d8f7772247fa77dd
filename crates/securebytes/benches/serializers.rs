// Encrypt + decrypt benchmarks for securebytes.
//
// Mirrors the per-serializer base64 round trip of the session record, plus a
// raw 1 KiB seal/open without serialization.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde::{Deserialize, Serialize};

use securebytes::{SecureBytes, Serializer};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Message {
    user_id: i64,
    message: String,
}

fn bench_base64_round_trip(c: &mut Criterion) {
    let secret = Message {
        user_id: 123_123_123,
        message: "secret".into(),
    };
    let mut group = c.benchmark_group("securebytes/base64_round_trip");
    for serializer in [Serializer::Json, Serializer::Binary, Serializer::Tlv] {
        let sb = SecureBytes::new(b"").with_serializer(serializer);
        group.bench_with_input(
            BenchmarkId::from_parameter(serializer),
            &secret,
            |b, secret| {
                b.iter(|| {
                    let text = sb.encrypt_to_base64(black_box(secret)).unwrap();
                    sb.decrypt_base64::<Message>(&text).unwrap()
                });
            },
        );
    }
    group.finish();
}

fn bench_raw_round_trip(c: &mut Criterion) {
    let sb = SecureBytes::new(b"");
    let data = vec![0x5Au8; 1024];
    let mut group = c.benchmark_group("securebytes/raw");
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_function("seal_open_1k", |b| {
        b.iter(|| {
            let blob = sb.raw_encrypt(black_box(&data)).unwrap();
            sb.raw_decrypt(&blob).unwrap()
        });
    });
    group.finish();
}

criterion_group!(benches, bench_base64_round_trip, bench_raw_round_trip);
criterion_main!(benches);
