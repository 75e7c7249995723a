use criterion::{black_box, criterion_group, criterion_main, Criterion};
use datafutures_crypto::{MarkerCodec, SealedCodec, ValueCodec};

fn ed25519_sign_bench(c: &mut Criterion) {
    let kp = datafutures_crypto::generate_keypair();
    let msg = [42u8; 2128];

    c.bench_function("ed25519_sign_challenge", |b| {
        b.iter(|| datafutures_crypto::sign_message(black_box(&msg), &kp.private))
    });
}

fn ed25519_verify_bench(c: &mut Criterion) {
    let kp = datafutures_crypto::generate_keypair();
    let msg = [42u8; 2128];
    let sig = datafutures_crypto::sign_message(&msg, &kp.private);

    c.bench_function("ed25519_verify_challenge", |b| {
        b.iter(|| datafutures_crypto::verify_signature(black_box(&msg), &sig, &kp.public))
    });
}

fn marker_codec_bench(c: &mut Criterion) {
    let token = MarkerCodec.encode(23.5).unwrap();

    c.bench_function("marker_encode", |b| {
        b.iter(|| MarkerCodec.encode(black_box(23.5)))
    });
    c.bench_function("marker_decode", |b| {
        b.iter(|| MarkerCodec.decode(black_box(&token)))
    });
}

fn sealed_codec_bench(c: &mut Criterion) {
    let codec = SealedCodec::new(b"bench secret").unwrap();
    let token = codec.encode(23.5).unwrap();

    c.bench_function("sealed_encode", |b| b.iter(|| codec.encode(black_box(23.5))));
    c.bench_function("sealed_decode", |b| b.iter(|| codec.decode(black_box(&token))));
}

fn session_key_bench(c: &mut Criterion) {
    c.bench_function("session_key_generate", |b| {
        b.iter(datafutures_crypto::generate_session_key)
    });
}

criterion_group!(
    benches,
    ed25519_sign_bench,
    ed25519_verify_bench,
    marker_codec_bench,
    sealed_codec_bench,
    session_key_bench,
);
criterion_main!(benches);
