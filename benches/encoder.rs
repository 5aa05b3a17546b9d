#[macro_use]
extern crate criterion;

use bvon::prelude::*;
use criterion::{black_box, Criterion};

const N_ARR: usize = 10;
const N_FIELDS: usize = 10;
const N_BIG_ARR: usize = 2000;

fn big_arr() -> Bvon {
    let v: Vec<Bvon> = (0..N_BIG_ARR).map(|i| Bvon::from(i as i64)).collect();
    Bvon::Array(v)
}

fn big_doc() -> Bvon {
    let row: VecMap<String, Bvon> = (0..N_FIELDS)
        .map(|i| {
            (
                format!("field{}", i),
                Bvon::Array((0..N_ARR).map(|n| Bvon::from(n as i64)).collect()),
            )
        })
        .collect();
    let rows: Vec<Bvon> = std::iter::repeat(Bvon::Object(row)).take(N_ARR).collect();
    Bvon::Array(rows)
}

fn bench_enc(c: &mut Criterion) {
    let doc = big_doc();
    let enc_len = serialize(&doc).unwrap().len();
    c.bench_function(
        &format!("Encoding a Bvon object, output size of {} bytes", enc_len),
        move |b| b.iter(|| serialize(black_box(&doc)).unwrap()),
    );
}

fn bench_enc_reused_buffer(c: &mut Criterion) {
    let doc = big_doc();
    let enc_len = serialize(&doc).unwrap().len();
    c.bench_function(
        &format!(
            "Encoding a Bvon object, output size of {} bytes, buffer reused",
            enc_len
        ),
        move |b| {
            let mut writer = Writer::with_capacity(enc_len * 2);
            b.iter(|| {
                writer.write(black_box(&doc)).unwrap().len()
            })
        },
    );
}

fn bench_enc_with_schema(c: &mut Criterion) {
    let doc = big_doc();
    let schema = Schema::build(&doc);
    let enc_len = serialize_with(&doc, &schema).unwrap().len();
    c.bench_function(
        &format!(
            "Encoding a Bvon object against a schema, output size of {} bytes",
            enc_len
        ),
        move |b| {
            let mut writer = Writer::with_capacity(enc_len * 2);
            b.iter(|| {
                writer.write_with(black_box(&doc), &schema).unwrap().len()
            })
        },
    );
}

fn bench_dec(c: &mut Criterion) {
    let enc = serialize(&big_doc()).unwrap();
    c.bench_function(
        &format!("Decoding a Bvon object, input size of {} bytes", enc.len()),
        move |b| b.iter(|| deserialize(black_box(&enc)).unwrap()),
    );
}

fn bench_enc_flat(c: &mut Criterion) {
    let arr = big_arr();
    let enc_len = serialize(&arr).unwrap().len();
    c.bench_function(
        &format!("Encoding a Bvon vector, output size of {} bytes", enc_len),
        move |b| b.iter(|| serialize(black_box(&arr)).unwrap()),
    );
}

fn bench_dec_flat(c: &mut Criterion) {
    let enc = serialize(&big_arr()).unwrap();
    c.bench_function(
        &format!("Decoding a Bvon vector of length {}", enc.len()),
        move |b| b.iter(|| deserialize(black_box(&enc)).unwrap()),
    );
}

criterion_group!(
    benches,
    bench_enc,
    bench_enc_reused_buffer,
    bench_enc_with_schema,
    bench_dec,
    bench_enc_flat,
    bench_dec_flat
);
criterion_main!(benches);
