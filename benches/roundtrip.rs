extern crate criterion;
extern crate tiff_graph;

use criterion::{black_box, BenchmarkId, Criterion, Throughput};
use tiff_graph::Tiff;

fn load(data: &[u8]) -> Tiff {
    Tiff::load(std::io::Cursor::new(black_box(data))).unwrap()
}

fn main() {
    struct BenchDef {
        data: &'static [u8],
        id: &'static str,
        sample_size: usize,
    }

    let defs = [
        BenchDef {
            data: include_bytes!(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/tests/images/multipage.tif"
            )),
            id: "multipage.tif",
            sample_size: 500,
        },
        BenchDef {
            data: include_bytes!(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/tests/images/pyramid-exif-be.tif"
            )),
            id: "pyramid-exif-be.tif",
            sample_size: 500,
        },
    ];

    let mut c = Criterion::default().configure_from_args();

    let mut group = c.benchmark_group("tiff-load");
    for def in &defs {
        group
            .sample_size(def.sample_size)
            .throughput(Throughput::Bytes(def.data.len() as u64))
            .bench_with_input(
                BenchmarkId::new(def.id, def.data.len()),
                def.data,
                |b, input| b.iter(|| load(input)),
            );
    }
    group.finish();

    let mut group = c.benchmark_group("tiff-encode");
    for def in &defs {
        let tiff = load(def.data);
        group
            .sample_size(def.sample_size)
            .throughput(Throughput::Bytes(def.data.len() as u64))
            .bench_with_input(BenchmarkId::new(def.id, def.data.len()), &tiff, |b, tiff| {
                b.iter(|| tiff.clone().encode().unwrap())
            });
    }
    group.finish();

    c.final_summary();
}
