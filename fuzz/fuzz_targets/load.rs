#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut limits = tiff_graph::decoder::Limits::default();
    limits.ifd_value_size = 1_000_000;
    limits.strip_size = 1_000_000;
    limits.max_directories = 4096;

    let _ = tiff_graph::Tiff::load_with_limits(std::io::Cursor::new(data), limits);
});
