#![no_main]
use libfuzzer_sys::fuzz_target;

use tiff_graph::decoder::Limits;
use tiff_graph::{Tiff, TiffError, TiffFormatError};

fuzz_target!(|data: &[u8]| {
    let mut limits = Limits::default();
    limits.ifd_value_size = 1_000_000;
    limits.strip_size = 1_000_000;
    limits.max_directories = 4096;

    let Ok(mut tiff) = Tiff::load_with_limits(std::io::Cursor::new(data), limits) else {
        return;
    };

    // Anything that loads must write out, unless a narrow strip tag can not hold the new offsets.
    let written = match tiff.encode() {
        Ok(written) => written,
        Err(TiffError::IntSizeError)
        | Err(TiffError::FormatError(TiffFormatError::InvalidTagValueType(_))) => return,
        Err(err) => panic!("loaded file failed to write: {}", err),
    };
    let reloaded = Tiff::load_with_limits(std::io::Cursor::new(&written), Limits::unlimited())
        .expect("written file loads again");
    assert_eq!(reloaded.images().len(), tiff.images().len());
});
