#![no_main]
use libfuzzer_sys::fuzz_target;
use logsign_core::encoding::{Codec, Reader};
use logsign_core::Manifest;

fuzz_target!(|data: &[u8]| {
    let mut reader = Reader::new(data);
    if let Ok(manifest) = Manifest::decode(&mut reader) {
        let _ = manifest.key();
    }
});
