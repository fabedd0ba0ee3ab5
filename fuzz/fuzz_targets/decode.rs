#![no_main]
#[macro_use] extern crate libfuzzer_sys;
extern crate huffpack;

fuzz_target!(|data: &[u8]| {
    // arbitrary bytes may fail to decode, but must never panic
    _ = huffpack::decompress::<u8>(data);
    _ = huffpack::decompress::<u16>(data);
    _ = huffpack::decompress_str(data);
});
