#![no_main]
#[macro_use] extern crate libfuzzer_sys;
extern crate huffpack;

fuzz_target!(|data: &[u8]| {
    huffpack::round_trip(data);
});
