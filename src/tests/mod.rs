use crate::huffman::frequency::analyze;
use crate::huffman::tree::build;
use crate::{compress, compress_str, compress_to_payload, decompress, decompress_str};
use alloc::collections::BinaryHeap;
use alloc::vec;
use alloc::vec::Vec;
use core::cmp::Reverse;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};


/// Sum of all merge weights, which is the bit length of any optimal prefix code.
fn optimal_bit_length(input: &[u8]) -> u64 {
    let frequencies = analyze(input);
    if frequencies.len() == 1 {
        return frequencies.total();
    }
    let mut heap: BinaryHeap<Reverse<u64>> = frequencies.iter().map(|(_, w)| Reverse(w)).collect();
    let mut cost = 0;
    while heap.len() > 1 {
        let Reverse(a) = heap.pop().unwrap();
        let Reverse(b) = heap.pop().unwrap();
        cost += a + b;
        heap.push(Reverse(a + b));
    }
    cost
}

fn random_input(rng: &mut SmallRng) -> Vec<u8> {
    let len = rng.gen_range(0..4000);
    let alphabet: u16 = rng.gen_range(1..=256);
    // skewed distributions make for deep trees
    let skewed = rng.gen_bool(0.5);
    (0..len)
        .map(|_| {
            let sym = if skewed {
                let roll: u16 = rng.gen_range(0..alphabet);
                rng.gen_range(0..=roll)
            } else {
                rng.gen_range(0..alphabet)
            };
            sym as u8
        })
        .collect()
}

#[test]
fn hello_world() {
    let input = b"Hello, World!";
    let compressed = compress(input).unwrap();
    assert!(compressed.len() > 5);
    assert_eq!(compressed[0], 0x00);
    let restored: Vec<u8> = decompress(&compressed).unwrap();
    assert_eq!(restored, input.to_vec());

    assert_eq!(
        decompress_str(&compress_str("Hello, World!").unwrap()).unwrap(),
        "Hello, World!"
    );
}

#[test]
fn empty_input() {
    assert_eq!(compress::<u8>(&[]).unwrap(), vec![0x01]);
    assert_eq!(compress_str("").unwrap(), vec![0x01]);
    assert!(decompress::<u8>(&[0x01]).unwrap().is_empty());
    assert_eq!(decompress_str(&[0x01]).unwrap(), "");
}

#[test]
fn single_symbol_golden_bytes() {
    // 4 bits, tree 0 | 1 'a' | 1 'a', payload 0000
    let compressed = compress(b"aaaa").unwrap();
    assert_eq!(
        compressed,
        vec![0x00, 0x00, 0x00, 0x00, 0x04, 0x58, 0x6C, 0x20, 0x00]
    );
    let restored: Vec<u8> = decompress(&compressed).unwrap();
    assert_eq!(restored, b"aaaa".to_vec());
}

#[test]
fn two_symbol_golden_bytes() {
    let compressed = compress(b"ab").unwrap();
    assert_eq!(
        compressed,
        vec![0x00, 0x00, 0x00, 0x00, 0x02, 0x58, 0x6C, 0x40, 0x40]
    );
}

#[test]
fn all_byte_values() {
    let input: Vec<u8> = (0..=255).collect();
    let payload = compress_to_payload(&input).unwrap();
    // 256 equally likely symbols make a perfect tree
    assert_eq!(payload.tree().unwrap().depth(), 8);
    assert_eq!(payload.header().bit_length, 256 * 8);

    let restored: Vec<u8> = decompress(&payload.to_bytes()).unwrap();
    assert_eq!(restored, input);
}

#[test]
fn skewed_input_is_compact() {
    let payload = compress_to_payload(b"aaaaaaaab").unwrap();
    assert_eq!(payload.header().bit_length, 9);
    assert!(payload.header().bit_length < 9 * 8);
}

#[test]
fn output_is_deterministic() {
    let mut rng = SmallRng::seed_from_u64(0xDEAD_BEEF);
    for _ in 0..50 {
        let input = random_input(&mut rng);
        assert_eq!(compress(&input).unwrap(), compress(&input).unwrap());
    }
}

#[test]
fn random_round_trips() {
    let mut rng = SmallRng::seed_from_u64(0x5EED);
    for _ in 0..200 {
        let input = random_input(&mut rng);
        let payload = compress_to_payload(&input).unwrap();
        let restored: Vec<u8> = decompress(&payload.to_bytes()).unwrap();
        assert_eq!(restored, input);

        if let Some(tree) = payload.tree() {
            let codes = tree.codes();
            assert!(codes.is_prefix_free());
            assert_eq!(codes.len(), analyze(&input).len());
            assert_eq!(
                u64::from(payload.header().bit_length),
                optimal_bit_length(&input)
            );
        }
    }
}

#[test]
fn wide_symbols_round_trip() {
    let mut rng = SmallRng::seed_from_u64(42);
    let input: Vec<u16> = (0..3000).map(|_| rng.gen_range(0..1000u16) * 61).collect();
    let restored: Vec<u16> = decompress(&compress(&input).unwrap()).unwrap();
    assert_eq!(restored, input);

    let input: Vec<u32> = (0..3000).map(|_| rng.gen::<u32>() % 300 * 0x00AB_CDEF).collect();
    let restored: Vec<u32> = decompress(&compress(&input).unwrap()).unwrap();
    assert_eq!(restored, input);
}

#[test]
fn fibonacci_weights_make_long_codes() {
    // weights 1, 1, 2, 3, 5, ... give a maximally unbalanced tree
    let mut input = Vec::new();
    let (mut a, mut b) = (1usize, 1usize);
    for sym in 0..20u8 {
        input.extend(core::iter::repeat(sym).take(a));
        let next = a + b;
        a = b;
        b = next;
    }
    let frequencies = analyze(&input);
    let tree = build(&frequencies).unwrap();
    assert_eq!(tree.depth(), 19);

    let restored: Vec<u8> = decompress(&compress(&input).unwrap()).unwrap();
    assert_eq!(restored, input);
}

#[test]
fn round_trip_helper() {
    crate::round_trip(b"");
    crate::round_trip(b"x");
    crate::round_trip(b"Hello, World!");
    crate::round_trip("Grüße".as_bytes());
    crate::round_trip(&[0xFF, 0xFE, 0x00]);
}
