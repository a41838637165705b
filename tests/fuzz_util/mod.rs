#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use chainstat::Record;

#[derive(Debug, Clone, Copy)]
pub struct FuzzParams {
    pub seed: u64,
    pub records: usize,
    pub key_space: u64,
}

fn env_u64(name: &str) -> Option<u64> {
    std::env::var(name).ok()?.trim().parse::<u64>().ok()
}

fn env_usize(name: &str) -> Option<usize> {
    std::env::var(name).ok()?.trim().parse::<usize>().ok()
}

fn mix_seed(mut seed: u64, tag: &str) -> u64 {
    // Stable per-test stream derived from the shared base seed.
    for (i, b) in tag.as_bytes().iter().enumerate() {
        seed ^= (*b as u64) << ((i % 8) * 8);
        seed = seed.rotate_left(13).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    }
    seed
}

pub fn params(test_tag: &str, default_records: usize, default_key_space: u64) -> FuzzParams {
    let base_seed = env_u64("CHAINSTAT_FUZZ_SEED").unwrap_or(0xA1B2_C3D4_E5F6_0708);
    let records = env_usize("CHAINSTAT_FUZZ_RECORDS").unwrap_or(default_records);
    let key_space = env_u64("CHAINSTAT_FUZZ_KEY_SPACE").unwrap_or(default_key_space);

    FuzzParams {
        seed: mix_seed(base_seed, test_tag),
        records,
        key_space: key_space.max(1),
    }
}

pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub fn choose_key(rng: &mut StdRng, key_space: u64) -> u64 {
    rng.gen_range(0..key_space)
}

pub fn random_records(rng: &mut StdRng, n: usize, key_space: u64) -> Vec<Record> {
    (0..n)
        .map(|i| Record::new(choose_key(rng, key_space), format!("r{i}"), "X"))
        .collect()
}

pub fn choose_table_size(rng: &mut StdRng) -> u64 {
    rng.gen_range(1..=512)
}
