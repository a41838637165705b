//! Seeded randomized checks of table invariants.
//!
//! Each test compares the table against a plain model built from the same
//! insertion sequence. Set `CHAINSTAT_FUZZ_SEED` to explore other streams.

mod fuzz_util;

use chainstat::{ChainedHashTable, Record};

#[test]
fn test_fuzz_conservation_and_hash_range() {
    let params = fuzz_util::params("conservation", 2_000, 100_000);
    let mut rng = fuzz_util::rng(params.seed);

    for _ in 0..20 {
        let size = fuzz_util::choose_table_size(&mut rng);
        let records = fuzz_util::random_records(&mut rng, params.records, params.key_space);

        let mut table = ChainedHashTable::new(size).unwrap();
        table.insert_all(records.iter().cloned());

        let total: usize = table.chain_lengths().sum();
        assert_eq!(total, records.len(), "M={size}");
        assert_eq!(table.len(), records.len() as u64);

        for (index, bucket) in table.buckets().enumerate() {
            for record in bucket {
                assert!(table.hash(record.id()) < size as usize);
                assert_eq!(table.hash(record.id()), index);
            }
        }

        let stats = table.compute_stats();
        assert_eq!(stats.used_slots + stats.empty_slots, size);
        assert_eq!(stats.occupancy_rate, stats.used_slots as f64 / size as f64);
        assert_eq!(stats.total_records, records.len() as u64);
        assert!(stats.min_chain_length <= stats.max_chain_length);
    }
}

#[test]
fn test_fuzz_search_matches_model() {
    let params = fuzz_util::params("search_model", 1_000, 5_000);
    let mut rng = fuzz_util::rng(params.seed);

    let size = fuzz_util::choose_table_size(&mut rng);
    let records = fuzz_util::random_records(&mut rng, params.records, params.key_space);
    let mut table = ChainedHashTable::new(size).unwrap();
    table.insert_all(records.iter().cloned());

    for _ in 0..2_000 {
        let id = fuzz_util::choose_key(&mut rng, params.key_space * 2);

        // Model: the bucket's chain is the insertion-ordered subsequence of
        // records sharing the same residue.
        let chain: Vec<&Record> = records
            .iter()
            .filter(|r| r.id() % size == id % size)
            .collect();
        let expected = chain.iter().position(|r| r.id() == id);

        let outcome = table.search(id);
        match expected {
            Some(position) => {
                assert_eq!(outcome.record, Some(chain[position]));
                assert_eq!(outcome.probes, position as u64 + 1);
            }
            None => {
                assert!(!outcome.found());
                assert_eq!(outcome.probes, chain.len() as u64 + 1);
            }
        }

        assert_eq!(table.search(id), outcome, "search must be deterministic");
    }
}
