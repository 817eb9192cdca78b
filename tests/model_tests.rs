//! Model-Based Tests
//!
//! Replays long pseudo-random operation sequences against both the cache and a
//! naive reference model that stores `(key, value, frequency, stamp)` rows in a
//! vector and finds the victim by linear scan. After every step the two must
//! agree on contents, frequencies, eviction victims and iteration order.

use frequency_cache::{FrequencyCache, PutOutcome};

/// Small xorshift generator so runs are reproducible without extra dependencies.
struct XorShift(u64);

impl XorShift {
    fn next(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    fn below(&mut self, bound: u64) -> u64 {
        self.next() % bound
    }
}

#[derive(Debug, Clone)]
struct Row {
    key: u64,
    value: u64,
    frequency: usize,
    /// When the row arrived at its current frequency
    stamp: u64,
}

/// Reference LFU with LRU tie-break, linear in everything.
struct Model {
    capacity: usize,
    rows: Vec<Row>,
    clock: u64,
}

impl Model {
    fn new(capacity: usize) -> Self {
        Model {
            capacity,
            rows: Vec::new(),
            clock: 0,
        }
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn position(&self, key: u64) -> Option<usize> {
        self.rows.iter().position(|r| r.key == key)
    }

    fn victim(&self) -> Option<usize> {
        self.rows
            .iter()
            .enumerate()
            .min_by_key(|(_, r)| (r.frequency, r.stamp))
            .map(|(i, _)| i)
    }

    fn get(&mut self, key: u64) -> Option<u64> {
        let idx = self.position(key)?;
        let stamp = self.tick();
        let row = &mut self.rows[idx];
        row.frequency += 1;
        row.stamp = stamp;
        Some(row.value)
    }

    fn put(&mut self, key: u64, value: u64) -> PutOutcome<u64, u64> {
        let stamp = self.tick();
        if let Some(idx) = self.position(key) {
            let row = &mut self.rows[idx];
            let previous = row.value;
            row.value = value;
            row.frequency += 1;
            row.stamp = stamp;
            return PutOutcome::Replaced(previous);
        }
        if self.capacity == 0 {
            return PutOutcome::Rejected(key, value);
        }
        let outcome = if self.rows.len() >= self.capacity {
            let idx = self.victim().expect("full model has a victim");
            let row = self.rows.remove(idx);
            PutOutcome::Evicted(row.key, row.value)
        } else {
            PutOutcome::Inserted
        };
        self.rows.push(Row {
            key,
            value,
            frequency: 0,
            stamp,
        });
        outcome
    }

    fn remove(&mut self, key: u64) -> Option<u64> {
        let idx = self.position(key)?;
        Some(self.rows.remove(idx).value)
    }

    fn pop(&mut self) -> Option<(u64, u64)> {
        let idx = self.victim()?;
        let row = self.rows.remove(idx);
        Some((row.key, row.value))
    }

    fn order(&self) -> Vec<(u64, u64)> {
        let mut rows = self.rows.clone();
        rows.sort_by_key(|r| (r.frequency, r.stamp));
        rows.into_iter().map(|r| (r.key, r.value)).collect()
    }
}

fn check_agreement(cache: &FrequencyCache<u64, u64>, model: &Model, step: usize) {
    assert!(cache.len() <= cache.cap(), "step {step}: capacity exceeded");
    assert_eq!(cache.len(), model.rows.len(), "step {step}: length");
    for row in &model.rows {
        assert_eq!(
            cache.frequency(&row.key),
            Some(row.frequency),
            "step {step}: frequency of {}",
            row.key
        );
    }
    let order: Vec<_> = cache.iter().map(|(k, v)| (*k, *v)).collect();
    assert_eq!(order, model.order(), "step {step}: eviction order");
    if let Err(err) = cache.check_invariants() {
        panic!("step {step}: {err}");
    }
}

fn run(seed: u64, capacity: usize, key_space: u64, steps: usize) {
    let mut rng = XorShift(seed);
    let mut cache = FrequencyCache::new(capacity);
    let mut model = Model::new(capacity);

    for step in 0..steps {
        let key = rng.below(key_space);
        match rng.below(100) {
            0..=39 => {
                let value = rng.next();
                assert_eq!(
                    cache.put(key, value),
                    model.put(key, value),
                    "step {step}: put {key}"
                );
            }
            40..=79 => {
                assert_eq!(cache.get(&key).copied(), model.get(key), "step {step}: get {key}");
            }
            80..=89 => {
                assert_eq!(cache.remove(&key), model.remove(key), "step {step}: remove {key}");
            }
            90..=94 => {
                assert_eq!(cache.pop(), model.pop(), "step {step}: pop");
            }
            95..=97 => {
                let expected = model.victim().map(|i| (model.rows[i].key, model.rows[i].value));
                assert_eq!(
                    cache.peek_lfu().map(|(k, v)| (*k, *v)),
                    expected,
                    "step {step}: peek_lfu"
                );
            }
            _ => {
                if rng.below(10) == 0 {
                    cache.clear();
                    model.rows.clear();
                }
            }
        }
        check_agreement(&cache, &model, step);
    }
}

#[test]
fn test_model_small_cache_dense_keys() {
    run(0x9E37_79B9_7F4A_7C15, 4, 8, 3_000);
}

#[test]
fn test_model_medium_cache_sparse_keys() {
    run(0xD1B5_4A32_D192_ED03, 16, 64, 3_000);
}

#[test]
fn test_model_single_slot() {
    run(0x94D0_49BB_1331_11EB, 1, 4, 1_000);
}

#[test]
fn test_model_zero_capacity() {
    run(0xBF58_476D_1CE4_E5B9, 0, 4, 500);
}

#[test]
fn test_model_key_space_fits() {
    // Capacity larger than the key space: nothing is ever evicted
    run(0x2545_F491_4F6C_DD1D, 32, 16, 2_000);
}
