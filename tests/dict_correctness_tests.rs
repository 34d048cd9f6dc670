use std::collections::HashMap;

use zumic_core::{
    database::{SdsCaseDictType, SdsDictType},
    Dict, DictError, Sds,
};

fn filled(n: u32) -> Dict<u32, u32> {
    let mut d = Dict::new();
    for i in 0..n {
        d.add(i, i * 3).unwrap();
    }
    d
}

fn finish_rehash<K, V, T>(d: &mut Dict<K, V, T>)
where
    T: zumic_core::DictType<K, V>,
{
    while d.rehash(100) {}
}

#[test]
fn test_peek_allows_multiple_borrows() {
    let mut d = Dict::new();

    d.add("x", 10u32).unwrap();
    d.add("y", 20u32).unwrap();
    d.add("z", 30u32).unwrap();

    // Все три ссылки живут одновременно.
    let (_, vx) = d.peek(&"x").unwrap();
    let (_, vy) = d.peek(&"y").unwrap();
    let (_, vz) = d.peek(&"z").unwrap();

    assert_eq!(*vx + *vy + *vz, 60);
}

#[test]
fn test_get_mut_increment() {
    let mut d = Dict::new();

    d.add("counter", 0u64).unwrap();

    for _ in 0..100 {
        *d.get_mut(&"counter").unwrap() += 1;
    }

    assert_eq!(d.fetch_value(&"counter"), Some(&100u64));
}

#[test]
fn test_get_mut_absent_key_returns_none() {
    let mut d: Dict<u32, u32> = Dict::new();

    assert!(d.get_mut(&0).is_none());

    d.add(1, 100).unwrap();

    assert!(d.get_mut(&0).is_none());
    assert!(d.get_mut(&1).is_some());
}

#[test]
fn test_first_insert_allocates_initial_table() {
    let mut d: Dict<u64, u64> = Dict::new();
    assert_eq!(d.buckets(), 0);

    d.add(42, 99).unwrap();

    assert_eq!(d.len(), 1);
    assert_eq!(d.buckets(), 4);
    assert_eq!(d.fetch_value(&42), Some(&99));
}

#[test]
fn test_growth_from_four_to_eight_to_sixteen() {
    let mut d: Dict<u32, u32> = Dict::new();

    for i in 1..=4u32 {
        d.add(i, i * 10).unwrap();
    }
    assert_eq!(d.table_size(0), 4);
    assert!(!d.is_rehashing());

    d.add(5, 50).unwrap();
    assert!(d.is_rehashing());
    assert_eq!(d.table_size(1), 8);

    for i in 6..=9u32 {
        d.add(i, i * 10).unwrap();
    }
    assert!(d.is_rehashing());
    assert_eq!(d.table_size(0), 8);
    assert_eq!(d.table_size(1), 16);
    assert_eq!(d.len(), 9);

    // Поиск идёт посреди второго рехеширования.
    for i in 1..=9u32 {
        assert_eq!(d.find(&i).map(|(k, v)| (*k, *v)), Some((i, i * 10)));
    }
    assert!(d.find(&100).is_none());
}

#[test]
fn test_add_existing_key_fails_and_keeps_value() {
    let mut d = Dict::new();
    d.add("k", 1).unwrap();

    assert!(matches!(d.add("k", 2), Err(DictError::KeyExists)));
    assert_eq!(d.fetch_value(&"k"), Some(&1));
    assert_eq!(d.len(), 1);
}

#[test]
fn test_replace_reports_insert_or_update() {
    let mut d = Dict::new();

    assert!(d.replace("k", 1).unwrap());
    assert!(!d.replace("k", 2).unwrap());

    assert_eq!(d.fetch_value(&"k"), Some(&2));
    assert_eq!(d.len(), 1);
}

#[test]
fn test_delete_missing_key() {
    let mut d = filled(10);

    assert!(matches!(d.delete(&100), Err(DictError::KeyNotFound)));
    assert_eq!(d.len(), 10);

    let mut empty: Dict<u32, u32> = Dict::new();
    assert!(matches!(empty.delete(&1), Err(DictError::KeyNotFound)));
}

#[test]
fn test_take_returns_pair() {
    let mut d = filled(10);

    assert_eq!(d.take(&4).unwrap(), (4, 12));
    assert!(d.fetch_value(&4).is_none());
    assert_eq!(d.len(), 9);
}

#[test]
fn test_insert_after_clear() {
    let mut d = filled(50);

    d.clear();
    assert!(d.is_empty());
    assert_eq!(d.buckets(), 0);
    assert!(!d.is_rehashing());

    for i in 100..150u32 {
        d.add(i, i).unwrap();
    }

    assert_eq!(d.len(), 50);
    for i in 100..150u32 {
        assert_eq!(d.fetch_value(&i), Some(&i));
    }
}

#[test]
fn test_growth_keeps_power_of_two_and_all_keys() {
    let mut d = filled(10_000);
    finish_rehash(&mut d);

    assert!(d.buckets().is_power_of_two());
    assert!(d.buckets() >= d.len());
    for i in 0..10_000u32 {
        assert_eq!(d.peek(&i).map(|(_, v)| *v), Some(i * 3));
    }
}

#[test]
fn test_every_key_found_during_rehash() {
    let mut d = filled(64);
    finish_rehash(&mut d);
    d.expand(1024).unwrap();
    assert!(d.is_rehashing());

    for i in 0..64u32 {
        assert!(d.contains_key(&i), "key {i} lost during rehash");
    }

    // Каждый find двигает рехеширование.
    for i in 0..64u32 {
        d.find(&i);
    }
    finish_rehash(&mut d);
    assert_eq!(d.table_used(0), 64);
    assert_eq!(d.table_size(1), 0);
}

#[test]
fn test_lengths_add_up_across_tables() {
    let mut d = filled(100);
    finish_rehash(&mut d);
    d.expand(4096).unwrap();
    d.rehash(3);

    assert_eq!(d.table_used(0) + d.table_used(1), d.len());
}

#[test]
fn test_expand_errors() {
    let mut d = filled(100);
    finish_rehash(&mut d);
    let size = d.buckets();

    assert!(matches!(
        d.expand(size),
        Err(DictError::SameSize { size: s }) if s == size
    ));

    d.expand(size * 4).unwrap();
    assert!(matches!(d.expand(size * 8), Err(DictError::RehashInProgress)));
}

#[test]
fn test_resize_shrinks_after_mass_delete() {
    let mut d = filled(1000);
    finish_rehash(&mut d);

    for i in 10..1000u32 {
        d.delete(&i).unwrap();
    }
    assert!(d.needs_resize());

    d.resize().unwrap();
    finish_rehash(&mut d);

    assert_eq!(d.buckets(), 16);
    for i in 0..10u32 {
        assert_eq!(d.fetch_value(&i), Some(&(i * 3)));
    }
}

#[test]
fn test_with_capacity_preallocates() {
    let d: Dict<u32, u32> = Dict::with_capacity(100).unwrap();
    assert_eq!(d.buckets(), 128);
    assert!(d.is_empty());
}

#[test]
fn test_with_capacity_overflow_is_allocation_failure() {
    let res: Result<Dict<u32, u32>, _> = Dict::with_capacity(usize::MAX);
    assert!(matches!(res, Err(DictError::AllocationFailure { .. })));
}

#[test]
fn test_matches_hashmap_model() {
    let mut d = Dict::new();
    let mut model = HashMap::new();

    for i in 0..2000u32 {
        let key = i.wrapping_mul(2_654_435_761) % 500;
        match i % 3 {
            0 => {
                let inserted = d.replace(key, i).unwrap();
                assert_eq!(inserted, model.insert(key, i).is_none());
            }
            1 => {
                let removed = d.delete(&key).is_ok();
                assert_eq!(removed, model.remove(&key).is_some());
            }
            _ => assert_eq!(d.fetch_value(&key), model.get(&key)),
        }
        assert_eq!(d.len(), model.len());
    }
}

#[test]
fn test_sds_keys() {
    let mut d = Dict::with_type(SdsDictType::new());

    d.add(Sds::from_str("alpha"), 1).unwrap();
    d.add(Sds::from_str("beta"), 2).unwrap();

    assert_eq!(d.fetch_value(&Sds::from_str("alpha")), Some(&1));
    assert!(d.fetch_value(&Sds::from_str("ALPHA")).is_none());
}

#[test]
fn test_case_insensitive_keys() {
    let mut d = Dict::with_type(SdsCaseDictType::new());

    d.add(Sds::from_str("Content-Type"), "json").unwrap();

    assert_eq!(
        d.fetch_value(&Sds::from_str("content-type")),
        Some(&"json")
    );
    assert!(matches!(
        d.add(Sds::from_str("CONTENT-TYPE"), "xml"),
        Err(DictError::KeyExists)
    ));
}

#[test]
fn test_clone_is_independent() {
    let mut d = filled(20);
    let mut copy = d.clone();

    copy.delete(&1).unwrap();
    *d.get_mut(&2).unwrap() = 0;

    assert_eq!(d.len(), 20);
    assert_eq!(copy.len(), 19);
    assert_eq!(copy.fetch_value(&2), Some(&6));
}

#[test]
fn test_clear_with_reports_progress() {
    let mut d: Dict<u32, u32> = Dict::with_capacity(200_000).unwrap();
    for i in 0..150_000u32 {
        d.add(i, i).unwrap();
    }

    let mut calls = Vec::new();
    d.clear_with(|idx| calls.push(idx));

    assert!(d.is_empty());
    assert_eq!(calls.first(), Some(&0));
    assert!(calls.iter().all(|i| i % 65536 == 0));
}
