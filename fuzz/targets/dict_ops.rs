#![no_main]

use std::collections::HashMap;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use zumic_core::Dict;

#[derive(Debug, Arbitrary)]
enum Op {
    Add(u8, u16),
    Replace(u8, u16),
    Delete(u8),
    Find(u8),
    Rehash(u8),
    Expand(u16),
    Resize,
    Scan(u64),
    SafeIterDelete(u8),
}

fuzz_target!(|ops: Vec<Op>| {
    let mut d: Dict<u8, u16> = Dict::new();
    let mut model: HashMap<u8, u16> = HashMap::new();

    for op in ops {
        match op {
            Op::Add(k, v) => {
                assert_eq!(d.add(k, v).is_ok(), !model.contains_key(&k));
                model.entry(k).or_insert(v);
            }
            Op::Replace(k, v) => {
                let inserted = d.replace(k, v).unwrap();
                assert_eq!(inserted, model.insert(k, v).is_none());
            }
            Op::Delete(k) => {
                assert_eq!(d.delete(&k).is_ok(), model.remove(&k).is_some());
            }
            Op::Find(k) => assert_eq!(d.fetch_value(&k), model.get(&k)),
            Op::Rehash(n) => {
                d.rehash(n as usize);
            }
            Op::Expand(size) => {
                // ошибки ожидаемы: идёт рехеширование или тот же размер
                let _ = d.expand(size as usize);
            }
            Op::Resize => {
                let _ = d.resize();
            }
            Op::Scan(cursor) => {
                d.scan(cursor, |k, v| assert_eq!(model.get(k), Some(v)));
            }
            Op::SafeIterDelete(modulo) => {
                let modulo = modulo.max(1);
                let mut it = d.safe_iter();
                while let Some((_, k, _)) = it.next(&d) {
                    let k = *k;
                    if k % modulo == 0 {
                        d.delete(&k).unwrap();
                        model.remove(&k);
                    }
                }
            }
        }

        assert_eq!(d.len(), model.len());
    }
});
