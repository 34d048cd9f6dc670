#![no_main]

use libfuzzer_sys::fuzz_target;
use zumic_core::Sds;

fuzz_target!(|data: &[u8]| {
    // Разбор не должен паниковать ни на каких данных.
    let _ = Sds::split_args(data);

    // Любой байтовый аргумент, записанный через cat_repr, читается обратно.
    let mut repr = Sds::empty();
    repr.cat_repr(data);
    let parsed = Sds::split_args(repr.as_slice()).expect("cat_repr output must parse");
    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed[0].as_slice(), data);
});
