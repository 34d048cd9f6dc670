use std::{
    hash::{Hash, Hasher},
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use siphasher::sip::SipHasher13;
use xxhash_rust::xxh64::xxh64;

use crate::{database::Sds, error::DictResult};

/// Значение seed по умолчанию (начальное значение djb2).
pub const DEFAULT_HASH_SEED: u64 = 5381;

static HASH_SEED: AtomicU64 = AtomicU64::new(DEFAULT_HASH_SEED);

/// Набор колбэков словаря: хеширование, сравнение, копирование и
/// освобождение ключей и значений.
///
/// `&self` играет роль контекста: состояние, нужное колбэкам конкретного
/// словаря, хранится в самой реализации. Один набор колбэков можно
/// разделить между словарями через `Arc<T>`.
///
/// Обязательны только `hash` и `key_eq`. По умолчанию ключи и значения
/// принимаются как есть и просто удаляются (`drop`).
pub trait DictType<K, V> {
    /// Хеш ключа.
    fn hash(
        &self,
        key: &K,
    ) -> u64;

    /// Равенство ключей.
    fn key_eq(
        &self,
        a: &K,
        b: &K,
    ) -> bool;

    /// Превращает ключ вызывающего кода в ключ, которым владеет словарь.
    /// Ошибка прерывает вставку до того, как запись попадёт в цепочку.
    fn dup_key(
        &self,
        key: K,
    ) -> DictResult<K> {
        Ok(key)
    }

    /// То же для значения.
    fn dup_val(
        &self,
        val: V,
    ) -> DictResult<V> {
        Ok(val)
    }

    /// Освобождает ключ удаляемой записи.
    fn destroy_key(
        &self,
        key: K,
    ) {
        drop(key);
    }

    /// Освобождает значение удаляемой или заменяемой записи.
    fn destroy_val(
        &self,
        val: V,
    ) {
        drop(val);
    }
}

/// Тип словаря по умолчанию: SipHash-1-3 с ключом из seed и `Eq`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultDictType {
    k0: u64,
    k1: u64,
}

/// Ключи `Sds`, бинарное сравнение, хеш xxh64.
///
/// Seed фиксируется при создании типа.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SdsDictType {
    seed: u64,
}

/// Ключи `Sds`, сравнение без учёта регистра ASCII.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SdsCaseDictType {
    seed: u64,
}

////////////////////////////////////////////////////////////////////////////////
// Seed и хеш-функции
////////////////////////////////////////////////////////////////////////////////

/// Устанавливает глобальный seed хеш-функций.
///
/// Вызывается один раз при старте процесса, до создания словарей.
/// Встроенные типы словарей запоминают seed при создании, поэтому
/// словари, созданные раньше, продолжают использовать старый seed.
/// Свободные функции `gen_hash_function` и `gen_case_hash_function`
/// читают текущий seed при каждом вызове.
pub fn set_hash_function_seed(seed: u64) {
    HASH_SEED.store(seed, Ordering::Relaxed);
}

/// Текущий глобальный seed хеш-функций.
pub fn hash_function_seed() -> u64 {
    HASH_SEED.load(Ordering::Relaxed)
}

/// Хеш произвольных байт (xxh64 с глобальным seed).
#[inline]
pub fn gen_hash_function(buf: &[u8]) -> u64 {
    xxh64(buf, hash_function_seed())
}

/// Хеш байт без учёта регистра ASCII (djb2 с глобальным seed).
pub fn gen_case_hash_function(buf: &[u8]) -> u64 {
    case_hash(buf, hash_function_seed())
}

fn case_hash(
    buf: &[u8],
    seed: u64,
) -> u64 {
    buf.iter().fold(seed, |hash, &b| {
        hash.wrapping_mul(33)
            .wrapping_add(b.to_ascii_lowercase() as u64)
    })
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl DefaultDictType {
    /// Создаёт тип с текущим глобальным seed.
    pub fn new() -> Self {
        Self::with_seed(hash_function_seed())
    }

    /// Создаёт тип с явно заданным seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            k0: seed,
            k1: seed.rotate_left(32) ^ 0x9e37_79b9_7f4a_7c15,
        }
    }
}

impl SdsDictType {
    /// Создаёт тип с текущим глобальным seed.
    pub fn new() -> Self {
        Self::with_seed(hash_function_seed())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self { seed }
    }
}

impl SdsCaseDictType {
    /// Создаёт тип с текущим глобальным seed.
    pub fn new() -> Self {
        Self::with_seed(hash_function_seed())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self { seed }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов
////////////////////////////////////////////////////////////////////////////////

impl Default for DefaultDictType {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for SdsDictType {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for SdsCaseDictType {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> DictType<K, V> for DefaultDictType
where
    K: Hash + Eq,
{
    #[inline]
    fn hash(
        &self,
        key: &K,
    ) -> u64 {
        let mut hasher = SipHasher13::new_with_keys(self.k0, self.k1);
        key.hash(&mut hasher);
        hasher.finish()
    }

    #[inline]
    fn key_eq(
        &self,
        a: &K,
        b: &K,
    ) -> bool {
        a == b
    }
}

impl<V> DictType<Sds, V> for SdsDictType {
    #[inline]
    fn hash(
        &self,
        key: &Sds,
    ) -> u64 {
        xxh64(key.as_slice(), self.seed)
    }

    #[inline]
    fn key_eq(
        &self,
        a: &Sds,
        b: &Sds,
    ) -> bool {
        a.as_slice() == b.as_slice()
    }
}

impl<V> DictType<Sds, V> for SdsCaseDictType {
    #[inline]
    fn hash(
        &self,
        key: &Sds,
    ) -> u64 {
        case_hash(key.as_slice(), self.seed)
    }

    #[inline]
    fn key_eq(
        &self,
        a: &Sds,
        b: &Sds,
    ) -> bool {
        a.as_slice().eq_ignore_ascii_case(b.as_slice())
    }
}

impl<K, V, T> DictType<K, V> for Arc<T>
where
    T: DictType<K, V> + ?Sized,
{
    fn hash(
        &self,
        key: &K,
    ) -> u64 {
        (**self).hash(key)
    }

    fn key_eq(
        &self,
        a: &K,
        b: &K,
    ) -> bool {
        (**self).key_eq(a, b)
    }

    fn dup_key(
        &self,
        key: K,
    ) -> DictResult<K> {
        (**self).dup_key(key)
    }

    fn dup_val(
        &self,
        val: V,
    ) -> DictResult<V> {
        (**self).dup_val(val)
    }

    fn destroy_key(
        &self,
        key: K,
    ) {
        (**self).destroy_key(key)
    }

    fn destroy_val(
        &self,
        val: V,
    ) {
        (**self).destroy_val(val)
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
