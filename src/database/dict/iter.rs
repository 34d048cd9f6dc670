use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use smallvec::SmallVec;

use super::{dict_base::Dict, dict_type::DictType, table::EntryId};
use crate::error::DictError;

/// Итератор по словарю `Dict` (разделяемая ссылка).
///
/// Словарь заморожен заимствованием, поэтому обход всегда согласован.
pub struct DictIter<'a, K, V, T>
where
    T: DictType<K, V>,
{
    dict: &'a Dict<K, V, T>,
    table: usize,
    bucket: usize,
    current: Option<EntryId>,
    remaining: usize,
}

/// Безопасный итератор: не держит заимствование словаря, и между вызовами
/// `next` словарь можно менять (вставлять, удалять, искать).
///
/// Пока итератор жив, рехеширование словаря приостановлено. Каждая запись,
/// присутствующая всё время обхода, возвращается ровно один раз; удалённые
/// записи пропускаются.
#[derive(Debug)]
pub struct SafeIter {
    table: usize,
    bucket: usize,
    /// Снимок текущей цепочки в обратном порядке.
    pending: SmallVec<[EntryId; 4]>,
    _pause: RehashPause,
}

/// Небезопасный (в смысле контракта) итератор: словарь между вызовами
/// `next` менять нельзя.
///
/// Нарушение контракта обнаруживается по отпечатку структуры словаря и
/// приводит к панике с `DictError::FatalIteratorMisuse`.
#[derive(Debug)]
pub struct UnsafeIter {
    table: usize,
    bucket: usize,
    current: Option<EntryId>,
    fingerprint: u64,
}

/// Учёт живого безопасного итератора в счётчике словаря.
#[derive(Debug)]
struct RehashPause(Arc<AtomicUsize>);

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl RehashPause {
    fn new(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::AcqRel);
        RehashPause(Arc::clone(counter))
    }
}

impl<K, V, T> Dict<K, V, T>
where
    T: DictType<K, V>,
{
    /// Обход всех записей по разделяемой ссылке.
    pub fn iter(&self) -> DictIter<'_, K, V, T> {
        DictIter {
            dict: self,
            table: 0,
            bucket: 0,
            current: None,
            remaining: self.len(),
        }
    }

    /// Безопасный итератор; рехеширование стоит, пока он жив.
    pub fn safe_iter(&self) -> SafeIter {
        SafeIter {
            table: 0,
            bucket: 0,
            pending: SmallVec::new(),
            _pause: RehashPause::new(&self.iterators),
        }
    }

    /// Небезопасный итератор с проверкой отпечатка.
    pub fn unsafe_iter(&self) -> UnsafeIter {
        UnsafeIter {
            table: 0,
            bucket: 0,
            current: None,
            fingerprint: self.fingerprint(),
        }
    }

    /// 64-битный отпечаток структуры словаря: адреса и размеры обеих таблиц
    /// и число записей в них.
    ///
    /// Меняется при любой вставке, удалении, шаге рехеширования или
    /// перевыделении таблиц. Замена значения его не меняет.
    pub fn fingerprint(&self) -> u64 {
        let integers = [
            self.ht[0].buckets.as_ptr() as usize as u64,
            self.ht[0].size() as u64,
            self.ht[0].used as u64,
            self.ht[1].buckets.as_ptr() as usize as u64,
            self.ht[1].size() as u64,
            self.ht[1].used as u64,
        ];

        // Перемешивание Томаса Ванга: порядок чисел тоже влияет на результат
        integers.iter().fold(0u64, |hash, &n| {
            let mut h = hash.wrapping_add(n);
            h = (!h).wrapping_add(h << 21);
            h ^= h >> 24;
            h = h.wrapping_add(h << 3).wrapping_add(h << 8);
            h ^= h >> 14;
            h = h.wrapping_add(h << 2).wrapping_add(h << 4);
            h ^= h >> 28;
            h.wrapping_add(h << 31)
        })
    }
}

impl SafeIter {
    /// Следующая запись словаря `dict`.
    ///
    /// `dict` должен быть тем же словарём, из которого создан итератор.
    pub fn next<'d, K, V, T>(
        &mut self,
        dict: &'d Dict<K, V, T>,
    ) -> Option<(EntryId, &'d K, &'d V)>
    where
        T: DictType<K, V>,
    {
        loop {
            while let Some(id) = self.pending.pop() {
                if let Some(node) = dict.entries.get(id) {
                    return Some((id, &node.key, &node.val));
                }
            }

            let table = &dict.ht[self.table];
            if self.bucket >= table.size() {
                if self.table == 0 && dict.is_rehashing() {
                    self.table = 1;
                    self.bucket = 0;
                    continue;
                }
                return None;
            }

            let mut cur = table.buckets[self.bucket];
            self.bucket += 1;
            while let Some(id) = cur {
                self.pending.push(id);
                cur = dict.entries.get(id).and_then(|node| node.next);
            }
            self.pending.reverse();
        }
    }
}

impl UnsafeIter {
    /// Следующая запись словаря `dict`.
    ///
    /// # Panics
    ///
    /// Паникует с `DictError::FatalIteratorMisuse`, если структура словаря
    /// изменилась после создания итератора.
    pub fn next<'d, K, V, T>(
        &mut self,
        dict: &'d Dict<K, V, T>,
    ) -> Option<(EntryId, &'d K, &'d V)>
    where
        T: DictType<K, V>,
    {
        let actual = dict.fingerprint();
        if actual != self.fingerprint {
            panic!(
                "{}",
                DictError::FatalIteratorMisuse {
                    expected: self.fingerprint,
                    actual,
                }
            );
        }

        loop {
            if let Some(id) = self.current {
                let node = dict.entries.get(id)?;
                self.current = node.next;
                return Some((id, &node.key, &node.val));
            }

            let table = &dict.ht[self.table];
            if self.bucket >= table.size() {
                if self.table == 0 && dict.is_rehashing() {
                    self.table = 1;
                    self.bucket = 0;
                    continue;
                }
                return None;
            }

            self.current = table.buckets[self.bucket];
            self.bucket += 1;
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов
////////////////////////////////////////////////////////////////////////////////

impl Drop for RehashPause {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

impl<'a, K, V, T> Iterator for DictIter<'a, K, V, T>
where
    T: DictType<K, V>,
{
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let dict = self.dict;

        loop {
            if let Some(id) = self.current {
                let node = &dict.entries[id];
                self.current = node.next;
                self.remaining -= 1;
                return Some((&node.key, &node.val));
            }

            let table = &dict.ht[self.table];
            if self.bucket >= table.size() {
                if self.table == 0 && dict.is_rehashing() {
                    self.table = 1;
                    self.bucket = 0;
                    continue;
                }
                return None;
            }

            self.current = table.buckets[self.bucket];
            self.bucket += 1;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V, T> ExactSizeIterator for DictIter<'_, K, V, T> where T: DictType<K, V> {}

impl<'a, K, V, T> IntoIterator for &'a Dict<K, V, T>
where
    T: DictType<K, V>,
{
    type Item = (&'a K, &'a V);
    type IntoIter = DictIter<'a, K, V, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
