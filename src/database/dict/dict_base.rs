use std::{
    fmt,
    hash::Hash,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

use slotmap::SlotMap;
use tracing::{debug, error, trace, warn};

use super::{
    dict_type::{DefaultDictType, DictType},
    entry::Entry,
    resize::resize_enabled,
    table::{next_power, DictNode, EntryId, HashTable},
};
use crate::{
    config::DictConfig,
    error::{DictError, DictResult},
};

/// Через сколько бакетов `clear_with` вызывает колбэк прогресса.
const CLEAR_PROGRESS_INTERVAL: usize = 65536;

/// Хеш-таблица с цепочками и инкрементальным рехешированием.
///
/// Записи хранятся в арене (`SlotMap`), бакеты держат только головы цепочек
/// в виде `EntryId`. Перенос записи между таблицами меняет только ссылки,
/// поэтому `EntryId` стабилен всё время жизни записи.
///
/// **ИНВАРИАНТЫ:**
///
/// - Если `rehash_idx == None`:
///     - ht[1] пуста (size = 0, used = 0)
///     - все записи находятся в ht[0]
///
/// - Если `rehash_idx == Some(i)`:
///     - бакеты ht[0] с индексами `< i` пусты
///     - новые записи добавляются только в ht[1]
///
/// - Общее количество записей всегда равно `ht[0].used + ht[1].used`.
/// - Ключ встречается не более одного раза (по `DictType::key_eq`).
/// - Размер каждой выделенной таблицы — степень двойки.
///
/// Рехеширование выполняется по одному бакету на каждой операции поиска,
/// вставки или удаления, если нет живых безопасных итераторов.
pub struct Dict<K, V, T = DefaultDictType>
where
    T: DictType<K, V>,
{
    pub(crate) dict_type: T,
    pub(crate) config: DictConfig,
    pub(crate) entries: SlotMap<EntryId, DictNode<K, V>>,
    pub(crate) ht: [HashTable; 2],
    pub(crate) rehash_idx: Option<usize>,
    /// Число живых безопасных итераторов; пока > 0, рехеширование стоит.
    pub(crate) iterators: Arc<AtomicUsize>,
}

/// Цель поиска при отвязывании записи от цепочки.
enum Target<'a, K> {
    Key(&'a K),
    Id(EntryId),
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl<K, V> Dict<K, V, DefaultDictType>
where
    K: Hash + Eq,
{
    /// Создаёт пустой словарь с типом по умолчанию. Таблицы не выделяются
    /// до первой вставки.
    pub fn new() -> Self {
        Self::with_type(DefaultDictType::new())
    }

    /// Создаёт словарь и сразу выделяет таблицу не меньше `capacity`.
    pub fn with_capacity(capacity: usize) -> DictResult<Self> {
        let mut dict = Self::new();
        dict.expand(capacity)?;
        Ok(dict)
    }
}

impl<K, V, T> Dict<K, V, T>
where
    T: DictType<K, V>,
{
    /// Создаёт пустой словарь с заданным набором колбэков.
    pub fn with_type(dict_type: T) -> Self {
        Self::with_config(dict_type, DictConfig::default())
    }

    /// Создаёт пустой словарь с колбэками и настройками роста.
    pub fn with_config(
        dict_type: T,
        config: DictConfig,
    ) -> Self {
        Dict {
            dict_type,
            config,
            entries: SlotMap::with_key(),
            ht: [HashTable::default(), HashTable::default()],
            rehash_idx: None,
            iterators: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Колбэки словаря.
    pub fn dict_type(&self) -> &T {
        &self.dict_type
    }

    /// Настройки роста и рехеширования.
    pub fn config(&self) -> &DictConfig {
        &self.config
    }

    /// Количество записей в обеих таблицах.
    #[inline]
    pub fn len(&self) -> usize {
        self.ht[0].used + self.ht[1].used
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Суммарное число бакетов обеих таблиц.
    #[inline]
    pub fn buckets(&self) -> usize {
        self.ht[0].size() + self.ht[1].size()
    }

    /// Целевой размер: ht[1] во время рехеширования, иначе ht[0].
    #[inline]
    pub fn size(&self) -> usize {
        if self.is_rehashing() {
            self.ht[1].size()
        } else {
            self.ht[0].size()
        }
    }

    /// Размер таблицы `table` (0 или 1).
    pub fn table_size(
        &self,
        table: usize,
    ) -> usize {
        self.ht[table].size()
    }

    /// Число записей в таблице `table` (0 или 1).
    pub fn table_used(
        &self,
        table: usize,
    ) -> usize {
        self.ht[table].used
    }

    #[inline]
    pub fn is_rehashing(&self) -> bool {
        self.rehash_idx.is_some()
    }

    /// Индекс следующего переносимого бакета ht[0].
    pub fn rehash_index(&self) -> Option<usize> {
        self.rehash_idx
    }

    /// `true`, если живёт хотя бы один безопасный итератор.
    #[inline]
    pub fn is_rehash_paused(&self) -> bool {
        self.iterators.load(Ordering::Acquire) > 0
    }

    /// Создаёт или увеличивает таблицу до степени двойки не меньше
    /// `max(size, len)`.
    ///
    /// Первая таблица выделяется сразу в ht[0]. Иначе новая таблица
    /// становится ht[1] и начинается рехеширование. Размер меньше текущего
    /// тоже допустим: так словарь сжимается.
    pub fn expand(
        &mut self,
        size: usize,
    ) -> DictResult<()> {
        if self.is_rehashing() {
            return Err(DictError::RehashInProgress);
        }

        let target = size.max(self.ht[0].used);
        let real_size = next_power(target, self.config.initial_size).ok_or_else(|| {
            error!(buckets = target, "dict table size overflows usize");
            DictError::AllocationFailure { buckets: target }
        })?;

        if real_size == self.ht[0].size() {
            return Err(DictError::SameSize { size: real_size });
        }

        let table = HashTable::with_capacity(real_size).inspect_err(|_| {
            error!(buckets = real_size, "dict table allocation failed");
        })?;

        if self.ht[0].is_empty_table() {
            self.ht[0] = table;
            return Ok(());
        }

        debug!(
            from = self.ht[0].size(),
            to = real_size,
            used = self.ht[0].used,
            "dict rehash started"
        );
        self.ht[1] = table;
        self.rehash_idx = Some(0);
        Ok(())
    }

    /// Сжимает таблицу до минимального размера, вмещающего все записи
    /// (не меньше `initial_size`).
    pub fn resize(&mut self) -> DictResult<()> {
        if !resize_enabled() {
            return Err(DictError::ResizeDisabled);
        }
        if self.is_rehashing() {
            return Err(DictError::RehashInProgress);
        }

        let minimal = self.ht[0].used.max(self.config.initial_size);
        self.expand(minimal)
    }

    /// `true`, если таблица заполнена меньше чем на 10% и её стоит сжать.
    pub fn needs_resize(&self) -> bool {
        let size = self.ht[0].size();
        let used = self.ht[0].used;
        size > self.config.initial_size && used * 100 / size < 10
    }

    pub(crate) fn expand_if_needed(&mut self) -> DictResult<()> {
        if self.is_rehashing() {
            return Ok(());
        }

        let size = self.ht[0].size();
        if size == 0 {
            return self.expand(self.config.initial_size);
        }

        let used = self.ht[0].used;
        if used >= size {
            let enabled = resize_enabled();
            if enabled || used / size > self.config.force_resize_ratio {
                if !enabled {
                    warn!(used, size, "dict growth forced while resize is disabled");
                }
                return self.expand(used.saturating_mul(2));
            }
        }

        Ok(())
    }

    /// Выполняет до `n` шагов рехеширования (один шаг — один непустой
    /// бакет ht[0]).
    ///
    /// Пропуск пустых бакетов ограничен `n * rehash_empty_visits`.
    /// Возвращает `true`, если работа ещё осталась. Пока живы безопасные
    /// итераторы, ничего не делает.
    pub fn rehash(
        &mut self,
        n: usize,
    ) -> bool {
        let Some(mut idx) = self.rehash_idx else {
            return false;
        };
        if self.is_rehash_paused() {
            return true;
        }

        let mut empty_visits = n.saturating_mul(self.config.rehash_empty_visits);
        let mut n = n;

        while n > 0 && self.ht[0].used != 0 {
            n -= 1;

            while self.ht[0].buckets[idx].is_none() {
                idx += 1;
                empty_visits = empty_visits.saturating_sub(1);
                if empty_visits == 0 {
                    self.rehash_idx = Some(idx);
                    return true;
                }
            }

            let mut cur = self.ht[0].buckets[idx].take();
            while let Some(id) = cur {
                let node = &mut self.entries[id];
                cur = node.next;

                let slot = self.ht[1].slot(self.dict_type.hash(&node.key));
                node.next = self.ht[1].buckets[slot];
                self.ht[1].buckets[slot] = Some(id);

                self.ht[0].used -= 1;
                self.ht[1].used += 1;
            }
            idx += 1;
        }

        if self.ht[0].used == 0 {
            self.ht[0] = std::mem::take(&mut self.ht[1]);
            self.rehash_idx = None;
            debug!(
                size = self.ht[0].size(),
                used = self.ht[0].used,
                "dict rehash completed"
            );
            return false;
        }

        self.rehash_idx = Some(idx);
        true
    }

    /// Рехеширует пачками по `rehash_batch` шагов, пока не истечёт `budget`
    /// или не закончится работа. Возвращает число выполненных шагов (кратно
    /// размеру пачки).
    pub fn rehash_for(
        &mut self,
        budget: Duration,
    ) -> usize {
        if !self.is_rehashing() || self.is_rehash_paused() {
            return 0;
        }

        let start = Instant::now();
        let batch = self.config.rehash_batch;
        let mut rehashes = 0;

        while self.rehash(batch) {
            rehashes += batch;
            if start.elapsed() >= budget {
                break;
            }
        }

        trace!(
            rehashes,
            elapsed_us = start.elapsed().as_micros() as u64,
            "dict timed rehash finished"
        );
        rehashes
    }

    /// Один шаг рехеширования, выполняемый попутно с обычными операциями.
    #[inline]
    pub(crate) fn rehash_step(&mut self) {
        if self.is_rehashing() {
            self.rehash(1);
        }
    }

    #[inline]
    pub(crate) fn hash_key(
        &self,
        key: &K,
    ) -> u64 {
        self.dict_type.hash(key)
    }

    /// Поиск записи по ключу и готовому хешу без шага рехеширования.
    pub(crate) fn find_with_hash(
        &self,
        key: &K,
        hash: u64,
    ) -> Option<EntryId> {
        if self.is_empty() {
            return None;
        }

        for t in 0..=1 {
            let table = &self.ht[t];
            if !table.is_empty_table() {
                let mut cur = table.buckets[table.slot(hash)];
                while let Some(id) = cur {
                    let node = &self.entries[id];
                    if self.dict_type.key_eq(&node.key, key) {
                        return Some(id);
                    }
                    cur = node.next;
                }
            }
            if !self.is_rehashing() {
                break;
            }
        }

        None
    }

    /// Привязывает новую запись в голову цепочки: в ht[1] во время
    /// рехеширования, иначе в ht[0]. Таблица должна быть выделена.
    pub(crate) fn link(
        &mut self,
        hash: u64,
        key: K,
        val: V,
    ) -> EntryId {
        let t = if self.is_rehashing() { 1 } else { 0 };
        let slot = self.ht[t].slot(hash);
        let head = self.ht[t].buckets[slot];

        let id = self.entries.insert(DictNode {
            key,
            val,
            next: head,
        });
        self.ht[t].buckets[slot] = Some(id);
        self.ht[t].used += 1;
        id
    }

    /// Вставляет пару `(key, val)`. Если ключ уже есть, возвращает
    /// `KeyExists` и ничего не меняет.
    pub fn add(
        &mut self,
        key: K,
        val: V,
    ) -> DictResult<EntryId> {
        self.rehash_step();

        let hash = self.hash_key(&key);
        if self.find_with_hash(&key, hash).is_some() {
            return Err(DictError::KeyExists);
        }

        self.expand_if_needed()?;

        let key = self.dict_type.dup_key(key)?;
        let val = match self.dict_type.dup_val(val) {
            Ok(val) => val,
            Err(e) => {
                self.dict_type.destroy_key(key);
                return Err(e);
            }
        };

        Ok(self.link(hash, key, val))
    }

    /// Вставляет или заменяет значение.
    ///
    /// Возвращает `true`, если ключ был добавлен, и `false`, если заменено
    /// значение существующей записи. Новое значение копируется раньше, чем
    /// освобождается старое, а `EntryId` записи сохраняется.
    pub fn replace(
        &mut self,
        key: K,
        val: V,
    ) -> DictResult<bool> {
        match self.entry(key)? {
            Entry::Occupied(mut e) => {
                e.replace(val)?;
                Ok(false)
            }
            Entry::Vacant(e) => {
                e.insert(val)?;
                Ok(true)
            }
        }
    }

    /// Ищет запись по ключу, попутно делая шаг рехеширования.
    pub fn find(
        &mut self,
        key: &K,
    ) -> Option<(&K, &V)> {
        let id = self.find_id(key)?;
        self.get_by_id(id)
    }

    /// Идентификатор записи с ключом `key`.
    pub fn find_id(
        &mut self,
        key: &K,
    ) -> Option<EntryId> {
        if self.is_empty() {
            return None;
        }
        self.rehash_step();
        let hash = self.hash_key(key);
        self.find_with_hash(key, hash)
    }

    /// Значение по ключу.
    pub fn fetch_value(
        &mut self,
        key: &K,
    ) -> Option<&V> {
        self.find(key).map(|(_, v)| v)
    }

    /// Изменяемая ссылка на значение по ключу.
    pub fn get_mut(
        &mut self,
        key: &K,
    ) -> Option<&mut V> {
        let id = self.find_id(key)?;
        self.entries.get_mut(id).map(|node| &mut node.val)
    }

    /// Поиск без шага рехеширования, по разделяемой ссылке.
    pub fn peek(
        &self,
        key: &K,
    ) -> Option<(&K, &V)> {
        let id = self.find_with_hash(key, self.hash_key(key))?;
        self.get_by_id(id)
    }

    pub fn contains_key(
        &self,
        key: &K,
    ) -> bool {
        self.find_with_hash(key, self.hash_key(key)).is_some()
    }

    /// Запись по идентификатору, если она ещё жива.
    pub fn get_by_id(
        &self,
        id: EntryId,
    ) -> Option<(&K, &V)> {
        self.entries.get(id).map(|node| (&node.key, &node.val))
    }

    /// Изменяемое значение по идентификатору.
    pub fn get_by_id_mut(
        &mut self,
        id: EntryId,
    ) -> Option<&mut V> {
        self.entries.get_mut(id).map(|node| &mut node.val)
    }

    /// Удаляет запись и освобождает её ключ и значение через `DictType`.
    pub fn delete(
        &mut self,
        key: &K,
    ) -> DictResult<()> {
        let (k, v) = self.take(key)?;
        self.dict_type.destroy_key(k);
        self.dict_type.destroy_val(v);
        Ok(())
    }

    /// Отвязывает запись и возвращает её ключ и значение без освобождения.
    pub fn take(
        &mut self,
        key: &K,
    ) -> DictResult<(K, V)> {
        if self.is_empty() {
            return Err(DictError::KeyNotFound);
        }
        self.rehash_step();

        let hash = self.hash_key(key);
        self.unlink(hash, Target::Key(key))
            .ok_or(DictError::KeyNotFound)
    }

    /// Отвязывает запись по идентификатору.
    pub(crate) fn take_by_id(
        &mut self,
        id: EntryId,
    ) -> Option<(K, V)> {
        let hash = self.hash_key(&self.entries.get(id)?.key);
        self.unlink(hash, Target::Id(id))
    }

    fn unlink(
        &mut self,
        hash: u64,
        target: Target<'_, K>,
    ) -> Option<(K, V)> {
        for t in 0..=1 {
            if !self.ht[t].is_empty_table() {
                let slot = self.ht[t].slot(hash);
                let mut prev: Option<EntryId> = None;
                let mut cur = self.ht[t].buckets[slot];

                while let Some(id) = cur {
                    let node = &self.entries[id];
                    let next = node.next;
                    let matched = match &target {
                        Target::Key(key) => self.dict_type.key_eq(&node.key, key),
                        Target::Id(target_id) => *target_id == id,
                    };

                    if matched {
                        match prev {
                            Some(p) => self.entries[p].next = next,
                            None => self.ht[t].buckets[slot] = next,
                        }
                        self.ht[t].used -= 1;
                        return self.entries.remove(id).map(|node| (node.key, node.val));
                    }

                    prev = cur;
                    cur = next;
                }
            }
            if !self.is_rehashing() {
                break;
            }
        }

        None
    }

    /// Удаляет все записи, освобождая их через `DictType`, и возвращает
    /// словарь в начальное состояние.
    pub fn clear(&mut self) {
        self.clear_with(|_| {});
    }

    /// То же, что `clear`, но вызывает `progress(index)` на каждом
    /// 65536-м бакете, чтобы вызывающий код мог делать фоновую работу
    /// во время долгой очистки.
    pub fn clear_with<F>(
        &mut self,
        mut progress: F,
    ) where
        F: FnMut(usize),
    {
        for t in 0..=1 {
            let table = std::mem::take(&mut self.ht[t]);
            let mut remaining = table.used;

            for (i, head) in table.buckets.into_iter().enumerate() {
                if remaining == 0 {
                    break;
                }
                if i % CLEAR_PROGRESS_INTERVAL == 0 {
                    progress(i);
                }

                let mut cur = head;
                while let Some(id) = cur {
                    let Some(node) = self.entries.remove(id) else {
                        break;
                    };
                    cur = node.next;
                    remaining -= 1;
                    self.dict_type.destroy_key(node.key);
                    self.dict_type.destroy_val(node.val);
                }
            }
        }

        self.entries.clear();
        self.rehash_idx = None;
    }
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов для Dict
////////////////////////////////////////////////////////////////////////////////

impl<K, V> Default for Dict<K, V, DefaultDictType>
where
    K: Hash + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, T> Drop for Dict<K, V, T>
where
    T: DictType<K, V>,
{
    fn drop(&mut self) {
        self.clear();
    }
}

/// Копия получает собственный счётчик безопасных итераторов: итераторы
/// оригинала не останавливают рехеширование копии.
impl<K, V, T> Clone for Dict<K, V, T>
where
    K: Clone,
    V: Clone,
    T: DictType<K, V> + Clone,
{
    fn clone(&self) -> Self {
        Dict {
            dict_type: self.dict_type.clone(),
            config: self.config,
            entries: self.entries.clone(),
            ht: self.ht.clone(),
            rehash_idx: self.rehash_idx,
            iterators: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl<K, V, T> fmt::Debug for Dict<K, V, T>
where
    K: fmt::Debug,
    V: fmt::Debug,
    T: DictType<K, V>,
{
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
