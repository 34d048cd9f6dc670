use super::{dict_base::Dict, dict_type::DictType, table::EntryId};
use crate::error::DictResult;

/// Представление одной позиции словаря: занятой или свободной.
pub enum Entry<'a, K, V, T>
where
    T: DictType<K, V>,
{
    Occupied(OccupiedEntry<'a, K, V, T>),
    Vacant(VacantEntry<'a, K, V, T>),
}

/// Существующая запись.
pub struct OccupiedEntry<'a, K, V, T>
where
    T: DictType<K, V>,
{
    pub(crate) dict: &'a mut Dict<K, V, T>,
    pub(crate) id: EntryId,
}

/// Свободная позиция. Ключ уже скопирован через `DictType::dup_key`, таблица
/// выделена, поэтому `insert` только копирует значение и привязывает запись.
pub struct VacantEntry<'a, K, V, T>
where
    T: DictType<K, V>,
{
    pub(crate) dict: &'a mut Dict<K, V, T>,
    pub(crate) key: K,
    pub(crate) hash: u64,
}

impl<K, V, T> Dict<K, V, T>
where
    T: DictType<K, V>,
{
    /// Находит запись по ключу или готовит место для неё.
    ///
    /// Делает шаг рехеширования и, если ключа нет, рост таблицы, поэтому
    /// может вернуть ошибку выделения памяти или копирования ключа.
    pub fn entry(
        &mut self,
        key: K,
    ) -> DictResult<Entry<'_, K, V, T>> {
        self.rehash_step();

        let hash = self.hash_key(&key);
        if let Some(id) = self.find_with_hash(&key, hash) {
            return Ok(Entry::Occupied(OccupiedEntry { dict: self, id }));
        }

        self.expand_if_needed()?;
        let key = self.dict_type.dup_key(key)?;

        Ok(Entry::Vacant(VacantEntry {
            dict: self,
            key,
            hash,
        }))
    }
}

impl<'a, K, V, T> OccupiedEntry<'a, K, V, T>
where
    T: DictType<K, V>,
{
    #[inline]
    pub fn id(&self) -> EntryId {
        self.id
    }

    #[inline]
    pub fn key(&self) -> &K {
        &self.dict.entries[self.id].key
    }

    #[inline]
    pub fn get(&self) -> &V {
        &self.dict.entries[self.id].val
    }

    #[inline]
    pub fn get_mut(&mut self) -> &mut V {
        &mut self.dict.entries[self.id].val
    }

    #[inline]
    pub fn into_mut(self) -> &'a mut V {
        let OccupiedEntry { dict, id } = self;
        &mut dict.entries[id].val
    }

    /// Подменяет значение как есть и возвращает старое, без колбэков.
    #[inline]
    pub fn insert(
        &mut self,
        val: V,
    ) -> V {
        std::mem::replace(self.get_mut(), val)
    }

    /// Заменяет значение через `DictType`: новое копируется `dup_val`,
    /// старое освобождается `destroy_val`. Порядок важен, если новое и
    /// старое значения разделяют ресурс.
    pub fn replace(
        &mut self,
        val: V,
    ) -> DictResult<()> {
        let val = self.dict.dict_type.dup_val(val)?;
        let old = std::mem::replace(&mut self.dict.entries[self.id].val, val);
        self.dict.dict_type.destroy_val(old);
        Ok(())
    }

    /// Отвязывает запись и возвращает её ключ и значение.
    pub fn remove(self) -> (K, V) {
        match self.dict.take_by_id(self.id) {
            Some(pair) => pair,
            None => unreachable!("occupied entry is always linked"),
        }
    }
}

impl<'a, K, V, T> VacantEntry<'a, K, V, T>
where
    T: DictType<K, V>,
{
    #[inline]
    pub fn key(&self) -> &K {
        &self.key
    }

    #[inline]
    pub fn into_key(self) -> K {
        self.key
    }

    /// Копирует значение и привязывает запись в голову цепочки. Если
    /// копирование не удалось, ключ освобождается.
    pub fn insert(
        self,
        val: V,
    ) -> DictResult<&'a mut V> {
        let dict = self.dict;
        let val = match dict.dict_type.dup_val(val) {
            Ok(val) => val,
            Err(e) => {
                dict.dict_type.destroy_key(self.key);
                return Err(e);
            }
        };

        let id = dict.link(self.hash, self.key, val);
        Ok(&mut dict.entries[id].val)
    }
}

impl<'a, K, V, T> Entry<'a, K, V, T>
where
    T: DictType<K, V>,
    V: Default,
{
    #[inline]
    pub fn or_default(self) -> DictResult<&'a mut V> {
        self.or_insert_with(V::default)
    }
}

impl<'a, K, V, T> Entry<'a, K, V, T>
where
    T: DictType<K, V>,
{
    pub fn or_insert(
        self,
        default: V,
    ) -> DictResult<&'a mut V> {
        match self {
            Entry::Occupied(e) => Ok(e.into_mut()),
            Entry::Vacant(e) => e.insert(default),
        }
    }

    pub fn or_insert_with(
        self,
        f: impl FnOnce() -> V,
    ) -> DictResult<&'a mut V> {
        match self {
            Entry::Occupied(e) => Ok(e.into_mut()),
            Entry::Vacant(e) => e.insert(f()),
        }
    }

    pub fn or_insert_with_key(
        self,
        f: impl FnOnce(&K) -> V,
    ) -> DictResult<&'a mut V> {
        match self {
            Entry::Occupied(e) => Ok(e.into_mut()),
            Entry::Vacant(e) => {
                let val = f(&e.key);
                e.insert(val)
            }
        }
    }

    pub fn and_modify(
        self,
        f: impl FnOnce(&mut V),
    ) -> Self {
        match self {
            Entry::Occupied(mut e) => {
                f(e.get_mut());
                Entry::Occupied(e)
            }
            Entry::Vacant(e) => Entry::Vacant(e),
        }
    }

    pub fn key(&self) -> &K {
        match self {
            Entry::Occupied(e) => e.key(),
            Entry::Vacant(e) => e.key(),
        }
    }
}
