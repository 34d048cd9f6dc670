use slotmap::new_key_type;

use crate::error::{DictError, DictResult};

new_key_type! {
    /// Стабильный идентификатор записи словаря.
    ///
    /// Остаётся валидным, пока запись не удалена, в том числе при переносе
    /// записи между таблицами во время рехеширования. После удаления
    /// идентификатор больше не разрешается, даже если слот переиспользован.
    pub struct EntryId;
}

/// Запись в цепочке коллизий.
#[derive(Debug, Clone)]
pub(crate) struct DictNode<K, V> {
    pub(crate) key: K,
    pub(crate) val: V,
    pub(crate) next: Option<EntryId>,
}

/// Одна таблица: бакеты (головы цепочек), маска размера и число записей.
///
/// Размер таблицы либо 0 (таблица не выделена), либо степень двойки.
#[derive(Debug, Clone, Default)]
pub(crate) struct HashTable {
    pub(crate) buckets: Vec<Option<EntryId>>,
    pub(crate) size_mask: usize,
    pub(crate) used: usize,
}

impl HashTable {
    /// Выделяет таблицу ровно на `size` бакетов (`size` — степень двойки).
    ///
    /// Нехватка памяти возвращается как ошибка, а не аварийное завершение.
    pub(crate) fn with_capacity(size: usize) -> DictResult<Self> {
        debug_assert!(size.is_power_of_two());

        let mut buckets = Vec::new();
        buckets
            .try_reserve_exact(size)
            .map_err(|_| DictError::AllocationFailure { buckets: size })?;
        buckets.resize(size, None);

        Ok(HashTable {
            buckets,
            size_mask: size - 1,
            used: 0,
        })
    }

    #[inline]
    pub(crate) fn size(&self) -> usize {
        self.buckets.len()
    }

    /// `true`, если бакеты не выделены.
    #[inline]
    pub(crate) fn is_empty_table(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Индекс бакета для хеша.
    #[inline]
    pub(crate) fn slot(
        &self,
        hash: u64,
    ) -> usize {
        (hash as usize) & self.size_mask
    }
}

/// Наименьшая степень двойки, не меньшая `max(size, min)`.
///
/// `None`, если такая степень не помещается в `usize`.
pub(crate) fn next_power(
    size: usize,
    min: usize,
) -> Option<usize> {
    size.max(min).max(1).checked_next_power_of_two()
}
