//! Курсорный обход без состояния на стороне словаря.
//!
//! Курсор увеличивается в обратном порядке бит: старшие биты индекса
//! меняются первыми. Поэтому бакеты, уже пройденные в меньшей таблице,
//! соответствуют уже пройденным бакетам в большей, и рост или сжатие между
//! вызовами не приводят к пропуску записей.

use super::{dict_base::Dict, dict_type::DictType, table::HashTable};

impl<K, V, T> Dict<K, V, T>
where
    T: DictType<K, V>,
{
    /// Посещает записи бакетов, на которые указывает `cursor`, и возвращает
    /// следующий курсор. Обход начинается и заканчивается курсором 0.
    ///
    /// Каждая запись, присутствующая от первого до последнего вызова,
    /// будет посещена хотя бы один раз; отдельные записи могут быть
    /// посещены повторно.
    pub fn scan<F>(
        &self,
        cursor: u64,
        mut f: F,
    ) -> u64
    where
        F: FnMut(&K, &V),
    {
        if self.is_empty() {
            return 0;
        }

        let mut v = cursor;

        let m0 = if !self.is_rehashing() {
            let t0 = &self.ht[0];
            let m0 = t0.size_mask as u64;
            self.scan_bucket(t0, v & m0, &mut f);
            m0
        } else {
            let (small, large) = if self.ht[0].size() <= self.ht[1].size() {
                (&self.ht[0], &self.ht[1])
            } else {
                (&self.ht[1], &self.ht[0])
            };
            let m0 = small.size_mask as u64;
            let m1 = large.size_mask as u64;

            self.scan_bucket(small, v & m0, &mut f);

            // все бакеты большей таблицы, раскрывающие бакет меньшей
            loop {
                self.scan_bucket(large, v & m1, &mut f);

                v = ((v | m0).wrapping_add(1) & !m0) | (v & m0);
                if v & (m0 ^ m1) == 0 {
                    break;
                }
            }
            m0
        };

        // незамаскированные биты выставлены, чтобы перенос шёл только по
        // битам меньшей таблицы
        v |= !m0;
        v = v.reverse_bits().wrapping_add(1).reverse_bits();
        v
    }

    fn scan_bucket<F>(
        &self,
        table: &HashTable,
        index: u64,
        f: &mut F,
    ) where
        F: FnMut(&K, &V),
    {
        let mut cur = table.buckets[index as usize];
        while let Some(id) = cur {
            let node = &self.entries[id];
            f(&node.key, &node.val);
            cur = node.next;
        }
    }
}
