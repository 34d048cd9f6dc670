use rand::Rng;

use super::{dict_base::Dict, dict_type::DictType, table::EntryId};

impl<K, V, T> Dict<K, V, T>
where
    T: DictType<K, V>,
{
    /// Случайная запись. `None` для пустого словаря.
    ///
    /// Сначала выбирается случайный непустой бакет (во время
    /// рехеширования по обеим таблицам, без уже перенесённой части ht[0]),
    /// затем случайная запись его цепочки. Распределение не равномерное:
    /// записи из длинных цепочек выпадают реже.
    pub fn random_key(&mut self) -> Option<(&K, &V)> {
        self.random_key_with(&mut rand::thread_rng())
    }

    /// То же, что `random_key`, с заданным генератором.
    pub fn random_key_with<R>(
        &mut self,
        rng: &mut R,
    ) -> Option<(&K, &V)>
    where
        R: Rng + ?Sized,
    {
        let id = self.random_entry_id(rng)?;
        self.get_by_id(id)
    }

    /// До `count` записей из одной случайной области таблиц.
    ///
    /// Быстрее, чем `count` вызовов `random_key`, но записи не независимы:
    /// они берутся из соседних бакетов. Повторов нет.
    pub fn sample(
        &mut self,
        count: usize,
    ) -> Vec<(&K, &V)> {
        self.sample_with(count, &mut rand::thread_rng())
    }

    /// То же, что `sample`, с заданным генератором.
    pub fn sample_with<R>(
        &mut self,
        count: usize,
        rng: &mut R,
    ) -> Vec<(&K, &V)>
    where
        R: Rng + ?Sized,
    {
        let count = count.min(self.len());
        if count == 0 {
            return Vec::new();
        }

        // попутная работа пропорционально запрошенному
        for _ in 0..count {
            if !self.is_rehashing() {
                break;
            }
            self.rehash_step();
        }

        let this = &*self;
        this.sample_ids(count, rng)
            .into_iter()
            .filter_map(move |id| this.get_by_id(id))
            .collect()
    }

    fn random_entry_id<R>(
        &mut self,
        rng: &mut R,
    ) -> Option<EntryId>
    where
        R: Rng + ?Sized,
    {
        if self.is_empty() {
            return None;
        }
        self.rehash_step();

        let head = match self.rehash_idx {
            Some(rehash_idx) => {
                let size0 = self.ht[0].size();
                let total = size0 + self.ht[1].size();
                loop {
                    // бакеты ht[0] ниже rehash_idx уже пусты
                    let h = rng.gen_range(rehash_idx..total);
                    let head = if h >= size0 {
                        self.ht[1].buckets[h - size0]
                    } else {
                        self.ht[0].buckets[h]
                    };
                    if head.is_some() {
                        break head;
                    }
                }
            }
            None => loop {
                let h = rng.gen::<u64>() as usize & self.ht[0].size_mask;
                if let Some(id) = self.ht[0].buckets[h] {
                    break Some(id);
                }
            },
        }?;

        let mut chain_len = 0;
        let mut cur = Some(head);
        while let Some(id) = cur {
            chain_len += 1;
            cur = self.entries[id].next;
        }

        let mut picked = head;
        for _ in 0..rng.gen_range(0..chain_len) {
            picked = self.entries[picked].next?;
        }
        Some(picked)
    }

    fn sample_ids<R>(
        &self,
        count: usize,
        rng: &mut R,
    ) -> Vec<EntryId>
    where
        R: Rng + ?Sized,
    {
        let tables = if self.is_rehashing() { 2 } else { 1 };
        let max_mask = self.ht[..tables]
            .iter()
            .map(|t| t.size_mask)
            .max()
            .unwrap_or(0);

        let mut out = Vec::with_capacity(count);
        let mut i = rng.gen::<u64>() as usize & max_mask;

        // каждый индекс проходится не более одного раза
        for _ in 0..=max_mask {
            for t in 0..tables {
                let table = &self.ht[t];
                let migrated = t == 0 && self.rehash_idx.is_some_and(|r| i < r);
                if migrated || i >= table.size() {
                    continue;
                }

                let mut cur = table.buckets[i];
                while let Some(id) = cur {
                    out.push(id);
                    if out.len() == count {
                        return out;
                    }
                    cur = self.entries[id].next;
                }
            }
            i = (i + 1) & max_mask;
        }

        out
    }
}
