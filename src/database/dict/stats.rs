use std::fmt;

use super::{dict_base::Dict, dict_type::DictType, table::HashTable};

/// Число корзин гистограммы длин цепочек; последняя собирает все
/// цепочки длиннее.
pub const STATS_VECTLEN: usize = 50;

/// Статистика одной таблицы.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableStats {
    /// 0 — основная таблица, 1 — таблица рехеширования.
    pub table: usize,
    pub size: usize,
    pub used: usize,
    /// Число непустых бакетов.
    pub slots: usize,
    pub max_chain_len: usize,
    pub total_chain_len: usize,
    pub chain_len_histogram: [usize; STATS_VECTLEN],
}

/// Статистика словаря: ht[0] и, во время рехеширования, ht[1].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictStats {
    pub tables: Vec<TableStats>,
}

impl<K, V, T> Dict<K, V, T>
where
    T: DictType<K, V>,
{
    /// Собирает статистику заполнения таблиц. Проходит все бакеты.
    pub fn stats(&self) -> DictStats {
        let count = if self.is_rehashing() { 2 } else { 1 };
        DictStats {
            tables: (0..count)
                .map(|t| self.table_stats(t, &self.ht[t]))
                .collect(),
        }
    }

    fn table_stats(
        &self,
        index: usize,
        table: &HashTable,
    ) -> TableStats {
        let mut stats = TableStats {
            table: index,
            size: table.size(),
            used: table.used,
            slots: 0,
            max_chain_len: 0,
            total_chain_len: 0,
            chain_len_histogram: [0; STATS_VECTLEN],
        };

        for head in &table.buckets {
            let mut len = 0;
            let mut cur = *head;
            while let Some(id) = cur {
                len += 1;
                cur = self.entries[id].next;
            }

            stats.chain_len_histogram[len.min(STATS_VECTLEN - 1)] += 1;
            if len > 0 {
                stats.slots += 1;
                stats.total_chain_len += len;
                stats.max_chain_len = stats.max_chain_len.max(len);
            }
        }

        stats
    }
}

impl fmt::Display for TableStats {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let name = if self.table == 0 {
            "main hash table"
        } else {
            "rehashing target"
        };

        if self.used == 0 {
            return writeln!(
                f,
                "Hash table {} stats ({name}):\nNo stats available for empty dictionaries",
                self.table
            );
        }

        writeln!(f, "Hash table {} stats ({name}):", self.table)?;
        writeln!(f, " table size: {}", self.size)?;
        writeln!(f, " number of elements: {}", self.used)?;
        writeln!(f, " different slots: {}", self.slots)?;
        writeln!(f, " max chain length: {}", self.max_chain_len)?;
        writeln!(
            f,
            " avg chain length (counted): {:.2}",
            self.total_chain_len as f64 / self.slots as f64
        )?;
        writeln!(
            f,
            " avg chain length (computed): {:.2}",
            self.used as f64 / self.slots as f64
        )?;
        writeln!(f, " Chain length distribution:")?;

        for (len, &n) in self.chain_len_histogram.iter().enumerate() {
            if n == 0 {
                continue;
            }
            writeln!(
                f,
                "   {len}: {n} ({:.2}%)",
                n as f64 * 100.0 / self.size as f64
            )?;
        }

        Ok(())
    }
}

impl fmt::Display for DictStats {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        for table in &self.tables {
            write!(f, "{table}")?;
        }
        Ok(())
    }
}
