use std::fmt;

use rand::Rng;

/// Ширина элементов `IntSet` в байтах.
///
/// Кодирование только расширяется: `Int16` → `Int32` → `Int64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IntSetEncoding {
    Int16 = 2,
    Int32 = 4,
    Int64 = 8,
}

/// Размер заголовка (кодирование + длина) в сериализованном виде.
const HEADER_LEN: usize = 8;

/// Итератор по всем элементам `IntSet` в порядке возрастания.
pub enum IntSetIter<'a> {
    Int16(std::slice::Iter<'a, i16>),
    Int32(std::slice::Iter<'a, i32>),
    Int64(std::slice::Iter<'a, i64>),
}

/// Отсортированный массив элементов одной ширины.
#[derive(Clone, PartialEq, Eq)]
enum Contents {
    Int16(Vec<i16>),
    Int32(Vec<i32>),
    Int64(Vec<i64>),
}

/// Компактное множество уникальных целых чисел с адаптивным хранением.
///
/// - Хранит элементы в отсортированном порядке без повторов.
/// - Все элементы имеют одну ширину — наименьшую, вмещающую каждый из них.
/// - Вставка числа, не влезающего в текущую ширину, расширяет весь массив.
///   Такое число всегда новый минимум или максимум.
#[derive(Clone, PartialEq, Eq)]
pub struct IntSet {
    contents: Contents,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl IntSetEncoding {
    /// Наименьшее кодирование, вмещающее `v`.
    #[inline]
    pub fn for_value(v: i64) -> Self {
        if i16::try_from(v).is_ok() {
            IntSetEncoding::Int16
        } else if i32::try_from(v).is_ok() {
            IntSetEncoding::Int32
        } else {
            IntSetEncoding::Int64
        }
    }

    /// Ширина элемента в байтах.
    #[inline]
    pub fn width(self) -> usize {
        self as usize
    }
}

impl IntSet {
    /// Создаёт пустое множество с кодированием `Int16`.
    pub fn new() -> Self {
        Self {
            contents: Contents::Int16(Vec::new()),
        }
    }

    /// Возвращает кол-во элементов во множестве.
    #[inline]
    pub fn len(&self) -> usize {
        match &self.contents {
            Contents::Int16(v) => v.len(),
            Contents::Int32(v) => v.len(),
            Contents::Int64(v) => v.len(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Текущее кодирование.
    #[inline]
    pub fn encoding(&self) -> IntSetEncoding {
        match &self.contents {
            Contents::Int16(_) => IntSetEncoding::Int16,
            Contents::Int32(_) => IntSetEncoding::Int32,
            Contents::Int64(_) => IntSetEncoding::Int64,
        }
    }

    /// Размер сериализованного множества: заголовок и `len × width` байт.
    #[inline]
    pub fn blob_len(&self) -> usize {
        HEADER_LEN + self.len() * self.encoding().width()
    }

    /// Проверяет, содержится ли значение во множестве.
    pub fn contains(
        &self,
        v: i64,
    ) -> bool {
        matches!(self.search(v), Some(Ok(_)))
    }

    /// Вставляет значение. `false`, если оно уже было.
    pub fn add(
        &mut self,
        v: i64,
    ) -> bool {
        if IntSetEncoding::for_value(v) > self.encoding() {
            self.upgrade_and_add(v);
            return true;
        }

        match &mut self.contents {
            Contents::Int16(data) => insert_sorted(data, v as i16),
            Contents::Int32(data) => insert_sorted(data, v as i32),
            Contents::Int64(data) => insert_sorted(data, v),
        }
    }

    /// Удаляет значение. `false`, если его не было.
    ///
    /// Кодирование после удаления не сужается.
    pub fn remove(
        &mut self,
        v: i64,
    ) -> bool {
        let Some(Ok(pos)) = self.search(v) else {
            return false;
        };

        match &mut self.contents {
            Contents::Int16(data) => {
                data.remove(pos);
            }
            Contents::Int32(data) => {
                data.remove(pos);
            }
            Contents::Int64(data) => {
                data.remove(pos);
            }
        }
        true
    }

    /// Элемент на позиции `pos` в порядке возрастания.
    pub fn get(
        &self,
        pos: usize,
    ) -> Option<i64> {
        match &self.contents {
            Contents::Int16(data) => data.get(pos).map(|&x| x as i64),
            Contents::Int32(data) => data.get(pos).map(|&x| x as i64),
            Contents::Int64(data) => data.get(pos).copied(),
        }
    }

    /// Случайный элемент или `None` для пустого множества.
    pub fn random(&self) -> Option<i64> {
        self.random_with(&mut rand::thread_rng())
    }

    /// То же, что `random`, с заданным генератором.
    pub fn random_with<R>(
        &self,
        rng: &mut R,
    ) -> Option<i64>
    where
        R: Rng + ?Sized,
    {
        if self.is_empty() {
            return None;
        }
        self.get(rng.gen_range(0..self.len()))
    }

    /// Наименьший элемент.
    pub fn min(&self) -> Option<i64> {
        self.get(0)
    }

    /// Наибольший элемент.
    pub fn max(&self) -> Option<i64> {
        self.len().checked_sub(1).and_then(|last| self.get(last))
    }

    /// Итератор по элементам в порядке возрастания.
    #[inline]
    pub fn iter(&self) -> IntSetIter<'_> {
        match &self.contents {
            Contents::Int16(data) => IntSetIter::Int16(data.iter()),
            Contents::Int32(data) => IntSetIter::Int32(data.iter()),
            Contents::Int64(data) => IntSetIter::Int64(data.iter()),
        }
    }

    /// Двоичный поиск в текущем кодировании.
    ///
    /// `None`, если значение не помещается в текущую ширину и заведомо
    /// отсутствует; иначе результат `binary_search`.
    fn search(
        &self,
        v: i64,
    ) -> Option<Result<usize, usize>> {
        match &self.contents {
            Contents::Int16(data) => {
                let x = i16::try_from(v).ok()?;
                Some(data.binary_search(&x))
            }
            Contents::Int32(data) => {
                let x = i32::try_from(v).ok()?;
                Some(data.binary_search(&x))
            }
            Contents::Int64(data) => Some(data.binary_search(&v)),
        }
    }

    /// Расширяет массив под кодирование `v` и добавляет `v` в начало
    /// (отрицательное — новый минимум) или в конец (новый максимум).
    fn upgrade_and_add(
        &mut self,
        v: i64,
    ) {
        let target = IntSetEncoding::for_value(v);
        let prepend = v < 0;
        let len = self.len();

        self.contents = match target {
            IntSetEncoding::Int16 => return,
            IntSetEncoding::Int32 => {
                let mut data = Vec::with_capacity(len + 1);
                if prepend {
                    data.push(v as i32);
                }
                data.extend(self.iter().map(|x| x as i32));
                if !prepend {
                    data.push(v as i32);
                }
                Contents::Int32(data)
            }
            IntSetEncoding::Int64 => {
                let mut data = Vec::with_capacity(len + 1);
                if prepend {
                    data.push(v);
                }
                data.extend(self.iter());
                if !prepend {
                    data.push(v);
                }
                Contents::Int64(data)
            }
        };
    }
}

/// Вставка в отсортированный вектор без повторов.
fn insert_sorted<T: Ord>(
    data: &mut Vec<T>,
    x: T,
) -> bool {
    match data.binary_search(&x) {
        Ok(_) => false,
        Err(pos) => {
            data.insert(pos, x);
            true
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов для IntSet, IntSetIter
////////////////////////////////////////////////////////////////////////////////

impl Default for IntSet {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for IntSet {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<i64> for IntSet {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        let mut set = IntSet::new();
        for v in iter {
            set.add(v);
        }
        set
    }
}

impl<'a> IntoIterator for &'a IntSet {
    type Item = i64;
    type IntoIter = IntSetIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> Iterator for IntSetIter<'a> {
    type Item = i64;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        match self {
            IntSetIter::Int16(iter) => iter.next().map(|&x| x as i64),
            IntSetIter::Int32(iter) => iter.next().map(|&x| x as i64),
            IntSetIter::Int64(iter) => iter.next().copied(),
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            IntSetIter::Int16(iter) => iter.size_hint(),
            IntSetIter::Int32(iter) => iter.size_hint(),
            IntSetIter::Int64(iter) => iter.size_hint(),
        }
    }
}

impl<'a> ExactSizeIterator for IntSetIter<'a> {}

impl<'a> DoubleEndedIterator for IntSetIter<'a> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        match self {
            IntSetIter::Int16(iter) => iter.next_back().map(|&x| x as i64),
            IntSetIter::Int32(iter) => iter.next_back().map(|&x| x as i64),
            IntSetIter::Int64(iter) => iter.next_back().copied(),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
