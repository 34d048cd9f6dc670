use std::{
    cmp::Ordering,
    fmt::{self, Display},
    hash::{Hash, Hasher},
    ops::{Deref, DerefMut},
    str::{from_utf8, Utf8Error},
};

/// Порог жадного роста: ниже него ёмкость удваивается, выше — растёт на
/// этот шаг.
pub const SDS_MAX_PREALLOC: usize = 1024 * 1024;

#[derive(Debug, Clone)]
enum Repr {
    Inline { len: u8, buf: [u8; Sds::INLINE_CAP] },
    Heap { buf: Vec<u8> },
}

/// Бинарно-безопасная динамическая строка.
///
/// Короткие строки (до `INLINE_CAP` байт) хранятся прямо в структуре,
/// длинные — в куче с запасом ёмкости под будущие дописывания.
#[derive(Debug, Clone)]
pub struct Sds(Repr);

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl Sds {
    pub const INLINE_CAP: usize = std::mem::size_of::<usize>() * 3 - 1;

    /// Пустая строка.
    #[inline]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Строка с копией `init`.
    #[inline]
    pub fn new<B: AsRef<[u8]>>(init: B) -> Self {
        Self::from_bytes(init)
    }

    /// Создаёт `Sds` из вектора байт, выбирая `inline` или `heap` в зависимости
    /// от длины.
    #[inline(always)]
    pub fn from_vec(vec: Vec<u8>) -> Self {
        if vec.len() <= Self::INLINE_CAP {
            Self::inline_from(&vec)
        } else {
            Sds(Repr::Heap { buf: vec })
        }
    }

    /// Создаёт `Sds` из байтов среза, копируя данные.
    #[inline]
    pub fn from_bytes<B: AsRef<[u8]>>(bytes: B) -> Self {
        let slice = bytes.as_ref();

        if slice.len() <= Self::INLINE_CAP {
            Self::inline_from(slice)
        } else {
            Sds(Repr::Heap {
                buf: slice.to_vec(),
            })
        }
    }

    /// Создаёт `Sds` из `&str`, автоматически выбирая представление.
    #[allow(clippy::should_implement_trait)]
    #[inline]
    pub fn from_str(s: &str) -> Self {
        Self::from_bytes(s.as_bytes())
    }

    #[inline]
    pub fn from_string(s: String) -> Self {
        Self::from_vec(s.into_bytes())
    }

    /// Десятичное представление числа.
    pub fn from_i64(value: i64) -> Self {
        Self::from_string(value.to_string())
    }

    fn inline_from(slice: &[u8]) -> Self {
        let mut buf = [0u8; Self::INLINE_CAP];
        buf[..slice.len()].copy_from_slice(slice);

        Sds(Repr::Inline {
            len: slice.len() as u8,
            buf,
        })
    }

    /// Возвращает содержимое строки как срез байт.
    #[inline(always)]
    pub fn as_slice(&self) -> &[u8] {
        match &self.0 {
            Repr::Inline { len, buf } => &buf[..*len as usize],
            Repr::Heap { buf } => buf.as_slice(),
        }
    }

    /// Псевдоним для [`as_slice`](Sds::as_slice).
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.as_slice()
    }

    /// Возвращает изменяемый срез текущего содержимого строки.
    #[inline(always)]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        match &mut self.0 {
            Repr::Inline { len, buf } => &mut buf[..*len as usize],
            Repr::Heap { buf } => buf.as_mut_slice(),
        }
    }

    /// Возвращает текущую длину строки в байтах.
    #[inline]
    pub fn len(&self) -> usize {
        match &self.0 {
            Repr::Inline { len, .. } => *len as usize,
            Repr::Heap { buf } => buf.len(),
        }
    }

    /// Возвращает `true`, если строка пустая.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ёмкость буфера: длина плюс свободное место.
    #[inline]
    pub fn alloc_size(&self) -> usize {
        match &self.0 {
            Repr::Inline { .. } => Self::INLINE_CAP,
            Repr::Heap { buf } => buf.capacity(),
        }
    }

    /// Свободное место в конце буфера.
    #[inline]
    pub fn avail(&self) -> usize {
        self.alloc_size() - self.len()
    }

    /// Возвращает `true`, если строка хранится на стеке (inline).
    #[inline]
    pub fn is_inline(&self) -> bool {
        matches!(self.0, Repr::Inline { .. })
    }

    /// Гарантирует `avail() >= addlen`.
    ///
    /// Рост жадный: новая длина `len + addlen` удваивается, пока меньше
    /// `SDS_MAX_PREALLOC`, иначе к ней добавляется `SDS_MAX_PREALLOC`.
    /// Длина и содержимое не меняются.
    pub fn make_room_for(
        &mut self,
        addlen: usize,
    ) {
        if self.avail() >= addlen {
            return;
        }

        let len = self.len();
        let mut new_len = len + addlen;
        if new_len < SDS_MAX_PREALLOC {
            new_len *= 2;
        } else {
            new_len += SDS_MAX_PREALLOC;
        }

        match &mut self.0 {
            Repr::Inline { len, buf } => {
                let cur_len = *len as usize;
                let mut vec = Vec::with_capacity(new_len);
                vec.extend_from_slice(&buf[..cur_len]);
                self.0 = Repr::Heap { buf: vec };
            }
            Repr::Heap { buf } => buf.reserve_exact(new_len - len),
        }
    }

    /// Убирает свободное место. Короткая строка возвращается в inline.
    pub fn remove_free_space(&mut self) {
        if let Repr::Heap { buf } = &mut self.0 {
            buf.shrink_to_fit();
        }
        self.inline_downgrade();
    }

    /// Дополняет строку нулевыми байтами до длины `len`. Более короткую
    /// длину игнорирует.
    pub fn grow_zero(
        &mut self,
        len: usize,
    ) {
        let cur_len = self.len();
        if len <= cur_len {
            return;
        }

        self.make_room_for(len - cur_len);
        match &mut self.0 {
            Repr::Inline { len: l, buf } => {
                buf[cur_len..len].fill(0);
                *l = len as u8;
            }
            Repr::Heap { buf } => buf.resize(len, 0),
        }
    }

    /// Дописывает байты в конец строки.
    pub fn cat<B: AsRef<[u8]>>(
        &mut self,
        t: B,
    ) {
        let other = t.as_ref();
        self.make_room_for(other.len());

        match &mut self.0 {
            Repr::Inline { len, buf } => {
                let cur_len = *len as usize;
                let total = cur_len + other.len();
                buf[cur_len..total].copy_from_slice(other);
                *len = total as u8;
            }
            Repr::Heap { buf } => buf.extend_from_slice(other),
        }
    }

    /// Дописывает первые `len` байт `t`.
    ///
    /// # Panics
    ///
    /// Паникует, если `len > t.len()`.
    pub fn cat_len(
        &mut self,
        t: &[u8],
        len: usize,
    ) {
        self.cat(&t[..len]);
    }

    /// Дописывает другую `Sds`.
    pub fn cat_sds(
        &mut self,
        t: &Sds,
    ) {
        self.cat(t.as_slice());
    }

    /// Заменяет содержимое копией `t`, переиспользуя буфер.
    pub fn cpy<B: AsRef<[u8]>>(
        &mut self,
        t: B,
    ) {
        self.clear();
        self.cat(t);
    }

    /// Добавляет один байт в конец строки.
    #[inline]
    pub fn push(
        &mut self,
        byte: u8,
    ) {
        self.cat([byte]);
    }

    /// Очищает содержимое строки, сохраняя буфер.
    pub fn clear(&mut self) {
        match &mut self.0 {
            Repr::Inline { len, .. } => *len = 0,
            Repr::Heap { buf } => buf.clear(),
        }
    }

    /// Обрезает строку до `new_len` байт.
    pub fn truncate(
        &mut self,
        new_len: usize,
    ) {
        match &mut self.0 {
            Repr::Inline { len, .. } => {
                if new_len < *len as usize {
                    *len = new_len as u8;
                }
            }
            Repr::Heap { buf } => buf.truncate(new_len),
        }
    }

    /// Удаляет с обоих концов байты, входящие в `cset`.
    pub fn trim(
        &mut self,
        cset: &[u8],
    ) {
        let s = self.as_slice();
        let start = s.iter().position(|b| !cset.contains(b)).unwrap_or(s.len());
        let end = s
            .iter()
            .rposition(|b| !cset.contains(b))
            .map_or(start, |i| i + 1);

        self.keep_range(start, end - start);
    }

    /// Оставляет подстроку `[start, end]` включительно.
    ///
    /// Отрицательные индексы отсчитываются от конца (-1 — последний байт).
    /// Индексы за концом строки обрезаются, пустой диапазон даёт пустую
    /// строку.
    pub fn range(
        &mut self,
        start: isize,
        end: isize,
    ) {
        let len = self.len() as isize;
        if len == 0 {
            return;
        }

        let start = if start < 0 { (len + start).max(0) } else { start };
        let end = if end < 0 { (len + end).max(0) } else { end.min(len - 1) };

        if start > end {
            self.keep_range(0, 0);
            return;
        }
        self.keep_range(start as usize, (end - start + 1) as usize);
    }

    /// Сдвигает `[start, start + len)` в начало и обрезает хвост.
    fn keep_range(
        &mut self,
        start: usize,
        len: usize,
    ) {
        if start > 0 && len > 0 {
            self.as_mut_slice().copy_within(start..start + len, 0);
        }
        self.truncate(len);
    }

    /// Переводит ASCII-буквы в нижний регистр.
    pub fn to_lower(&mut self) {
        self.as_mut_slice().make_ascii_lowercase();
    }

    /// Переводит ASCII-буквы в верхний регистр.
    pub fn to_upper(&mut self) {
        self.as_mut_slice().make_ascii_uppercase();
    }

    /// Заменяет каждое вхождение `from[i]` на `to[i]`. Лишние байты более
    /// длинного набора игнорируются.
    pub fn map_chars(
        &mut self,
        from: &[u8],
        to: &[u8],
    ) {
        let set_len = from.len().min(to.len());
        for b in self.as_mut_slice() {
            if let Some(i) = from[..set_len].iter().position(|f| f == b) {
                *b = to[i];
            }
        }
    }

    /// Дописывает `p` в кавычках, экранируя непечатаемые байты
    /// (`\n`, `\r`, `\t`, `\a`, `\b`, `\xHH`), кавычку и обратный слэш.
    pub fn cat_repr(
        &mut self,
        p: &[u8],
    ) {
        self.push(b'"');
        for &b in p {
            match b {
                b'\\' | b'"' => {
                    self.push(b'\\');
                    self.push(b);
                }
                b'\n' => self.cat(b"\\n"),
                b'\r' => self.cat(b"\\r"),
                b'\t' => self.cat(b"\\t"),
                0x07 => self.cat(b"\\a"),
                0x08 => self.cat(b"\\b"),
                _ if b.is_ascii_graphic() || b == b' ' => self.push(b),
                _ => self.cat(format!("\\x{b:02x}")),
            }
        }
        self.push(b'"');
    }

    /// Делит `s` по разделителю `sep`.
    ///
    /// `None` для пустого разделителя. Пустой вход даёт пустой вектор,
    /// соседние разделители дают пустые части.
    pub fn split_len(
        s: &[u8],
        sep: &[u8],
    ) -> Option<Vec<Sds>> {
        if sep.is_empty() {
            return None;
        }
        if s.is_empty() {
            return Some(Vec::new());
        }

        let mut tokens = Vec::new();
        let mut start = 0;
        let mut j = 0;
        while j + sep.len() <= s.len() {
            if &s[j..j + sep.len()] == sep {
                tokens.push(Sds::from_bytes(&s[start..j]));
                start = j + sep.len();
                j = start;
            } else {
                j += 1;
            }
        }
        tokens.push(Sds::from_bytes(&s[start..]));

        Some(tokens)
    }

    /// Разбирает строку как аргументы командной строки.
    ///
    /// Аргументы разделяются пробельными символами. В двойных кавычках
    /// поддерживаются `\n`, `\r`, `\t`, `\b`, `\a`, `\xHH` и экранирование
    /// любого байта; в одинарных — только `\'`. `None`, если кавычки не
    /// закрыты или за закрывающей кавычкой сразу идёт не пробел.
    pub fn split_args(line: &[u8]) -> Option<Vec<Sds>> {
        let at = |i: usize| line.get(i).copied().unwrap_or(0);
        let mut args = Vec::new();
        let mut p = 0;

        loop {
            while at(p) != 0 && at(p).is_ascii_whitespace() {
                p += 1;
            }
            if at(p) == 0 {
                return Some(args);
            }

            let mut current = Sds::empty();
            let (mut in_dq, mut in_sq, mut done) = (false, false, false);

            while !done {
                let c = at(p);
                if in_dq {
                    if c == b'\\'
                        && at(p + 1) == b'x'
                        && at(p + 2).is_ascii_hexdigit()
                        && at(p + 3).is_ascii_hexdigit()
                    {
                        current.push(hex_value(at(p + 2)) * 16 + hex_value(at(p + 3)));
                        p += 3;
                    } else if c == b'\\' && at(p + 1) != 0 {
                        p += 1;
                        current.push(match at(p) {
                            b'n' => b'\n',
                            b'r' => b'\r',
                            b't' => b'\t',
                            b'b' => 0x08,
                            b'a' => 0x07,
                            other => other,
                        });
                    } else if c == b'"' {
                        if at(p + 1) != 0 && !at(p + 1).is_ascii_whitespace() {
                            return None;
                        }
                        done = true;
                    } else if c == 0 {
                        return None;
                    } else {
                        current.push(c);
                    }
                } else if in_sq {
                    if c == b'\\' && at(p + 1) == b'\'' {
                        p += 1;
                        current.push(b'\'');
                    } else if c == b'\'' {
                        if at(p + 1) != 0 && !at(p + 1).is_ascii_whitespace() {
                            return None;
                        }
                        done = true;
                    } else if c == 0 {
                        return None;
                    } else {
                        current.push(c);
                    }
                } else {
                    match c {
                        b' ' | b'\n' | b'\r' | b'\t' | 0 => done = true,
                        b'"' => in_dq = true,
                        b'\'' => in_sq = true,
                        _ => current.push(c),
                    }
                }

                if at(p) != 0 {
                    p += 1;
                }
            }

            args.push(current);
        }
    }

    /// Склеивает части через разделитель.
    pub fn join<B: AsRef<[u8]>>(
        parts: &[B],
        sep: &[u8],
    ) -> Sds {
        let mut joined = Sds::empty();
        for (i, part) in parts.iter().enumerate() {
            if i > 0 {
                joined.cat(sep);
            }
            joined.cat(part);
        }
        joined
    }

    /// Возвращает копию подстроки в диапазоне `[start, end)`.
    pub fn slice_range(
        &self,
        start: usize,
        end: usize,
    ) -> Self {
        assert!(
            start <= end && end <= self.len(),
            "Sds::slice_range: invalid range [{start}, {end}) for len {}",
            self.len()
        );

        Self::from_bytes(&self.as_slice()[start..end])
    }

    /// Преобразует heap-строку обратно в inline, если длина позволяет.
    fn inline_downgrade(&mut self) {
        if let Repr::Heap { buf } = &self.0 {
            if buf.len() <= Self::INLINE_CAP {
                self.0 = Self::inline_from(buf).0;
            }
        }
    }

    /// Преобразует байтовое представление строки в `&str`, если она валидна
    /// как UTF-8.
    #[inline]
    pub fn as_str(&self) -> Result<&str, Utf8Error> {
        from_utf8(self.as_slice())
    }

    /// Проверяет внутренние иварианты структуры.
    #[cfg(debug_assertions)]
    pub fn debug_assert_invariants(&self) {
        match &self.0 {
            Repr::Inline { len, .. } => {
                assert!(
                    (*len as usize) <= Self::INLINE_CAP,
                    "Sds invariant violation: Inline len ({}) > INLINE_CAP ({})",
                    len,
                    Self::INLINE_CAP
                );
            }
            Repr::Heap { buf } => {
                assert!(
                    buf.len() <= buf.capacity(),
                    "Sds invariant violation: Heap buf.len() ({}) > buf.capacity() ({})",
                    buf.len(),
                    buf.capacity()
                );
            }
        }
        assert_eq!(self.len() + self.avail(), self.alloc_size());
    }

    /// No-op в release-сборке.
    #[cfg(not(debug_assertions))]
    #[inline(always)]
    pub fn debug_assert_invariants(&self) {}
}

#[inline]
fn hex_value(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        b'A'..=b'F' => c - b'A' + 10,
        _ => 0,
    }
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов для Sds
////////////////////////////////////////////////////////////////////////////////

impl Default for Sds {
    fn default() -> Self {
        Sds(Repr::Inline {
            len: 0,
            buf: [0u8; Sds::INLINE_CAP],
        })
    }
}

impl Deref for Sds {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl DerefMut for Sds {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut_slice()
    }
}

impl AsRef<[u8]> for Sds {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl fmt::Write for Sds {
    fn write_str(
        &mut self,
        s: &str,
    ) -> fmt::Result {
        self.cat(s.as_bytes());
        Ok(())
    }
}

impl Display for Sds {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self.as_str() {
            Ok(s) => write!(f, "{s}"),
            Err(_) => write!(f, "{:?}", self.as_slice()),
        }
    }
}

impl Hash for Sds {
    fn hash<H: Hasher>(
        &self,
        state: &mut H,
    ) {
        self.as_slice().hash(state);
    }
}

impl PartialEq for Sds {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Eq for Sds {}

impl PartialOrd for Sds {
    fn partial_cmp(
        &self,
        other: &Self,
    ) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Побайтовое сравнение; при равном префиксе короче та строка, что меньше.
impl Ord for Sds {
    fn cmp(
        &self,
        other: &Self,
    ) -> Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

impl TryFrom<Sds> for String {
    type Error = Utf8Error;

    fn try_from(value: Sds) -> Result<Self, Self::Error> {
        value.as_str().map(|s| s.to_string())
    }
}

impl From<&[u8]> for Sds {
    fn from(slice: &[u8]) -> Self {
        Sds::from_bytes(slice)
    }
}

impl From<Vec<u8>> for Sds {
    fn from(v: Vec<u8>) -> Self {
        Sds::from_vec(v)
    }
}

impl From<Sds> for Vec<u8> {
    fn from(s: Sds) -> Self {
        match s.0 {
            Repr::Inline { len, buf } => buf[..len as usize].to_vec(),
            Repr::Heap { buf } => buf,
        }
    }
}

impl From<&str> for Sds {
    fn from(s: &str) -> Self {
        Sds::from_str(s)
    }
}

impl From<String> for Sds {
    #[inline]
    fn from(s: String) -> Self {
        Sds::from_string(s)
    }
}

impl std::str::FromStr for Sds {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Sds::from_str(s))
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use std::fmt::Write;

    use super::*;

    #[test]
    fn test_inline_creation_from_str() {
        let s = Sds::from_str("hello");

        assert_eq!(s.len(), 5);
        assert_eq!(s.as_slice(), b"hello");
        assert!(s.is_inline());

        s.debug_assert_invariants();
    }

    #[test]
    fn test_heap_creation_from_str() {
        let long = "this is a long string exceeding the inline cap";
        let s = Sds::from_str(long);

        assert_eq!(s.len(), long.len());
        assert_eq!(s.as_slice(), long.as_bytes());
        assert!(!s.is_inline());

        s.debug_assert_invariants();
    }

    /// Тест проверяет жадный рост: удвоение ниже порога.
    #[test]
    fn test_make_room_for_doubles_small() {
        let mut s = Sds::new([b'a'; 100]);
        s.make_room_for(10);

        assert!(s.alloc_size() >= 220);
        assert!(s.avail() >= 10);
        assert_eq!(s.len(), 100);
        s.debug_assert_invariants();
    }

    /// Тест проверяет жадный рост: фиксированный шаг выше порога.
    #[test]
    fn test_make_room_for_linear_above_limit() {
        let mut s = Sds::new(vec![0u8; SDS_MAX_PREALLOC]);
        s.make_room_for(1);

        assert!(s.alloc_size() >= 2 * SDS_MAX_PREALLOC + 1);
        assert!(s.alloc_size() < 4 * SDS_MAX_PREALLOC);
    }

    /// Тест проверяет, что при достаточном запасе ёмкость не меняется.
    #[test]
    fn test_make_room_for_noop_when_enough() {
        let mut s = Sds::new("abc");
        let before = s.alloc_size();
        s.make_room_for(Sds::INLINE_CAP - 3);
        assert_eq!(s.alloc_size(), before);
        assert!(s.is_inline());
    }

    #[test]
    fn test_remove_free_space() {
        let mut s = Sds::new([b'x'; 40]);
        s.make_room_for(100);
        assert!(s.avail() >= 100);

        s.remove_free_space();
        assert_eq!(s.avail(), 0);

        s.truncate(5);
        s.remove_free_space();
        assert!(s.is_inline());
        assert_eq!(s.as_slice(), b"xxxxx");
    }

    #[test]
    fn test_grow_zero() {
        let mut s = Sds::new("ab");
        s.grow_zero(5);
        assert_eq!(s.as_slice(), b"ab\0\0\0");

        s.grow_zero(3);
        assert_eq!(s.len(), 5);

        s.grow_zero(64);
        assert_eq!(s.len(), 64);
        assert!(s[2..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_cat_variants() {
        let mut s = Sds::new("foo");
        s.cat("bar");
        s.cat_len(b"bazqux", 3);
        s.cat_sds(&Sds::new("!"));
        assert_eq!(s.as_slice(), b"foobarbaz!");

        s.cpy("a much longer replacement string than before");
        assert_eq!(s.as_slice(), b"a much longer replacement string than before");

        s.cpy("x");
        assert_eq!(s.as_slice(), b"x");
    }

    #[test]
    fn test_fmt_write() {
        let mut s = Sds::new("n=");
        write!(s, "{}-{:03}", 42, 7).unwrap();
        assert_eq!(s.as_slice(), b"n=42-007");
    }

    #[test]
    fn test_from_i64() {
        assert_eq!(Sds::from_i64(0).as_slice(), b"0");
        assert_eq!(Sds::from_i64(-123).as_slice(), b"-123");
        assert_eq!(
            Sds::from_i64(i64::MIN).as_slice(),
            b"-9223372036854775808"
        );
    }

    #[test]
    fn test_trim() {
        let mut s = Sds::new("xxciaoyyy");
        s.trim(b"xy");
        assert_eq!(s.as_slice(), b"ciao");

        let mut all = Sds::new("xyxy");
        all.trim(b"xy");
        assert!(all.is_empty());
    }

    /// Тест проверяет `range` с отрицательными индексами и обрезкой.
    #[test]
    fn test_range() {
        let cases: [(isize, isize, &[u8]); 8] = [
            (1, 1, b"i"),
            (1, -1, b"iao"),
            (-2, -1, b"ao"),
            (2, 1, b""),
            (1, 100, b"iao"),
            (100, 100, b""),
            (0, isize::MAX, b"ciao"),
            (isize::MIN, isize::MAX, b"ciao"),
        ];

        for (start, end, expected) in cases {
            let mut s = Sds::new("ciao");
            s.range(start, end);
            assert_eq!(s.as_slice(), expected, "range({start}, {end})");
        }
    }

    #[test]
    fn test_case_and_map_chars() {
        let mut s = Sds::new("Hello, World");
        s.to_lower();
        assert_eq!(s.as_slice(), b"hello, world");
        s.to_upper();
        assert_eq!(s.as_slice(), b"HELLO, WORLD");

        let mut m = Sds::new("hello");
        m.map_chars(b"ho", b"01");
        assert_eq!(m.as_slice(), b"0ell1");
    }

    #[test]
    fn test_ordering() {
        assert!(Sds::new("foa") < Sds::new("foo"));
        assert!(Sds::new("bar") < Sds::new("bar\0"));
        assert!(Sds::new([0x7fu8]) < Sds::new([0x80u8]));
        assert_eq!(Sds::new("a").cmp(&Sds::new("a")), Ordering::Equal);
    }

    #[test]
    fn test_split_len() {
        let parts = Sds::split_len(b"a,b,,c", b",").unwrap();
        let parts: Vec<&[u8]> = parts.iter().map(|p| p.as_slice()).collect();
        assert_eq!(parts, vec![&b"a"[..], b"b", b"", b"c"]);

        assert_eq!(Sds::split_len(b"", b",").unwrap().len(), 0);
        assert!(Sds::split_len(b"abc", b"").is_none());

        let multi = Sds::split_len(b"1--2--", b"--").unwrap();
        assert_eq!(multi.len(), 3);
        assert!(multi[2].is_empty());
    }

    #[test]
    fn test_join() {
        let joined = Sds::join(&["a", "b", "c"], b", ");
        assert_eq!(joined.as_slice(), b"a, b, c");
        assert!(Sds::join::<&str>(&[], b",").is_empty());
    }

    #[test]
    fn test_cat_repr() {
        let mut s = Sds::empty();
        s.cat_repr(b"a\"b\\\n\x01 z");
        assert_eq!(s.as_slice(), b"\"a\\\"b\\\\\\n\\x01 z\"");
    }

    #[test]
    fn test_push_exceeding_inline() {
        let mut s = Sds::from_str("a".repeat(Sds::INLINE_CAP).as_str());

        s.push(b'x');

        assert!(!s.is_inline());
        assert_eq!(s.len(), Sds::INLINE_CAP + 1);

        s.debug_assert_invariants();
    }

    #[test]
    fn test_clear_keeps_buffer() {
        let mut s = Sds::new([b'q'; 64]);
        let alloc = s.alloc_size();
        s.clear();

        assert!(s.is_empty());
        assert_eq!(s.alloc_size(), alloc);
        assert_eq!(s.avail(), alloc);
    }

    #[test]
    fn test_slice_range() {
        let s = Sds::from_str("hello world");
        let sub = s.slice_range(6, 11);
        assert_eq!(sub.as_slice(), b"world");
    }

    #[test]
    fn test_inline_cap_value() {
        assert_eq!(Sds::INLINE_CAP, std::mem::size_of::<usize>() * 3 - 1);
    }
}
