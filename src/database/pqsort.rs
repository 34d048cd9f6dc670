//! Частичная быстрая сортировка.
//!
//! Трёхпутевое разбиение Бентли — Макилроя, которое рекурсивно спускается
//! только в части, пересекающиеся с нужным диапазоном индексов. После
//! вызова `v[lrange..=rrange]` содержит ровно те элементы, что были бы там
//! после полной сортировки; остальные позиции упорядочены лишь частично.
//! Используется, когда нужна одна страница отсортированного результата.

use std::cmp::Ordering;

/// Ниже этого размера часть сортируется вставками.
const INSERTION_THRESHOLD: usize = 7;

/// Выше этого размера опорный элемент выбирается как медиана медиан.
const NINTHER_THRESHOLD: usize = 40;

/// Частично сортирует `v` по возрастанию так, что диапазон
/// `[lrange, rrange]` (включительно) оказывается на своих местах.
///
/// `rrange` за пределами среза обрезается до последнего индекса.
pub fn pqsort<T: Ord>(
    v: &mut [T],
    lrange: usize,
    rrange: usize,
) {
    pqsort_by(v, lrange, rrange, T::cmp);
}

/// То же, что `pqsort`, с компаратором.
pub fn pqsort_by<T, F>(
    v: &mut [T],
    lrange: usize,
    rrange: usize,
    mut cmp: F,
) where
    F: FnMut(&T, &T) -> Ordering,
{
    if v.is_empty() {
        return;
    }
    let rrange = rrange.min(v.len() - 1);
    if lrange > rrange {
        return;
    }

    let len = v.len();
    sort_range(v, 0, len, lrange, rrange, &mut cmp);
}

/// Сортирует `v[lo..lo + n]`, пропуская части вне `[lrange, rrange]`.
fn sort_range<T, F>(
    v: &mut [T],
    mut lo: usize,
    mut n: usize,
    lrange: usize,
    rrange: usize,
    cmp: &mut F,
) where
    F: FnMut(&T, &T) -> Ordering,
{
    loop {
        if n < INSERTION_THRESHOLD {
            insertion_sort(&mut v[lo..lo + n], cmp);
            return;
        }

        let mut pm = lo + n / 2;
        if n > INSERTION_THRESHOLD {
            let mut pl = lo;
            let mut pn = lo + n - 1;
            if n > NINTHER_THRESHOLD {
                let d = n / 8;
                pl = med3(v, pl, pl + d, pl + 2 * d, cmp);
                pm = med3(v, pm - d, pm, pm + d, cmp);
                pn = med3(v, pn - 2 * d, pn - d, pn, cmp);
            }
            pm = med3(v, pl, pm, pn, cmp);
        }
        v.swap(lo, pm);

        // [lo, pa) == опорный, [pa, pb) <, (pc, pd] >, (pd, end) ==
        let (mut pa, mut pb) = (lo + 1, lo + 1);
        let (mut pc, mut pd) = (lo + n - 1, lo + n - 1);
        loop {
            while pb <= pc {
                match cmp(&v[pb], &v[lo]) {
                    Ordering::Greater => break,
                    Ordering::Equal => {
                        v.swap(pa, pb);
                        pa += 1;
                    }
                    Ordering::Less => {}
                }
                pb += 1;
            }
            while pb <= pc {
                match cmp(&v[pc], &v[lo]) {
                    Ordering::Less => break,
                    Ordering::Equal => {
                        v.swap(pc, pd);
                        pd -= 1;
                    }
                    Ordering::Greater => {}
                }
                pc -= 1;
            }
            if pb > pc {
                break;
            }
            v.swap(pb, pc);
            pb += 1;
            pc -= 1;
        }

        // равные опорному переезжают в середину
        let pn = lo + n;
        let r = (pa - lo).min(pb - pa);
        vec_swap(v, lo, pb - r, r);
        let r = (pd - pc).min(pn - pd - 1);
        vec_swap(v, pb, pn - r, r);

        let left = pb - pa;
        if left > 1 && overlaps(lo, lo + left - 1, lrange, rrange) {
            sort_range(v, lo, left, lrange, rrange, cmp);
        }

        let right = pd - pc;
        if right <= 1 {
            return;
        }
        lo = pn - right;
        n = right;
        if !overlaps(lo, lo + n - 1, lrange, rrange) {
            return;
        }
    }
}

#[inline]
fn overlaps(
    left: usize,
    right: usize,
    lrange: usize,
    rrange: usize,
) -> bool {
    !(rrange < left || lrange > right)
}

fn insertion_sort<T, F>(
    v: &mut [T],
    cmp: &mut F,
) where
    F: FnMut(&T, &T) -> Ordering,
{
    for i in 1..v.len() {
        let mut j = i;
        while j > 0 && cmp(&v[j - 1], &v[j]) == Ordering::Greater {
            v.swap(j - 1, j);
            j -= 1;
        }
    }
}

/// Индекс медианы трёх элементов.
fn med3<T, F>(
    v: &[T],
    a: usize,
    b: usize,
    c: usize,
    cmp: &mut F,
) -> usize
where
    F: FnMut(&T, &T) -> Ordering,
{
    if cmp(&v[a], &v[b]) == Ordering::Less {
        if cmp(&v[b], &v[c]) == Ordering::Less {
            b
        } else if cmp(&v[a], &v[c]) == Ordering::Less {
            c
        } else {
            a
        }
    } else if cmp(&v[b], &v[c]) == Ordering::Greater {
        b
    } else if cmp(&v[a], &v[c]) == Ordering::Less {
        a
    } else {
        c
    }
}

/// Меняет местами блоки `v[a..a + n]` и `v[b..b + n]`.
fn vec_swap<T>(
    v: &mut [T],
    a: usize,
    b: usize,
    n: usize,
) {
    for i in 0..n {
        v.swap(a + i, b + i);
    }
}
