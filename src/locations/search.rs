//! Binary search over sorted sequences
//!
//! `compare` is always called as `compare(element, item)`.

use std::cmp::Ordering;

/// Index at which `item` would be inserted to keep `sorted` ordered.
///
/// An exact match returns its index.
pub fn location_of<T, U, F>(item: &U, sorted: &[T], mut compare: F) -> usize
where
    F: FnMut(&T, &U) -> Ordering,
{
    let mut start = 0;
    let mut end = sorted.len();

    loop {
        let pivot = start + (end - start) / 2;
        if end <= start {
            return pivot;
        }

        let compared = compare(&sorted[pivot], item);
        if end - start == 1 {
            return if compared == Ordering::Less {
                pivot + 1
            } else {
                pivot
            };
        }

        match compared {
            Ordering::Equal => return pivot,
            Ordering::Less => start = pivot,
            Ordering::Greater => end = pivot,
        }
    }
}

/// Index of an element equal to `item`, if any
pub fn index_of_sorted<T, U, F>(item: &U, sorted: &[T], mut compare: F) -> Option<usize>
where
    F: FnMut(&T, &U) -> Ordering,
{
    let mut start = 0;
    let mut end = sorted.len();

    while end > start {
        let pivot = start + (end - start) / 2;
        let compared = compare(&sorted[pivot], item);
        if end - start == 1 {
            return (compared == Ordering::Equal).then_some(pivot);
        }

        match compared {
            Ordering::Equal => return Some(pivot),
            Ordering::Less => start = pivot,
            Ordering::Greater => end = pivot,
        }
    }

    None
}

/// Insert `item` at its sorted position and return that position
pub fn insert_sorted<T, F>(item: T, sorted: &mut Vec<T>, mut compare: F) -> usize
where
    F: FnMut(&T, &T) -> Ordering,
{
    let at = location_of(&item, sorted, &mut compare);
    sorted.insert(at, item);
    at
}
