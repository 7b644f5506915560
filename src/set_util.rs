//! Counting set operations over ascending index sequences.
//!
//! All functions walk both slices once, so they run in `O(|a| + |b|)`.
//! Inputs must be sorted ascending without duplicates; hit lists held by a
//! [`Clustering`](crate::Clustering) always are.

use std::cmp::Ordering;

/// `|A ∩ B|`
pub fn count_intersection(a: &[usize], b: &[usize]) -> usize {
    let (mut i, mut j, mut count) = (0, 0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                i += 1;
                j += 1;
                count += 1;
            }
        }
    }
    count
}

/// `|A ∪ B|`
pub fn count_union(a: &[usize], b: &[usize]) -> usize {
    a.len() + b.len() - count_intersection(a, b)
}

/// `|A − B|`
pub fn count_difference(a: &[usize], b: &[usize]) -> usize {
    let (mut i, mut j, mut count) = (0, 0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Less => {
                i += 1;
                count += 1;
            }
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                i += 1;
                j += 1;
            }
        }
    }
    count + (a.len() - i)
}

/// `|A − B| + |B − A|`
pub fn count_symmetric_difference(a: &[usize], b: &[usize]) -> usize {
    let (mut i, mut j, mut count) = (0, 0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Less => {
                i += 1;
                count += 1;
            }
            Ordering::Greater => {
                j += 1;
                count += 1;
            }
            Ordering::Equal => {
                i += 1;
                j += 1;
            }
        }
    }
    count + (a.len() - i) + (b.len() - j)
}
