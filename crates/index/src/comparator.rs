//! Key comparison for index nodes.
//!
//! Keys are ordered only against keys of the same kind. A mismatch surfaces as
//! [`IndexError::IncomparableTypes`] instead of an arbitrary order.

use crate::error::IndexError;
use core::cmp::Ordering;
use tabula_core::Value;

/// Compares two index keys.
#[inline]
pub fn compare_keys(a: &Value, b: &Value) -> Result<Ordering, IndexError> {
    a.compare(b).map_err(|_| IndexError::IncomparableTypes {
        left: a.kind_name(),
        right: b.kind_name(),
    })
}

/// Binary search over a sorted key slice.
///
/// Mirrors `slice::binary_search`: `Ok(i)` when `keys[i] == key`, otherwise
/// `Err(i)` with the insertion point.
pub fn locate(keys: &[Value], key: &Value) -> Result<Result<usize, usize>, IndexError> {
    let (mut lo, mut hi) = (0, keys.len());
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        match compare_keys(&keys[mid], key)? {
            Ordering::Less => lo = mid + 1,
            Ordering::Greater => hi = mid,
            Ordering::Equal => return Ok(Ok(mid)),
        }
    }
    Ok(Err(lo))
}
