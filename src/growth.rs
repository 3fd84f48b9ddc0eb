//! Size accounting shared by both buffer variants.
//!
//! Every length that reaches a buffer goes through these helpers so that
//! overflow is detected before anything is written.

use alloc::vec::Vec;

use crate::error::{Result, StrBufError};

/// Returns the smallest power of two strictly greater than `requested`.
///
/// The bits below the highest set bit are smeared to ones, then the value
/// is incremented. Returns `None` when the result does not fit in `usize`.
///
/// ```text
/// 0 -> 1, 1 -> 2, 255 -> 256, 256 -> 512
/// ```
#[must_use]
pub(crate) fn next_capacity(requested: usize) -> Option<usize> {
    let mut big = requested;
    let mut shift = 1;
    while shift < usize::BITS {
        big |= big >> shift;
        shift <<= 1;
    }
    big.checked_add(1)
}

/// Content length after appending `additional` bytes to `used` bytes.
pub(crate) fn grown_len(used: usize, additional: usize) -> Result<usize> {
    used.checked_add(additional)
        .ok_or_else(|| StrBufError::overflow(additional))
}

/// Length of `text` as a C string limited to `max_len` bytes: the position of
/// the first NUL, or `min(text.len(), max_len)` when there is none.
#[must_use]
pub(crate) fn c_len(text: &[u8], max_len: usize) -> usize {
    let bounded = text.get(..max_len).unwrap_or(text);
    bounded
        .iter()
        .position(|&b| b == 0)
        .unwrap_or(bounded.len())
}

/// Copies `content` into a new allocation of exactly `content.len() + 1`
/// bytes and terminates it.
pub(crate) fn terminated_copy(content: &[u8]) -> Result<Vec<u8>> {
    let size = grown_len(content.len(), 1)?;
    let mut out = Vec::new();
    out.try_reserve_exact(size)
        .map_err(|_| StrBufError::AllocationFailure { size })?;
    out.extend_from_slice(content);
    out.push(0);
    Ok(out)
}

/// Writes the terminator after `used` content bytes of `data` and returns
/// the terminated prefix.
///
/// An empty buffer yields a static terminator without touching `data`,
/// which may then be empty.
pub(crate) fn terminated_view(data: &mut [u8], used: usize) -> Result<&[u8]> {
    if used == 0 {
        return Ok(b"\0");
    }
    let capacity = data.len();
    match data.get_mut(..=used) {
        Some(view) => {
            view[used] = 0;
            Ok(view)
        }
        None => Err(StrBufError::IllegalState { used, capacity }),
    }
}
