use alloc::vec::Vec;
use core::ffi::CStr;
use core::fmt;

use crate::error::{Result, StrBufError};
use crate::format::format_into;
use crate::growth::{c_len, grown_len, terminated_copy, terminated_view};

/// A byte string buffer over a caller-provided region.
///
/// The region is borrowed for the lifetime of the buffer and is never
/// reallocated or freed. The last byte of the region is reserved for the
/// terminator, so at most `capacity() - 1` content bytes fit.
pub struct FixedStrBuf<'a> {
    data: &'a mut [u8],
    used: usize,
}

impl<'a> FixedStrBuf<'a> {
    /// Creates an empty buffer over `data`. The previous contents of `data`
    /// are ignored.
    #[must_use]
    pub fn new(data: &'a mut [u8]) -> Self {
        Self { data, used: 0 }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.used
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.used == 0
    }

    /// Bytes that can still be appended.
    #[must_use]
    pub fn available_bytes(&self) -> usize {
        self.capacity().saturating_sub(self.used).saturating_sub(1)
    }

    fn overflow(&self, requested: usize) -> StrBufError {
        StrBufError::Range {
            requested,
            limit: self.available_bytes(),
        }
    }

    /// Checks that `additional` bytes fit before the terminator slot and
    /// returns the resulting length.
    fn reserve(&self, additional: usize) -> Result<usize> {
        let max_used = self
            .capacity()
            .checked_sub(1)
            .ok_or_else(|| self.overflow(additional))?;
        match grown_len(self.used, additional) {
            Ok(new_used) if new_used <= max_used => Ok(new_used),
            _ => Err(self.overflow(additional)),
        }
    }

    fn push_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let new_used = self.reserve(bytes.len())?;
        self.data[self.used..new_used].copy_from_slice(bytes);
        self.used = new_used;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.used = 0;
    }

    /// Sets the content length to `len`, truncating or appending zero bytes.
    ///
    /// # Errors
    ///
    /// `StrBufError::Range` if `len` leaves no room for the terminator.
    pub fn resize(&mut self, len: usize) -> Result<()> {
        if len > self.used {
            let new_used = self.reserve(len - self.used)?;
            self.data[self.used..new_used].fill(0);
        }
        self.used = len;
        Ok(())
    }

    /// Appends `count` copies of `byte`.
    ///
    /// # Errors
    ///
    /// `StrBufError::Range` if the bytes do not fit.
    pub fn fill(&mut self, count: usize, byte: u8) -> Result<()> {
        let new_used = self.reserve(count)?;
        self.data[self.used..new_used].fill(byte);
        self.used = new_used;
        Ok(())
    }

    /// Appends `text` up to its first NUL byte.
    ///
    /// # Errors
    ///
    /// `StrBufError::Range` if the text does not fit.
    pub fn append(&mut self, text: impl AsRef<[u8]>) -> Result<()> {
        let text = text.as_ref();
        self.append_slice(text, text.len())
    }

    /// Appends at most `max_len` bytes of `text`, stopping at a NUL byte.
    ///
    /// # Errors
    ///
    /// `StrBufError::Range` if the text does not fit.
    pub fn append_slice(&mut self, text: impl AsRef<[u8]>, max_len: usize) -> Result<()> {
        let text = text.as_ref();
        let len = c_len(text, max_len);
        self.push_bytes(&text[..len])
    }

    /// Appends a single byte.
    ///
    /// # Errors
    ///
    /// `StrBufError::Range` if the buffer is full.
    pub fn append_char(&mut self, byte: u8) -> Result<()> {
        let new_used = self.reserve(1)?;
        self.data[self.used] = byte;
        self.used = new_used;
        Ok(())
    }

    /// Appends formatted output. This is what `write!(buf, ...)` calls.
    ///
    /// On failure the length is unchanged, but bytes past the content may
    /// have been overwritten by the partial output.
    ///
    /// # Errors
    ///
    /// `StrBufError::Range` if the output and its terminator do not fit,
    /// `StrBufError::InvalidInput` if a formatting impl fails.
    pub fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> Result<()> {
        let remaining = self.capacity() - self.used;
        let size = format_into(&mut self.data[self.used..], args)?;
        if size >= remaining {
            return Err(self.overflow(size));
        }
        self.used += size;
        Ok(())
    }

    /// Content bytes without the terminator.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.used]
    }

    /// Terminates the content in place and returns it with the trailing NUL.
    ///
    /// # Errors
    ///
    /// `StrBufError::IllegalState` if there is no room for the terminator.
    pub fn as_str(&mut self) -> Result<&[u8]> {
        terminated_view(self.data, self.used)
    }

    /// Terminated view as a [`CStr`].
    ///
    /// # Errors
    ///
    /// `StrBufError::InvalidInput` if the content contains a NUL byte.
    pub fn as_c_str(&mut self) -> Result<&CStr> {
        CStr::from_bytes_with_nul(self.as_str()?).map_err(|_| StrBufError::InvalidInput {
            reason: "content contains an interior NUL byte",
        })
    }

    /// Copies the content and a terminator into a new heap allocation.
    ///
    /// # Errors
    ///
    /// `StrBufError::AllocationFailure` if the allocator refuses.
    pub fn to_str(&self) -> Result<Vec<u8>> {
        terminated_copy(self.as_bytes())
    }
}

impl fmt::Debug for FixedStrBuf<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixedStrBuf")
            .field("capacity", &self.capacity())
            .field("used", &self.used)
            .field("content", &self.as_bytes())
            .finish()
    }
}

impl fmt::Write for FixedStrBuf<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push_bytes(s.as_bytes()).map_err(|_| fmt::Error)
    }

    fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> fmt::Result {
        FixedStrBuf::write_fmt(self, args).map_err(|_| fmt::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_size_region() {
        let mut region = [0u8; 0];
        let mut buf = FixedStrBuf::new(&mut region);
        assert_eq!(buf.available_bytes(), 0);
        assert!(buf.append_char(b'a').is_err());
        assert!(buf.append("").is_err());
        assert_eq!(buf.as_str().unwrap(), b"\0");
    }

    #[test]
    fn test_view_without_spare_byte_is_illegal_state() {
        let mut region = [b'a'; 3];
        let mut buf = FixedStrBuf {
            data: &mut region,
            used: 3,
        };
        assert_eq!(
            buf.as_str(),
            Err(StrBufError::IllegalState {
                used: 3,
                capacity: 3
            })
        );
    }
}
