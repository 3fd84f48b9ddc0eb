use alloc::vec::Vec;
use core::ffi::CStr;
use core::fmt;
use core::mem;

use log::{debug, trace, warn};

use crate::error::{Result, StrBufError};
use crate::format::{format_into, UNSTABLE_FORMAT};
use crate::growth::{c_len, grown_len, next_capacity, terminated_copy, terminated_view};

// Largest allocation the global allocator can be asked for.
const MAX_ALLOC: usize = isize::MAX as usize;

/// Initial capacity used by [`StrBuf::with_default_capacity`].
pub const DEFAULT_CAPACITY: usize = 256;

/// A growable byte string buffer that owns its storage.
///
/// The buffer always keeps at least one byte beyond its content, so a
/// NUL-terminated view can be produced in place by [`StrBuf::as_str`].
/// Capacity grows in powers of two.
pub struct StrBuf {
    // `data.len()` is the capacity; bytes past `used` are scratch space.
    data: Vec<u8>,
    used: usize,
}

impl StrBuf {
    /// Creates an empty buffer without allocating.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            data: Vec::new(),
            used: 0,
        }
    }

    /// Creates a buffer with room for at least `capacity` content bytes plus
    /// the terminator.
    ///
    /// # Errors
    ///
    /// `StrBufError::Range` if the rounded-up capacity does not fit in
    /// `usize`, `StrBufError::AllocationFailure` if the allocator refuses.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let mut buf = Self::new();
        buf.ensure_capacity(capacity)?;
        Ok(buf)
    }

    /// Creates a buffer with [`DEFAULT_CAPACITY`] bytes of storage.
    ///
    /// # Errors
    ///
    /// `StrBufError::AllocationFailure` if the allocator refuses.
    pub fn with_default_capacity() -> Result<Self> {
        Self::with_capacity(DEFAULT_CAPACITY - 1)
    }

    /// Creates a buffer holding a copy of `text` up to its first NUL byte.
    ///
    /// # Errors
    ///
    /// `StrBufError::AllocationFailure` if the allocator refuses.
    pub fn from_bytes(text: impl AsRef<[u8]>) -> Result<Self> {
        let text = text.as_ref();
        let len = c_len(text, text.len());
        let mut buf = Self::with_capacity(len)?;
        buf.push_bytes(&text[..len])?;
        Ok(buf)
    }

    /// Copies the buffer, keeping its capacity.
    ///
    /// # Errors
    ///
    /// `StrBufError::AllocationFailure` if the allocator refuses.
    pub fn try_clone(&self) -> Result<Self> {
        let capacity = self.capacity();
        let mut data = Vec::new();
        data.try_reserve_exact(capacity)
            .map_err(|_| StrBufError::AllocationFailure { size: capacity })?;
        data.extend_from_slice(&self.data);
        Ok(Self {
            data,
            used: self.used,
        })
    }

    /// Total bytes of storage, terminator slot included.
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

    /// Bytes that can be appended before the next reallocation.
    #[must_use]
    pub fn available_bytes(&self) -> usize {
        self.capacity().saturating_sub(self.used).saturating_sub(1)
    }

    /// Makes room for `requested` content bytes plus the terminator.
    ///
    /// Does nothing if the capacity already exceeds `requested`. Otherwise
    /// the capacity becomes the smallest power of two greater than
    /// `requested`; if that allocation fails, exactly `requested + 1` bytes
    /// are tried once more.
    ///
    /// # Errors
    ///
    /// `StrBufError::Range` if the power of two does not fit in `usize` or
    /// `requested + 1` exceeds `isize::MAX`,
    /// `StrBufError::AllocationFailure` if both allocations fail. The buffer
    /// is unchanged on error.
    pub fn ensure_capacity(&mut self, requested: usize) -> Result<()> {
        let capacity = self.capacity();
        if requested == 0 || requested < capacity {
            return Ok(());
        }
        let big = next_capacity(requested).ok_or_else(|| StrBufError::overflow(requested))?;
        if requested >= MAX_ALLOC {
            return Err(StrBufError::Range {
                requested,
                limit: MAX_ALLOC - 1,
            });
        }

        if big <= MAX_ALLOC && self.data.try_reserve_exact(big - capacity).is_ok() {
            trace!("strbuf grow: {capacity} -> {big} bytes for {requested}");
            self.data.resize(big, 0);
            return Ok(());
        }

        // `requested < MAX_ALLOC`, so this cannot overflow
        let exact = requested + 1;
        warn!("strbuf: allocation of {big} bytes failed, retrying with {exact}");
        self.data
            .try_reserve_exact(exact - capacity)
            .map_err(|_| StrBufError::AllocationFailure { size: exact })?;
        self.data.resize(exact, 0);
        Ok(())
    }

    fn reserve_more(&mut self, additional: usize) -> Result<usize> {
        let new_used = grown_len(self.used, additional)?;
        self.ensure_capacity(new_used)?;
        Ok(new_used)
    }

    fn push_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let new_used = self.reserve_more(bytes.len())?;
        self.data[self.used..new_used].copy_from_slice(bytes);
        self.used = new_used;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.used = 0;
    }

    /// Reallocates the storage down to exactly `len() + 1` bytes.
    ///
    /// # Errors
    ///
    /// `StrBufError::AllocationFailure` if the smaller allocation fails; the
    /// buffer is unchanged.
    pub fn shrink(&mut self) -> Result<()> {
        let target = grown_len(self.used, 1)?;
        if target >= self.capacity() {
            return Ok(());
        }
        let mut data = Vec::new();
        data.try_reserve_exact(target)
            .map_err(|_| StrBufError::AllocationFailure { size: target })?;
        data.extend_from_slice(&self.data[..target]);
        debug!("strbuf shrink: {} -> {target} bytes", self.capacity());
        self.data = data;
        Ok(())
    }

    /// Shortens the content to `len` bytes.
    ///
    /// # Errors
    ///
    /// `StrBufError::Range` if `len` is greater than the current length.
    pub fn truncate(&mut self, len: usize) -> Result<()> {
        if len > self.used {
            return Err(StrBufError::Range {
                requested: len,
                limit: self.used,
            });
        }
        self.used = len;
        Ok(())
    }

    /// Sets the content length to `len`, truncating or appending zero bytes.
    ///
    /// # Errors
    ///
    /// `StrBufError::Range` or `StrBufError::AllocationFailure` if growing
    /// fails.
    pub fn resize(&mut self, len: usize) -> Result<()> {
        if len > self.used {
            self.ensure_capacity(len)?;
            self.data[self.used..len].fill(0);
        }
        self.used = len;
        Ok(())
    }

    /// Appends `count` copies of `byte`.
    ///
    /// # Errors
    ///
    /// `StrBufError::Range` if the new length overflows,
    /// `StrBufError::AllocationFailure` if growing fails.
    pub fn fill(&mut self, count: usize, byte: u8) -> Result<()> {
        let new_used = self.reserve_more(count)?;
        self.data[self.used..new_used].fill(byte);
        self.used = new_used;
        Ok(())
    }

    /// Appends `text` up to its first NUL byte.
    ///
    /// # Errors
    ///
    /// `StrBufError::Range` if the new length overflows,
    /// `StrBufError::AllocationFailure` if growing fails.
    pub fn append(&mut self, text: impl AsRef<[u8]>) -> Result<()> {
        let text = text.as_ref();
        self.append_slice(text, text.len())
    }

    /// Appends at most `max_len` bytes of `text`, stopping at a NUL byte.
    ///
    /// # Errors
    ///
    /// `StrBufError::Range` if the new length overflows,
    /// `StrBufError::AllocationFailure` if growing fails.
    pub fn append_slice(&mut self, text: impl AsRef<[u8]>, max_len: usize) -> Result<()> {
        let text = text.as_ref();
        let len = c_len(text, max_len);
        self.push_bytes(&text[..len])
    }

    /// Appends a single byte.
    ///
    /// # Errors
    ///
    /// `StrBufError::Range` if the new length overflows,
    /// `StrBufError::AllocationFailure` if growing fails.
    pub fn append_char(&mut self, byte: u8) -> Result<()> {
        let new_used = self.reserve_more(1)?;
        self.data[self.used] = byte;
        self.used = new_used;
        Ok(())
    }

    /// Appends formatted output. This is what `write!(buf, ...)` calls.
    ///
    /// Output is first rendered into the spare capacity. If it did not fit,
    /// the buffer grows and formatting runs a second time. If only the
    /// terminator slot is missing, the buffer grows without reformatting.
    ///
    /// # Errors
    ///
    /// `StrBufError::InvalidInput` if a formatting impl fails or the two
    /// passes disagree on the length, `StrBufError::Range` or
    /// `StrBufError::AllocationFailure` if growing fails. The content is
    /// unchanged on error.
    pub fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> Result<()> {
        let remaining = self.capacity() - self.used;
        let size = format_into(&mut self.data[self.used..], args)?;
        if size > remaining {
            self.reserve_more(size)?;
            if format_into(&mut self.data[self.used..], args)? != size {
                return Err(UNSTABLE_FORMAT);
            }
        } else if size == remaining {
            self.reserve_more(size)?;
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
    /// `StrBufError::IllegalState` if there is no room for the terminator,
    /// which the growth logic never allows.
    pub fn as_str(&mut self) -> Result<&[u8]> {
        terminated_view(&mut self.data, self.used)
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

    /// Copies the content and a terminator into a new exact-size allocation.
    ///
    /// # Errors
    ///
    /// `StrBufError::AllocationFailure` if the allocator refuses.
    pub fn to_str(&self) -> Result<Vec<u8>> {
        terminated_copy(self.as_bytes())
    }

    /// Moves the terminated content out and leaves the buffer empty with no
    /// storage.
    ///
    /// The result is right-sized when possible. If the right-sized copy
    /// cannot be allocated, the existing storage is returned instead.
    ///
    /// # Errors
    ///
    /// `StrBufError::AllocationFailure` only when the buffer has no spare
    /// byte and growing by one fails; the buffer is unchanged.
    pub fn into_str(&mut self) -> Result<Vec<u8>> {
        let size = grown_len(self.used, 1)?;
        let capacity = self.capacity();
        let out = if size < capacity {
            match terminated_copy(self.as_bytes()) {
                Ok(out) => out,
                Err(_) => {
                    warn!("strbuf: shrink to {size} bytes failed, handing out {capacity}");
                    self.data[self.used] = 0;
                    let mut out = mem::take(&mut self.data);
                    out.truncate(size);
                    out
                }
            }
        } else if size == capacity {
            self.data[self.used] = 0;
            mem::take(&mut self.data)
        } else {
            self.data
                .try_reserve_exact(1)
                .map_err(|_| StrBufError::AllocationFailure { size })?;
            let mut out = mem::take(&mut self.data);
            out.push(0);
            out
        };
        self.data = Vec::new();
        self.used = 0;
        Ok(out)
    }

    /// Releases the storage. Equivalent to dropping the buffer.
    pub fn release(self) {
        trace!("strbuf release: {} bytes", self.capacity());
    }
}

impl Default for StrBuf {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for StrBuf {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            used: self.used,
        }
    }
}

impl fmt::Debug for StrBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrBuf")
            .field("capacity", &self.capacity())
            .field("used", &self.used)
            .field("content", &self.as_bytes())
            .finish()
    }
}

impl PartialEq for StrBuf {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for StrBuf {}

impl TryFrom<&[u8]> for StrBuf {
    type Error = StrBufError;

    fn try_from(text: &[u8]) -> Result<Self> {
        Self::from_bytes(text)
    }
}

impl TryFrom<&str> for StrBuf {
    type Error = StrBufError;

    fn try_from(text: &str) -> Result<Self> {
        Self::from_bytes(text)
    }
}

impl fmt::Write for StrBuf {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push_bytes(s.as_bytes()).map_err(|_| fmt::Error)
    }

    fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> fmt::Result {
        StrBuf::write_fmt(self, args).map_err(|_| fmt::Error)
    }
}
