#![no_std]

//! `strbuf`: byte string buffers that always keep room for a NUL terminator.
//!
//! Two buffer types share one set of operations:
//!
//! - [`StrBuf`] owns a heap allocation and grows it in powers of two.
//! - [`FixedStrBuf`] borrows a caller-provided `&mut [u8]` and never
//!   reallocates; operations fail with [`StrBufError::Range`] when the region
//!   is exhausted.
//!
//! Both reserve one byte past the content, so [`StrBuf::as_str`] and
//! [`FixedStrBuf::as_str`] can terminate the content in place and hand out a
//! NUL-terminated view without allocating. The content is plain bytes; no
//! UTF-8 validation is performed.
//!
//! This crate is `no_std` and needs only `alloc`. The optional `std` feature
//! builds the error type against `std`:
//! ```toml
//! [dependencies]
//! strbuf = { version = "1.0", features = ["std"] }
//! ```
//!
//! # Building a string
//!
//! ```
//! use strbuf::StrBuf;
//!
//! let mut buf = StrBuf::new();
//! buf.append("Hell")?;
//! buf.append_slice("o xxx", 2)?;
//! write!(buf, "{}! {:02}", "world", 42)?;
//!
//! assert_eq!(buf.to_str()?, b"Hello world! 42\0");
//! assert_eq!(buf.as_c_str()?.to_bytes(), b"Hello world! 42");
//! # Ok::<(), strbuf::StrBufError>(())
//! ```
//!
//! `write!` resolves to the inherent `write_fmt`, so formatting errors come
//! back as [`StrBufError`]. Both buffers also implement [`core::fmt::Write`].
//!
//! # Growth
//!
//! Capacity is always a power of two strictly greater than the content
//! length. If the power-of-two allocation fails, the exact size is tried once
//! before [`StrBufError::AllocationFailure`] is reported.
//!
//! ```
//! use strbuf::StrBuf;
//!
//! let mut buf = StrBuf::new();
//! assert_eq!(buf.capacity(), 0);
//!
//! buf.ensure_capacity(100)?;
//! assert_eq!(buf.capacity(), 128);
//!
//! buf.fill(128, b'-')?;
//! assert_eq!(buf.capacity(), 256);
//!
//! buf.truncate(3)?;
//! buf.shrink()?;
//! assert_eq!(buf.capacity(), 4);
//!
//! let owned = buf.into_str()?;
//! assert_eq!(owned, b"---\0");
//! assert_eq!(buf.capacity(), 0);
//! # Ok::<(), strbuf::StrBufError>(())
//! ```
//!
//! # Fixed regions
//!
//! ```
//! use strbuf::{ErrorKind, FixedStrBuf};
//!
//! let mut region = [0u8; 16];
//! let mut buf = FixedStrBuf::new(&mut region);
//!
//! buf.append("123456789012345")?;
//! assert_eq!(buf.len(), 15);
//!
//! let err = buf.append_char(b'6').unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::Range);
//! assert_eq!(buf.len(), 15);
//!
//! assert_eq!(buf.as_str()?, b"123456789012345\0");
//! # Ok::<(), strbuf::StrBufError>(())
//! ```
//!
//! # Logging
//!
//! Growth decisions are reported through the [`log`](https://docs.rs/log)
//! facade at `trace` level, allocation fallbacks at `warn`. Nothing is
//! printed unless the application installs a logger.

extern crate alloc;

mod error;
mod fixed;
mod format;
mod growth;
mod strbuf;

pub use error::{ErrorKind, Result, StrBufError};
pub use fixed::FixedStrBuf;
pub use strbuf::{StrBuf, DEFAULT_CAPACITY};
