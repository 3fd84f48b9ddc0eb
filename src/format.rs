use core::fmt::{self, Write};

use crate::error::{Result, StrBufError};

/// `fmt::Write` sink that copies as much output as fits into `buf` and keeps
/// counting past the end, so one pass reports the full formatted length.
struct CountingWriter<'a> {
    buf: &'a mut [u8],
    required: usize,
    overflowed: bool,
}

impl Write for CountingWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let bytes = s.as_bytes();
        if let Some(dst) = self.buf.get_mut(self.required..) {
            let n = dst.len().min(bytes.len());
            dst[..n].copy_from_slice(&bytes[..n]);
        }
        match self.required.checked_add(bytes.len()) {
            Some(required) => {
                self.required = required;
                Ok(())
            }
            None => {
                self.overflowed = true;
                Err(fmt::Error)
            }
        }
    }
}

/// Formats `args` into `buf`, truncating output that does not fit.
///
/// Returns the length the complete output needs, which may exceed
/// `buf.len()`.
///
/// # Errors
///
/// `StrBufError::Range` if the output length overflows `usize`,
/// `StrBufError::InvalidInput` if a formatting impl reports an error.
pub(crate) fn format_into(buf: &mut [u8], args: fmt::Arguments<'_>) -> Result<usize> {
    let mut writer = CountingWriter {
        buf,
        required: 0,
        overflowed: false,
    };
    match writer.write_fmt(args) {
        Ok(()) => Ok(writer.required),
        Err(_) if writer.overflowed => Err(StrBufError::overflow(usize::MAX)),
        Err(_) => Err(StrBufError::InvalidInput {
            reason: "formatting trait implementation returned an error",
        }),
    }
}

pub(crate) const UNSTABLE_FORMAT: StrBufError = StrBufError::InvalidInput {
    reason: "formatted length changed between passes",
};

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    impl fmt::Display for Failing {
        fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
            Err(fmt::Error)
        }
    }

    #[test]
    fn test_format_fits() {
        let mut buf = [0u8; 16];
        let size = format_into(&mut buf, format_args!("{}-{:02}", "ab", 7)).unwrap();
        assert_eq!(size, 5);
        assert_eq!(&buf[..5], b"ab-07");
    }

    #[test]
    fn test_format_truncates_but_counts() {
        let mut buf = [0u8; 4];
        let size = format_into(&mut buf, format_args!("{}", "hello world")).unwrap();
        assert_eq!(size, 11);
        assert_eq!(&buf, b"hell");
    }

    #[test]
    fn test_format_into_empty_region() {
        let size = format_into(&mut [], format_args!("{}", 12345)).unwrap();
        assert_eq!(size, 5);
    }

    #[test]
    fn test_format_error_is_invalid_input() {
        let mut buf = [0u8; 8];
        let err = format_into(&mut buf, format_args!("a{}", Failing)).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::InvalidInput);
    }
}
