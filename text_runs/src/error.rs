// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

/// Rich error type for character buffer and run list edits.
///
/// Carries a non-exhaustive [`ErrorKind`] plus the attempted character range and the
/// length of the buffer at the time of failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    /// The non-exhaustive category describing this error.
    kind: ErrorKind,

    /// The start character index of the caller-provided range.
    start: usize,

    /// The end character index (exclusive) of the caller-provided range.
    end: usize,

    /// The number of characters in the buffer at the time of failure.
    len: usize,
}

#[expect(
    clippy::len_without_is_empty,
    reason = "`Error::len` reports buffer length context; an `is_empty` method would be misleading and unused."
)]
impl Error {
    /// The machine-readable category for this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The start character index of the range provided by the caller.
    pub fn start(&self) -> usize {
        self.start
    }

    /// The end character index of the range provided by the caller.
    pub fn end(&self) -> usize {
        self.end
    }

    /// The number of characters in the buffer at the time of the error.
    pub fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn invalid_bounds(start: usize, end: usize, len: usize) -> Self {
        Self {
            kind: ErrorKind::InvalidBounds,
            start,
            end,
            len,
        }
    }

    pub(crate) fn invalid_range(start: usize, end: usize, len: usize) -> Self {
        Self {
            kind: ErrorKind::InvalidRange,
            start,
            end,
            len,
        }
    }

    /// Checks that `start..end` is an ordered range within a buffer of `len` characters.
    pub fn check_range(start: usize, end: usize, len: usize) -> Result<(), Self> {
        if start > end {
            return Err(Self::invalid_range(start, end, len));
        }
        if end > len {
            return Err(Self::invalid_bounds(start, end, len));
        }
        Ok(())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ErrorKind::InvalidBounds => write!(
                f,
                "character range {}..{} out of bounds for len {}",
                self.start, self.end, self.len
            ),
            ErrorKind::InvalidRange => {
                write!(
                    f,
                    "invalid character range {}..{}: start > end",
                    self.start, self.end
                )
            }
        }
    }
}

impl core::error::Error for Error {}

/// The non-exhaustive category of an error.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Provided range indices were out of bounds relative to the buffer length.
    InvalidBounds,

    /// The provided range had `start > end`.
    InvalidRange,
}

#[cfg(test)]
mod tests {
    use super::{Error, ErrorKind};

    #[test]
    fn check_range_accepts_empty_and_full() {
        assert!(Error::check_range(0, 0, 0).is_ok());
        assert!(Error::check_range(0, 4, 4).is_ok());
        assert!(Error::check_range(4, 4, 4).is_ok());
    }

    #[test]
    fn check_range_messages() {
        let e = Error::check_range(3, 2, 5).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::InvalidRange);
        assert!(e.to_string().contains("3..2"));
        assert!(e.to_string().contains("start > end"));

        let e = Error::check_range(1, 9, 5).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::InvalidBounds);
        assert_eq!((e.start(), e.end(), e.len()), (1, 9, 5));
        assert!(e.to_string().contains("len 5"));
    }
}
