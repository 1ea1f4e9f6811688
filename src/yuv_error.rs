/*
 * Copyright (c) Radzivon Bartoshyk, 11/2024. All rights reserved.
 *
 * Redistribution and use in source and binary forms, with or without modification,
 * are permitted provided that the following conditions are met:
 *
 * 1.  Redistributions of source code must retain the above copyright notice, this
 * list of conditions and the following disclaimer.
 *
 * 2.  Redistributions in binary form must reproduce the above copyright notice,
 * this list of conditions and the following disclaimer in the documentation
 * and/or other materials provided with the distribution.
 *
 * 3.  Neither the name of the copyright holder nor the names of its
 * contributors may be used to endorse or promote products derived from
 * this software without specific prior written permission.
 *
 * THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
 * AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
 * IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
 * DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
 * FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
 * DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
 * SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
 * CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
 * OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
 * OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.
 */
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq)]
pub struct MismatchedSize {
    pub expected: usize,
    pub received: usize,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum YuvError {
    /// Width or a required height is zero
    ZeroBaseSize,
    /// A dimension is negative where the operation does not accept it
    InvalidDimensions,
    PlaneSizeMismatch(MismatchedSize),
    StrideTooSmall(MismatchedSize),
    PointerOverflow,
    /// Scalar argument (fill value, blend value) is outside of its domain
    ValueOutOfRange(i32),
    NegativeOffset,
    /// Row does not fit into the fixed stack scratch buffer
    RowTooWide(MismatchedSize),
    /// Geometry can't be represented in 16.16 fixed point
    ScaleNotSupported,
}

impl YuvError {
    /// Integer status for this error, negative and distinct per variant.
    #[inline]
    pub const fn code(&self) -> i32 {
        match self {
            YuvError::ZeroBaseSize => -1,
            YuvError::InvalidDimensions => -2,
            YuvError::PlaneSizeMismatch(_) => -3,
            YuvError::StrideTooSmall(_) => -4,
            YuvError::PointerOverflow => -5,
            YuvError::ValueOutOfRange(_) => -6,
            YuvError::NegativeOffset => -7,
            YuvError::RowTooWide(_) => -8,
            YuvError::ScaleNotSupported => -9,
        }
    }
}

impl Display for YuvError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            YuvError::ZeroBaseSize => f.write_str("Zero sized images is not supported"),
            YuvError::InvalidDimensions => f.write_str("Negative dimensions are not supported"),
            YuvError::PlaneSizeMismatch(size) => f.write_fmt(format_args!(
                "Plane must have size at least {} but it is {}",
                size.expected, size.received
            )),
            YuvError::StrideTooSmall(size) => f.write_fmt(format_args!(
                "Stride must be at least {} but it is {}",
                size.expected, size.received
            )),
            YuvError::PointerOverflow => f.write_str("Image size overflow pointer capabilities"),
            YuvError::ValueOutOfRange(value) => {
                f.write_fmt(format_args!("Value {} is out of supported range", value))
            }
            YuvError::NegativeOffset => f.write_str("Offsets must not be negative"),
            YuvError::RowTooWide(size) => f.write_fmt(format_args!(
                "Row must be at most {} bytes but it is {}",
                size.expected, size.received
            )),
            YuvError::ScaleNotSupported => {
                f.write_str("Scaling geometry exceeds fixed point capabilities")
            }
        }
    }
}

impl Error for YuvError {}

/// Maps an operation result onto the integer status convention: `0` on success, negative otherwise.
#[inline]
pub fn status(result: &Result<(), YuvError>) -> i32 {
    match result {
        Ok(_) => 0,
        Err(err) => err.code(),
    }
}

#[inline]
pub(crate) fn check_overflow_v2(v0: usize, v1: usize) -> Result<usize, YuvError> {
    v0.checked_mul(v1).ok_or(YuvError::PointerOverflow)
}

/// Rejects non-positive widths.
#[inline]
pub(crate) fn check_width(width: i32) -> Result<usize, YuvError> {
    if width == 0 {
        return Err(YuvError::ZeroBaseSize);
    }
    if width < 0 {
        return Err(YuvError::InvalidDimensions);
    }
    Ok(width as usize)
}

/// Height as row count plus the flip flag carried by its sign.
#[inline]
pub(crate) fn resolve_height(height: i32) -> (usize, bool) {
    (height.unsigned_abs() as usize, height < 0)
}

/// Fill operations want at least one row.
#[inline]
pub(crate) fn check_fill_height(height: i32) -> Result<usize, YuvError> {
    if height == 0 {
        return Err(YuvError::ZeroBaseSize);
    }
    if height < 0 {
        return Err(YuvError::InvalidDimensions);
    }
    Ok(height as usize)
}

#[inline]
pub(crate) fn check_row_fits(row_bytes: usize, limit: usize) -> Result<(), YuvError> {
    if row_bytes > limit {
        return Err(YuvError::RowTooWide(MismatchedSize {
            expected: limit,
            received: row_bytes,
        }));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(status(&Ok(())), 0);
        assert!(status(&Err(YuvError::ZeroBaseSize)) < 0);
        assert!(status(&Err(YuvError::ValueOutOfRange(300))) < 0);
        let size = MismatchedSize {
            expected: 4,
            received: 1,
        };
        let errors = [
            YuvError::ZeroBaseSize,
            YuvError::InvalidDimensions,
            YuvError::PlaneSizeMismatch(size),
            YuvError::StrideTooSmall(size),
            YuvError::PointerOverflow,
            YuvError::ValueOutOfRange(-1),
            YuvError::NegativeOffset,
            YuvError::RowTooWide(size),
            YuvError::ScaleNotSupported,
        ];
        let mut codes: Vec<i32> = errors.iter().map(|e| e.code()).collect();
        assert!(codes.iter().all(|&c| c < 0));
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_dimension_checks() {
        assert_eq!(check_width(0), Err(YuvError::ZeroBaseSize));
        assert_eq!(check_width(-3), Err(YuvError::InvalidDimensions));
        assert_eq!(check_width(7), Ok(7));
        assert_eq!(resolve_height(-5), (5, true));
        assert_eq!(resolve_height(0), (0, false));
        assert_eq!(check_fill_height(0), Err(YuvError::ZeroBaseSize));
        assert_eq!(check_fill_height(-1), Err(YuvError::InvalidDimensions));
        assert!(check_overflow_v2(usize::MAX, 2).is_err());
    }
}
