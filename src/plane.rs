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
use crate::dispatch::common_alignment;
use crate::yuv_error::{check_overflow_v2, MismatchedSize};
use crate::YuvError;

/// Widest row, in bytes, the stack scratch buffers hold.
pub const MAX_STRIDE: usize = 2880 * 4;

/// Validates plane geometry and returns the byte offset of logical row 0.
fn plane_origin(len: usize, stride: i32, row_bytes: usize, rows: usize) -> Result<usize, YuvError> {
    if rows == 0 || row_bytes == 0 {
        return Ok(0);
    }
    let abs_stride = stride.unsigned_abs() as usize;
    if rows > 1 && abs_stride < row_bytes {
        return Err(YuvError::StrideTooSmall(MismatchedSize {
            expected: row_bytes,
            received: abs_stride,
        }));
    }
    let last_row = check_overflow_v2(rows - 1, abs_stride)?;
    let required = last_row
        .checked_add(row_bytes)
        .ok_or(YuvError::PointerOverflow)?;
    if len < required {
        return Err(YuvError::PlaneSizeMismatch(MismatchedSize {
            expected: required,
            received: len,
        }));
    }
    Ok(if stride < 0 { last_row } else { 0 })
}

/// Stride is meaningless for empty planes.
#[inline]
fn effective_stride(stride: i32, row_bytes: usize, rows: usize) -> isize {
    if rows == 0 || row_bytes == 0 {
        0
    } else {
        stride as isize
    }
}

#[inline(always)]
fn row_start(origin: usize, stride: isize, y: usize) -> usize {
    (origin as isize + y as isize * stride) as usize
}

/// Read-only view of `rows` rows of `row_bytes` bytes each.
///
/// Construction checks that every row lies inside the slice, for positive and negative
/// strides alike.
#[derive(Debug, Copy, Clone)]
pub(crate) struct PlaneRef<'a> {
    data: &'a [u8],
    origin: usize,
    stride: isize,
    row_bytes: usize,
    rows: usize,
}

impl<'a> PlaneRef<'a> {
    pub(crate) fn new(
        data: &'a [u8],
        stride: i32,
        row_bytes: usize,
        rows: usize,
    ) -> Result<PlaneRef<'a>, YuvError> {
        let origin = plane_origin(data.len(), stride, row_bytes, rows)?;
        Ok(PlaneRef {
            data,
            origin,
            stride: effective_stride(stride, row_bytes, rows),
            row_bytes,
            rows,
        })
    }

    /// Row 0 becomes the last row, walking backwards.
    #[inline]
    pub(crate) fn flipped(self) -> PlaneRef<'a> {
        if self.rows == 0 {
            return self;
        }
        PlaneRef {
            origin: row_start(self.origin, self.stride, self.rows - 1),
            stride: -self.stride,
            ..self
        }
    }

    #[inline]
    pub(crate) fn flip_if(self, flip: bool) -> PlaneRef<'a> {
        if flip {
            self.flipped()
        } else {
            self
        }
    }

    #[inline(always)]
    pub(crate) fn row(&self, y: usize) -> &'a [u8] {
        let start = row_start(self.origin, self.stride, y);
        &self.data[start..start + self.row_bytes]
    }

    #[inline]
    pub(crate) fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub(crate) fn alignment(&self) -> usize {
        let address = self.data.as_ptr() as usize + self.origin;
        common_alignment(&[address, self.stride.unsigned_abs()])
    }
}

/// Mutable counterpart of [`PlaneRef`].
#[derive(Debug)]
pub(crate) struct PlaneMut<'a> {
    data: &'a mut [u8],
    origin: usize,
    stride: isize,
    row_bytes: usize,
    rows: usize,
}

impl<'a> PlaneMut<'a> {
    pub(crate) fn new(
        data: &'a mut [u8],
        stride: i32,
        row_bytes: usize,
        rows: usize,
    ) -> Result<PlaneMut<'a>, YuvError> {
        let origin = plane_origin(data.len(), stride, row_bytes, rows)?;
        Ok(PlaneMut {
            data,
            origin,
            stride: effective_stride(stride, row_bytes, rows),
            row_bytes,
            rows,
        })
    }

    #[inline]
    pub(crate) fn flipped(self) -> PlaneMut<'a> {
        if self.rows == 0 {
            return self;
        }
        PlaneMut {
            origin: row_start(self.origin, self.stride, self.rows - 1),
            stride: -self.stride,
            ..self
        }
    }

    #[inline]
    pub(crate) fn flip_if(self, flip: bool) -> PlaneMut<'a> {
        if flip {
            self.flipped()
        } else {
            self
        }
    }

    #[inline(always)]
    pub(crate) fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let start = row_start(self.origin, self.stride, y);
        &mut self.data[start..start + self.row_bytes]
    }

    #[inline]
    pub(crate) fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub(crate) fn alignment(&self) -> usize {
        let address = self.data.as_ptr() as usize + self.origin;
        common_alignment(&[address, self.stride.unsigned_abs()])
    }
}

/// Fixed size stack scratch row, 64 byte aligned.
#[repr(C, align(64))]
pub(crate) struct AlignedRow<T: Copy>([T; MAX_STRIDE]);

impl<T: Copy + Default> AlignedRow<T> {
    #[inline]
    pub(crate) fn new() -> AlignedRow<T> {
        AlignedRow([T::default(); MAX_STRIDE])
    }

    #[inline]
    pub(crate) fn as_slice(&self, len: usize) -> &[T] {
        &self.0[..len]
    }

    #[inline]
    pub(crate) fn as_mut_slice(&mut self, len: usize) -> &mut [T] {
        &mut self.0[..len]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_rejects_short_buffers() {
        let data = vec![0u8; 10 * 3 - 1];
        assert_eq!(
            PlaneRef::new(&data, 10, 10, 3).err(),
            Some(YuvError::PlaneSizeMismatch(MismatchedSize {
                expected: 30,
                received: 29
            }))
        );
        assert!(PlaneRef::new(&data, 8, 10, 3).is_err());
        // last row does not need padding
        let data = vec![0u8; 12 * 2 + 10];
        assert!(PlaneRef::new(&data, 12, 10, 3).is_ok());
        assert!(PlaneRef::new(&data, -12, 10, 3).is_ok());
        assert!(PlaneRef::new(&[], 0, 10, 0).is_ok());
    }

    #[test]
    fn test_negative_stride_walks_backwards() {
        let data: Vec<u8> = (0..12u8).collect();
        let plane = PlaneRef::new(&data, -4, 4, 3).unwrap();
        assert_eq!(plane.row(0), &[8, 9, 10, 11]);
        assert_eq!(plane.row(2), &[0, 1, 2, 3]);
        let flipped = plane.flipped();
        assert_eq!(flipped.row(0), &[0, 1, 2, 3]);
        assert_eq!(flipped.row(2), &[8, 9, 10, 11]);
    }

    #[test]
    fn test_flip_odd_and_even_heights() {
        for rows in 1..6usize {
            let data: Vec<u8> = (0..(rows * 3) as u8).collect();
            let plane = PlaneRef::new(&data, 3, 3, rows).unwrap();
            let flipped = plane.flipped();
            for y in 0..rows {
                assert_eq!(flipped.row(y), plane.row(rows - 1 - y));
            }
            let twice = flipped.flipped();
            for y in 0..rows {
                assert_eq!(twice.row(y), plane.row(y));
            }
        }
    }

    #[test]
    fn test_plane_mut_rows() {
        let mut data = vec![0u8; 8];
        {
            let mut plane = PlaneMut::new(&mut data, 4, 2, 2).unwrap().flipped();
            plane.row_mut(0).copy_from_slice(&[1, 2]);
            plane.row_mut(1).copy_from_slice(&[3, 4]);
        }
        assert_eq!(data, [3, 4, 0, 0, 1, 2, 0, 0]);
    }

    #[test]
    fn test_scratch_alignment() {
        let row = AlignedRow::<u8>::new();
        assert_eq!(row.as_slice(16).as_ptr() as usize % 64, 0);
    }
}
