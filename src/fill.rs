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
use crate::cpu::{CpuFeature, CpuFeatures};
use crate::dispatch::{select_kernel, KernelDescriptor, RowKernel, WidthRule};
use crate::images::YuvPlanarImageMut;
use crate::plane::PlaneMut;
use crate::yuv_error::{check_fill_height, check_width};
use crate::YuvError;

/// Writes the little endian 32-bit `value` repeatedly over `dst`.
pub(crate) type SetRowHandler = unsafe fn(dst: &mut [u8], value: u32);

pub(crate) fn set_row(dst: &mut [u8], value: u32) {
    let pattern = value.to_le_bytes();
    let mut chunks = dst.chunks_exact_mut(4);
    for chunk in &mut chunks {
        chunk.copy_from_slice(&pattern);
    }
    for (dst, &src) in chunks.into_remainder().iter_mut().zip(pattern.iter()) {
        *dst = src;
    }
}

fn set_row_kernel(features: CpuFeatures, width: usize, alignment: usize) -> RowKernel<SetRowHandler> {
    let candidates: &[KernelDescriptor<SetRowHandler>] = &[
        #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "avx"))]
        KernelDescriptor {
            name: "set_row_avx2",
            feature: CpuFeature::Avx2,
            width: WidthRule::AtLeast(32),
            alignment: 1,
            kernel: crate::avx2::set_row_avx2,
        },
        #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "sse"))]
        KernelDescriptor {
            name: "set_row_sse2",
            feature: CpuFeature::Sse2,
            width: WidthRule::MultipleOf(16),
            alignment: 16,
            kernel: crate::sse::set_row_sse2,
        },
        #[cfg(all(target_arch = "aarch64", feature = "neon"))]
        KernelDescriptor {
            name: "set_row_neon",
            feature: CpuFeature::Neon,
            width: WidthRule::AtLeast(16),
            alignment: 1,
            kernel: crate::neon::set_row_neon,
        },
    ];
    select_kernel(
        "set_row",
        candidates,
        set_row as SetRowHandler,
        features,
        width,
        alignment,
    )
}

/// Fills `row_bytes` of every row of `plane` starting at byte `x`.
fn fill_rows(
    plane: &mut PlaneMut,
    first_row: usize,
    x: usize,
    row_bytes: usize,
    value: u32,
    features: CpuFeatures,
) {
    let kernel = set_row_kernel(features, row_bytes, 1);
    for y in first_row..plane.rows() {
        let row = &mut plane.row_mut(y)[x..x + row_bytes];
        kernel.split(row_bytes, |f, start, count| unsafe {
            f(&mut row[start..start + count], value)
        });
    }
}

/// Fills a rectangle `[x, x + width) x [y, y + height)` of a plane of `bpp` byte samples.
fn fill_rect_impl(
    dst: &mut [u8],
    dst_stride: i32,
    x: usize,
    y: usize,
    width: usize,
    height: usize,
    bpp: usize,
    value: u32,
    features: CpuFeatures,
) -> Result<(), YuvError> {
    let row_bytes = width.checked_mul(bpp).ok_or(YuvError::PointerOverflow)?;
    let start = x.checked_mul(bpp).ok_or(YuvError::PointerOverflow)?;
    let mut plane = PlaneMut::new(dst, dst_stride, start + row_bytes, y + height)?;
    if x == 0 && y == 0 {
        let alignment = plane.alignment();
        let kernel = set_row_kernel(features, row_bytes, alignment);
        for row in 0..plane.rows() {
            let row = plane.row_mut(row);
            kernel.split(row_bytes, |f, start, count| unsafe {
                f(&mut row[start..start + count], value)
            });
        }
        return Ok(());
    }
    fill_rows(&mut plane, y, start, row_bytes, value, features);
    Ok(())
}

#[inline]
fn check_offsets(x: i32, y: i32) -> Result<(usize, usize), YuvError> {
    if x < 0 || y < 0 {
        return Err(YuvError::NegativeOffset);
    }
    Ok((x as usize, y as usize))
}

#[inline]
fn check_sample(value: i32) -> Result<u32, YuvError> {
    if !(0..=255).contains(&value) {
        return Err(YuvError::ValueOutOfRange(value));
    }
    Ok(value as u32 * 0x01010101)
}

/// Fills a plane of bytes with a constant value.
///
/// `height` must be positive.
pub fn set_plane(
    dst: &mut [u8],
    dst_stride: i32,
    width: i32,
    height: i32,
    value: u8,
) -> Result<(), YuvError> {
    let width = check_width(width)?;
    let height = check_fill_height(height)?;
    fill_rect_impl(
        dst,
        dst_stride,
        0,
        0,
        width,
        height,
        1,
        value as u32 * 0x01010101,
        CpuFeatures::detect(),
    )
}

/// Fills a rectangle of an I420 image.
///
/// Chroma rectangle starts at `(x / 2, y / 2)` and spans `((width + 1) / 2, (height + 1) / 2)`.
/// Values must be in `0..=255`.
pub fn i420_rect(
    dst: &mut YuvPlanarImageMut,
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    value_y: i32,
    value_u: i32,
    value_v: i32,
) -> Result<(), YuvError> {
    let (x, y) = check_offsets(x, y)?;
    let width = check_width(width)?;
    let height = check_fill_height(height)?;
    let value_y = check_sample(value_y)?;
    let value_u = check_sample(value_u)?;
    let value_v = check_sample(value_v)?;
    let features = CpuFeatures::detect();

    let chroma_x = x / 2;
    let chroma_y = y / 2;
    let chroma_width = (width + 1) >> 1;
    let chroma_height = (height + 1) >> 1;

    // validate all planes before the first write
    PlaneMut::new(dst.y_plane, dst.y_stride, x + width, y + height)?;
    PlaneMut::new(
        dst.u_plane,
        dst.u_stride,
        chroma_x + chroma_width,
        chroma_y + chroma_height,
    )?;
    PlaneMut::new(
        dst.v_plane,
        dst.v_stride,
        chroma_x + chroma_width,
        chroma_y + chroma_height,
    )?;

    fill_rect_impl(
        dst.y_plane,
        dst.y_stride,
        x,
        y,
        width,
        height,
        1,
        value_y,
        features,
    )?;
    fill_rect_impl(
        dst.u_plane,
        dst.u_stride,
        chroma_x,
        chroma_y,
        chroma_width,
        chroma_height,
        1,
        value_u,
        features,
    )?;
    fill_rect_impl(
        dst.v_plane,
        dst.v_stride,
        chroma_x,
        chroma_y,
        chroma_width,
        chroma_height,
        1,
        value_v,
        features,
    )
}

/// Fills a rectangle of an ARGB image with a 32-bit pixel value.
pub fn argb_rect(
    dst: &mut [u8],
    dst_stride: i32,
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    value: u32,
) -> Result<(), YuvError> {
    let (x, y) = check_offsets(x, y)?;
    let width = check_width(width)?;
    let height = check_fill_height(height)?;
    fill_rect_impl(
        dst,
        dst_stride,
        x,
        y,
        width,
        height,
        4,
        value,
        CpuFeatures::detect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_kernels_match_reference() {
        for width in 0..100usize {
            for value in [0x01010101u32, 0xFF00FF00, 0x12345678] {
                let mut fast = vec![0u8; width * 3];
                let mut reference = vec![0u8; width * 3];
                let stride = width.max(1) as i32;
                fill_rect_impl(&mut fast, stride, 0, 0, width, 3, 1, value, CpuFeatures::detect())
                    .unwrap();
                fill_rect_impl(
                    &mut reference,
                    stride,
                    0,
                    0,
                    width,
                    3,
                    1,
                    value,
                    CpuFeatures::empty(),
                )
                .unwrap();
                assert_eq!(fast, reference, "width {}", width);
            }
        }
    }

    #[test]
    fn test_argb_rect_keeps_border() {
        let original: Vec<u8> = (0..12 * 12 * 4).map(|i| (i % 251) as u8).collect();
        let mut canvas = original.clone();
        argb_rect(&mut canvas, 12 * 4, 1, 1, 10, 10, 0xFF00FF00).unwrap();
        for y in 0..12usize {
            for x in 0..12usize {
                let offset = y * 48 + x * 4;
                let px = &canvas[offset..offset + 4];
                if (1..11).contains(&x) && (1..11).contains(&y) {
                    assert_eq!(px, &0xFF00FF00u32.to_le_bytes());
                } else {
                    assert_eq!(px, &original[offset..offset + 4], "x {} y {}", x, y);
                }
            }
        }
    }

    #[test]
    fn test_i420_rect_containment() {
        let (w, h) = (9usize, 7usize);
        let (cw, ch) = (5usize, 4usize);
        let mut y_plane = vec![7u8; w * h];
        let mut u_plane = vec![7u8; cw * ch];
        let mut v_plane = vec![7u8; cw * ch];
        let mut image = YuvPlanarImageMut {
            y_plane: &mut y_plane,
            y_stride: w as i32,
            u_plane: &mut u_plane,
            u_stride: cw as i32,
            v_plane: &mut v_plane,
            v_stride: cw as i32,
        };
        i420_rect(&mut image, 3, 2, 5, 3, 100, 110, 120).unwrap();
        for y in 0..h {
            for x in 0..w {
                let inside = (3..8).contains(&x) && (2..5).contains(&y);
                assert_eq!(y_plane[y * w + x], if inside { 100 } else { 7 });
            }
        }
        for y in 0..ch {
            for x in 0..cw {
                let inside = (1..4).contains(&x) && (1..3).contains(&y);
                assert_eq!(u_plane[y * cw + x], if inside { 110 } else { 7 });
                assert_eq!(v_plane[y * cw + x], if inside { 120 } else { 7 });
            }
        }
    }

    #[test]
    fn test_rect_rejects_bad_arguments() {
        let mut canvas = vec![0u8; 64];
        assert_eq!(
            argb_rect(&mut canvas, 16, -1, 0, 1, 1, 0),
            Err(YuvError::NegativeOffset)
        );
        assert_eq!(
            argb_rect(&mut canvas, 16, 0, 0, 1, 0, 0),
            Err(YuvError::ZeroBaseSize)
        );
        assert_eq!(
            argb_rect(&mut canvas, 16, 0, 0, 1, -1, 0),
            Err(YuvError::InvalidDimensions)
        );
        assert!(argb_rect(&mut canvas, 16, 3, 3, 2, 2, 0).is_err());
        assert!(canvas.iter().all(|&v| v == 0));
        let mut y = [0u8; 4];
        let mut u = [0u8; 1];
        let mut v = [0u8; 1];
        let mut image = YuvPlanarImageMut {
            y_plane: &mut y,
            y_stride: 2,
            u_plane: &mut u,
            u_stride: 1,
            v_plane: &mut v,
            v_stride: 1,
        };
        assert_eq!(
            i420_rect(&mut image, 0, 0, 2, 2, 256, 0, 0),
            Err(YuvError::ValueOutOfRange(256))
        );
        assert_eq!(
            i420_rect(&mut image, 0, 0, 2, 2, 0, -1, 0),
            Err(YuvError::ValueOutOfRange(-1))
        );
        assert!(i420_rect(&mut image, 0, 0, 2, 2, 1, 2, 3).is_ok());
        assert_eq!(y, [1, 1, 1, 1]);
        assert_eq!(u, [2]);
        assert_eq!(v, [3]);
    }

    #[test]
    fn test_set_plane() {
        let mut plane = vec![0u8; 5 * 3];
        set_plane(&mut plane, 5, 4, 3, 9).unwrap();
        for y in 0..3 {
            assert_eq!(&plane[y * 5..y * 5 + 4], &[9, 9, 9, 9]);
            assert_eq!(plane[y * 5 + 4], 0);
        }
        assert_eq!(set_plane(&mut plane, 5, 4, 0, 9), Err(YuvError::ZeroBaseSize));
    }
}
