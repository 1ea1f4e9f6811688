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
use crate::plane::{AlignedRow, PlaneMut, PlaneRef, MAX_STRIDE};
use crate::yuv_error::{check_row_fits, check_width, resolve_height};
use crate::yuv_support::{PixelLayout, YuvChromaSample, YuvStandardMatrix};
use crate::yuv_to_rgba::{yuv_to_rgba, yuv_to_rgba_kernel};
use crate::YuvError;

/// Expands `y_row.len()` gray samples into ARGB pixels.
pub(crate) type GrayToArgbRowHandler = unsafe fn(y_row: &[u8], argb: &mut [u8]);

pub(crate) fn gray_to_argb_row(y_row: &[u8], argb: &mut [u8]) {
    for (dst, &y) in argb.chunks_exact_mut(4).zip(y_row.iter()) {
        dst[0] = y;
        dst[1] = y;
        dst[2] = y;
        dst[3] = 255;
    }
}

#[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "avx"))]
#[target_feature(enable = "avx2")]
unsafe fn gray_to_argb_row_avx2(y_row: &[u8], argb: &mut [u8]) {
    gray_to_argb_row(y_row, argb);
}

fn gray_to_argb_kernel(features: CpuFeatures, width: usize) -> RowKernel<GrayToArgbRowHandler> {
    let candidates: &[KernelDescriptor<GrayToArgbRowHandler>] = &[
        #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "avx"))]
        KernelDescriptor {
            name: "gray_to_argb_row_avx2",
            feature: CpuFeature::Avx2,
            width: WidthRule::AtLeast(32),
            alignment: 1,
            kernel: gray_to_argb_row_avx2,
        },
        #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "sse"))]
        KernelDescriptor {
            name: "gray_to_argb_row_sse2",
            feature: CpuFeature::Sse2,
            width: WidthRule::AtLeast(16),
            alignment: 1,
            kernel: crate::sse::gray_to_argb_row_sse2,
        },
        #[cfg(all(target_arch = "aarch64", feature = "neon"))]
        KernelDescriptor {
            name: "gray_to_argb_row_neon",
            feature: CpuFeature::Neon,
            width: WidthRule::AtLeast(16),
            alignment: 1,
            kernel: crate::neon::gray_to_argb_row_neon,
        },
    ];
    select_kernel(
        "gray_to_argb_row",
        candidates,
        gray_to_argb_row as GrayToArgbRowHandler,
        features,
        width,
        1,
    )
}

pub(crate) fn i400_to_argb_impl(
    src_y: &[u8],
    src_stride_y: i32,
    argb: &mut [u8],
    argb_stride: i32,
    width: usize,
    height: i32,
    features: CpuFeatures,
) -> Result<(), YuvError> {
    let (rows, flip) = resolve_height(height);
    let y_plane = PlaneRef::new(src_y, src_stride_y, width, rows)?;
    let mut dst = PlaneMut::new(argb, argb_stride, width * 4, rows)?.flip_if(flip);
    let kernel = gray_to_argb_kernel(features, width);
    for y in 0..rows {
        let (src, dst) = (y_plane.row(y), dst.row_mut(y));
        kernel.split(width, |f, start, count| unsafe {
            f(&src[start..start + count], &mut dst[start * 4..(start + count) * 4])
        });
    }
    Ok(())
}

/// Converts a full range grayscale plane to ARGB by replicating the sample, alpha is 255.
///
/// Negative `height` writes the output bottom-up.
///
/// # Arguments
///
/// * `src_y`: Gray plane
/// * `src_stride_y`: Bytes per gray row, may be negative
/// * `argb`: Destination ARGB image
/// * `argb_stride`: Bytes per ARGB row, may be negative
/// * `width`: Image width
/// * `height`: Image height, negative to flip
///
/// returns: Result<(), YuvError>
///
pub fn i400_to_argb(
    src_y: &[u8],
    src_stride_y: i32,
    argb: &mut [u8],
    argb_stride: i32,
    width: i32,
    height: i32,
) -> Result<(), YuvError> {
    let width = check_width(width)?;
    i400_to_argb_impl(
        src_y,
        src_stride_y,
        argb,
        argb_stride,
        width,
        height,
        CpuFeatures::detect(),
    )
}

/// Converts a luma only plane to ARGB through `matrix` with neutral chroma.
///
/// Limited range matrices expand 16..235 to the full 0..255 range.
pub fn y_to_argb(
    src_y: &[u8],
    src_stride_y: i32,
    argb: &mut [u8],
    argb_stride: i32,
    width: i32,
    height: i32,
    matrix: YuvStandardMatrix,
) -> Result<(), YuvError> {
    const ARGB: u8 = PixelLayout::Argb as u8;
    const YUV444: u8 = YuvChromaSample::Yuv444 as u8;

    let width = check_width(width)?;
    check_row_fits(width, MAX_STRIDE)?;
    let (rows, flip) = resolve_height(height);
    let y_plane = PlaneRef::new(src_y, src_stride_y, width, rows)?;
    let mut dst = PlaneMut::new(argb, argb_stride, width * 4, rows)?.flip_if(flip);

    let mut neutral = AlignedRow::<u8>::new();
    neutral.as_mut_slice(width).fill(128);
    let chroma = neutral.as_slice(width);

    let constants = matrix.constants();
    let kernel = yuv_to_rgba_kernel::<ARGB, YUV444>(CpuFeatures::detect(), width);
    for y in 0..rows {
        yuv_to_rgba::<ARGB, YUV444>(
            &kernel,
            y_plane.row(y),
            chroma,
            chroma,
            dst.row_mut(y),
            &constants,
            width,
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_gray_kernels_match_reference() {
        let mut rng = StdRng::seed_from_u64(17);
        for width in 1..80usize {
            let src: Vec<u8> = (0..width * 2).map(|_| rng.random()).collect();
            let mut fast = vec![0u8; width * 8];
            let mut reference = vec![0u8; width * 8];
            i400_to_argb_impl(
                &src,
                width as i32,
                &mut fast,
                (width * 4) as i32,
                width,
                2,
                CpuFeatures::detect(),
            )
            .unwrap();
            i400_to_argb_impl(
                &src,
                width as i32,
                &mut reference,
                (width * 4) as i32,
                width,
                2,
                CpuFeatures::empty(),
            )
            .unwrap();
            assert_eq!(fast, reference, "width {}", width);
            for (px, &y) in reference.chunks_exact(4).zip(src.iter()) {
                assert_eq!(px, &[y, y, y, 255]);
            }
        }
    }

    #[test]
    fn test_y_to_argb_expands_limited_range() {
        let src = [16u8, 235, 126];
        let mut argb = [0u8; 12];
        y_to_argb(&src, 3, &mut argb, 12, 3, 1, YuvStandardMatrix::Bt601).unwrap();
        assert_eq!(&argb[0..4], &[0, 0, 0, 255]);
        assert_eq!(&argb[4..8], &[255, 255, 255, 255]);
        assert_eq!(argb[8], argb[9]);
        assert_eq!(argb[9], argb[10]);

        let mut jpeg = [0u8; 12];
        y_to_argb(&src, 3, &mut jpeg, 12, 3, 1, YuvStandardMatrix::Jpeg).unwrap();
        assert_eq!(&jpeg[8..12], &[126, 126, 126, 255]);
    }
}
