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
use crate::numerics::{attenuate_channel, unattenuate_channel};
use crate::plane::{PlaneMut, PlaneRef};
use crate::yuv_error::{check_overflow_v2, check_width, resolve_height};
use crate::YuvError;

/// Rewrites the color channels of `dst.len() / 4` ARGB pixels, alpha is copied.
pub(crate) type AlphaRowHandler = unsafe fn(src: &[u8], dst: &mut [u8]);

pub(crate) fn attenuate_row(src: &[u8], dst: &mut [u8]) {
    for (dst, src) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = src[3];
        dst[0] = attenuate_channel(src[0], a);
        dst[1] = attenuate_channel(src[1], a);
        dst[2] = attenuate_channel(src[2], a);
        dst[3] = a;
    }
}

pub(crate) fn unattenuate_row(src: &[u8], dst: &mut [u8]) {
    for (dst, src) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = src[3];
        dst[0] = unattenuate_channel(src[0], a);
        dst[1] = unattenuate_channel(src[1], a);
        dst[2] = unattenuate_channel(src[2], a);
        dst[3] = a;
    }
}

fn attenuate_kernel(features: CpuFeatures, width: usize) -> RowKernel<AlphaRowHandler> {
    let candidates: &[KernelDescriptor<AlphaRowHandler>] = &[
        #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "sse"))]
        KernelDescriptor {
            name: "attenuate_row_sse2",
            feature: CpuFeature::Sse2,
            width: WidthRule::AtLeast(4),
            alignment: 1,
            kernel: crate::sse::attenuate_row_sse2,
        },
        #[cfg(all(target_arch = "aarch64", feature = "neon"))]
        KernelDescriptor {
            name: "attenuate_row_neon",
            feature: CpuFeature::Neon,
            width: WidthRule::AtLeast(8),
            alignment: 1,
            kernel: crate::neon::attenuate_row_neon,
        },
    ];
    select_kernel(
        "attenuate_row",
        candidates,
        attenuate_row as AlphaRowHandler,
        features,
        width,
        1,
    )
}

fn unattenuate_kernel(features: CpuFeatures, width: usize) -> RowKernel<AlphaRowHandler> {
    let candidates: &[KernelDescriptor<AlphaRowHandler>] = &[
        #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "avx"))]
        KernelDescriptor {
            name: "unattenuate_row_avx2",
            feature: CpuFeature::Avx2,
            width: WidthRule::AtLeast(8),
            alignment: 1,
            kernel: crate::avx2::unattenuate_row_avx2,
        },
    ];
    select_kernel(
        "unattenuate_row",
        candidates,
        unattenuate_row as AlphaRowHandler,
        features,
        width,
        1,
    )
}

fn alpha_rows(
    src_argb: &[u8],
    src_stride_argb: i32,
    dst_argb: &mut [u8],
    dst_stride_argb: i32,
    width: usize,
    height: i32,
    kernel: RowKernel<AlphaRowHandler>,
) -> Result<(), YuvError> {
    let (rows, flip) = resolve_height(height);
    let row_bytes = check_overflow_v2(width, 4)?;
    let src = PlaneRef::new(src_argb, src_stride_argb, row_bytes, rows)?.flip_if(flip);
    let mut dst = PlaneMut::new(dst_argb, dst_stride_argb, row_bytes, rows)?;
    for y in 0..rows {
        let (src, dst) = (src.row(y), dst.row_mut(y));
        kernel.split(width, |f, start, count| unsafe {
            f(
                &src[start * 4..(start + count) * 4],
                &mut dst[start * 4..(start + count) * 4],
            )
        });
    }
    Ok(())
}

pub(crate) fn argb_attenuate_impl(
    src_argb: &[u8],
    src_stride_argb: i32,
    dst_argb: &mut [u8],
    dst_stride_argb: i32,
    width: usize,
    height: i32,
    features: CpuFeatures,
) -> Result<(), YuvError> {
    alpha_rows(
        src_argb,
        src_stride_argb,
        dst_argb,
        dst_stride_argb,
        width,
        height,
        attenuate_kernel(features, width),
    )
}

pub(crate) fn argb_unattenuate_impl(
    src_argb: &[u8],
    src_stride_argb: i32,
    dst_argb: &mut [u8],
    dst_stride_argb: i32,
    width: usize,
    height: i32,
    features: CpuFeatures,
) -> Result<(), YuvError> {
    alpha_rows(
        src_argb,
        src_stride_argb,
        dst_argb,
        dst_stride_argb,
        width,
        height,
        unattenuate_kernel(features, width),
    )
}

/// Premultiplies color channels by alpha: `c = (c * a + 127) / 255`.
///
/// Negative `height` flips the source.
///
/// # Arguments
///
/// * `src_argb`: Straight alpha ARGB image
/// * `src_stride_argb`: Bytes per source row, may be negative
/// * `dst_argb`: Destination, may not alias the source
/// * `dst_stride_argb`: Bytes per destination row, may be negative
/// * `width`: Image width
/// * `height`: Image height, negative to flip
///
/// returns: Result<(), YuvError>
///
pub fn argb_attenuate(
    src_argb: &[u8],
    src_stride_argb: i32,
    dst_argb: &mut [u8],
    dst_stride_argb: i32,
    width: i32,
    height: i32,
) -> Result<(), YuvError> {
    let width = check_width(width)?;
    argb_attenuate_impl(
        src_argb,
        src_stride_argb,
        dst_argb,
        dst_stride_argb,
        width,
        height,
        CpuFeatures::detect(),
    )
}

/// Divides premultiplied color channels by alpha through a reciprocal table.
///
/// Channels saturate at 255, pixels with zero alpha are passed through.
/// Negative `height` flips the source.
pub fn argb_unattenuate(
    src_argb: &[u8],
    src_stride_argb: i32,
    dst_argb: &mut [u8],
    dst_stride_argb: i32,
    width: i32,
    height: i32,
) -> Result<(), YuvError> {
    let width = check_width(width)?;
    argb_unattenuate_impl(
        src_argb,
        src_stride_argb,
        dst_argb,
        dst_stride_argb,
        width,
        height,
        CpuFeatures::detect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_alpha_row_bytes_overflow() {
        let src = [0u8; 8];
        let width = usize::MAX / 2;
        for features in [CpuFeatures::detect(), CpuFeatures::empty()] {
            let mut dst = [7u8; 8];
            assert_eq!(
                argb_attenuate_impl(&src, 8, &mut dst, 8, width, 1, features),
                Err(YuvError::PointerOverflow)
            );
            assert_eq!(
                argb_unattenuate_impl(&src, 8, &mut dst, 8, width, 1, features),
                Err(YuvError::PointerOverflow)
            );
            assert_eq!(dst, [7; 8]);
        }
    }

    type AlphaImpl =
        fn(&[u8], i32, &mut [u8], i32, usize, i32, CpuFeatures) -> Result<(), YuvError>;

    #[test]
    fn test_alpha_kernels_match_reference() {
        let mut rng = StdRng::seed_from_u64(61);
        let ops: [AlphaImpl; 2] = [argb_attenuate_impl, argb_unattenuate_impl];
        for op in ops {
            for width in 1..70usize {
                let src: Vec<u8> = (0..width * 4 * 2).map(|_| rng.random()).collect();
                let stride = (width * 4) as i32;
                let mut fast = vec![0u8; src.len()];
                let mut reference = vec![0u8; src.len()];
                op(&src, stride, &mut fast, stride, width, 2, CpuFeatures::detect()).unwrap();
                op(&src, stride, &mut reference, stride, width, 2, CpuFeatures::empty()).unwrap();
                assert_eq!(fast, reference, "width {}", width);
            }
        }
    }

    #[test]
    fn test_attenuate_half_alpha() {
        // B, G, R, A
        let src = [50u8, 100, 200, 128];
        let mut dst = [0u8; 4];
        argb_attenuate(&src, 4, &mut dst, 4, 1, 1).unwrap();
        assert_eq!(dst, [25, 50, 100, 128]);
    }

    #[test]
    fn test_unattenuate_near_inverse() {
        let mut pixels = Vec::new();
        for a in 1..=255u8 {
            for c in (0..=255u8).step_by(5) {
                pixels.extend_from_slice(&[c, c / 2, 255 - c, a]);
            }
        }
        let width = pixels.len() / 4;
        let stride = pixels.len() as i32;
        let mut premultiplied = vec![0u8; pixels.len()];
        let mut restored = vec![0u8; pixels.len()];
        argb_attenuate(&pixels, stride, &mut premultiplied, stride, width as i32, 1).unwrap();
        argb_unattenuate(&premultiplied, stride, &mut restored, stride, width as i32, 1).unwrap();
        for (src, back) in pixels.chunks_exact(4).zip(restored.chunks_exact(4)) {
            let a = src[3] as i32;
            let bound = (255 + a - 1) / a;
            for c in 0..3 {
                let diff = (src[c] as i32 - back[c] as i32).abs();
                assert!(diff <= bound, "{:?} -> {:?}", src, back);
            }
            assert_eq!(src[3], back[3]);
        }
    }

    #[test]
    fn test_unattenuate_zero_alpha_passes_through() {
        let src = [7u8, 8, 9, 0];
        let mut dst = [0u8; 4];
        argb_unattenuate(&src, 4, &mut dst, 4, 1, 1).unwrap();
        assert_eq!(dst, src);
    }
}
