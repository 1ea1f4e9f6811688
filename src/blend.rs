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
use crate::numerics::blend_channel;
use crate::plane::{PlaneMut, PlaneRef};
use crate::yuv_error::{check_overflow_v2, check_width, resolve_height};
use crate::YuvError;

/// Composites `dst.len() / 4` ARGB pixels of `top` over `bottom`.
pub(crate) type BlendRowHandler = unsafe fn(bottom: &[u8], top: &[u8], dst: &mut [u8]);

/// Top layer alpha drives the mix, the result is opaque.
pub(crate) fn blend_row(bottom: &[u8], top: &[u8], dst: &mut [u8]) {
    for ((dst, bottom), top) in dst
        .chunks_exact_mut(4)
        .zip(bottom.chunks_exact(4))
        .zip(top.chunks_exact(4))
    {
        let a = top[3];
        dst[0] = blend_channel(top[0], bottom[0], a);
        dst[1] = blend_channel(top[1], bottom[1], a);
        dst[2] = blend_channel(top[2], bottom[2], a);
        dst[3] = 255;
    }
}

fn blend_kernel(features: CpuFeatures, width: usize) -> RowKernel<BlendRowHandler> {
    let candidates: &[KernelDescriptor<BlendRowHandler>] = &[
        #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "sse"))]
        KernelDescriptor {
            name: "blend_row_sse2",
            feature: CpuFeature::Sse2,
            width: WidthRule::AtLeast(4),
            alignment: 1,
            kernel: crate::sse::blend_row_sse2,
        },
        #[cfg(all(target_arch = "aarch64", feature = "neon"))]
        KernelDescriptor {
            name: "blend_row_neon",
            feature: CpuFeature::Neon,
            width: WidthRule::AtLeast(8),
            alignment: 1,
            kernel: crate::neon::blend_row_neon,
        },
    ];
    select_kernel(
        "blend_row",
        candidates,
        blend_row as BlendRowHandler,
        features,
        width,
        1,
    )
}

pub(crate) fn argb_blend_impl(
    src_argb0: &[u8],
    src_stride_argb0: i32,
    src_argb1: &[u8],
    src_stride_argb1: i32,
    dst_argb: &mut [u8],
    dst_stride_argb: i32,
    width: usize,
    height: i32,
    features: CpuFeatures,
) -> Result<(), YuvError> {
    let (rows, flip) = resolve_height(height);
    let row_bytes = check_overflow_v2(width, 4)?;
    let bottom = PlaneRef::new(src_argb0, src_stride_argb0, row_bytes, rows)?;
    let top = PlaneRef::new(src_argb1, src_stride_argb1, row_bytes, rows)?;
    let mut dst = PlaneMut::new(dst_argb, dst_stride_argb, row_bytes, rows)?.flip_if(flip);
    let kernel = blend_kernel(features, width);
    for y in 0..rows {
        let (bottom, top, dst) = (bottom.row(y), top.row(y), dst.row_mut(y));
        kernel.split(width, |f, start, count| unsafe {
            let range = start * 4..(start + count) * 4;
            f(&bottom[range.clone()], &top[range.clone()], &mut dst[range])
        });
    }
    Ok(())
}

/// Alpha blends `src_argb1` over `src_argb0`.
///
/// Each color channel is `(a * top + (255 - a) * bottom + 127) / 255` where `a` is the top
/// pixel alpha, the output alpha is 255. Negative `height` writes the output bottom-up.
///
/// # Arguments
///
/// * `src_argb0`: Bottom layer
/// * `src_stride_argb0`: Bytes per bottom row, may be negative
/// * `src_argb1`: Top layer
/// * `src_stride_argb1`: Bytes per top row, may be negative
/// * `dst_argb`: Destination
/// * `dst_stride_argb`: Bytes per destination row, may be negative
/// * `width`: Image width
/// * `height`: Image height, negative to flip
///
/// returns: Result<(), YuvError>
///
pub fn argb_blend(
    src_argb0: &[u8],
    src_stride_argb0: i32,
    src_argb1: &[u8],
    src_stride_argb1: i32,
    dst_argb: &mut [u8],
    dst_stride_argb: i32,
    width: i32,
    height: i32,
) -> Result<(), YuvError> {
    let width = check_width(width)?;
    argb_blend_impl(
        src_argb0,
        src_stride_argb0,
        src_argb1,
        src_stride_argb1,
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
    fn test_blend_row_bytes_overflow() {
        let src = [0u8; 8];
        let mut dst = [7u8; 8];
        let width = usize::MAX / 2;
        let features = CpuFeatures::empty();
        let result = argb_blend_impl(&src, 8, &src, 8, &mut dst, 8, width, 1, features);
        assert_eq!(result, Err(YuvError::PointerOverflow));
        assert_eq!(dst, [7; 8]);
    }

    #[test]
    fn test_blend_kernels_match_reference() {
        let mut rng = StdRng::seed_from_u64(53);
        for width in 1..70usize {
            let len = width * 4 * 2;
            let bottom: Vec<u8> = (0..len).map(|_| rng.random()).collect();
            let top: Vec<u8> = (0..len).map(|_| rng.random()).collect();
            let stride = (width * 4) as i32;
            let mut fast = vec![0u8; len];
            let mut reference = vec![0u8; len];
            argb_blend_impl(
                &bottom,
                stride,
                &top,
                stride,
                &mut fast,
                stride,
                width,
                2,
                CpuFeatures::detect(),
            )
            .unwrap();
            argb_blend_impl(
                &bottom,
                stride,
                &top,
                stride,
                &mut reference,
                stride,
                width,
                2,
                CpuFeatures::empty(),
            )
            .unwrap();
            assert_eq!(fast, reference, "width {}", width);
        }
    }

    #[test]
    fn test_blend_alpha_limits() {
        let bottom = [10u8, 20, 30, 0, 10, 20, 30, 0, 0, 0, 0, 0];
        let top = [200u8, 100, 50, 255, 200, 100, 50, 0, 255, 255, 255, 128];
        let mut dst = [0u8; 12];
        argb_blend(&bottom, 12, &top, 12, &mut dst, 12, 3, 1).unwrap();
        assert_eq!(&dst[0..4], &[200, 100, 50, 255]);
        assert_eq!(&dst[4..8], &[10, 20, 30, 255]);
        assert_eq!(&dst[8..12], &[128, 128, 128, 255]);
    }

    #[test]
    fn test_blend_flips_destination() {
        let bottom = [0u8; 8];
        let top = [1u8, 1, 1, 255, 2, 2, 2, 255];
        let mut dst = [0u8; 8];
        argb_blend(&bottom, 4, &top, 4, &mut dst, 4, 1, -2).unwrap();
        assert_eq!(dst, [2, 2, 2, 255, 1, 1, 1, 255]);
    }
}
