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
use crate::numerics::rgb_to_y;
use crate::plane::{PlaneMut, PlaneRef};
use crate::yuv_error::{check_width, resolve_height};
use crate::yuv_support::PixelLayout;
use crate::YuvError;

/// Produces `y_row.len()` luma samples.
pub(crate) type RgbToYRowHandler = unsafe fn(rgba: &[u8], y_row: &mut [u8]);

pub(crate) fn rgb_to_y_row<const LAYOUT: u8>(rgba: &[u8], y_row: &mut [u8]) {
    let layout: PixelLayout = LAYOUT.into();
    for (y, px) in y_row
        .iter_mut()
        .zip(rgba.chunks_exact(layout.get_channels_count()))
    {
        *y = rgb_to_y(
            px[layout.get_r_channel_offset()],
            px[layout.get_g_channel_offset()],
            px[layout.get_b_channel_offset()],
        );
    }
}

fn rgb_to_y_kernel<const LAYOUT: u8>(features: CpuFeatures, width: usize) -> RowKernel<RgbToYRowHandler> {
    let candidates: &[KernelDescriptor<RgbToYRowHandler>] = &[
        #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "sse"))]
        KernelDescriptor {
            name: "rgb_to_y_row_ssse3",
            feature: CpuFeature::Ssse3,
            width: WidthRule::AtLeast(4),
            alignment: 1,
            kernel: crate::sse::rgb_to_y_row_ssse3::<LAYOUT>,
        },
        #[cfg(all(target_arch = "aarch64", feature = "neon"))]
        KernelDescriptor {
            name: "rgb_to_y_row_neon",
            feature: CpuFeature::Neon,
            width: WidthRule::AtLeast(8),
            alignment: 1,
            kernel: crate::neon::rgb_to_y_row_neon::<LAYOUT>,
        },
    ];
    let candidates = if PixelLayout::from(LAYOUT).get_channels_count() == 4 {
        candidates
    } else {
        &candidates[..0]
    };
    select_kernel(
        "rgb_to_y_row",
        candidates,
        rgb_to_y_row::<LAYOUT> as RgbToYRowHandler,
        features,
        width,
        1,
    )
}

pub(crate) fn rgbx_to_y_impl<const LAYOUT: u8>(
    src: &[u8],
    src_stride: i32,
    dst_y: &mut [u8],
    dst_stride_y: i32,
    width: usize,
    height: i32,
    features: CpuFeatures,
) -> Result<(), YuvError> {
    let channels = PixelLayout::from(LAYOUT).get_channels_count();
    let (rows, flip) = resolve_height(height);
    let src_plane = PlaneRef::new(src, src_stride, width * channels, rows)?.flip_if(flip);
    let mut y_plane = PlaneMut::new(dst_y, dst_stride_y, width, rows)?;
    let kernel = rgb_to_y_kernel::<LAYOUT>(features, width);
    for y in 0..rows {
        let (src, dst) = (src_plane.row(y), y_plane.row_mut(y));
        kernel.split(width, |f, start, count| unsafe {
            f(
                &src[start * channels..(start + count) * channels],
                &mut dst[start..start + count],
            )
        });
    }
    Ok(())
}

/// Converts ARGB to a BT.601 limited range luma plane.
///
/// `Y = (66 * R + 129 * G + 25 * B + 0x1080) >> 8`, negative `height` flips the source.
///
/// # Arguments
///
/// * `src_argb`: Source ARGB image
/// * `src_stride_argb`: Bytes per ARGB row, may be negative
/// * `dst_y`: Destination luma plane
/// * `dst_stride_y`: Bytes per luma row, may be negative
/// * `width`: Image width
/// * `height`: Image height, negative to flip
///
/// returns: Result<(), YuvError>
///
pub fn argb_to_i400(
    src_argb: &[u8],
    src_stride_argb: i32,
    dst_y: &mut [u8],
    dst_stride_y: i32,
    width: i32,
    height: i32,
) -> Result<(), YuvError> {
    let width = check_width(width)?;
    rgbx_to_y_impl::<{ PixelLayout::Argb as u8 }>(
        src_argb,
        src_stride_argb,
        dst_y,
        dst_stride_y,
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

    const ARGB: u8 = PixelLayout::Argb as u8;

    #[test]
    fn test_luma_kernels_match_reference() {
        let mut rng = StdRng::seed_from_u64(23);
        for width in 1..60usize {
            let src: Vec<u8> = (0..width * 4 * 3).map(|_| rng.random()).collect();
            let mut fast = vec![0u8; width * 3];
            let mut reference = vec![0u8; width * 3];
            rgbx_to_y_impl::<ARGB>(
                &src,
                (width * 4) as i32,
                &mut fast,
                width as i32,
                width,
                3,
                CpuFeatures::detect(),
            )
            .unwrap();
            rgbx_to_y_impl::<ARGB>(
                &src,
                (width * 4) as i32,
                &mut reference,
                width as i32,
                width,
                3,
                CpuFeatures::empty(),
            )
            .unwrap();
            assert_eq!(fast, reference, "width {}", width);
        }
    }

    #[test]
    fn test_luma_extremes() {
        let argb = [0u8, 0, 0, 255, 255, 255, 255, 255];
        let mut y = [0u8; 2];
        argb_to_i400(&argb, 8, &mut y, 2, 2, 1).unwrap();
        assert_eq!(y, [16, 235]);
    }
}
