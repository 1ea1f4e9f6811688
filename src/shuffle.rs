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
use crate::numerics::store_pixel;
use crate::plane::{PlaneMut, PlaneRef};
use crate::yuv_error::{check_width, resolve_height};
use crate::yuv_support::PixelLayout;
use crate::YuvError;

/// Reorders whole pixels, the pixel count is implied by the slice lengths.
pub(crate) type ShuffleRowHandler = unsafe fn(src: &[u8], dst: &mut [u8]);

pub(crate) fn shuffle_row<const SRC: u8, const DST: u8>(src: &[u8], dst: &mut [u8]) {
    let src_layout: PixelLayout = SRC.into();
    let dst_layout: PixelLayout = DST.into();
    for (s, d) in src
        .chunks_exact(src_layout.get_channels_count())
        .zip(dst.chunks_exact_mut(dst_layout.get_channels_count()))
    {
        let a = if src_layout.has_alpha() {
            s[src_layout.get_a_channel_offset()]
        } else {
            255
        };
        store_pixel::<DST>(
            d,
            s[src_layout.get_r_channel_offset()],
            s[src_layout.get_g_channel_offset()],
            s[src_layout.get_b_channel_offset()],
            a,
        );
    }
}

/// Byte shuffles exist for 4 to 4, 3 to 4 and 4 to 3 channel conversions.
const fn has_vector_shuffle(src: PixelLayout, dst: PixelLayout) -> bool {
    let src_channels = src.get_channels_count();
    let dst_channels = dst.get_channels_count();
    (src_channels == 4 && dst_channels == 4)
        || (src_channels == 3 && dst_channels == 4)
        || (src_channels == 4 && dst_channels == 3)
}

fn shuffle_kernel<const SRC: u8, const DST: u8>(
    features: CpuFeatures,
    width: usize,
) -> RowKernel<ShuffleRowHandler> {
    let candidates: &[KernelDescriptor<ShuffleRowHandler>] = &[
        #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "sse"))]
        KernelDescriptor {
            name: "shuffle_row_ssse3",
            feature: CpuFeature::Ssse3,
            width: WidthRule::AtLeast(16),
            alignment: 1,
            kernel: crate::sse::shuffle_row_ssse3::<SRC, DST>,
        },
        #[cfg(all(target_arch = "aarch64", feature = "neon"))]
        KernelDescriptor {
            name: "shuffle_row_neon",
            feature: CpuFeature::Neon,
            width: WidthRule::AtLeast(16),
            alignment: 1,
            kernel: crate::neon::shuffle_row_neon::<SRC, DST>,
        },
    ];
    let candidates = if has_vector_shuffle(SRC.into(), DST.into()) {
        candidates
    } else {
        &candidates[..0]
    };
    select_kernel(
        "shuffle_row",
        candidates,
        shuffle_row::<SRC, DST> as ShuffleRowHandler,
        features,
        width,
        1,
    )
}

pub(crate) fn shuffle_impl<const SRC: u8, const DST: u8>(
    src: &[u8],
    src_stride: i32,
    dst: &mut [u8],
    dst_stride: i32,
    width: usize,
    height: i32,
    features: CpuFeatures,
) -> Result<(), YuvError> {
    let src_channels = PixelLayout::from(SRC).get_channels_count();
    let dst_channels = PixelLayout::from(DST).get_channels_count();
    let (rows, flip) = resolve_height(height);
    let src_plane = PlaneRef::new(src, src_stride, width * src_channels, rows)?.flip_if(flip);
    let mut dst_plane = PlaneMut::new(dst, dst_stride, width * dst_channels, rows)?;
    let kernel = shuffle_kernel::<SRC, DST>(features, width);
    for y in 0..rows {
        let (src, dst) = (src_plane.row(y), dst_plane.row_mut(y));
        kernel.split(width, |f, start, count| unsafe {
            f(
                &src[start * src_channels..(start + count) * src_channels],
                &mut dst[start * dst_channels..(start + count) * dst_channels],
            )
        });
    }
    Ok(())
}

fn shuffle<const SRC: u8, const DST: u8>(
    src: &[u8],
    src_stride: i32,
    dst: &mut [u8],
    dst_stride: i32,
    width: i32,
    height: i32,
) -> Result<(), YuvError> {
    let width = check_width(width)?;
    shuffle_impl::<SRC, DST>(
        src,
        src_stride,
        dst,
        dst_stride,
        width,
        height,
        CpuFeatures::detect(),
    )
}

/// Converts ARGB to RGB24 (B, G, R in memory), negative `height` flips the source.
pub fn argb_to_rgb24(
    src_argb: &[u8],
    src_stride_argb: i32,
    dst_rgb24: &mut [u8],
    dst_stride_rgb24: i32,
    width: i32,
    height: i32,
) -> Result<(), YuvError> {
    shuffle::<{ PixelLayout::Argb as u8 }, { PixelLayout::Rgb24 as u8 }>(
        src_argb,
        src_stride_argb,
        dst_rgb24,
        dst_stride_rgb24,
        width,
        height,
    )
}

/// Converts ARGB to RAW (R, G, B in memory), negative `height` flips the source.
pub fn argb_to_raw(
    src_argb: &[u8],
    src_stride_argb: i32,
    dst_raw: &mut [u8],
    dst_stride_raw: i32,
    width: i32,
    height: i32,
) -> Result<(), YuvError> {
    shuffle::<{ PixelLayout::Argb as u8 }, { PixelLayout::Raw as u8 }>(
        src_argb,
        src_stride_argb,
        dst_raw,
        dst_stride_raw,
        width,
        height,
    )
}

/// Converts ARGB to little endian RGB565, negative `height` flips the source.
pub fn argb_to_rgb565(
    src_argb: &[u8],
    src_stride_argb: i32,
    dst_rgb565: &mut [u8],
    dst_stride_rgb565: i32,
    width: i32,
    height: i32,
) -> Result<(), YuvError> {
    shuffle::<{ PixelLayout::Argb as u8 }, { PixelLayout::Rgb565 as u8 }>(
        src_argb,
        src_stride_argb,
        dst_rgb565,
        dst_stride_rgb565,
        width,
        height,
    )
}

/// Converts ARGB to ABGR, negative `height` flips the source.
pub fn argb_to_abgr(
    src_argb: &[u8],
    src_stride_argb: i32,
    dst_abgr: &mut [u8],
    dst_stride_abgr: i32,
    width: i32,
    height: i32,
) -> Result<(), YuvError> {
    shuffle::<{ PixelLayout::Argb as u8 }, { PixelLayout::Abgr as u8 }>(
        src_argb,
        src_stride_argb,
        dst_abgr,
        dst_stride_abgr,
        width,
        height,
    )
}

/// Converts ARGB to BGRA, negative `height` flips the source.
pub fn argb_to_bgra(
    src_argb: &[u8],
    src_stride_argb: i32,
    dst_bgra: &mut [u8],
    dst_stride_bgra: i32,
    width: i32,
    height: i32,
) -> Result<(), YuvError> {
    shuffle::<{ PixelLayout::Argb as u8 }, { PixelLayout::Bgra as u8 }>(
        src_argb,
        src_stride_argb,
        dst_bgra,
        dst_stride_bgra,
        width,
        height,
    )
}

/// Converts ARGB to RGBA, negative `height` flips the source.
pub fn argb_to_rgba(
    src_argb: &[u8],
    src_stride_argb: i32,
    dst_rgba: &mut [u8],
    dst_stride_rgba: i32,
    width: i32,
    height: i32,
) -> Result<(), YuvError> {
    shuffle::<{ PixelLayout::Argb as u8 }, { PixelLayout::Rgba as u8 }>(
        src_argb,
        src_stride_argb,
        dst_rgba,
        dst_stride_rgba,
        width,
        height,
    )
}

/// Converts ABGR to ARGB, negative `height` flips the source.
pub fn abgr_to_argb(
    src_abgr: &[u8],
    src_stride_abgr: i32,
    dst_argb: &mut [u8],
    dst_stride_argb: i32,
    width: i32,
    height: i32,
) -> Result<(), YuvError> {
    shuffle::<{ PixelLayout::Abgr as u8 }, { PixelLayout::Argb as u8 }>(
        src_abgr,
        src_stride_abgr,
        dst_argb,
        dst_stride_argb,
        width,
        height,
    )
}

/// Converts BGRA to ARGB, negative `height` flips the source.
pub fn bgra_to_argb(
    src_bgra: &[u8],
    src_stride_bgra: i32,
    dst_argb: &mut [u8],
    dst_stride_argb: i32,
    width: i32,
    height: i32,
) -> Result<(), YuvError> {
    shuffle::<{ PixelLayout::Bgra as u8 }, { PixelLayout::Argb as u8 }>(
        src_bgra,
        src_stride_bgra,
        dst_argb,
        dst_stride_argb,
        width,
        height,
    )
}

/// Converts RGBA to ARGB, negative `height` flips the source.
pub fn rgba_to_argb(
    src_rgba: &[u8],
    src_stride_rgba: i32,
    dst_argb: &mut [u8],
    dst_stride_argb: i32,
    width: i32,
    height: i32,
) -> Result<(), YuvError> {
    shuffle::<{ PixelLayout::Rgba as u8 }, { PixelLayout::Argb as u8 }>(
        src_rgba,
        src_stride_rgba,
        dst_argb,
        dst_stride_argb,
        width,
        height,
    )
}

/// Converts RGB24 to ARGB with opaque alpha, negative `height` flips the source.
pub fn rgb24_to_argb(
    src_rgb24: &[u8],
    src_stride_rgb24: i32,
    dst_argb: &mut [u8],
    dst_stride_argb: i32,
    width: i32,
    height: i32,
) -> Result<(), YuvError> {
    shuffle::<{ PixelLayout::Rgb24 as u8 }, { PixelLayout::Argb as u8 }>(
        src_rgb24,
        src_stride_rgb24,
        dst_argb,
        dst_stride_argb,
        width,
        height,
    )
}

/// Converts RAW to ARGB with opaque alpha, negative `height` flips the source.
pub fn raw_to_argb(
    src_raw: &[u8],
    src_stride_raw: i32,
    dst_argb: &mut [u8],
    dst_stride_argb: i32,
    width: i32,
    height: i32,
) -> Result<(), YuvError> {
    shuffle::<{ PixelLayout::Raw as u8 }, { PixelLayout::Argb as u8 }>(
        src_raw,
        src_stride_raw,
        dst_argb,
        dst_stride_argb,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const ARGB: u8 = PixelLayout::Argb as u8;
    const ABGR: u8 = PixelLayout::Abgr as u8;
    const BGRA: u8 = PixelLayout::Bgra as u8;
    const RGBA: u8 = PixelLayout::Rgba as u8;
    const RGB24: u8 = PixelLayout::Rgb24 as u8;
    const RAW: u8 = PixelLayout::Raw as u8;
    const RGB565: u8 = PixelLayout::Rgb565 as u8;

    fn check_kernels<const SRC: u8, const DST: u8>() {
        let src_channels = PixelLayout::from(SRC).get_channels_count();
        let dst_channels = PixelLayout::from(DST).get_channels_count();
        let mut rng = StdRng::seed_from_u64(SRC as u64 * 16 + DST as u64);
        for width in 1..70usize {
            let src: Vec<u8> = (0..width * src_channels * 2).map(|_| rng.random()).collect();
            let mut fast = vec![0u8; width * dst_channels * 2];
            let mut reference = vec![0u8; width * dst_channels * 2];
            for (dst, features) in [
                (&mut fast, CpuFeatures::detect()),
                (&mut reference, CpuFeatures::empty()),
            ] {
                shuffle_impl::<SRC, DST>(
                    &src,
                    (width * src_channels) as i32,
                    dst,
                    (width * dst_channels) as i32,
                    width,
                    2,
                    features,
                )
                .unwrap();
            }
            assert_eq!(fast, reference, "{} -> {} width {}", SRC, DST, width);
        }
    }

    #[test]
    fn test_shuffle_kernels_match_reference() {
        check_kernels::<ARGB, ABGR>();
        check_kernels::<ARGB, BGRA>();
        check_kernels::<ARGB, RGBA>();
        check_kernels::<ABGR, ARGB>();
        check_kernels::<BGRA, ARGB>();
        check_kernels::<RGBA, ARGB>();
        check_kernels::<RGB24, ARGB>();
        check_kernels::<RAW, ARGB>();
        check_kernels::<ARGB, RGB24>();
        check_kernels::<ARGB, RAW>();
        check_kernels::<ARGB, RGB565>();
    }

    #[test]
    fn test_channel_order() {
        // B, G, R, A
        let argb = [1u8, 2, 3, 4];
        let mut abgr = [0u8; 4];
        argb_to_abgr(&argb, 4, &mut abgr, 4, 1, 1).unwrap();
        assert_eq!(abgr, [3, 2, 1, 4]);
        let mut bgra = [0u8; 4];
        argb_to_bgra(&argb, 4, &mut bgra, 4, 1, 1).unwrap();
        assert_eq!(bgra, [4, 3, 2, 1]);
        let mut rgba = [0u8; 4];
        argb_to_rgba(&argb, 4, &mut rgba, 4, 1, 1).unwrap();
        assert_eq!(rgba, [4, 1, 2, 3]);
        let mut raw = [0u8; 3];
        argb_to_raw(&argb, 4, &mut raw, 3, 1, 1).unwrap();
        assert_eq!(raw, [3, 2, 1]);
        let mut back = [0u8; 4];
        raw_to_argb(&raw, 3, &mut back, 4, 1, 1).unwrap();
        assert_eq!(back, [1, 2, 3, 255]);
        let mut rgb565 = [0u8; 2];
        argb_to_rgb565(&[255, 255, 255, 0], 4, &mut rgb565, 2, 1, 1).unwrap();
        assert_eq!(rgb565, [0xFF, 0xFF]);
    }

    #[test]
    fn test_negative_height_flips_source() {
        let rgb24 = [1u8, 2, 3, 4, 5, 6];
        let mut argb = [0u8; 8];
        rgb24_to_argb(&rgb24, 3, &mut argb, 4, 1, -2).unwrap();
        assert_eq!(argb, [4, 5, 6, 255, 1, 2, 3, 255]);
    }
}
