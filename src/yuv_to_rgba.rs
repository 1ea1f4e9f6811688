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
use crate::images::YuvPlanarImage;
use crate::numerics::{store_pixel, yuv_pixel};
use crate::plane::PlaneMut;
use crate::yuv_error::{check_width, resolve_height};
use crate::yuv_support::{PixelLayout, YuvChromaSample, YuvConstants, YuvStandardMatrix};
use crate::YuvError;

/// Converts `y_row.len()` pixels; chroma rows hold at least the matching chroma samples.
pub(crate) type YuvToRgbaRowHandler = unsafe fn(
    y_row: &[u8],
    u_row: &[u8],
    v_row: &[u8],
    rgba: &mut [u8],
    constants: &YuvConstants,
);

pub(crate) fn yuv_to_rgba_row<const LAYOUT: u8, const SAMPLING: u8>(
    y_row: &[u8],
    u_row: &[u8],
    v_row: &[u8],
    rgba: &mut [u8],
    constants: &YuvConstants,
) {
    let layout: PixelLayout = LAYOUT.into();
    let sampling: YuvChromaSample = SAMPLING.into();
    let channels = layout.get_channels_count();

    if sampling == YuvChromaSample::Yuv444 {
        for (((dst, &y), &u), &v) in rgba
            .chunks_exact_mut(channels)
            .zip(y_row.iter())
            .zip(u_row.iter())
            .zip(v_row.iter())
        {
            let (b, g, r) = yuv_pixel(y, u, v, constants);
            store_pixel::<LAYOUT>(dst, r, g, b, 255);
        }
        return;
    }

    for (((dst, y_pair), &u), &v) in rgba
        .chunks_mut(channels * 2)
        .zip(y_row.chunks(2))
        .zip(u_row.iter())
        .zip(v_row.iter())
    {
        for (dst, &y) in dst.chunks_exact_mut(channels).zip(y_pair.iter()) {
            let (b, g, r) = yuv_pixel(y, u, v, constants);
            store_pixel::<LAYOUT>(dst, r, g, b, 255);
        }
    }
}

pub(crate) fn yuv_to_rgba_kernel<const LAYOUT: u8, const SAMPLING: u8>(
    features: CpuFeatures,
    width: usize,
) -> RowKernel<YuvToRgbaRowHandler> {
    let candidates: &[KernelDescriptor<YuvToRgbaRowHandler>] = &[
        #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "avx"))]
        KernelDescriptor {
            name: "yuv_to_rgba_row_avx2",
            feature: CpuFeature::Avx2,
            width: WidthRule::AtLeast(16),
            alignment: 1,
            kernel: crate::avx2::yuv_to_rgba_row_avx2::<LAYOUT, SAMPLING>,
        },
        #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "sse"))]
        KernelDescriptor {
            name: "yuv_to_rgba_row_sse2",
            feature: CpuFeature::Sse2,
            width: WidthRule::AtLeast(8),
            alignment: 1,
            kernel: crate::sse::yuv_to_rgba_row_sse2::<LAYOUT, SAMPLING>,
        },
        #[cfg(all(target_arch = "aarch64", feature = "neon"))]
        KernelDescriptor {
            name: "yuv_to_rgba_row_neon",
            feature: CpuFeature::Neon,
            width: WidthRule::AtLeast(8),
            alignment: 1,
            kernel: crate::neon::yuv_to_rgba_row_neon::<LAYOUT, SAMPLING>,
        },
    ];
    // vector kernels only write four channel layouts
    let layout: PixelLayout = LAYOUT.into();
    let candidates = if layout.get_channels_count() == 4 {
        candidates
    } else {
        &candidates[..0]
    };
    select_kernel(
        "yuv_to_rgba_row",
        candidates,
        yuv_to_rgba_row::<LAYOUT, SAMPLING> as YuvToRgbaRowHandler,
        features,
        width,
        1,
    )
}

/// Runs the selected kernel over one row, resuming chroma at the split point.
#[inline]
pub(crate) fn yuv_to_rgba<const LAYOUT: u8, const SAMPLING: u8>(
    kernel: &RowKernel<YuvToRgbaRowHandler>,
    y_row: &[u8],
    u_row: &[u8],
    v_row: &[u8],
    rgba: &mut [u8],
    constants: &YuvConstants,
    width: usize,
) {
    let channels = PixelLayout::from(LAYOUT).get_channels_count();
    let shift = match YuvChromaSample::from(SAMPLING) {
        YuvChromaSample::Yuv420 | YuvChromaSample::Yuv422 => 1,
        YuvChromaSample::Yuv444 => 0,
    };
    kernel.split(width, |f, start, count| unsafe {
        let cx = start >> shift;
        f(
            &y_row[start..start + count],
            &u_row[cx..],
            &v_row[cx..],
            &mut rgba[start * channels..(start + count) * channels],
            constants,
        )
    });
}

pub(crate) fn yuv_to_rgbx_impl<const LAYOUT: u8, const SAMPLING: u8>(
    image: &YuvPlanarImage,
    rgba: &mut [u8],
    rgba_stride: i32,
    matrix: YuvStandardMatrix,
    features: CpuFeatures,
) -> Result<(), YuvError> {
    let layout: PixelLayout = LAYOUT.into();
    let sampling: YuvChromaSample = SAMPLING.into();
    let width = check_width(image.width)?;
    let (rows, flip) = resolve_height(image.height);
    let (y_plane, u_plane, v_plane) = image.planes(sampling, width, rows)?;
    let mut dst = PlaneMut::new(
        rgba,
        rgba_stride,
        width * layout.get_channels_count(),
        rows,
    )?
    .flip_if(flip);

    let constants = matrix.constants();
    let kernel = yuv_to_rgba_kernel::<LAYOUT, SAMPLING>(features, width);

    for y in 0..rows {
        let cy = sampling.chroma_row(y);
        yuv_to_rgba::<LAYOUT, SAMPLING>(
            &kernel,
            y_plane.row(y),
            u_plane.row(cy),
            v_plane.row(cy),
            dst.row_mut(y),
            &constants,
            width,
        );
    }
    Ok(())
}

/// Convert YUV 420 planar format to ARGB format.
///
/// ARGB is stored as B, G, R, A in memory.
///
/// # Arguments
///
/// * `planar_image` - Source planar image, negative height writes the output bottom-up.
/// * `argb` - A mutable slice to store the converted ARGB data.
/// * `argb_stride` - Bytes per row of the ARGB image, may be negative.
/// * `matrix` - The YUV standard matrix (BT.601, JPEG or BT.709).
///
/// returns: Result<(), YuvError>
///
pub fn i420_to_argb(
    planar_image: &YuvPlanarImage,
    argb: &mut [u8],
    argb_stride: i32,
    matrix: YuvStandardMatrix,
) -> Result<(), YuvError> {
    yuv_to_rgbx_impl::<{ PixelLayout::Argb as u8 }, { YuvChromaSample::Yuv420 as u8 }>(
        planar_image,
        argb,
        argb_stride,
        matrix,
        CpuFeatures::detect(),
    )
}

/// Convert YUV 422 planar format to ARGB format.
///
/// # Arguments
///
/// * `planar_image` - Source planar image, negative height writes the output bottom-up.
/// * `argb` - A mutable slice to store the converted ARGB data.
/// * `argb_stride` - Bytes per row of the ARGB image, may be negative.
/// * `matrix` - The YUV standard matrix (BT.601, JPEG or BT.709).
///
/// returns: Result<(), YuvError>
///
pub fn i422_to_argb(
    planar_image: &YuvPlanarImage,
    argb: &mut [u8],
    argb_stride: i32,
    matrix: YuvStandardMatrix,
) -> Result<(), YuvError> {
    yuv_to_rgbx_impl::<{ PixelLayout::Argb as u8 }, { YuvChromaSample::Yuv422 as u8 }>(
        planar_image,
        argb,
        argb_stride,
        matrix,
        CpuFeatures::detect(),
    )
}

/// Convert YUV 444 planar format to ARGB format.
///
/// # Arguments
///
/// * `planar_image` - Source planar image, negative height writes the output bottom-up.
/// * `argb` - A mutable slice to store the converted ARGB data.
/// * `argb_stride` - Bytes per row of the ARGB image, may be negative.
/// * `matrix` - The YUV standard matrix (BT.601, JPEG or BT.709).
///
/// returns: Result<(), YuvError>
///
pub fn i444_to_argb(
    planar_image: &YuvPlanarImage,
    argb: &mut [u8],
    argb_stride: i32,
    matrix: YuvStandardMatrix,
) -> Result<(), YuvError> {
    yuv_to_rgbx_impl::<{ PixelLayout::Argb as u8 }, { YuvChromaSample::Yuv444 as u8 }>(
        planar_image,
        argb,
        argb_stride,
        matrix,
        CpuFeatures::detect(),
    )
}

/// Convert YUV 420 planar format to ABGR (R, G, B, A in memory).
pub fn i420_to_abgr(
    planar_image: &YuvPlanarImage,
    abgr: &mut [u8],
    abgr_stride: i32,
    matrix: YuvStandardMatrix,
) -> Result<(), YuvError> {
    yuv_to_rgbx_impl::<{ PixelLayout::Abgr as u8 }, { YuvChromaSample::Yuv420 as u8 }>(
        planar_image,
        abgr,
        abgr_stride,
        matrix,
        CpuFeatures::detect(),
    )
}

/// Convert YUV 420 planar format to BGRA (A, R, G, B in memory).
pub fn i420_to_bgra(
    planar_image: &YuvPlanarImage,
    bgra: &mut [u8],
    bgra_stride: i32,
    matrix: YuvStandardMatrix,
) -> Result<(), YuvError> {
    yuv_to_rgbx_impl::<{ PixelLayout::Bgra as u8 }, { YuvChromaSample::Yuv420 as u8 }>(
        planar_image,
        bgra,
        bgra_stride,
        matrix,
        CpuFeatures::detect(),
    )
}

/// Convert YUV 420 planar format to RGBA (A, B, G, R in memory).
pub fn i420_to_rgba(
    planar_image: &YuvPlanarImage,
    rgba: &mut [u8],
    rgba_stride: i32,
    matrix: YuvStandardMatrix,
) -> Result<(), YuvError> {
    yuv_to_rgbx_impl::<{ PixelLayout::Rgba as u8 }, { YuvChromaSample::Yuv420 as u8 }>(
        planar_image,
        rgba,
        rgba_stride,
        matrix,
        CpuFeatures::detect(),
    )
}

/// Convert YUV 420 planar format to RGB24 (B, G, R in memory).
pub fn i420_to_rgb24(
    planar_image: &YuvPlanarImage,
    rgb: &mut [u8],
    rgb_stride: i32,
    matrix: YuvStandardMatrix,
) -> Result<(), YuvError> {
    yuv_to_rgbx_impl::<{ PixelLayout::Rgb24 as u8 }, { YuvChromaSample::Yuv420 as u8 }>(
        planar_image,
        rgb,
        rgb_stride,
        matrix,
        CpuFeatures::detect(),
    )
}

/// Convert YUV 420 planar format to RAW (R, G, B in memory).
pub fn i420_to_raw(
    planar_image: &YuvPlanarImage,
    raw: &mut [u8],
    raw_stride: i32,
    matrix: YuvStandardMatrix,
) -> Result<(), YuvError> {
    yuv_to_rgbx_impl::<{ PixelLayout::Raw as u8 }, { YuvChromaSample::Yuv420 as u8 }>(
        planar_image,
        raw,
        raw_stride,
        matrix,
        CpuFeatures::detect(),
    )
}

/// Convert YUV 420 planar format to little endian RGB565.
pub fn i420_to_rgb565(
    planar_image: &YuvPlanarImage,
    rgb565: &mut [u8],
    rgb565_stride: i32,
    matrix: YuvStandardMatrix,
) -> Result<(), YuvError> {
    yuv_to_rgbx_impl::<{ PixelLayout::Rgb565 as u8 }, { YuvChromaSample::Yuv420 as u8 }>(
        planar_image,
        rgb565,
        rgb565_stride,
        matrix,
        CpuFeatures::detect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const ARGB: u8 = PixelLayout::Argb as u8;
    const ABGR: u8 = PixelLayout::Abgr as u8;
    const RGB24: u8 = PixelLayout::Rgb24 as u8;
    const YUV420: u8 = YuvChromaSample::Yuv420 as u8;
    const YUV422: u8 = YuvChromaSample::Yuv422 as u8;
    const YUV444: u8 = YuvChromaSample::Yuv444 as u8;

    fn random_plane(rng: &mut StdRng, len: usize) -> Vec<u8> {
        (0..len).map(|_| rng.random()).collect()
    }

    fn convert<const LAYOUT: u8, const SAMPLING: u8>(
        width: usize,
        rows: usize,
        features: CpuFeatures,
        matrix: YuvStandardMatrix,
        seed: u64,
    ) -> Vec<u8> {
        let sampling: YuvChromaSample = SAMPLING.into();
        let channels = PixelLayout::from(LAYOUT).get_channels_count();
        let chroma_width = sampling.chroma_width(width);
        let chroma_rows = sampling.chroma_height(rows);
        let mut rng = StdRng::seed_from_u64(seed);
        let y = random_plane(&mut rng, width * rows);
        let u = random_plane(&mut rng, chroma_width * chroma_rows);
        let v = random_plane(&mut rng, chroma_width * chroma_rows);
        let image = YuvPlanarImage {
            y_plane: &y,
            y_stride: width as i32,
            u_plane: &u,
            u_stride: chroma_width as i32,
            v_plane: &v,
            v_stride: chroma_width as i32,
            width: width as i32,
            height: rows as i32,
        };
        let mut rgba = vec![0u8; width * channels * rows];
        yuv_to_rgbx_impl::<LAYOUT, SAMPLING>(
            &image,
            &mut rgba,
            (width * channels) as i32,
            matrix,
            features,
        )
        .unwrap();
        rgba
    }

    #[test]
    fn test_kernels_match_reference() {
        for width in 1..70usize {
            for matrix in [
                YuvStandardMatrix::Bt601,
                YuvStandardMatrix::Jpeg,
                YuvStandardMatrix::Bt709,
            ] {
                let seed = width as u64;
                assert_eq!(
                    convert::<ARGB, YUV420>(width, 3, CpuFeatures::detect(), matrix, seed),
                    convert::<ARGB, YUV420>(width, 3, CpuFeatures::empty(), matrix, seed),
                    "420 width {}",
                    width
                );
                assert_eq!(
                    convert::<ABGR, YUV422>(width, 2, CpuFeatures::detect(), matrix, seed),
                    convert::<ABGR, YUV422>(width, 2, CpuFeatures::empty(), matrix, seed),
                    "422 width {}",
                    width
                );
                assert_eq!(
                    convert::<ARGB, YUV444>(width, 2, CpuFeatures::detect(), matrix, seed),
                    convert::<ARGB, YUV444>(width, 2, CpuFeatures::empty(), matrix, seed),
                    "444 width {}",
                    width
                );
            }
        }
    }

    #[test]
    fn test_rgb24_matches_argb_channels() {
        let argb = convert::<ARGB, YUV420>(13, 4, CpuFeatures::detect(), YuvStandardMatrix::Bt601, 3);
        let rgb = convert::<RGB24, YUV420>(13, 4, CpuFeatures::detect(), YuvStandardMatrix::Bt601, 3);
        for (argb, rgb) in argb.chunks_exact(4).zip(rgb.chunks_exact(3)) {
            assert_eq!(&argb[..3], rgb);
            assert_eq!(argb[3], 255);
        }
    }

    #[test]
    fn test_gray_levels() {
        let y = [16u8, 235, 16, 235];
        let uv = [128u8];
        let image = YuvPlanarImage {
            y_plane: &y,
            y_stride: 2,
            u_plane: &uv,
            u_stride: 1,
            v_plane: &uv,
            v_stride: 1,
            width: 2,
            height: 2,
        };
        let mut argb = [0u8; 16];
        i420_to_argb(&image, &mut argb, 8, YuvStandardMatrix::Bt601).unwrap();
        assert_eq!(&argb[0..4], &[0, 0, 0, 255]);
        assert_eq!(&argb[4..8], &[255, 255, 255, 255]);
    }

    #[test]
    fn test_negative_height_flips_output() {
        let y = [16u8, 16, 235, 235];
        let uv = [128u8];
        let image = YuvPlanarImage {
            y_plane: &y,
            y_stride: 2,
            u_plane: &uv,
            u_stride: 1,
            v_plane: &uv,
            v_stride: 1,
            width: 2,
            height: -2,
        };
        let mut argb = [0u8; 16];
        i420_to_argb(&image, &mut argb, 8, YuvStandardMatrix::Bt601).unwrap();
        assert_eq!(&argb[0..4], &[255, 255, 255, 255]);
        assert_eq!(&argb[8..12], &[0, 0, 0, 255]);
    }

    #[test]
    fn test_rejects_short_destination() {
        let y = [0u8; 4];
        let uv = [128u8];
        let image = YuvPlanarImage {
            y_plane: &y,
            y_stride: 2,
            u_plane: &uv,
            u_stride: 1,
            v_plane: &uv,
            v_stride: 1,
            width: 2,
            height: 2,
        };
        let mut argb = [0u8; 15];
        assert!(i420_to_argb(&image, &mut argb, 8, YuvStandardMatrix::Bt601).is_err());
        let mut rgb565 = [0u8; 8];
        assert!(i420_to_rgb565(&image, &mut rgb565, 4, YuvStandardMatrix::Bt601).is_ok());
        assert_eq!(&rgb565[..2], &[0, 0]);
    }
}
