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
use crate::cpu::CpuFeatures;
use crate::images::YuvBiPlanarImage;
use crate::plane::{AlignedRow, PlaneMut, MAX_STRIDE};
use crate::uv_plane::{split_uv, split_uv_kernel};
use crate::yuv_error::{check_row_fits, check_width, resolve_height};
use crate::yuv_support::{PixelLayout, YuvChromaSample, YuvStandardMatrix};
use crate::yuv_to_rgba::{yuv_to_rgba, yuv_to_rgba_kernel};
use crate::YuvError;

/// Bi-planar 4:2:0 to packed RGB.
///
/// Interleaved chroma is deinterleaved into stack rows once per chroma row, then the
/// planar row kernel does the color math.
fn yuv_nv_to_rgbx_impl<const LAYOUT: u8, const SWAP_UV: bool>(
    image: &YuvBiPlanarImage,
    rgba: &mut [u8],
    rgba_stride: i32,
    matrix: YuvStandardMatrix,
    features: CpuFeatures,
) -> Result<(), YuvError> {
    const YUV420: u8 = YuvChromaSample::Yuv420 as u8;

    let layout: PixelLayout = LAYOUT.into();
    let width = check_width(image.width)?;
    let (rows, flip) = resolve_height(image.height);
    let chroma_width = YuvChromaSample::Yuv420.chroma_width(width);
    check_row_fits(chroma_width, MAX_STRIDE)?;
    let (y_plane, uv_plane) = image.planes(width, rows)?;
    let mut dst = PlaneMut::new(
        rgba,
        rgba_stride,
        width * layout.get_channels_count(),
        rows,
    )?
    .flip_if(flip);

    let constants = matrix.constants();
    let kernel = yuv_to_rgba_kernel::<LAYOUT, YUV420>(features, width);
    let split_kernel = split_uv_kernel(features, chroma_width);

    let mut u_row = AlignedRow::<u8>::new();
    let mut v_row = AlignedRow::<u8>::new();

    for y in 0..rows {
        if y & 1 == 0 {
            let uv = uv_plane.row(y >> 1);
            let (first, second) = if SWAP_UV {
                (&mut v_row, &mut u_row)
            } else {
                (&mut u_row, &mut v_row)
            };
            split_uv(
                &split_kernel,
                uv,
                first.as_mut_slice(chroma_width),
                second.as_mut_slice(chroma_width),
                chroma_width,
            );
        }
        yuv_to_rgba::<LAYOUT, YUV420>(
            &kernel,
            y_plane.row(y),
            u_row.as_slice(chroma_width),
            v_row.as_slice(chroma_width),
            dst.row_mut(y),
            &constants,
            width,
        );
    }
    Ok(())
}

/// Convert NV12 (Y plane plus interleaved U, V) to ARGB.
///
/// # Arguments
///
/// * `bi_planar_image` - Source image, negative height writes the output bottom-up.
/// * `argb` - A mutable slice to store the converted ARGB data.
/// * `argb_stride` - Bytes per row of the ARGB image, may be negative.
/// * `matrix` - The YUV standard matrix (BT.601, JPEG or BT.709).
///
/// returns: Result<(), YuvError>
///
pub fn nv12_to_argb(
    bi_planar_image: &YuvBiPlanarImage,
    argb: &mut [u8],
    argb_stride: i32,
    matrix: YuvStandardMatrix,
) -> Result<(), YuvError> {
    yuv_nv_to_rgbx_impl::<{ PixelLayout::Argb as u8 }, false>(
        bi_planar_image,
        argb,
        argb_stride,
        matrix,
        CpuFeatures::detect(),
    )
}

/// Convert NV21 (Y plane plus interleaved V, U) to ARGB.
pub fn nv21_to_argb(
    bi_planar_image: &YuvBiPlanarImage,
    argb: &mut [u8],
    argb_stride: i32,
    matrix: YuvStandardMatrix,
) -> Result<(), YuvError> {
    yuv_nv_to_rgbx_impl::<{ PixelLayout::Argb as u8 }, true>(
        bi_planar_image,
        argb,
        argb_stride,
        matrix,
        CpuFeatures::detect(),
    )
}

/// Convert NV12 to little endian RGB565.
pub fn nv12_to_rgb565(
    bi_planar_image: &YuvBiPlanarImage,
    rgb565: &mut [u8],
    rgb565_stride: i32,
    matrix: YuvStandardMatrix,
) -> Result<(), YuvError> {
    yuv_nv_to_rgbx_impl::<{ PixelLayout::Rgb565 as u8 }, false>(
        bi_planar_image,
        rgb565,
        rgb565_stride,
        matrix,
        CpuFeatures::detect(),
    )
}
