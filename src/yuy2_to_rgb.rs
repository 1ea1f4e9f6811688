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
use crate::plane::{AlignedRow, PlaneMut, PlaneRef, MAX_STRIDE};
use crate::yuv_error::{check_row_fits, check_width, resolve_height};
use crate::yuv_support::{PixelLayout, YuvChromaSample, YuvStandardMatrix, Yuy2Description};
use crate::yuv_to_rgba::{yuv_to_rgba, yuv_to_rgba_kernel};
use crate::yuy2_to_yuv::{yuy2_to_yuv, yuy2_to_yuv_kernel};
use crate::YuvError;

fn yuy2_to_rgbx_impl<const YUY2_SOURCE: u8, const LAYOUT: u8>(
    yuy2: &[u8],
    yuy2_stride: i32,
    rgba: &mut [u8],
    rgba_stride: i32,
    width: usize,
    height: i32,
    matrix: YuvStandardMatrix,
    features: CpuFeatures,
) -> Result<(), YuvError> {
    const YUV422: u8 = YuvChromaSample::Yuv422 as u8;

    check_row_fits(width, MAX_STRIDE)?;
    let channels = PixelLayout::from(LAYOUT).get_channels_count();
    let chroma_width = YuvChromaSample::Yuv422.chroma_width(width);
    let (rows, flip) = resolve_height(height);
    let src = PlaneRef::new(yuy2, yuy2_stride, chroma_width * 4, rows)?.flip_if(flip);
    let mut dst = PlaneMut::new(rgba, rgba_stride, width * channels, rows)?;

    let constants = matrix.constants();
    let unpack = yuy2_to_yuv_kernel::<YUY2_SOURCE>(features, width);
    let kernel = yuv_to_rgba_kernel::<LAYOUT, YUV422>(features, width);

    let mut y_row = AlignedRow::<u8>::new();
    let mut u_row = AlignedRow::<u8>::new();
    let mut v_row = AlignedRow::<u8>::new();

    for y in 0..rows {
        yuy2_to_yuv(
            &unpack,
            src.row(y),
            y_row.as_mut_slice(width),
            u_row.as_mut_slice(chroma_width),
            v_row.as_mut_slice(chroma_width),
            width,
        );
        yuv_to_rgba::<LAYOUT, YUV422>(
            &kernel,
            y_row.as_slice(width),
            u_row.as_slice(chroma_width),
            v_row.as_slice(chroma_width),
            dst.row_mut(y),
            &constants,
            width,
        );
    }
    Ok(())
}

/// Convert YUYV (YUY2) packed format to ARGB.
///
/// Negative `height` flips the source.
///
/// # Arguments
///
/// * `yuy2_store`: Source packed image
/// * `yuy2_stride`: Bytes per packed row, may be negative
/// * `argb`: Destination ARGB image
/// * `argb_stride`: Bytes per ARGB row, may be negative
/// * `width`: Image width
/// * `height`: Image height, negative to flip
/// * `matrix`: The YUV standard matrix (BT.601, JPEG or BT.709)
///
/// returns: Result<(), YuvError>
///
pub fn yuy2_to_argb(
    yuy2_store: &[u8],
    yuy2_stride: i32,
    argb: &mut [u8],
    argb_stride: i32,
    width: i32,
    height: i32,
    matrix: YuvStandardMatrix,
) -> Result<(), YuvError> {
    let width = check_width(width)?;
    yuy2_to_rgbx_impl::<{ Yuy2Description::YUYV as u8 }, { PixelLayout::Argb as u8 }>(
        yuy2_store,
        yuy2_stride,
        argb,
        argb_stride,
        width,
        height,
        matrix,
        CpuFeatures::detect(),
    )
}

/// Convert UYVY packed format to ARGB, negative `height` flips the source.
pub fn uyvy_to_argb(
    uyvy_store: &[u8],
    uyvy_stride: i32,
    argb: &mut [u8],
    argb_stride: i32,
    width: i32,
    height: i32,
    matrix: YuvStandardMatrix,
) -> Result<(), YuvError> {
    let width = check_width(width)?;
    yuy2_to_rgbx_impl::<{ Yuy2Description::UYVY as u8 }, { PixelLayout::Argb as u8 }>(
        uyvy_store,
        uyvy_stride,
        argb,
        argb_stride,
        width,
        height,
        matrix,
        CpuFeatures::detect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::images::YuvPlanarImage;
    use crate::yuv_to_rgba::yuv_to_rgbx_impl;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_yuy2_matches_planar() {
        const ARGB: u8 = PixelLayout::Argb as u8;
        const YUV422: u8 = YuvChromaSample::Yuv422 as u8;
        let mut rng = StdRng::seed_from_u64(41);
        for width in 1..40usize {
            let cw = (width + 1) / 2;
            let yuy2: Vec<u8> = (0..cw * 4).map(|_| rng.random()).collect();
            let mut y = Vec::new();
            let mut u = Vec::new();
            let mut v = Vec::new();
            for (i, px) in yuy2.chunks_exact(4).enumerate() {
                y.push(px[0]);
                if i * 2 + 1 < width {
                    y.push(px[2]);
                }
                u.push(px[1]);
                v.push(px[3]);
            }
            let image = YuvPlanarImage {
                y_plane: &y,
                y_stride: width as i32,
                u_plane: &u,
                u_stride: cw as i32,
                v_plane: &v,
                v_stride: cw as i32,
                width: width as i32,
                height: 1,
            };
            let mut expected = vec![0u8; width * 4];
            yuv_to_rgbx_impl::<ARGB, YUV422>(
                &image,
                &mut expected,
                (width * 4) as i32,
                YuvStandardMatrix::Bt601,
                CpuFeatures::empty(),
            )
            .unwrap();
            let mut argb = vec![0u8; width * 4];
            yuy2_to_argb(
                &yuy2,
                (cw * 4) as i32,
                &mut argb,
                (width * 4) as i32,
                width as i32,
                1,
                YuvStandardMatrix::Bt601,
            )
            .unwrap();
            assert_eq!(argb, expected, "width {}", width);
        }
    }

    #[test]
    fn test_uyvy_gray() {
        let uyvy = [128u8, 16, 128, 235];
        let mut argb = [0u8; 8];
        uyvy_to_argb(&uyvy, 4, &mut argb, 8, 2, 1, YuvStandardMatrix::Bt601).unwrap();
        assert_eq!(argb, [0, 0, 0, 255, 255, 255, 255, 255]);
    }
}
