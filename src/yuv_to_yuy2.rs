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
use crate::plane::PlaneMut;
use crate::yuv_error::{check_width, resolve_height};
use crate::yuv_support::{YuvChromaSample, Yuy2Description};
use crate::YuvError;

/// Packs `y_row.len()` pixels, an odd last pixel gets a zero second luma.
pub(crate) type YuvToYuy2RowHandler =
    unsafe fn(y_row: &[u8], u_row: &[u8], v_row: &[u8], yuy2: &mut [u8]);

pub(crate) fn yuv_to_yuy2_row<const YUY2_TARGET: u8>(
    y_row: &[u8],
    u_row: &[u8],
    v_row: &[u8],
    yuy2: &mut [u8],
) {
    let target: Yuy2Description = YUY2_TARGET.into();
    for (((px, y_pair), &u), &v) in yuy2
        .chunks_exact_mut(4)
        .zip(y_row.chunks(2))
        .zip(u_row.iter())
        .zip(v_row.iter())
    {
        px[target.get_first_y_position()] = y_pair[0];
        px[target.get_second_y_position()] = y_pair.get(1).copied().unwrap_or(0);
        px[target.get_u_position()] = u;
        px[target.get_v_position()] = v;
    }
}

fn yuv_to_yuy2_kernel<const YUY2_TARGET: u8>(
    features: CpuFeatures,
    width: usize,
) -> RowKernel<YuvToYuy2RowHandler> {
    let candidates: &[KernelDescriptor<YuvToYuy2RowHandler>] = &[
        #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "sse"))]
        KernelDescriptor {
            name: "yuv_to_yuy2_row_sse2",
            feature: CpuFeature::Sse2,
            width: WidthRule::AtLeast(16),
            alignment: 1,
            kernel: crate::sse::yuv_to_yuy2_row_sse2::<YUY2_TARGET>,
        },
        #[cfg(all(target_arch = "aarch64", feature = "neon"))]
        KernelDescriptor {
            name: "yuv_to_yuy2_row_neon",
            feature: CpuFeature::Neon,
            width: WidthRule::AtLeast(16),
            alignment: 1,
            kernel: crate::neon::yuv_to_yuy2_row_neon::<YUY2_TARGET>,
        },
    ];
    select_kernel(
        "yuv_to_yuy2_row",
        candidates,
        yuv_to_yuy2_row::<YUY2_TARGET> as YuvToYuy2RowHandler,
        features,
        width,
        1,
    )
}

pub(crate) fn yuv_to_yuy2_impl<const YUY2_TARGET: u8>(
    planar_image: &YuvPlanarImage,
    yuy2_store: &mut [u8],
    yuy2_stride: i32,
    features: CpuFeatures,
) -> Result<(), YuvError> {
    let width = check_width(planar_image.width)?;
    let (rows, flip) = resolve_height(planar_image.height);
    let chroma_width = YuvChromaSample::Yuv422.chroma_width(width);
    let (y_plane, u_plane, v_plane) = planar_image.planes(YuvChromaSample::Yuv422, width, rows)?;
    let mut dst = PlaneMut::new(yuy2_store, yuy2_stride, chroma_width * 4, rows)?.flip_if(flip);
    let kernel = yuv_to_yuy2_kernel::<YUY2_TARGET>(features, width);
    for y in 0..rows {
        let (y_row, u_row, v_row) = (y_plane.row(y), u_plane.row(y), v_plane.row(y));
        let dst = dst.row_mut(y);
        kernel.split(width, |f, start, count| unsafe {
            let cx = start >> 1;
            f(
                &y_row[start..start + count],
                &u_row[cx..],
                &v_row[cx..],
                &mut dst[start * 2..],
            )
        });
    }
    Ok(())
}

/// Convert YUV 422 planar format to YUYV (YUY2) packed format.
///
/// Negative height in `planar_image` writes the output bottom-up.
///
/// # Arguments
///
/// * `planar_image`: Source 4:2:2 image
/// * `yuy2_store`: Destination packed image
/// * `yuy2_stride`: Bytes per packed row, may be negative
///
/// returns: Result<(), YuvError>
///
pub fn i422_to_yuy2(
    planar_image: &YuvPlanarImage,
    yuy2_store: &mut [u8],
    yuy2_stride: i32,
) -> Result<(), YuvError> {
    yuv_to_yuy2_impl::<{ Yuy2Description::YUYV as u8 }>(
        planar_image,
        yuy2_store,
        yuy2_stride,
        CpuFeatures::detect(),
    )
}

/// Convert YUV 422 planar format to UYVY packed format.
pub fn i422_to_uyvy(
    planar_image: &YuvPlanarImage,
    uyvy_store: &mut [u8],
    uyvy_stride: i32,
) -> Result<(), YuvError> {
    yuv_to_yuy2_impl::<{ Yuy2Description::UYVY as u8 }>(
        planar_image,
        uyvy_store,
        uyvy_stride,
        CpuFeatures::detect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::images::YuvPlanarImageMut;
    use crate::yuy2_to_yuv::yuy2_to_i422;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const YUYV: u8 = Yuy2Description::YUYV as u8;
    const UYVY: u8 = Yuy2Description::UYVY as u8;

    fn pack<const TARGET: u8>(width: usize, seed: u64, features: CpuFeatures) -> Vec<u8> {
        let cw = (width + 1) / 2;
        let mut rng = StdRng::seed_from_u64(seed);
        let y: Vec<u8> = (0..width * 2).map(|_| rng.random()).collect();
        let u: Vec<u8> = (0..cw * 2).map(|_| rng.random()).collect();
        let v: Vec<u8> = (0..cw * 2).map(|_| rng.random()).collect();
        let image = YuvPlanarImage {
            y_plane: &y,
            y_stride: width as i32,
            u_plane: &u,
            u_stride: cw as i32,
            v_plane: &v,
            v_stride: cw as i32,
            width: width as i32,
            height: 2,
        };
        let mut packed = vec![0u8; cw * 4 * 2];
        yuv_to_yuy2_impl::<TARGET>(&image, &mut packed, (cw * 4) as i32, features).unwrap();
        packed
    }

    #[test]
    fn test_pack_kernels_match_reference() {
        for width in 1..70usize {
            assert_eq!(
                pack::<YUYV>(width, width as u64, CpuFeatures::detect()),
                pack::<YUYV>(width, width as u64, CpuFeatures::empty()),
                "yuyv width {}",
                width
            );
            assert_eq!(
                pack::<UYVY>(width, width as u64, CpuFeatures::detect()),
                pack::<UYVY>(width, width as u64, CpuFeatures::empty()),
                "uyvy width {}",
                width
            );
        }
    }

    #[test]
    fn test_odd_width_pads_second_luma() {
        let y = [1u8, 2, 3];
        let u = [4u8, 5];
        let v = [6u8, 7];
        let image = YuvPlanarImage {
            y_plane: &y,
            y_stride: 3,
            u_plane: &u,
            u_stride: 2,
            v_plane: &v,
            v_stride: 2,
            width: 3,
            height: 1,
        };
        let mut yuy2 = [0xAAu8; 8];
        i422_to_yuy2(&image, &mut yuy2, 8).unwrap();
        assert_eq!(yuy2, [1, 4, 2, 6, 3, 5, 0, 7]);
        let mut uyvy = [0xAAu8; 8];
        i422_to_uyvy(&image, &mut uyvy, 8).unwrap();
        assert_eq!(uyvy, [4, 1, 6, 2, 5, 3, 7, 0]);
    }

    #[test]
    fn test_pack_unpack_even_width() {
        let width = 34usize;
        let packed = pack::<YUYV>(width, 99, CpuFeatures::detect());
        let mut y = vec![0u8; width * 2];
        let mut u = vec![0u8; width];
        let mut v = vec![0u8; width];
        let mut image = YuvPlanarImageMut {
            y_plane: &mut y,
            y_stride: width as i32,
            u_plane: &mut u,
            u_stride: (width / 2) as i32,
            v_plane: &mut v,
            v_stride: (width / 2) as i32,
        };
        yuy2_to_i422(&packed, (width * 2) as i32, &mut image, width as i32, 2).unwrap();
        let mut rng = StdRng::seed_from_u64(99);
        let expected_y: Vec<u8> = (0..width * 2).map(|_| rng.random()).collect();
        assert_eq!(y, expected_y);
    }
}
