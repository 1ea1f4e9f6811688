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
use crate::plane::PlaneRef;
use crate::yuv_error::{check_width, resolve_height};
use crate::yuv_support::{YuvChromaSample, Yuy2Description};
use crate::YuvError;

/// Unpacks `y_row.len()` pixels of packed 4:2:2.
pub(crate) type Yuy2ToYuvRowHandler =
    unsafe fn(yuy2: &[u8], y_row: &mut [u8], u_row: &mut [u8], v_row: &mut [u8]);

pub(crate) fn yuy2_to_yuv_row<const YUY2_SOURCE: u8>(
    yuy2: &[u8],
    y_row: &mut [u8],
    u_row: &mut [u8],
    v_row: &mut [u8],
) {
    let source: Yuy2Description = YUY2_SOURCE.into();
    for (((y_pair, u), v), px) in y_row
        .chunks_mut(2)
        .zip(u_row.iter_mut())
        .zip(v_row.iter_mut())
        .zip(yuy2.chunks_exact(4))
    {
        y_pair[0] = px[source.get_first_y_position()];
        if let Some(y1) = y_pair.get_mut(1) {
            *y1 = px[source.get_second_y_position()];
        }
        *u = px[source.get_u_position()];
        *v = px[source.get_v_position()];
    }
}

pub(crate) fn yuy2_to_yuv_kernel<const YUY2_SOURCE: u8>(
    features: CpuFeatures,
    width: usize,
) -> RowKernel<Yuy2ToYuvRowHandler> {
    let candidates: &[KernelDescriptor<Yuy2ToYuvRowHandler>] = &[
        #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "sse"))]
        KernelDescriptor {
            name: "yuy2_to_yuv_row_sse2",
            feature: CpuFeature::Sse2,
            width: WidthRule::AtLeast(16),
            alignment: 1,
            kernel: crate::sse::yuy2_to_yuv_row_sse2::<YUY2_SOURCE>,
        },
        #[cfg(all(target_arch = "aarch64", feature = "neon"))]
        KernelDescriptor {
            name: "yuy2_to_yuv_row_neon",
            feature: CpuFeature::Neon,
            width: WidthRule::AtLeast(16),
            alignment: 1,
            kernel: crate::neon::yuy2_to_yuv_row_neon::<YUY2_SOURCE>,
        },
    ];
    select_kernel(
        "yuy2_to_yuv_row",
        candidates,
        yuy2_to_yuv_row::<YUY2_SOURCE> as Yuy2ToYuvRowHandler,
        features,
        width,
        1,
    )
}

/// Unpacks one row, the bulk ends on a macropixel boundary.
#[inline]
pub(crate) fn yuy2_to_yuv(
    kernel: &RowKernel<Yuy2ToYuvRowHandler>,
    yuy2: &[u8],
    y_row: &mut [u8],
    u_row: &mut [u8],
    v_row: &mut [u8],
    width: usize,
) {
    kernel.split(width, |f, start, count| unsafe {
        let cx = start >> 1;
        let chroma_end = (start + count + 1) >> 1;
        f(
            &yuy2[start * 2..],
            &mut y_row[start..start + count],
            &mut u_row[cx..chroma_end],
            &mut v_row[cx..chroma_end],
        )
    });
}

pub(crate) fn yuy2_to_yuv_impl<const YUY2_SOURCE: u8>(
    yuy2: &[u8],
    yuy2_stride: i32,
    planar_image: &mut YuvPlanarImageMut,
    width: usize,
    height: i32,
    features: CpuFeatures,
) -> Result<(), YuvError> {
    let (rows, flip) = resolve_height(height);
    let chroma_width = YuvChromaSample::Yuv422.chroma_width(width);
    let src = PlaneRef::new(yuy2, yuy2_stride, chroma_width * 4, rows)?.flip_if(flip);
    let (mut y_plane, mut u_plane, mut v_plane) =
        planar_image.planes(YuvChromaSample::Yuv422, width, rows)?;
    let kernel = yuy2_to_yuv_kernel::<YUY2_SOURCE>(features, width);
    for y in 0..rows {
        yuy2_to_yuv(
            &kernel,
            src.row(y),
            y_plane.row_mut(y),
            u_plane.row_mut(y),
            v_plane.row_mut(y),
            width,
        );
    }
    Ok(())
}

/// Convert YUYV (YUY2) packed format to YUV 422 planar.
///
/// Negative `height` flips the source.
///
/// # Arguments
///
/// * `yuy2_store`: Source packed image, `Y0 U Y1 V` per two pixels
/// * `yuy2_stride`: Bytes per packed row, may be negative
/// * `planar_image`: Destination 4:2:2 planes
/// * `width`: Image width
/// * `height`: Image height, negative to flip
///
/// returns: Result<(), YuvError>
///
pub fn yuy2_to_i422(
    yuy2_store: &[u8],
    yuy2_stride: i32,
    planar_image: &mut YuvPlanarImageMut,
    width: i32,
    height: i32,
) -> Result<(), YuvError> {
    let width = check_width(width)?;
    yuy2_to_yuv_impl::<{ Yuy2Description::YUYV as u8 }>(
        yuy2_store,
        yuy2_stride,
        planar_image,
        width,
        height,
        CpuFeatures::detect(),
    )
}

/// Convert UYVY packed format to YUV 422 planar, negative `height` flips the source.
pub fn uyvy_to_i422(
    uyvy_store: &[u8],
    uyvy_stride: i32,
    planar_image: &mut YuvPlanarImageMut,
    width: i32,
    height: i32,
) -> Result<(), YuvError> {
    let width = check_width(width)?;
    yuy2_to_yuv_impl::<{ Yuy2Description::UYVY as u8 }>(
        uyvy_store,
        uyvy_stride,
        planar_image,
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

    fn unpack<const SOURCE: u8>(
        width: usize,
        src: &[u8],
        features: CpuFeatures,
    ) -> (Vec<u8>, Vec<u8>, Vec<u8>) {
        let cw = (width + 1) / 2;
        let mut y = vec![0u8; width * 2];
        let mut u = vec![0u8; cw * 2];
        let mut v = vec![0u8; cw * 2];
        let mut image = YuvPlanarImageMut {
            y_plane: &mut y,
            y_stride: width as i32,
            u_plane: &mut u,
            u_stride: cw as i32,
            v_plane: &mut v,
            v_stride: cw as i32,
        };
        yuy2_to_yuv_impl::<SOURCE>(src, (cw * 4) as i32, &mut image, width, 2, features).unwrap();
        (y, u, v)
    }

    #[test]
    fn test_unpack_kernels_match_reference() {
        let mut rng = StdRng::seed_from_u64(31);
        for width in 1..70usize {
            let cw = (width + 1) / 2;
            let src: Vec<u8> = (0..cw * 4 * 2).map(|_| rng.random()).collect();
            assert_eq!(
                unpack::<{ Yuy2Description::YUYV as u8 }>(width, &src, CpuFeatures::detect()),
                unpack::<{ Yuy2Description::YUYV as u8 }>(width, &src, CpuFeatures::empty()),
                "yuyv width {}",
                width
            );
            assert_eq!(
                unpack::<{ Yuy2Description::UYVY as u8 }>(width, &src, CpuFeatures::detect()),
                unpack::<{ Yuy2Description::UYVY as u8 }>(width, &src, CpuFeatures::empty()),
                "uyvy width {}",
                width
            );
        }
    }

    #[test]
    fn test_odd_width_positions() {
        let src = [10u8, 20, 11, 30, 12, 21, 0, 31];
        let (y, u, v) = unpack::<{ Yuy2Description::YUYV as u8 }>(3, &[&src[..], &src[..]].concat(), CpuFeatures::empty());
        assert_eq!(&y[..3], &[10, 11, 12]);
        assert_eq!(&u[..2], &[20, 21]);
        assert_eq!(&v[..2], &[30, 31]);
        let (y, u, v) = unpack::<{ Yuy2Description::UYVY as u8 }>(3, &[&src[..], &src[..]].concat(), CpuFeatures::empty());
        assert_eq!(&y[..3], &[20, 30, 21]);
        assert_eq!(&u[..2], &[10, 12]);
        assert_eq!(&v[..2], &[11, 0]);
    }
}
