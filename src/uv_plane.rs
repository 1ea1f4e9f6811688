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
use crate::copy_plane::copy_rows;
use crate::cpu::{CpuFeature, CpuFeatures};
use crate::dispatch::{select_kernel, KernelDescriptor, RowKernel, WidthRule};
use crate::images::{YuvBiPlanarImage, YuvPlanarImageMut};
use crate::plane::{PlaneMut, PlaneRef};
use crate::yuv_error::{check_width, resolve_height};
use crate::yuv_support::YuvChromaSample;
use crate::YuvError;

/// Deinterleaves `dst_u.len()` pairs.
pub(crate) type SplitUvHandler = unsafe fn(src_uv: &[u8], dst_u: &mut [u8], dst_v: &mut [u8]);

/// Interleaves `src_u.len()` pairs.
pub(crate) type MergeUvHandler = unsafe fn(src_u: &[u8], src_v: &[u8], dst_uv: &mut [u8]);

pub(crate) fn split_uv_row(src_uv: &[u8], dst_u: &mut [u8], dst_v: &mut [u8]) {
    for ((u, v), uv) in dst_u
        .iter_mut()
        .zip(dst_v.iter_mut())
        .zip(src_uv.chunks_exact(2))
    {
        *u = uv[0];
        *v = uv[1];
    }
}

pub(crate) fn merge_uv_row(src_u: &[u8], src_v: &[u8], dst_uv: &mut [u8]) {
    for ((uv, &u), &v) in dst_uv.chunks_exact_mut(2).zip(src_u.iter()).zip(src_v.iter()) {
        uv[0] = u;
        uv[1] = v;
    }
}

pub(crate) fn split_uv_kernel(features: CpuFeatures, width: usize) -> RowKernel<SplitUvHandler> {
    let candidates: &[KernelDescriptor<SplitUvHandler>] = &[
        #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "avx"))]
        KernelDescriptor {
            name: "split_uv_row_avx2",
            feature: CpuFeature::Avx2,
            width: WidthRule::AtLeast(32),
            alignment: 1,
            kernel: crate::avx2::split_uv_row_avx2,
        },
        #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "sse"))]
        KernelDescriptor {
            name: "split_uv_row_sse2",
            feature: CpuFeature::Sse2,
            width: WidthRule::AtLeast(16),
            alignment: 1,
            kernel: crate::sse::split_uv_row_sse2,
        },
        #[cfg(all(target_arch = "aarch64", feature = "neon"))]
        KernelDescriptor {
            name: "split_uv_row_neon",
            feature: CpuFeature::Neon,
            width: WidthRule::AtLeast(16),
            alignment: 1,
            kernel: crate::neon::split_uv_row_neon,
        },
    ];
    select_kernel(
        "split_uv_row",
        candidates,
        split_uv_row as SplitUvHandler,
        features,
        width,
        1,
    )
}

fn merge_uv_kernel(features: CpuFeatures, width: usize) -> RowKernel<MergeUvHandler> {
    let candidates: &[KernelDescriptor<MergeUvHandler>] = &[
        #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "sse"))]
        KernelDescriptor {
            name: "merge_uv_row_sse2",
            feature: CpuFeature::Sse2,
            width: WidthRule::AtLeast(16),
            alignment: 1,
            kernel: crate::sse::merge_uv_row_sse2,
        },
        #[cfg(all(target_arch = "aarch64", feature = "neon"))]
        KernelDescriptor {
            name: "merge_uv_row_neon",
            feature: CpuFeature::Neon,
            width: WidthRule::AtLeast(16),
            alignment: 1,
            kernel: crate::neon::merge_uv_row_neon,
        },
    ];
    select_kernel(
        "merge_uv_row",
        candidates,
        merge_uv_row as MergeUvHandler,
        features,
        width,
        1,
    )
}

/// Splits one interleaved row of `width` pairs.
#[inline]
pub(crate) fn split_uv(
    kernel: &RowKernel<SplitUvHandler>,
    src_uv: &[u8],
    dst_u: &mut [u8],
    dst_v: &mut [u8],
    width: usize,
) {
    kernel.split(width, |f, start, count| unsafe {
        f(
            &src_uv[start * 2..(start + count) * 2],
            &mut dst_u[start..start + count],
            &mut dst_v[start..start + count],
        )
    });
}

fn split_uv_rows(
    src: &PlaneRef,
    dst_u: &mut PlaneMut,
    dst_v: &mut PlaneMut,
    width: usize,
    features: CpuFeatures,
) {
    let kernel = split_uv_kernel(features, width);
    for y in 0..src.rows() {
        split_uv(&kernel, src.row(y), dst_u.row_mut(y), dst_v.row_mut(y), width);
    }
}

pub(crate) fn split_uv_plane_impl(
    src_uv: &[u8],
    src_stride_uv: i32,
    dst_u: &mut [u8],
    dst_stride_u: i32,
    dst_v: &mut [u8],
    dst_stride_v: i32,
    width: usize,
    height: i32,
    features: CpuFeatures,
) -> Result<(), YuvError> {
    let (rows, flip) = resolve_height(height);
    let src = PlaneRef::new(src_uv, src_stride_uv, width * 2, rows)?.flip_if(flip);
    let mut u = PlaneMut::new(dst_u, dst_stride_u, width, rows)?;
    let mut v = PlaneMut::new(dst_v, dst_stride_v, width, rows)?;
    split_uv_rows(&src, &mut u, &mut v, width, features);
    Ok(())
}

/// Splits interleaved UV plane into separate U and V planes.
///
/// `width` is the count of UV pairs per row, negative `height` flips the source.
pub fn split_uv_plane(
    src_uv: &[u8],
    src_stride_uv: i32,
    dst_u: &mut [u8],
    dst_stride_u: i32,
    dst_v: &mut [u8],
    dst_stride_v: i32,
    width: i32,
    height: i32,
) -> Result<(), YuvError> {
    let width = check_width(width)?;
    split_uv_plane_impl(
        src_uv,
        src_stride_uv,
        dst_u,
        dst_stride_u,
        dst_v,
        dst_stride_v,
        width,
        height,
        CpuFeatures::detect(),
    )
}

pub(crate) fn merge_uv_plane_impl(
    src_u: &[u8],
    src_stride_u: i32,
    src_v: &[u8],
    src_stride_v: i32,
    dst_uv: &mut [u8],
    dst_stride_uv: i32,
    width: usize,
    height: i32,
    features: CpuFeatures,
) -> Result<(), YuvError> {
    let (rows, flip) = resolve_height(height);
    let u = PlaneRef::new(src_u, src_stride_u, width, rows)?.flip_if(flip);
    let v = PlaneRef::new(src_v, src_stride_v, width, rows)?.flip_if(flip);
    let mut dst = PlaneMut::new(dst_uv, dst_stride_uv, width * 2, rows)?;
    let kernel = merge_uv_kernel(features, width);
    for y in 0..rows {
        let (u, v) = (u.row(y), v.row(y));
        let dst = dst.row_mut(y);
        kernel.split(width, |f, start, count| unsafe {
            f(
                &u[start..start + count],
                &v[start..start + count],
                &mut dst[start * 2..(start + count) * 2],
            )
        });
    }
    Ok(())
}

/// Interleaves U and V planes into one UV plane, negative `height` flips the sources.
pub fn merge_uv_plane(
    src_u: &[u8],
    src_stride_u: i32,
    src_v: &[u8],
    src_stride_v: i32,
    dst_uv: &mut [u8],
    dst_stride_uv: i32,
    width: i32,
    height: i32,
) -> Result<(), YuvError> {
    let width = check_width(width)?;
    merge_uv_plane_impl(
        src_u,
        src_stride_u,
        src_v,
        src_stride_v,
        dst_uv,
        dst_stride_uv,
        width,
        height,
        CpuFeatures::detect(),
    )
}

fn nv_to_i420_impl<const SWAP_UV: bool>(
    src: &YuvBiPlanarImage,
    dst: &mut YuvPlanarImageMut,
) -> Result<(), YuvError> {
    let width = check_width(src.width)?;
    let (rows, flip) = resolve_height(src.height);
    let features = CpuFeatures::detect();
    let (y, uv) = src.planes(width, rows)?;
    let (mut dy, mut du, mut dv) = dst.planes(YuvChromaSample::Yuv420, width, rows)?;
    let chroma_width = YuvChromaSample::Yuv420.chroma_width(width);
    copy_rows(&y.flip_if(flip), &mut dy, width, features);
    if SWAP_UV {
        split_uv_rows(&uv.flip_if(flip), &mut dv, &mut du, chroma_width, features);
    } else {
        split_uv_rows(&uv.flip_if(flip), &mut du, &mut dv, chroma_width, features);
    }
    Ok(())
}

/// Converts NV12 to I420, negative height flips the source.
pub fn nv12_to_i420(src: &YuvBiPlanarImage, dst: &mut YuvPlanarImageMut) -> Result<(), YuvError> {
    nv_to_i420_impl::<false>(src, dst)
}

/// Converts NV21 to I420, negative height flips the source.
pub fn nv21_to_i420(src: &YuvBiPlanarImage, dst: &mut YuvPlanarImageMut) -> Result<(), YuvError> {
    nv_to_i420_impl::<true>(src, dst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_split_and_merge_match_reference() {
        let mut rng = StdRng::seed_from_u64(11);
        for width in 1..90usize {
            let rows = 3usize;
            let src: Vec<u8> = (0..width * 2 * rows).map(|_| rng.random()).collect();
            let stride = (width * 2) as i32;
            let mut results = Vec::new();
            for features in [CpuFeatures::detect(), CpuFeatures::empty()] {
                let mut u = vec![0u8; width * rows];
                let mut v = vec![0u8; width * rows];
                split_uv_plane_impl(
                    &src,
                    stride,
                    &mut u,
                    width as i32,
                    &mut v,
                    width as i32,
                    width,
                    rows as i32,
                    features,
                )
                .unwrap();
                let mut merged = vec![0u8; src.len()];
                merge_uv_plane_impl(
                    &u,
                    width as i32,
                    &v,
                    width as i32,
                    &mut merged,
                    stride,
                    width,
                    rows as i32,
                    features,
                )
                .unwrap();
                assert_eq!(merged, src, "width {}", width);
                results.push((u, v));
            }
            assert_eq!(results[0], results[1], "width {}", width);
            for (i, &u) in results[1].0.iter().enumerate() {
                assert_eq!(u, src[i * 2]);
            }
        }
    }

    #[test]
    fn test_nv21_to_i420_swaps_chroma() {
        let y = [1u8, 2, 3, 4];
        let vu = [9u8, 8];
        let src = YuvBiPlanarImage {
            y_plane: &y,
            y_stride: 2,
            uv_plane: &vu,
            uv_stride: 2,
            width: 2,
            height: 2,
        };
        let mut dy = [0u8; 4];
        let mut du = [0u8; 1];
        let mut dv = [0u8; 1];
        let mut dst = YuvPlanarImageMut {
            y_plane: &mut dy,
            y_stride: 2,
            u_plane: &mut du,
            u_stride: 1,
            v_plane: &mut dv,
            v_stride: 1,
        };
        nv21_to_i420(&src, &mut dst).unwrap();
        assert_eq!(dy, y);
        assert_eq!(du, [8]);
        assert_eq!(dv, [9]);
    }
}
