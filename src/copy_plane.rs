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
use crate::images::{YuvPlanarImage, YuvPlanarImageMut};
use crate::plane::{PlaneMut, PlaneRef};
use crate::yuv_error::{check_width, resolve_height};
use crate::yuv_support::YuvChromaSample;
use crate::YuvError;

/// Row handler where the slice lengths carry the row width in bytes.
pub(crate) type CopyRowHandler = unsafe fn(src: &[u8], dst: &mut [u8]);

pub(crate) fn copy_row(src: &[u8], dst: &mut [u8]) {
    dst.copy_from_slice(src);
}

pub(crate) fn mirror_row(src: &[u8], dst: &mut [u8]) {
    for (dst, src) in dst.iter_mut().zip(src.iter().rev()) {
        *dst = *src;
    }
}

pub(crate) fn argb_mirror_row(src: &[u8], dst: &mut [u8]) {
    for (dst, src) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4).rev()) {
        dst.copy_from_slice(src);
    }
}

pub(crate) fn copy_row_kernel(
    features: CpuFeatures,
    width: usize,
    alignment: usize,
) -> RowKernel<CopyRowHandler> {
    let candidates: &[KernelDescriptor<CopyRowHandler>] = &[
        #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "avx"))]
        KernelDescriptor {
            name: "copy_row_avx2",
            feature: CpuFeature::Avx2,
            width: WidthRule::MultipleOf(64),
            alignment: 1,
            kernel: crate::avx2::copy_row_avx2,
        },
        #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "sse"))]
        KernelDescriptor {
            name: "copy_row_sse2",
            feature: CpuFeature::Sse2,
            width: WidthRule::MultipleOf(32),
            alignment: 16,
            kernel: crate::sse::copy_row_sse2,
        },
        #[cfg(all(target_arch = "aarch64", feature = "neon"))]
        KernelDescriptor {
            name: "copy_row_neon",
            feature: CpuFeature::Neon,
            width: WidthRule::MultipleOf(32),
            alignment: 1,
            kernel: crate::neon::copy_row_neon,
        },
    ];
    select_kernel(
        "copy_row",
        candidates,
        copy_row as CopyRowHandler,
        features,
        width,
        alignment,
    )
}

pub(crate) fn mirror_row_kernel(features: CpuFeatures, width: usize) -> RowKernel<CopyRowHandler> {
    let candidates: &[KernelDescriptor<CopyRowHandler>] = &[
        #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "sse"))]
        KernelDescriptor {
            name: "mirror_row_ssse3",
            feature: CpuFeature::Ssse3,
            width: WidthRule::AtLeast(16),
            alignment: 1,
            kernel: crate::sse::mirror_row_ssse3,
        },
        #[cfg(all(target_arch = "aarch64", feature = "neon"))]
        KernelDescriptor {
            name: "mirror_row_neon",
            feature: CpuFeature::Neon,
            width: WidthRule::AtLeast(16),
            alignment: 1,
            kernel: crate::neon::mirror_row_neon,
        },
    ];
    select_kernel(
        "mirror_row",
        candidates,
        mirror_row as CopyRowHandler,
        features,
        width,
        1,
    )
}

/// `width` is in pixels here.
pub(crate) fn argb_mirror_row_kernel(
    features: CpuFeatures,
    width: usize,
) -> RowKernel<CopyRowHandler> {
    let candidates: &[KernelDescriptor<CopyRowHandler>] = &[
        #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "sse"))]
        KernelDescriptor {
            name: "argb_mirror_row_sse2",
            feature: CpuFeature::Sse2,
            width: WidthRule::AtLeast(4),
            alignment: 1,
            kernel: crate::sse::argb_mirror_row_sse2,
        },
        #[cfg(all(target_arch = "aarch64", feature = "neon"))]
        KernelDescriptor {
            name: "argb_mirror_row_neon",
            feature: CpuFeature::Neon,
            width: WidthRule::AtLeast(4),
            alignment: 1,
            kernel: crate::neon::argb_mirror_row_neon,
        },
    ];
    select_kernel(
        "argb_mirror_row",
        candidates,
        argb_mirror_row as CopyRowHandler,
        features,
        width,
        1,
    )
}

/// Copies `width` bytes per row.
pub(crate) fn copy_rows(src: &PlaneRef, dst: &mut PlaneMut, width: usize, features: CpuFeatures) {
    let kernel = copy_row_kernel(features, width, src.alignment().min(dst.alignment()));
    for y in 0..src.rows() {
        let src = src.row(y);
        let dst = dst.row_mut(y);
        kernel.split(width, |f, start, count| unsafe {
            f(&src[start..start + count], &mut dst[start..start + count])
        });
    }
}

/// Mirrors `width` pixels of `bpp` bytes per row.
///
/// The bulk kernel writes the first `aligned` output pixels, which come from the end of the
/// source row, the reference kernel finishes from the start of the source row.
fn mirror_rows(
    src: &PlaneRef,
    dst: &mut PlaneMut,
    width: usize,
    bpp: usize,
    kernel: RowKernel<CopyRowHandler>,
) {
    for y in 0..src.rows() {
        let src = src.row(y);
        let dst = dst.row_mut(y);
        kernel.split(width, |f, start, count| {
            let src_start = (width - start - count) * bpp;
            unsafe {
                f(
                    &src[src_start..src_start + count * bpp],
                    &mut dst[start * bpp..(start + count) * bpp],
                )
            }
        });
    }
}

/// Row coalescing, contiguous planes are handled as one long row.
#[inline]
fn coalesce(stride: i32, other_stride: i32, row_bytes: usize, rows: usize) -> Option<(usize, usize)> {
    if stride as i64 == row_bytes as i64 && other_stride as i64 == row_bytes as i64 && rows > 1 {
        let total = row_bytes.checked_mul(rows)?;
        return Some((total, 1));
    }
    None
}

pub(crate) fn copy_plane_impl(
    src: &[u8],
    src_stride: i32,
    dst: &mut [u8],
    dst_stride: i32,
    row_bytes: usize,
    height: i32,
    features: CpuFeatures,
) -> Result<(), YuvError> {
    let (rows, flip) = resolve_height(height);
    let (row_bytes, rows) = if flip {
        (row_bytes, rows)
    } else {
        coalesce(src_stride, dst_stride, row_bytes, rows).unwrap_or((row_bytes, rows))
    };
    let src_plane = PlaneRef::new(src, src_stride, row_bytes, rows)?.flip_if(flip);
    let mut dst_plane = PlaneMut::new(dst, dst_stride, row_bytes, rows)?;
    copy_rows(&src_plane, &mut dst_plane, row_bytes, features);
    Ok(())
}

/// Copies a plane of bytes
///
/// Negative `height` flips the source vertically.
///
/// # Arguments
///
/// * `src`: Source plane
/// * `src_stride`: Source stride in bytes, may be negative
/// * `dst`: Destination plane
/// * `dst_stride`: Destination stride in bytes, may be negative
/// * `width`: Row width in bytes
/// * `height`: Rows count, negative to flip
///
/// returns: Result<(), YuvError>
///
pub fn copy_plane(
    src: &[u8],
    src_stride: i32,
    dst: &mut [u8],
    dst_stride: i32,
    width: i32,
    height: i32,
) -> Result<(), YuvError> {
    let width = check_width(width)?;
    copy_plane_impl(
        src,
        src_stride,
        dst,
        dst_stride,
        width,
        height,
        CpuFeatures::detect(),
    )
}

/// Copies ARGB image, negative `height` flips the source.
pub fn argb_copy(
    src: &[u8],
    src_stride: i32,
    dst: &mut [u8],
    dst_stride: i32,
    width: i32,
    height: i32,
) -> Result<(), YuvError> {
    let width = check_width(width)?;
    let row_bytes = width.checked_mul(4).ok_or(YuvError::PointerOverflow)?;
    copy_plane_impl(
        src,
        src_stride,
        dst,
        dst_stride,
        row_bytes,
        height,
        CpuFeatures::detect(),
    )
}

pub(crate) fn mirror_plane_impl(
    src: &[u8],
    src_stride: i32,
    dst: &mut [u8],
    dst_stride: i32,
    width: usize,
    height: i32,
    bpp: usize,
    features: CpuFeatures,
) -> Result<(), YuvError> {
    let (rows, flip) = resolve_height(height);
    let row_bytes = width.checked_mul(bpp).ok_or(YuvError::PointerOverflow)?;
    let src_plane = PlaneRef::new(src, src_stride, row_bytes, rows)?.flip_if(flip);
    let mut dst_plane = PlaneMut::new(dst, dst_stride, row_bytes, rows)?;
    let kernel = if bpp == 4 {
        argb_mirror_row_kernel(features, width)
    } else {
        mirror_row_kernel(features, width)
    };
    mirror_rows(&src_plane, &mut dst_plane, width, bpp, kernel);
    Ok(())
}

/// Mirrors a plane of bytes left to right, negative `height` flips the source.
pub fn mirror_plane(
    src: &[u8],
    src_stride: i32,
    dst: &mut [u8],
    dst_stride: i32,
    width: i32,
    height: i32,
) -> Result<(), YuvError> {
    let width = check_width(width)?;
    mirror_plane_impl(
        src,
        src_stride,
        dst,
        dst_stride,
        width,
        height,
        1,
        CpuFeatures::detect(),
    )
}

/// Mirrors ARGB pixels left to right keeping channel order, negative `height` flips the source.
pub fn argb_mirror(
    src: &[u8],
    src_stride: i32,
    dst: &mut [u8],
    dst_stride: i32,
    width: i32,
    height: i32,
) -> Result<(), YuvError> {
    let width = check_width(width)?;
    mirror_plane_impl(
        src,
        src_stride,
        dst,
        dst_stride,
        width,
        height,
        4,
        CpuFeatures::detect(),
    )
}

/// Copies I420 image, negative height flips the source.
///
/// Geometry is taken from `src`, `dst` must hold the same amount of rows.
pub fn i420_copy(src: &YuvPlanarImage, dst: &mut YuvPlanarImageMut) -> Result<(), YuvError> {
    let width = check_width(src.width)?;
    let (rows, flip) = resolve_height(src.height);
    let features = CpuFeatures::detect();
    let (y, u, v) = src.planes(YuvChromaSample::Yuv420, width, rows)?;
    let (mut dy, mut du, mut dv) = dst.planes(YuvChromaSample::Yuv420, width, rows)?;
    let chroma_width = YuvChromaSample::Yuv420.chroma_width(width);
    copy_rows(&y.flip_if(flip), &mut dy, width, features);
    copy_rows(&u.flip_if(flip), &mut du, chroma_width, features);
    copy_rows(&v.flip_if(flip), &mut dv, chroma_width, features);
    Ok(())
}

/// Mirrors I420 image left to right.
///
/// Negative height walks source and destination bottom-up together, so rows keep their
/// order and only columns are reversed.
pub fn i420_mirror(src: &YuvPlanarImage, dst: &mut YuvPlanarImageMut) -> Result<(), YuvError> {
    i420_mirror_impl(src, dst, CpuFeatures::detect())
}

fn i420_mirror_impl(
    src: &YuvPlanarImage,
    dst: &mut YuvPlanarImageMut,
    features: CpuFeatures,
) -> Result<(), YuvError> {
    let width = check_width(src.width)?;
    let (rows, flip) = resolve_height(src.height);
    let (y, u, v) = src.planes(YuvChromaSample::Yuv420, width, rows)?;
    let (dy, du, dv) = dst.planes(YuvChromaSample::Yuv420, width, rows)?;
    let chroma_width = YuvChromaSample::Yuv420.chroma_width(width);
    let luma_kernel = mirror_row_kernel(features, width);
    let chroma_kernel = mirror_row_kernel(features, chroma_width);
    mirror_rows(
        &y.flip_if(flip),
        &mut dy.flip_if(flip),
        width,
        1,
        luma_kernel,
    );
    mirror_rows(
        &u.flip_if(flip),
        &mut du.flip_if(flip),
        chroma_width,
        1,
        chroma_kernel,
    );
    mirror_rows(
        &v.flip_if(flip),
        &mut dv.flip_if(flip),
        chroma_width,
        1,
        chroma_kernel,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_bytes(rng: &mut StdRng, len: usize) -> Vec<u8> {
        (0..len).map(|_| rng.random::<u8>()).collect()
    }

    #[test]
    fn test_copy_plane_17x3() {
        let mut rng = StdRng::seed_from_u64(17);
        let (width, height, src_stride, dst_stride) = (17usize, 3usize, 21usize, 32usize);
        let src = random_bytes(&mut rng, src_stride * height);
        let mut dst = vec![0u8; dst_stride * height];
        copy_plane(
            &src,
            src_stride as i32,
            &mut dst,
            dst_stride as i32,
            width as i32,
            height as i32,
        )
        .unwrap();
        for y in 0..height {
            assert_eq!(
                &dst[y * dst_stride..y * dst_stride + width],
                &src[y * src_stride..y * src_stride + width]
            );
            assert!(dst[y * dst_stride + width..(y + 1) * dst_stride]
                .iter()
                .all(|&v| v == 0));
        }
    }

    #[test]
    fn test_copy_kernels_match_reference() {
        let mut rng = StdRng::seed_from_u64(1);
        for width in 0..140usize {
            let src = random_bytes(&mut rng, width * 2);
            let mut fast = vec![0u8; width * 2];
            let mut reference = vec![0u8; width * 2];
            let stride = width.max(1) as i32;
            copy_plane_impl(&src, stride, &mut fast, stride, width, 2, CpuFeatures::detect())
                .unwrap();
            copy_plane_impl(
                &src,
                stride,
                &mut reference,
                stride,
                width,
                2,
                CpuFeatures::empty(),
            )
            .unwrap();
            assert_eq!(fast, reference, "width {}", width);
            assert_eq!(fast, src);
        }
    }

    #[test]
    fn test_mirror_kernels_match_reference() {
        let mut rng = StdRng::seed_from_u64(2);
        for bpp in [1usize, 4] {
            for width in 1..80usize {
                let src = random_bytes(&mut rng, width * bpp * 3);
                let stride = (width * bpp) as i32;
                let mut fast = vec![0u8; src.len()];
                let mut reference = vec![0u8; src.len()];
                mirror_plane_impl(&src, stride, &mut fast, stride, width, 3, bpp, CpuFeatures::detect())
                    .unwrap();
                mirror_plane_impl(
                    &src,
                    stride,
                    &mut reference,
                    stride,
                    width,
                    3,
                    bpp,
                    CpuFeatures::empty(),
                )
                .unwrap();
                assert_eq!(fast, reference, "width {} bpp {}", width, bpp);
                for x in 0..width {
                    assert_eq!(
                        &reference[x * bpp..(x + 1) * bpp],
                        &src[(width - 1 - x) * bpp..(width - x) * bpp]
                    );
                }
            }
        }
    }

    #[test]
    fn test_copy_flip_is_idempotent() {
        let mut rng = StdRng::seed_from_u64(3);
        for height in [1usize, 2, 5, 6] {
            let width = 13usize;
            let src = random_bytes(&mut rng, width * height);
            let mut flipped = vec![0u8; src.len()];
            let mut restored = vec![0u8; src.len()];
            copy_plane(&src, 13, &mut flipped, 13, 13, -(height as i32)).unwrap();
            for y in 0..height {
                assert_eq!(
                    &flipped[y * width..(y + 1) * width],
                    &src[(height - 1 - y) * width..(height - y) * width]
                );
            }
            copy_plane(&flipped, 13, &mut restored, 13, 13, -(height as i32)).unwrap();
            assert_eq!(restored, src);
        }
    }

    #[test]
    fn test_copy_negative_stride_composes_with_flip() {
        let src: Vec<u8> = (0..12u8).collect();
        let mut dst = vec![0u8; 12];
        // negative stride and negative height cancel out
        copy_plane(&src, -4, &mut dst, 4, 4, -3).unwrap();
        assert_eq!(dst, src);
        copy_plane(&src, -4, &mut dst, 4, 4, 3).unwrap();
        assert_eq!(dst, [8, 9, 10, 11, 4, 5, 6, 7, 0, 1, 2, 3]);
    }

    #[test]
    fn test_copy_degenerate_sizes() {
        let src = [1u8; 8];
        let mut dst = [0u8; 8];
        assert_eq!(copy_plane(&src, 4, &mut dst, 4, 0, 2), Err(YuvError::ZeroBaseSize));
        assert_eq!(copy_plane(&src, 4, &mut dst, 4, 4, 0), Ok(()));
        assert_eq!(dst, [0u8; 8]);
        assert!(copy_plane(&src, 4, &mut dst, 4, 4, 3).is_err());
        assert_eq!(dst, [0u8; 8]);
    }

    #[test]
    fn test_i420_mirror_negative_height() {
        let y = [1u8, 2, 3, 4, 5, 6, 7, 8];
        let u = [10u8, 11];
        let v = [20u8, 21];
        let src = YuvPlanarImage {
            y_plane: &y,
            y_stride: 4,
            u_plane: &u,
            u_stride: 2,
            v_plane: &v,
            v_stride: 2,
            width: 4,
            height: -2,
        };
        let mut dy = [0u8; 8];
        let mut du = [0u8; 2];
        let mut dv = [0u8; 2];
        let mut dst = YuvPlanarImageMut {
            y_plane: &mut dy,
            y_stride: 4,
            u_plane: &mut du,
            u_stride: 2,
            v_plane: &mut dv,
            v_stride: 2,
        };
        i420_mirror(&src, &mut dst).unwrap();
        assert_eq!(dy, [4, 3, 2, 1, 8, 7, 6, 5]);
        assert_eq!(du, [11, 10]);
        assert_eq!(dv, [21, 20]);
    }

    #[test]
    fn test_i420_copy_odd_size() {
        let mut rng = StdRng::seed_from_u64(4);
        let (w, h) = (5usize, 3usize);
        let y = random_bytes(&mut rng, w * h);
        let u = random_bytes(&mut rng, 3 * 2);
        let v = random_bytes(&mut rng, 3 * 2);
        let src = YuvPlanarImage {
            y_plane: &y,
            y_stride: 5,
            u_plane: &u,
            u_stride: 3,
            v_plane: &v,
            v_stride: 3,
            width: 5,
            height: 3,
        };
        let mut dy = vec![0u8; w * h];
        let mut du = vec![0u8; 6];
        let mut dv = vec![0u8; 6];
        let mut dst = YuvPlanarImageMut {
            y_plane: &mut dy,
            y_stride: 5,
            u_plane: &mut du,
            u_stride: 3,
            v_plane: &mut dv,
            v_stride: 3,
        };
        i420_copy(&src, &mut dst).unwrap();
        assert_eq!(dy, y);
        assert_eq!(du, u);
        assert_eq!(dv, v);
    }

    #[test]
    fn test_argb_mirror_keeps_channel_order() {
        let src = [1u8, 2, 3, 4, 5, 6, 7, 8];
        let mut dst = [0u8; 8];
        argb_mirror(&src, 8, &mut dst, 8, 2, 1).unwrap();
        assert_eq!(dst, [5, 6, 7, 8, 1, 2, 3, 4]);
    }
}
