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
use crate::cpu::CpuFeatures;
use crate::dispatch::RowKernel;
use crate::plane::{PlaneMut, PlaneRef};
use crate::scale::{
    check_scale_geometry, scale_bilinear, scale_filter_reduce, scale_plane_vertical,
    scale_simple, scale_slope, FilterMode, ScaleGeometry, ScaleSlope,
};
use crate::scale_rows::{
    argb_scale_cols, argb_scale_filter_cols, argb_scale_row_down2_kernel,
    argb_scale_row_down_even, scale_row_down, ScaleColsHandler,
};
use crate::YuvError;

/// Even integer reduction on both axes by exactly 2 horizontally.
fn scale_argb_down2(
    src: &PlaneRef,
    dst: &mut PlaneMut,
    dst_width: usize,
    slope: ScaleSlope,
    filtering: FilterMode,
    features: CpuFeatures,
) {
    let filtered = filtering != FilterMode::None;
    let linear = filtering == FilterMode::Linear;
    let kernel = argb_scale_row_down2_kernel(features, dst_width, linear, filtered);
    // point sampling takes the second pixel of each pair
    let column = if filtered {
        slope.x >> 16
    } else {
        (slope.x >> 16) - 1
    };
    let offset = column.max(0) as usize * 4;
    let last = src.rows() - 1;
    let row_step = (slope.dy >> 16) as usize;
    let first_row = (slope.y >> 16).max(0) as usize;
    for j in 0..dst.rows() {
        let yi = (first_row + j * row_step).min(last);
        let second = match filtering {
            FilterMode::Bilinear | FilterMode::Box => (yi + 1).min(last),
            _ => yi,
        };
        let rows = [&src.row(yi)[offset..], &src.row(second)[offset..]];
        scale_row_down(&kernel, rows, dst.row_mut(j), dst_width, 4, (2, 1));
    }
}

/// Even integer reduction by 4, 6, 8 and so on.
fn scale_argb_down_even(
    src: &PlaneRef,
    dst: &mut PlaneMut,
    dst_width: usize,
    slope: ScaleSlope,
    filtering: FilterMode,
) {
    let filtered = filtering != FilterMode::None;
    let col_step = (slope.dx >> 16) as usize;
    let row_step = (slope.dy >> 16) as usize;
    let offset = (slope.x >> 16).max(0) as usize * 4;
    let first_row = (slope.y >> 16).max(0) as usize;
    let last = src.rows() - 1;
    for j in 0..dst.rows() {
        let yi = (first_row + j * row_step).min(last);
        let second = if filtering == FilterMode::Linear {
            yi
        } else {
            (yi + 1).min(last)
        };
        let rows = [&src.row(yi)[offset..], &src.row(second)[offset..]];
        argb_scale_row_down_even(rows, &mut dst.row_mut(j)[..dst_width * 4], col_step, filtered);
    }
}

pub(crate) fn scale_argb_impl(
    src_argb: &[u8],
    src_stride_argb: i32,
    src_width: i32,
    src_height: i32,
    dst_argb: &mut [u8],
    dst_stride_argb: i32,
    dst_width: i32,
    dst_height: i32,
    filtering: FilterMode,
    features: CpuFeatures,
) -> Result<(), YuvError> {
    let Some(geometry) = check_scale_geometry(src_width, src_height, dst_width, dst_height)? else {
        return Ok(());
    };
    let ScaleGeometry {
        src_width: sw,
        src_rows: sh,
        flip,
        dst_width: dw,
        dst_height: dh,
    } = geometry;
    let src = PlaneRef::new(src_argb, src_stride_argb, sw * 4, sh)?.flip_if(flip);
    let mut dst = PlaneMut::new(dst_argb, dst_stride_argb, dw * 4, dh)?;
    let mut filtering = scale_filter_reduce(sw, sh, dw, dh, filtering);

    let path = |name: &str, filtering: FilterMode| {
        log::debug!(
            "scale_argb {}x{} -> {}x{} {:?}: {}",
            sw,
            sh,
            dw,
            dh,
            filtering,
            name
        );
    };

    if dw == sw && dh == sh {
        path("copy", filtering);
        copy_rows(&src, &mut dst, dw * 4, features);
        return Ok(());
    }

    let slope = scale_slope(sw, sh, dw, dh, filtering);
    if (slope.dx | slope.dy) & 0xffff == 0 {
        if slope.dx == 0 || slope.dy == 0 {
            filtering = FilterMode::None;
        } else if slope.dx & 0x10000 == 0 && slope.dy & 0x10000 == 0 {
            if slope.dx == 0x20000 {
                path("down2", filtering);
                scale_argb_down2(&src, &mut dst, dw, slope, filtering, features);
            } else {
                path("down_even", filtering);
                scale_argb_down_even(&src, &mut dst, dw, slope, filtering);
            }
            return Ok(());
        } else if slope.dx & 0x10000 != 0 && slope.dy & 0x10000 != 0 {
            // odd integer steps land on pixel centers
            filtering = FilterMode::None;
        }
    }
    if filtering == FilterMode::None {
        path("simple", filtering);
        let slope = scale_slope(sw, sh, dw, dh, FilterMode::None);
        let cols = RowKernel::reference("argb_scale_cols", argb_scale_cols as ScaleColsHandler);
        scale_simple(&src, &mut dst, dw, 4, slope, &cols);
        return Ok(());
    }
    if slope.dx == 0x10000 && slope.x & 0xffff == 0 {
        path("vertical", filtering);
        scale_plane_vertical(&src, &mut dst, dw, 4, slope, filtering, features);
        return Ok(());
    }
    path("bilinear", filtering);
    let filtering = if filtering == FilterMode::Box {
        FilterMode::Bilinear
    } else {
        filtering
    };
    let cols = RowKernel::reference(
        "argb_scale_filter_cols",
        argb_scale_filter_cols as ScaleColsHandler,
    );
    scale_bilinear(&src, &mut dst, sw, dw, 4, slope, filtering, &cols, features)
}

/// Scales an ARGB image.
///
/// Even integer reductions use dedicated 2x2 reducers, `Box` is accepted and treated as
/// `Bilinear` outside of those. Negative `src_height` flips the source, a zero `src_height`
/// is a no-op.
///
/// # Arguments
///
/// * `src_argb`: Source ARGB image
/// * `src_stride_argb`: Bytes per source row, may be negative
/// * `src_width`: Source width in pixels, at most 32767
/// * `src_height`: Source height, negative to flip
/// * `dst_argb`: Destination ARGB image
/// * `dst_stride_argb`: Bytes per destination row, may be negative
/// * `dst_width`: Destination width in pixels
/// * `dst_height`: Destination height
/// * `filtering`: Requested filter, see [FilterMode]
///
/// returns: Result<(), YuvError>
///
pub fn scale_argb(
    src_argb: &[u8],
    src_stride_argb: i32,
    src_width: i32,
    src_height: i32,
    dst_argb: &mut [u8],
    dst_stride_argb: i32,
    dst_width: i32,
    dst_height: i32,
    filtering: FilterMode,
) -> Result<(), YuvError> {
    scale_argb_impl(
        src_argb,
        src_stride_argb,
        src_width,
        src_height,
        dst_argb,
        dst_stride_argb,
        dst_width,
        dst_height,
        filtering,
        CpuFeatures::detect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn pixel(image: &[u8], stride: usize, x: usize, y: usize) -> [u8; 4] {
        let o = y * stride + x * 4;
        [image[o], image[o + 1], image[o + 2], image[o + 3]]
    }

    #[test]
    fn test_argb_down2() {
        let mut src = vec![0u8; 4 * 4 * 2];
        for (i, px) in src.chunks_exact_mut(4).enumerate() {
            px.fill((i * 10) as u8);
        }
        let mut dst = vec![0u8; 2 * 4];
        scale_argb(&src, 16, 4, 2, &mut dst, 8, 2, 1, FilterMode::Bilinear).unwrap();
        // (0 + 10 + 40 + 50 + 2) / 4 and (20 + 30 + 60 + 70 + 2) / 4
        assert_eq!(pixel(&dst, 8, 0, 0), [25; 4]);
        assert_eq!(pixel(&dst, 8, 1, 0), [45; 4]);
        scale_argb(&src, 16, 4, 2, &mut dst, 8, 2, 1, FilterMode::None).unwrap();
        assert_eq!(pixel(&dst, 8, 0, 0), [50; 4]);
        assert_eq!(pixel(&dst, 8, 1, 0), [70; 4]);
    }

    #[test]
    fn test_argb_down_even_point() {
        let mut src = vec![0u8; 8 * 4 * 8];
        for (i, px) in src.chunks_exact_mut(4).enumerate() {
            px.fill(i as u8);
        }
        let mut dst = vec![0u8; 2 * 4 * 2];
        scale_argb(&src, 32, 8, 8, &mut dst, 8, 2, 2, FilterMode::None).unwrap();
        // centers of the 4x4 cells
        assert_eq!(pixel(&dst, 8, 0, 0), [18; 4]);
        assert_eq!(pixel(&dst, 8, 1, 0), [22; 4]);
        assert_eq!(pixel(&dst, 8, 0, 1), [50; 4]);
        assert_eq!(pixel(&dst, 8, 1, 1), [54; 4]);
    }

    #[test]
    fn test_argb_vertical_keeps_columns() {
        let src: Vec<u8> = (0..3 * 4 * 4).map(|v| v as u8).collect();
        let mut dst = vec![0u8; 3 * 4 * 2];
        scale_argb(&src, 12, 3, 4, &mut dst, 12, 3, 2, FilterMode::Bilinear).unwrap();
        // y starts half a step in: rows 0.5 and 2.5
        for x in 0..3 {
            let top = pixel(&src, 12, x, 0);
            let below = pixel(&src, 12, x, 1);
            let expected: Vec<u8> = top
                .iter()
                .zip(below.iter())
                .map(|(&a, &b)| ((a as u32 * 128 + b as u32 * 128 + 128) >> 8) as u8)
                .collect();
            assert_eq!(&pixel(&dst, 12, x, 0)[..], &expected[..]);
        }
    }

    #[test]
    fn test_argb_same_size_flip() {
        let src = [1u8, 1, 1, 1, 2, 2, 2, 2];
        let mut dst = [0u8; 8];
        scale_argb(&src, 4, 1, -2, &mut dst, 4, 1, 2, FilterMode::Box).unwrap();
        assert_eq!(dst, [2, 2, 2, 2, 1, 1, 1, 1]);
    }

    #[test]
    fn test_argb_paths_match_reference() {
        let mut rng = StdRng::seed_from_u64(103);
        let sizes = [
            (40usize, 20usize, 20usize, 10usize),
            (40, 20, 10, 5),
            (40, 20, 40, 12),
            (40, 20, 26, 13),
            (17, 9, 40, 30),
            (40, 20, 8, 20),
        ];
        for &(sw, sh, dw, dh) in sizes.iter() {
            let src: Vec<u8> = (0..sw * sh * 4).map(|_| rng.random()).collect();
            for filtering in [
                FilterMode::None,
                FilterMode::Linear,
                FilterMode::Bilinear,
                FilterMode::Box,
            ] {
                let mut fast = vec![0u8; dw * dh * 4];
                let mut reference = vec![0u8; dw * dh * 4];
                for (out, features) in [
                    (&mut fast, CpuFeatures::detect()),
                    (&mut reference, CpuFeatures::empty()),
                ] {
                    scale_argb_impl(
                        &src,
                        (sw * 4) as i32,
                        sw as i32,
                        sh as i32,
                        out,
                        (dw * 4) as i32,
                        dw as i32,
                        dh as i32,
                        filtering,
                        features,
                    )
                    .unwrap();
                }
                assert_eq!(fast, reference, "{}x{} -> {}x{} {:?}", sw, sh, dw, dh, filtering);
            }
        }
    }

    #[test]
    fn test_argb_flat_stays_flat() {
        let src = [7u8, 70, 140, 210].repeat(30 * 20);
        for filtering in [FilterMode::None, FilterMode::Bilinear, FilterMode::Box] {
            for (dw, dh) in [(15usize, 10usize), (7, 5), (45, 33), (12, 20)] {
                let mut dst = vec![0u8; dw * dh * 4];
                scale_argb(
                    &src,
                    120,
                    30,
                    20,
                    &mut dst,
                    (dw * 4) as i32,
                    dw as i32,
                    dh as i32,
                    filtering,
                )
                .unwrap();
                assert!(
                    dst.chunks_exact(4).all(|px| px == [7, 70, 140, 210]),
                    "{}x{} {:?}",
                    dw,
                    dh,
                    filtering
                );
            }
        }
    }
}
