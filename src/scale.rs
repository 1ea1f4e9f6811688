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
use crate::images::{YuvPlanarImage, YuvPlanarImageMut};
use crate::plane::{AlignedRow, PlaneMut, PlaneRef, MAX_STRIDE};
use crate::scale_rows::*;
use crate::yuv_error::{check_row_fits, check_width, resolve_height};
use crate::YuvError;

/// Resampling filter used by the scalers.
///
/// Requested filters may be reduced to cheaper ones when the geometry makes them
/// equivalent, e.g. `Box` becomes `Bilinear` when no axis shrinks by more than half.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum FilterMode {
    /// Point sampling
    #[default]
    None = 0,
    /// Horizontal interpolation only
    Linear = 1,
    Bilinear = 2,
    /// Area averaging for large reductions
    Box = 3,
}

impl From<u8> for FilterMode {
    #[inline]
    fn from(value: u8) -> Self {
        match value {
            0 => FilterMode::None,
            1 => FilterMode::Linear,
            2 => FilterMode::Bilinear,
            3 => FilterMode::Box,
            _ => {
                panic!("Unknown value")
            }
        }
    }
}

/// Largest dimension representable by the 16.16 cursor.
const MAX_SCALE_DIMENSION: usize = 32767;

/// Picks the cheapest filter producing the same image as `filtering`.
pub(crate) fn scale_filter_reduce(
    src_width: usize,
    src_height: usize,
    dst_width: usize,
    dst_height: usize,
    filtering: FilterMode,
) -> FilterMode {
    let mut filtering = filtering;
    if filtering == FilterMode::Box && dst_width * 2 >= src_width && dst_height * 2 >= src_height {
        filtering = FilterMode::Bilinear;
    }
    if filtering == FilterMode::Bilinear {
        if src_height == 1 || dst_height == src_height || dst_height * 3 == src_height {
            filtering = FilterMode::Linear;
        }
        if src_width == 1 {
            filtering = FilterMode::None;
        }
    }
    if filtering == FilterMode::Linear
        && (src_width == 1 || dst_width == src_width || dst_width * 3 == src_width)
    {
        filtering = FilterMode::None;
    }
    filtering
}

#[inline]
pub(crate) fn fixed_div(num: i32, div: i32) -> i32 {
    (((num as i64) << 16) / div as i64) as i32
}

/// Step that lands the last destination sample exactly on the last source sample.
#[inline]
pub(crate) fn fixed_div1(num: i32, div: i32) -> i32 {
    ((((num as i64) << 16) - 0x00010001) / (div as i64 - 1)) as i32
}

#[inline]
const fn center_start(dx: i32, s: i32) -> i32 {
    if dx < 0 {
        -((-dx >> 1) + s)
    } else {
        (dx >> 1) + s
    }
}

/// 16.16 starting cursor and step on both axes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct ScaleSlope {
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) dx: i32,
    pub(crate) dy: i32,
}

pub(crate) fn scale_slope(
    src_width: usize,
    src_height: usize,
    dst_width: usize,
    dst_height: usize,
    filtering: FilterMode,
) -> ScaleSlope {
    let (sw, sh) = (src_width as i32, src_height as i32);
    let (dw, dh) = (dst_width as i32, dst_height as i32);
    let mut slope = ScaleSlope {
        x: 0,
        y: 0,
        dx: 0,
        dy: 0,
    };
    match filtering {
        FilterMode::Box => {
            slope.dx = fixed_div(sw, dw);
            slope.dy = fixed_div(sh, dh);
        }
        FilterMode::Bilinear | FilterMode::Linear => {
            if dw <= sw {
                slope.dx = fixed_div(sw, dw);
                slope.x = center_start(slope.dx, -32768);
            } else if dw > 1 {
                slope.dx = fixed_div1(sw, dw);
            }
            if filtering == FilterMode::Linear {
                slope.dy = fixed_div(sh, dh);
                slope.y = slope.dy >> 1;
            } else if dh <= sh {
                slope.dy = fixed_div(sh, dh);
                slope.y = center_start(slope.dy, -32768);
            } else if dh > 1 {
                slope.dy = fixed_div1(sh, dh);
            }
        }
        FilterMode::None => {
            slope.dx = fixed_div(sw, dw);
            slope.dy = fixed_div(sh, dh);
            slope.x = center_start(slope.dx, 0);
            slope.y = center_start(slope.dy, 0);
        }
    }
    slope
}

/// Validated scaler geometry, `None` when the source has no rows.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct ScaleGeometry {
    pub(crate) src_width: usize,
    pub(crate) src_rows: usize,
    pub(crate) flip: bool,
    pub(crate) dst_width: usize,
    pub(crate) dst_height: usize,
}

pub(crate) fn check_scale_geometry(
    src_width: i32,
    src_height: i32,
    dst_width: i32,
    dst_height: i32,
) -> Result<Option<ScaleGeometry>, YuvError> {
    let src_width = check_width(src_width)?;
    let dst_width = check_width(dst_width)?;
    if dst_height == 0 {
        return Err(YuvError::ZeroBaseSize);
    }
    if dst_height < 0 {
        return Err(YuvError::InvalidDimensions);
    }
    let dst_height = dst_height as usize;
    let (src_rows, flip) = resolve_height(src_height);
    if src_rows == 0 {
        return Ok(None);
    }
    if src_width > MAX_SCALE_DIMENSION
        || src_rows > MAX_SCALE_DIMENSION
        || dst_width > MAX_SCALE_DIMENSION
        || dst_height > MAX_SCALE_DIMENSION
    {
        return Err(YuvError::ScaleNotSupported);
    }
    Ok(Some(ScaleGeometry {
        src_width,
        src_rows,
        flip,
        dst_width,
        dst_height,
    }))
}

/// Interpolates rows only, `dst_width` pixels starting at source column `x >> 16`.
pub(crate) fn scale_plane_vertical(
    src: &PlaneRef,
    dst: &mut PlaneMut,
    dst_width: usize,
    bpp: usize,
    slope: ScaleSlope,
    filtering: FilterMode,
    features: CpuFeatures,
) {
    let src_rows = src.rows() as i32;
    let max_y = if src_rows > 1 {
        ((src_rows - 1) << 16) - 1
    } else {
        0
    };
    let width = dst_width * bpp;
    let offset = (slope.x >> 16).max(0) as usize * bpp;
    let last = src.rows() - 1;
    let kernel = interpolate_row_kernel(features, width);
    let mut y = slope.y;
    for j in 0..dst.rows() {
        y = y.min(max_y);
        let yc = y.max(0);
        let yi = (yc >> 16) as usize;
        let yf = if filtering != FilterMode::None {
            (yc >> 8) & 255
        } else {
            0
        };
        let row0 = &src.row(yi.min(last))[offset..offset + width];
        let row1 = &src.row((yi + 1).min(last))[offset..offset + width];
        interpolate(&kernel, dst.row_mut(j), row0, row1, width, yf);
        y += slope.dy;
    }
}

/// Bilinear and linear resampling in either direction.
///
/// Rows are interpolated into a scratch row first, then the column resampler walks it.
pub(crate) fn scale_bilinear(
    src: &PlaneRef,
    dst: &mut PlaneMut,
    src_width: usize,
    dst_width: usize,
    bpp: usize,
    slope: ScaleSlope,
    filtering: FilterMode,
    cols: &RowKernel<ScaleColsHandler>,
    features: CpuFeatures,
) -> Result<(), YuvError> {
    let row_bytes = src_width * bpp;
    let vertical = filtering != FilterMode::Linear;
    if vertical {
        check_row_fits(row_bytes, MAX_STRIDE)?;
    }
    let last = src.rows() - 1;
    let max_y = (last as i32) << 16;
    let interpolator = interpolate_row_kernel(features, row_bytes);
    let mut scratch = AlignedRow::<u8>::new();
    let mut y = slope.y;
    for j in 0..dst.rows() {
        y = y.min(max_y);
        let yc = y.max(0);
        let yi = (yc >> 16) as usize;
        let yf = (yc >> 8) & 255;
        let dst_row = dst.row_mut(j);
        if !vertical || yf == 0 {
            scale_cols_run(cols, dst_row, src.row(yi), dst_width, bpp, slope.x, slope.dx);
        } else {
            let row = scratch.as_mut_slice(row_bytes);
            interpolate(
                &interpolator,
                row,
                src.row(yi),
                src.row((yi + 1).min(last)),
                row_bytes,
                yf,
            );
            scale_cols_run(
                cols,
                dst_row,
                scratch.as_slice(row_bytes),
                dst_width,
                bpp,
                slope.x,
                slope.dx,
            );
        }
        y += slope.dy;
    }
    Ok(())
}

/// Point sampling on both axes.
pub(crate) fn scale_simple(
    src: &PlaneRef,
    dst: &mut PlaneMut,
    dst_width: usize,
    bpp: usize,
    slope: ScaleSlope,
    cols: &RowKernel<ScaleColsHandler>,
) {
    let last = (src.rows() - 1) as i32;
    let mut y = slope.y;
    for j in 0..dst.rows() {
        let yi = num_traits::clamp(y >> 16, 0, last) as usize;
        scale_cols_run(cols, dst.row_mut(j), src.row(yi), dst_width, bpp, slope.x, slope.dx);
        y += slope.dy;
    }
}

fn scale_plane_down2(
    src: &PlaneRef,
    dst: &mut PlaneMut,
    dst_width: usize,
    filtering: FilterMode,
    features: CpuFeatures,
) {
    let filtered = filtering != FilterMode::None;
    let linear = filtering == FilterMode::Linear;
    let kernel = scale_row_down2_kernel(features, dst_width, linear, filtered);
    for j in 0..dst.rows() {
        let rows = match filtering {
            FilterMode::None => [src.row(j * 2 + 1); 2],
            FilterMode::Linear => [src.row(j * 2); 2],
            _ => [src.row(j * 2), src.row(j * 2 + 1)],
        };
        scale_row_down(&kernel, rows, dst.row_mut(j), dst_width, 1, (2, 1));
    }
}

fn scale_plane_down4(
    src: &PlaneRef,
    dst: &mut PlaneMut,
    dst_width: usize,
    filtering: FilterMode,
    features: CpuFeatures,
) {
    let filtered = filtering != FilterMode::None;
    let kernel = scale_row_down4_kernel(features, dst_width, filtered);
    for j in 0..dst.rows() {
        let base = j * 4;
        let rows = if filtered {
            [
                src.row(base),
                src.row(base + 1),
                src.row(base + 2),
                src.row(base + 3),
            ]
        } else {
            [src.row(base + 2); 4]
        };
        scale_row_down(&kernel, rows, dst.row_mut(j), dst_width, 1, (4, 1));
    }
}

fn scale_plane_down34(src: &PlaneRef, dst: &mut PlaneMut, dst_width: usize, filtering: FilterMode) {
    let filtered = filtering != FilterMode::None;
    let (first, second) = scale_row_down34_kernels(filtered);
    let last = src.rows() - 1;
    let row = |y: usize| src.row(y.min(last));
    // linear filtering never mixes rows
    let pair = |a: usize, b: usize| {
        if filtering == FilterMode::Linear {
            [row(a), row(a)]
        } else {
            [row(a), row(b)]
        }
    };
    let dst_height = dst.rows();
    let mut j = 0usize;
    let mut base = 0usize;
    while j + 2 < dst_height {
        scale_row_down(&first, pair(base, base + 1), dst.row_mut(j), dst_width, 1, (4, 3));
        scale_row_down(&second, pair(base + 1, base + 2), dst.row_mut(j + 1), dst_width, 1, (4, 3));
        scale_row_down(&first, pair(base + 3, base + 2), dst.row_mut(j + 2), dst_width, 1, (4, 3));
        j += 3;
        base += 4;
    }
    match dst_height - j {
        2 => {
            scale_row_down(&first, pair(base, base + 1), dst.row_mut(j), dst_width, 1, (4, 3));
            scale_row_down(&second, [row(base + 1); 2], dst.row_mut(j + 1), dst_width, 1, (4, 3));
        }
        1 => {
            scale_row_down(&first, [row(base); 2], dst.row_mut(j), dst_width, 1, (4, 3));
        }
        _ => {}
    }
}

fn scale_plane_down38(src: &PlaneRef, dst: &mut PlaneMut, dst_width: usize, filtering: FilterMode) {
    let filtered = filtering != FilterMode::None;
    let (three, two) = scale_row_down38_kernels(filtered);
    let last = src.rows() - 1;
    let row = |y: usize| src.row(y.min(last));
    let triple = |a: usize| {
        if filtering == FilterMode::Linear {
            [row(a); 3]
        } else {
            [row(a), row(a + 1), row(a + 2)]
        }
    };
    let dst_height = dst.rows();
    let mut j = 0usize;
    let mut base = 0usize;
    while j + 2 < dst_height {
        scale_row_down(&three, triple(base), dst.row_mut(j), dst_width, 1, (8, 3));
        scale_row_down(&three, triple(base + 3), dst.row_mut(j + 1), dst_width, 1, (8, 3));
        scale_row_down(&two, triple(base + 6), dst.row_mut(j + 2), dst_width, 1, (8, 3));
        j += 3;
        base += 8;
    }
    match dst_height - j {
        2 => {
            scale_row_down(&three, triple(base), dst.row_mut(j), dst_width, 1, (8, 3));
            scale_row_down(&three, [row(base + 3); 3], dst.row_mut(j + 1), dst_width, 1, (8, 3));
        }
        1 => {
            scale_row_down(&three, [row(base); 3], dst.row_mut(j), dst_width, 1, (8, 3));
        }
        _ => {}
    }
}

/// Area average for reductions of more than half vertically.
fn scale_plane_box(
    src: &PlaneRef,
    dst: &mut PlaneMut,
    src_width: usize,
    dst_width: usize,
    features: CpuFeatures,
) -> Result<(), YuvError> {
    check_row_fits(src_width, MAX_STRIDE)?;
    let slope = scale_slope(src_width, src.rows(), dst_width, dst.rows(), FilterMode::Box);
    let add_cols: fn(&mut [u8], &[u32], usize, i32, i32) = if slope.dx & 0xffff != 0 {
        scale_add_cols2
    } else if slope.dx != 0x10000 {
        scale_add_cols1
    } else {
        scale_add_cols0
    };
    let add_row = scale_add_row_kernel(features, src_width);
    let max_y = (src.rows() as i32) << 16;
    let last = src.rows() - 1;
    let mut acc = AlignedRow::<u16>::new();
    let mut sums = AlignedRow::<u32>::new();
    let mut y = slope.y;
    for j in 0..dst.rows() {
        let iy = (y >> 16) as usize;
        y = (y + slope.dy).min(max_y);
        let box_height = ((y >> 16) as usize).saturating_sub(iy).max(1);
        scale_add_rows(
            &add_row,
            &mut (iy..iy + box_height).map(|r| src.row(r.min(last))),
            acc.as_mut_slice(src_width),
            sums.as_mut_slice(src_width),
            src_width,
        );
        add_cols(
            &mut dst.row_mut(j)[..dst_width],
            sums.as_slice(src_width),
            box_height,
            slope.x,
            slope.dx,
        );
    }
    Ok(())
}

/// Row walker picked for a plane scale.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum PlaneScalePath {
    Copy,
    Vertical,
    Down34,
    Down2,
    Down38,
    Down4,
    Box,
    Bilinear,
    Simple,
}

/// A plane scale whose geometry, filter and scratch needs are already checked.
#[derive(Debug, Copy, Clone)]
struct PlaneScalePlan {
    geometry: ScaleGeometry,
    filtering: FilterMode,
    path: PlaneScalePath,
}

impl PlaneScalePlan {
    fn new(
        src_width: i32,
        src_height: i32,
        dst_width: i32,
        dst_height: i32,
        filtering: FilterMode,
    ) -> Result<Option<PlaneScalePlan>, YuvError> {
        let Some(geometry) = check_scale_geometry(src_width, src_height, dst_width, dst_height)?
        else {
            return Ok(None);
        };
        let (sw, sh) = (geometry.src_width, geometry.src_rows);
        let (dw, dh) = (geometry.dst_width, geometry.dst_height);
        let filtering = scale_filter_reduce(sw, sh, dw, dh, filtering);
        let path = if dw == sw && dh == sh {
            PlaneScalePath::Copy
        } else if dw == sw && filtering != FilterMode::Box {
            PlaneScalePath::Vertical
        } else if dw <= sw && dh <= sh && 4 * dw == 3 * sw && 4 * dh == 3 * sh {
            PlaneScalePath::Down34
        } else if dw <= sw && dh <= sh && 2 * dw == sw && 2 * dh == sh {
            PlaneScalePath::Down2
        } else if dw <= sw && dh <= sh && 8 * dw == 3 * sw && dh == (sh * 3 + 7) / 8 {
            // 3/8 rounds up for odd chroma heights
            PlaneScalePath::Down38
        } else if 4 * dw == sw
            && 4 * dh == sh
            && (filtering == FilterMode::Box || filtering == FilterMode::None)
        {
            PlaneScalePath::Down4
        } else if filtering == FilterMode::Box && dh * 2 < sh {
            PlaneScalePath::Box
        } else if filtering != FilterMode::None {
            PlaneScalePath::Bilinear
        } else {
            PlaneScalePath::Simple
        };
        match path {
            PlaneScalePath::Box => check_row_fits(sw, MAX_STRIDE)?,
            PlaneScalePath::Bilinear if filtering != FilterMode::Linear => {
                check_row_fits(sw, MAX_STRIDE)?
            }
            _ => {}
        }
        Ok(Some(PlaneScalePlan {
            geometry,
            filtering,
            path,
        }))
    }

    fn planes<'a, 'b>(
        &self,
        src: &'a [u8],
        src_stride: i32,
        dst: &'b mut [u8],
        dst_stride: i32,
    ) -> Result<(PlaneRef<'a>, PlaneMut<'b>), YuvError> {
        let g = self.geometry;
        let src = PlaneRef::new(src, src_stride, g.src_width, g.src_rows)?.flip_if(g.flip);
        let dst = PlaneMut::new(dst, dst_stride, g.dst_width, g.dst_height)?;
        Ok((src, dst))
    }

    fn run(
        &self,
        src: &PlaneRef,
        dst: &mut PlaneMut,
        features: CpuFeatures,
    ) -> Result<(), YuvError> {
        let g = self.geometry;
        let (sw, sh, dw, dh) = (g.src_width, g.src_rows, g.dst_width, g.dst_height);
        let filtering = self.filtering;
        log::debug!(
            "scale_plane {}x{} -> {}x{} {:?}: {:?}",
            sw,
            sh,
            dw,
            dh,
            filtering,
            self.path
        );
        match self.path {
            PlaneScalePath::Copy => copy_rows(src, dst, dw, features),
            PlaneScalePath::Vertical => {
                let slope = scale_slope(sw, sh, dw, dh, filtering);
                scale_plane_vertical(src, dst, dw, 1, slope, filtering, features);
            }
            PlaneScalePath::Down34 => scale_plane_down34(src, dst, dw, filtering),
            PlaneScalePath::Down2 => scale_plane_down2(src, dst, dw, filtering, features),
            PlaneScalePath::Down38 => scale_plane_down38(src, dst, dw, filtering),
            PlaneScalePath::Down4 => scale_plane_down4(src, dst, dw, filtering, features),
            PlaneScalePath::Box => scale_plane_box(src, dst, sw, dw, features)?,
            PlaneScalePath::Bilinear => {
                let slope = scale_slope(sw, sh, dw, dh, filtering);
                let filtering = if filtering == FilterMode::Box {
                    FilterMode::Bilinear
                } else {
                    filtering
                };
                let cols = scale_filter_cols_kernel(features, dw);
                scale_bilinear(src, dst, sw, dw, 1, slope, filtering, &cols, features)?;
            }
            PlaneScalePath::Simple => {
                let slope = scale_slope(sw, sh, dw, dh, FilterMode::None);
                let cols = RowKernel::reference("scale_cols", scale_cols as ScaleColsHandler);
                scale_simple(src, dst, dw, 1, slope, &cols);
            }
        }
        Ok(())
    }
}

pub(crate) fn scale_plane_impl(
    src: &[u8],
    src_stride: i32,
    src_width: i32,
    src_height: i32,
    dst: &mut [u8],
    dst_stride: i32,
    dst_width: i32,
    dst_height: i32,
    filtering: FilterMode,
    features: CpuFeatures,
) -> Result<(), YuvError> {
    let Some(plan) = PlaneScalePlan::new(src_width, src_height, dst_width, dst_height, filtering)?
    else {
        return Ok(());
    };
    let (src, mut dst) = plan.planes(src, src_stride, dst, dst_stride)?;
    plan.run(&src, &mut dst, features)
}

/// Scales a single 8 bit plane.
///
/// Negative `src_height` flips the source. A zero `src_height` is a no-op.
///
/// # Arguments
///
/// * `src`: Source plane
/// * `src_stride`: Bytes per source row, may be negative
/// * `src_width`: Source width, at most 32767
/// * `src_height`: Source height, negative to flip
/// * `dst`: Destination plane
/// * `dst_stride`: Bytes per destination row, may be negative
/// * `dst_width`: Destination width, at most 32767
/// * `dst_height`: Destination height, at most 32767
/// * `filtering`: Requested filter, see [FilterMode]
///
/// returns: Result<(), YuvError>
///
pub fn scale_plane(
    src: &[u8],
    src_stride: i32,
    src_width: i32,
    src_height: i32,
    dst: &mut [u8],
    dst_stride: i32,
    dst_width: i32,
    dst_height: i32,
    filtering: FilterMode,
) -> Result<(), YuvError> {
    scale_plane_impl(
        src,
        src_stride,
        src_width,
        src_height,
        dst,
        dst_stride,
        dst_width,
        dst_height,
        filtering,
        CpuFeatures::detect(),
    )
}

/// Scales all three planes of a 4:2:0 image, chroma planes use rounded up half sizes.
///
/// Negative height in `src` flips the source.
pub fn i420_scale(
    src: &YuvPlanarImage,
    dst: &mut YuvPlanarImageMut,
    dst_width: i32,
    dst_height: i32,
    filtering: FilterMode,
) -> Result<(), YuvError> {
    let src_width = check_width(src.width)?;
    let dst_chroma_width = check_width(dst_width)?.div_ceil(2) as i32;
    if dst_height <= 0 {
        return Err(if dst_height == 0 {
            YuvError::ZeroBaseSize
        } else {
            YuvError::InvalidDimensions
        });
    }
    let dst_chroma_height = (dst_height + 1) / 2;
    let src_chroma_width = src_width.div_ceil(2) as i32;
    let (rows, flip) = resolve_height(src.height);
    let src_chroma_rows = rows.div_ceil(2) as i32;
    let src_chroma_height = if flip {
        -src_chroma_rows
    } else {
        src_chroma_rows
    };
    let luma = PlaneScalePlan::new(src.width, src.height, dst_width, dst_height, filtering)?;
    let chroma = PlaneScalePlan::new(
        src_chroma_width,
        src_chroma_height,
        dst_chroma_width,
        dst_chroma_height,
        filtering,
    )?;
    let (Some(luma), Some(chroma)) = (luma, chroma) else {
        return Ok(());
    };
    // every plane is checked before the first row is written
    let (src_y, mut dst_y) = luma.planes(src.y_plane, src.y_stride, dst.y_plane, dst.y_stride)?;
    let (src_u, mut dst_u) =
        chroma.planes(src.u_plane, src.u_stride, dst.u_plane, dst.u_stride)?;
    let (src_v, mut dst_v) =
        chroma.planes(src.v_plane, src.v_stride, dst.v_plane, dst.v_stride)?;
    let features = CpuFeatures::detect();
    luma.run(&src_y, &mut dst_y, features)?;
    chroma.run(&src_u, &mut dst_u, features)?;
    chroma.run(&src_v, &mut dst_v, features)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_filter_reduce() {
        assert_eq!(
            scale_filter_reduce(100, 100, 60, 60, FilterMode::Box),
            FilterMode::Bilinear
        );
        assert_eq!(
            scale_filter_reduce(100, 100, 20, 20, FilterMode::Box),
            FilterMode::Box
        );
        assert_eq!(
            scale_filter_reduce(100, 1, 60, 1, FilterMode::Bilinear),
            FilterMode::Linear
        );
        assert_eq!(
            scale_filter_reduce(100, 90, 100, 30, FilterMode::Bilinear),
            FilterMode::Linear
        );
        assert_eq!(
            scale_filter_reduce(1, 90, 1, 30, FilterMode::Bilinear),
            FilterMode::None
        );
        assert_eq!(
            scale_filter_reduce(90, 10, 30, 10, FilterMode::Linear),
            FilterMode::None
        );
        assert_eq!(
            scale_filter_reduce(90, 10, 40, 10, FilterMode::Linear),
            FilterMode::Linear
        );
    }

    #[test]
    fn test_slopes() {
        let point = scale_slope(4, 4, 2, 2, FilterMode::None);
        assert_eq!(point.dx, 0x20000);
        assert_eq!(point.x, 0x10000);
        let bilinear = scale_slope(4, 4, 2, 2, FilterMode::Bilinear);
        assert_eq!(bilinear.x, 0x8000);
        let up = scale_slope(2, 2, 4, 4, FilterMode::Bilinear);
        assert_eq!(up.x, 0);
        assert_eq!(up.dx, 21845);
        let boxed = scale_slope(6, 6, 2, 2, FilterMode::Box);
        assert_eq!((boxed.x, boxed.y, boxed.dx), (0, 0, 0x30000));
    }

    #[test]
    fn test_geometry_validation() {
        let src = [0u8; 16];
        let mut dst = [0xAAu8; 4];
        assert_eq!(
            scale_plane(&src, 4, 4, 4, &mut dst, 2, 2, 0, FilterMode::None),
            Err(YuvError::ZeroBaseSize)
        );
        assert_eq!(
            scale_plane(&src, 4, -4, 4, &mut dst, 2, 2, 2, FilterMode::None),
            Err(YuvError::InvalidDimensions)
        );
        assert_eq!(
            scale_plane(&src, 40000, 40000, 1, &mut dst, 2, 2, 2, FilterMode::None),
            Err(YuvError::ScaleNotSupported)
        );
        assert!(scale_plane(&src, 4, 4, 0, &mut dst, 2, 2, 2, FilterMode::None).is_ok());
        assert_eq!(dst, [0xAA; 4]);
    }

    #[test]
    fn test_same_size_copies_and_flips() {
        let src = [1u8, 2, 3, 4, 5, 6];
        let mut dst = [0u8; 6];
        scale_plane(&src, 3, 3, -2, &mut dst, 3, 3, 2, FilterMode::Bilinear).unwrap();
        assert_eq!(dst, [4, 5, 6, 1, 2, 3]);
    }

    #[test]
    fn test_down2_box_average() {
        let src = [10u8, 20, 30, 40, 10, 20, 30, 40];
        let mut dst = [0u8; 2];
        scale_plane(&src, 4, 4, 2, &mut dst, 2, 2, 1, FilterMode::Box).unwrap();
        assert_eq!(dst, [15, 35]);
        scale_plane(&src, 4, 4, 2, &mut dst, 2, 2, 1, FilterMode::None).unwrap();
        assert_eq!(dst, [20, 40]);
    }

    #[test]
    fn test_linear_upscale_hits_both_ends() {
        let src = [0u8, 255];
        let mut dst = [0u8; 4];
        scale_plane(&src, 2, 2, 1, &mut dst, 4, 4, 1, FilterMode::Bilinear).unwrap();
        assert_eq!(dst, [0, 85, 170, 255]);
    }

    #[test]
    fn test_vertical_only() {
        let src = [10u8, 20, 30, 40];
        let mut dst = [0u8; 2];
        // a single column reduces to point sampling at the box centers
        scale_plane(&src, 1, 1, 4, &mut dst, 1, 1, 2, FilterMode::Bilinear).unwrap();
        assert_eq!(dst, [20, 40]);
    }

    #[test]
    fn test_point_sampling_rows_ignore_width_change() {
        let src = [10u8, 10, 20, 20, 30, 30, 40, 40];
        let mut same_width = [0u8; 4];
        scale_plane(&src, 2, 2, 4, &mut same_width, 2, 2, 2, FilterMode::None).unwrap();
        let mut narrower = [0u8; 2];
        scale_plane(&src, 2, 2, 4, &mut narrower, 1, 1, 2, FilterMode::None).unwrap();
        assert_eq!(narrower, [20, 40]);
        assert_eq!(same_width, [20, 20, 40, 40]);
        // odd height, vertical only versus the simple path
        let src: Vec<u8> = (0..7u8).flat_map(|v| [v * 30; 3]).collect();
        let mut same_width = [0u8; 9];
        scale_plane(&src, 3, 3, 7, &mut same_width, 3, 3, 3, FilterMode::None).unwrap();
        let mut narrower = [0u8; 6];
        scale_plane(&src, 3, 3, 7, &mut narrower, 2, 2, 3, FilterMode::None).unwrap();
        for j in 0..3 {
            assert_eq!(same_width[j * 3], narrower[j * 2], "row {}", j);
        }
    }

    #[test]
    fn test_box_tall_column_keeps_full_scale() {
        let src = vec![255u8; 600];
        let mut dst = [0u8; 1];
        scale_plane(&src, 1, 1, 600, &mut dst, 1, 1, 1, FilterMode::Box).unwrap();
        assert_eq!(dst, [255]);

        let mut src = vec![0u8; 4 * 1000];
        for row in src.chunks_exact_mut(4) {
            row.copy_from_slice(&[255, 255, 0, 100]);
        }
        for features in [CpuFeatures::detect(), CpuFeatures::empty()] {
            let mut dst = [0u8; 4 * 2];
            scale_plane_impl(&src, 4, 4, 1000, &mut dst, 4, 4, 2, FilterMode::Box, features)
                .unwrap();
            assert_eq!(dst, [255, 255, 0, 100, 255, 255, 0, 100]);
        }
    }

    #[test]
    fn test_box_reduction() {
        let mut src = vec![0u8; 16 * 8];
        for row in src.chunks_exact_mut(16) {
            row[..8].fill(10);
            row[8..].fill(200);
        }
        let mut dst = [0u8; 2];
        scale_plane(&src, 16, 16, 8, &mut dst, 2, 2, 1, FilterMode::Box).unwrap();
        assert_eq!(dst, [10, 200]);
    }

    #[test]
    fn test_three_eighths_short_source() {
        // 3 source rows still produce 2 destination rows without reading past the plane
        let src = [50u8; 8 * 3];
        let mut dst = [0u8; 3 * 2];
        scale_plane(&src, 8, 8, 3, &mut dst, 3, 3, 2, FilterMode::None).unwrap();
        assert_eq!(dst, [50; 6]);
    }

    #[test]
    fn test_every_path_matches_reference() {
        let mut rng = StdRng::seed_from_u64(101);
        let sizes = [
            (64usize, 48usize, 48usize, 36usize),
            (64, 48, 32, 24),
            (64, 48, 24, 18),
            (64, 48, 16, 12),
            (64, 48, 10, 7),
            (64, 48, 100, 70),
            (37, 29, 64, 40),
            (64, 48, 64, 20),
            (200, 10, 37, 10),
        ];
        let filters = [
            FilterMode::None,
            FilterMode::Linear,
            FilterMode::Bilinear,
            FilterMode::Box,
        ];
        for &(sw, sh, dw, dh) in sizes.iter() {
            let src: Vec<u8> = (0..sw * sh).map(|_| rng.random()).collect();
            for filtering in filters {
                let mut fast = vec![0u8; dw * dh];
                let mut reference = vec![0u8; dw * dh];
                let args = (sw as i32, sh as i32, dw as i32, dh as i32);
                scale_plane_impl(
                    &src,
                    args.0,
                    args.0,
                    args.1,
                    &mut fast,
                    args.2,
                    args.2,
                    args.3,
                    filtering,
                    CpuFeatures::detect(),
                )
                .unwrap();
                scale_plane_impl(
                    &src,
                    args.0,
                    args.0,
                    args.1,
                    &mut reference,
                    args.2,
                    args.2,
                    args.3,
                    filtering,
                    CpuFeatures::empty(),
                )
                .unwrap();
                assert_eq!(fast, reference, "{:?} {:?}", args, filtering);
            }
        }
    }

    #[test]
    fn test_flat_image_stays_flat() {
        let src = vec![90u8; 48 * 40];
        for filtering in [FilterMode::None, FilterMode::Linear, FilterMode::Bilinear] {
            for (dw, dh) in [(24usize, 20usize), (36, 30), (12, 10), (70, 50)] {
                let mut dst = vec![0u8; dw * dh];
                scale_plane(
                    &src,
                    48,
                    48,
                    40,
                    &mut dst,
                    dw as i32,
                    dw as i32,
                    dh as i32,
                    filtering,
                )
                .unwrap();
                assert!(dst.iter().all(|&v| v == 90), "{}x{} {:?}", dw, dh, filtering);
            }
        }
    }

    #[test]
    fn test_i420_scale_halves_chroma() {
        let y = vec![16u8; 8 * 6];
        let u = vec![100u8; 4 * 3];
        let v = vec![150u8; 4 * 3];
        let image = YuvPlanarImage {
            y_plane: &y,
            y_stride: 8,
            u_plane: &u,
            u_stride: 4,
            v_plane: &v,
            v_stride: 4,
            width: 8,
            height: 6,
        };
        let mut dy = vec![0u8; 4 * 3];
        let mut du = vec![0u8; 2 * 2];
        let mut dv = vec![0u8; 2 * 2];
        let mut dst = YuvPlanarImageMut {
            y_plane: &mut dy,
            y_stride: 4,
            u_plane: &mut du,
            u_stride: 2,
            v_plane: &mut dv,
            v_stride: 2,
        };
        i420_scale(&image, &mut dst, 4, 3, FilterMode::Bilinear).unwrap();
        assert!(dy.iter().all(|&v| v == 16));
        assert!(du.iter().all(|&v| v == 100));
        assert!(dv.iter().all(|&v| v == 150));
    }

    #[test]
    fn test_i420_scale_rejects_before_writing() {
        let y = vec![16u8; 8 * 8];
        let u = vec![100u8; 1];
        let v = vec![150u8; 4 * 4];
        let image = YuvPlanarImage {
            y_plane: &y,
            y_stride: 8,
            u_plane: &u,
            u_stride: 4,
            v_plane: &v,
            v_stride: 4,
            width: 8,
            height: 8,
        };
        let mut dy = vec![200u8; 4 * 4];
        let mut du = vec![201u8; 2 * 2];
        let mut dv = vec![202u8; 2 * 2];
        let mut dst = YuvPlanarImageMut {
            y_plane: &mut dy,
            y_stride: 4,
            u_plane: &mut du,
            u_stride: 2,
            v_plane: &mut dv,
            v_stride: 2,
        };
        for filtering in [FilterMode::None, FilterMode::Bilinear, FilterMode::Box] {
            assert!(i420_scale(&image, &mut dst, 4, 4, filtering).is_err());
        }
        assert!(dy.iter().all(|&v| v == 200));
        assert!(du.iter().all(|&v| v == 201));
        assert!(dv.iter().all(|&v| v == 202));

        // a short chroma destination is caught before the luma plane is written too
        let u = vec![100u8; 4 * 4];
        let image = YuvPlanarImage {
            u_plane: &u,
            ..image
        };
        let mut dy = vec![200u8; 4 * 4];
        let mut du = vec![201u8; 2 * 2];
        let mut dv = vec![202u8; 3];
        let mut dst = YuvPlanarImageMut {
            y_plane: &mut dy,
            y_stride: 4,
            u_plane: &mut du,
            u_stride: 2,
            v_plane: &mut dv,
            v_stride: 2,
        };
        assert!(i420_scale(&image, &mut dst, 4, 4, FilterMode::Bilinear).is_err());
        assert!(dy.iter().all(|&v| v == 200));
        assert!(du.iter().all(|&v| v == 201));
    }
}
