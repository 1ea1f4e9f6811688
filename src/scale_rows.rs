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
use crate::numerics::blend_fraction;
use num_traits::AsPrimitive;

/// Reduces `N` source rows into `dst.len()` output bytes.
pub(crate) type ScaleRowDownHandler<const N: usize> = unsafe fn(src: [&[u8]; N], dst: &mut [u8]);

/// Adds one source row into the 16-bit accumulator with saturation.
pub(crate) type ScaleAddRowHandler = unsafe fn(src: &[u8], dst: &mut [u16]);

/// `dst = (src0 * (256 - f) + src1 * f + 128) >> 8` over `dst.len()` bytes.
pub(crate) type InterpolateRowHandler =
    unsafe fn(dst: &mut [u8], src0: &[u8], src1: &[u8], fraction: i32);

/// Column resampler walking a 16.16 cursor, `dst.len()` bytes are written.
pub(crate) type ScaleColsHandler = unsafe fn(dst: &mut [u8], src: &[u8], x: i32, dx: i32);

#[inline(always)]
fn sum_box<T: AsPrimitive<i32>>(samples: &[T]) -> i32 {
    samples.iter().map(|&v| v.as_()).sum()
}

pub(crate) fn scale_row_down2(src: [&[u8]; 2], dst: &mut [u8]) {
    for (d, s) in dst.iter_mut().zip(src[0].chunks_exact(2)) {
        *d = s[1];
    }
}

pub(crate) fn scale_row_down2_linear(src: [&[u8]; 2], dst: &mut [u8]) {
    for (d, s) in dst.iter_mut().zip(src[0].chunks_exact(2)) {
        *d = ((s[0] as u16 + s[1] as u16 + 1) >> 1) as u8;
    }
}

pub(crate) fn scale_row_down2_box(src: [&[u8]; 2], dst: &mut [u8]) {
    for ((d, s), t) in dst
        .iter_mut()
        .zip(src[0].chunks_exact(2))
        .zip(src[1].chunks_exact(2))
    {
        *d = ((sum_box(s) + sum_box(t) + 2) >> 2) as u8;
    }
}

/// Samples column 2 of every 4, the caller picks source row 2.
pub(crate) fn scale_row_down4(src: [&[u8]; 4], dst: &mut [u8]) {
    for (d, s) in dst.iter_mut().zip(src[0].chunks_exact(4)) {
        *d = s[2];
    }
}

pub(crate) fn scale_row_down4_box(src: [&[u8]; 4], dst: &mut [u8]) {
    for (x, d) in dst.iter_mut().enumerate() {
        let sum: i32 = src.iter().map(|row| sum_box(&row[x * 4..x * 4 + 4])).sum();
        *d = ((sum + 8) >> 4) as u8;
    }
}

pub(crate) fn scale_row_down34(src: [&[u8]; 2], dst: &mut [u8]) {
    for (d, s) in dst.chunks_exact_mut(3).zip(src[0].chunks_exact(4)) {
        d[0] = s[0];
        d[1] = s[1];
        d[2] = s[3];
    }
}

#[inline(always)]
fn down34_taps(s: &[u8]) -> [i32; 3] {
    let s0 = s[0] as i32;
    let s1 = s[1] as i32;
    let s2 = s[2] as i32;
    let s3 = s[3] as i32;
    [
        (s0 * 3 + s1 + 2) >> 2,
        (s1 + s2 + 1) >> 1,
        (s2 + s3 * 3 + 2) >> 2,
    ]
}

/// Output row weighted 3:1 towards `src[0]`.
pub(crate) fn scale_row_down34_0_box(src: [&[u8]; 2], dst: &mut [u8]) {
    for ((d, s), t) in dst
        .chunks_exact_mut(3)
        .zip(src[0].chunks_exact(4))
        .zip(src[1].chunks_exact(4))
    {
        let a = down34_taps(s);
        let b = down34_taps(t);
        for i in 0..3 {
            d[i] = ((a[i] * 3 + b[i] + 2) >> 2) as u8;
        }
    }
}

/// Output row halfway between both rows.
pub(crate) fn scale_row_down34_1_box(src: [&[u8]; 2], dst: &mut [u8]) {
    for ((d, s), t) in dst
        .chunks_exact_mut(3)
        .zip(src[0].chunks_exact(4))
        .zip(src[1].chunks_exact(4))
    {
        let a = down34_taps(s);
        let b = down34_taps(t);
        for i in 0..3 {
            d[i] = ((a[i] + b[i] + 1) >> 1) as u8;
        }
    }
}

pub(crate) fn scale_row_down38(src: [&[u8]; 3], dst: &mut [u8]) {
    for (d, s) in dst.chunks_exact_mut(3).zip(src[0].chunks_exact(8)) {
        d[0] = s[0];
        d[1] = s[3];
        d[2] = s[6];
    }
}

pub(crate) fn scale_row_down38_3_box(src: [&[u8]; 3], dst: &mut [u8]) {
    for (x, d) in dst.chunks_exact_mut(3).enumerate() {
        let o = x * 8;
        let column = |from: usize, to: usize| -> i32 {
            src.iter().map(|row| sum_box(&row[o + from..o + to])).sum()
        };
        d[0] = ((column(0, 3) * (65536 / 9)) >> 16) as u8;
        d[1] = ((column(3, 6) * (65536 / 9)) >> 16) as u8;
        d[2] = ((column(6, 8) * (65536 / 6)) >> 16) as u8;
    }
}

pub(crate) fn scale_row_down38_2_box(src: [&[u8]; 3], dst: &mut [u8]) {
    for (x, d) in dst.chunks_exact_mut(3).enumerate() {
        let o = x * 8;
        let column = |from: usize, to: usize| -> i32 {
            src[..2]
                .iter()
                .map(|row| sum_box(&row[o + from..o + to]))
                .sum()
        };
        d[0] = ((column(0, 3) * (65536 / 6)) >> 16) as u8;
        d[1] = ((column(3, 6) * (65536 / 6)) >> 16) as u8;
        d[2] = ((column(6, 8) * (65536 / 4)) >> 16) as u8;
    }
}

pub(crate) fn scale_add_row(src: &[u8], dst: &mut [u16]) {
    for (d, &s) in dst.iter_mut().zip(src.iter()) {
        *d = d.saturating_add(s as u16);
    }
}

pub(crate) fn interpolate_row(dst: &mut [u8], src0: &[u8], src1: &[u8], fraction: i32) {
    if fraction == 0 {
        dst.copy_from_slice(&src0[..dst.len()]);
        return;
    }
    let f1 = fraction as u32;
    let f0 = 256 - f1;
    for ((d, &a), &b) in dst.iter_mut().zip(src0.iter()).zip(src1.iter()) {
        *d = ((a as u32 * f0 + b as u32 * f1 + 128) >> 8) as u8;
    }
}

/// Source pixel pair around the cursor, clamped to the row.
#[inline(always)]
pub(crate) fn filter_taps(x: i32, last: i32) -> (usize, usize) {
    let xi = x >> 16;
    if xi < 0 {
        (0, 0)
    } else if xi >= last {
        (last as usize, last as usize)
    } else {
        (xi as usize, xi as usize + 1)
    }
}

pub(crate) fn scale_filter_cols(dst: &mut [u8], src: &[u8], x: i32, dx: i32) {
    let last = src.len() as i32 - 1;
    let mut x = x;
    for d in dst.iter_mut() {
        let (a, b) = filter_taps(x, last);
        *d = blend_fraction(src[a], src[b], x & 0xffff);
        x = x.wrapping_add(dx);
    }
}

pub(crate) fn scale_cols(dst: &mut [u8], src: &[u8], x: i32, dx: i32) {
    let last = src.len() as i32 - 1;
    let mut x = x;
    for d in dst.iter_mut() {
        *d = src[num_traits::clamp(x >> 16, 0, last) as usize];
        x = x.wrapping_add(dx);
    }
}

pub(crate) fn argb_scale_filter_cols(dst: &mut [u8], src: &[u8], x: i32, dx: i32) {
    let last = (src.len() / 4) as i32 - 1;
    let mut x = x;
    for d in dst.chunks_exact_mut(4) {
        let (a, b) = filter_taps(x, last);
        let f = x & 0xffff;
        for c in 0..4 {
            d[c] = blend_fraction(src[a * 4 + c], src[b * 4 + c], f);
        }
        x = x.wrapping_add(dx);
    }
}

pub(crate) fn argb_scale_cols(dst: &mut [u8], src: &[u8], x: i32, dx: i32) {
    let last = (src.len() / 4) as i32 - 1;
    let mut x = x;
    for d in dst.chunks_exact_mut(4) {
        let xi = num_traits::clamp(x >> 16, 0, last) as usize;
        d.copy_from_slice(&src[xi * 4..xi * 4 + 4]);
        x = x.wrapping_add(dx);
    }
}

/// Odd pixel of every pair.
pub(crate) fn argb_scale_row_down2(src: [&[u8]; 2], dst: &mut [u8]) {
    for (d, s) in dst.chunks_exact_mut(4).zip(src[0].chunks_exact(8)) {
        d.copy_from_slice(&s[4..8]);
    }
}

pub(crate) fn argb_scale_row_down2_linear(src: [&[u8]; 2], dst: &mut [u8]) {
    for (d, s) in dst.chunks_exact_mut(4).zip(src[0].chunks_exact(8)) {
        for c in 0..4 {
            d[c] = ((s[c] as u16 + s[c + 4] as u16 + 1) >> 1) as u8;
        }
    }
}

pub(crate) fn argb_scale_row_down2_box(src: [&[u8]; 2], dst: &mut [u8]) {
    for ((d, s), t) in dst
        .chunks_exact_mut(4)
        .zip(src[0].chunks_exact(8))
        .zip(src[1].chunks_exact(8))
    {
        for c in 0..4 {
            let sum = s[c] as u16 + s[c + 4] as u16 + t[c] as u16 + t[c + 4] as u16;
            d[c] = ((sum + 2) >> 2) as u8;
        }
    }
}

/// One pixel every `step` pixels, or the 2x2 box average there.
pub(crate) fn argb_scale_row_down_even(src: [&[u8]; 2], dst: &mut [u8], step: usize, filter: bool) {
    for (x, d) in dst.chunks_exact_mut(4).enumerate() {
        let o = x * step * 4;
        if filter {
            for c in 0..4 {
                let sum = src[0][o + c] as u16
                    + src[0][o + 4 + c] as u16
                    + src[1][o + c] as u16
                    + src[1][o + 4 + c] as u16;
                d[c] = ((sum + 2) >> 2) as u8;
            }
        } else {
            d.copy_from_slice(&src[0][o..o + 4]);
        }
    }
}

/// Rounded mean of a `box_width` by `box_height` area whose column sums are `sums`.
#[inline]
fn box_average(sums: &[u32], box_height: usize) -> u8 {
    let area = (sums.len() * box_height).max(1) as u64;
    let total: u64 = sums.iter().map(|&v| v as u64).sum();
    ((total + area / 2) / area) as u8
}

/// Box column pass when the box width varies between `dx >> 16` and one more.
pub(crate) fn scale_add_cols2(dst: &mut [u8], src: &[u32], box_height: usize, x: i32, dx: i32) {
    let mut x = x;
    for d in dst.iter_mut() {
        let ix = (x >> 16) as usize;
        x += dx;
        let box_width = (((x >> 16) as usize).saturating_sub(ix)).max(1);
        let end = (ix + box_width).min(src.len());
        *d = box_average(&src[ix.min(end)..end], box_height);
    }
}

/// Box column pass with a fixed integer box width.
pub(crate) fn scale_add_cols1(dst: &mut [u8], src: &[u32], box_height: usize, x: i32, dx: i32) {
    let box_width = ((dx >> 16) as usize).max(1);
    let mut ix = (x >> 16) as usize;
    for d in dst.iter_mut() {
        *d = box_average(&src[ix..ix + box_width], box_height);
        ix += box_width;
    }
}

/// Box column pass without horizontal reduction.
pub(crate) fn scale_add_cols0(dst: &mut [u8], src: &[u32], box_height: usize, x: i32, _: i32) {
    let box_height = box_height.max(1) as u32;
    let src = &src[(x >> 16) as usize..];
    for (d, &s) in dst.iter_mut().zip(src.iter()) {
        *d = ((s + box_height / 2) / box_height) as u8;
    }
}

/// Down2 row kernel for `point`, `linear` or `box` reduction.
pub(crate) fn scale_row_down2_kernel(
    features: CpuFeatures,
    dst_width: usize,
    linear: bool,
    filtered: bool,
) -> RowKernel<ScaleRowDownHandler<2>> {
    let (name, reference): (&'static str, ScaleRowDownHandler<2>) = match (filtered, linear) {
        (false, _) => ("scale_row_down2", scale_row_down2),
        (true, true) => ("scale_row_down2_linear", scale_row_down2_linear),
        (true, false) => ("scale_row_down2_box", scale_row_down2_box),
    };
    let candidates: &[KernelDescriptor<ScaleRowDownHandler<2>>] = match (filtered, linear) {
        (false, _) => &[
            #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "sse"))]
            KernelDescriptor {
                name: "scale_row_down2_sse2",
                feature: CpuFeature::Sse2,
                width: WidthRule::AtLeast(16),
                alignment: 1,
                kernel: crate::sse::scale_row_down2_sse2,
            },
            #[cfg(all(target_arch = "aarch64", feature = "neon"))]
            KernelDescriptor {
                name: "scale_row_down2_neon",
                feature: CpuFeature::Neon,
                width: WidthRule::AtLeast(16),
                alignment: 1,
                kernel: crate::neon::scale_row_down2_neon,
            },
        ],
        (true, true) => &[
            #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "sse"))]
            KernelDescriptor {
                name: "scale_row_down2_linear_ssse3",
                feature: CpuFeature::Ssse3,
                width: WidthRule::AtLeast(16),
                alignment: 1,
                kernel: crate::sse::scale_row_down2_linear_ssse3,
            },
            #[cfg(all(target_arch = "aarch64", feature = "neon"))]
            KernelDescriptor {
                name: "scale_row_down2_linear_neon",
                feature: CpuFeature::Neon,
                width: WidthRule::AtLeast(16),
                alignment: 1,
                kernel: crate::neon::scale_row_down2_linear_neon,
            },
        ],
        (true, false) => &[
            #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "sse"))]
            KernelDescriptor {
                name: "scale_row_down2_box_ssse3",
                feature: CpuFeature::Ssse3,
                width: WidthRule::AtLeast(16),
                alignment: 1,
                kernel: crate::sse::scale_row_down2_box_ssse3,
            },
            #[cfg(all(target_arch = "aarch64", feature = "neon"))]
            KernelDescriptor {
                name: "scale_row_down2_box_neon",
                feature: CpuFeature::Neon,
                width: WidthRule::AtLeast(16),
                alignment: 1,
                kernel: crate::neon::scale_row_down2_box_neon,
            },
        ],
    };
    select_kernel(name, candidates, reference, features, dst_width, 1)
}

pub(crate) fn scale_row_down4_kernel(
    features: CpuFeatures,
    dst_width: usize,
    filtered: bool,
) -> RowKernel<ScaleRowDownHandler<4>> {
    if filtered {
        let candidates: &[KernelDescriptor<ScaleRowDownHandler<4>>] = &[
            #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "sse"))]
            KernelDescriptor {
                name: "scale_row_down4_box_ssse3",
                feature: CpuFeature::Ssse3,
                width: WidthRule::AtLeast(8),
                alignment: 1,
                kernel: crate::sse::scale_row_down4_box_ssse3,
            },
            #[cfg(all(target_arch = "aarch64", feature = "neon"))]
            KernelDescriptor {
                name: "scale_row_down4_box_neon",
                feature: CpuFeature::Neon,
                width: WidthRule::AtLeast(8),
                alignment: 1,
                kernel: crate::neon::scale_row_down4_box_neon,
            },
        ];
        return select_kernel(
            "scale_row_down4_box",
            candidates,
            scale_row_down4_box as ScaleRowDownHandler<4>,
            features,
            dst_width,
            1,
        );
    }
    let candidates: &[KernelDescriptor<ScaleRowDownHandler<4>>] = &[
        #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "sse"))]
        KernelDescriptor {
            name: "scale_row_down4_sse2",
            feature: CpuFeature::Sse2,
            width: WidthRule::AtLeast(8),
            alignment: 1,
            kernel: crate::sse::scale_row_down4_sse2,
        },
        #[cfg(all(target_arch = "aarch64", feature = "neon"))]
        KernelDescriptor {
            name: "scale_row_down4_neon",
            feature: CpuFeature::Neon,
            width: WidthRule::AtLeast(8),
            alignment: 1,
            kernel: crate::neon::scale_row_down4_neon,
        },
    ];
    select_kernel(
        "scale_row_down4",
        candidates,
        scale_row_down4 as ScaleRowDownHandler<4>,
        features,
        dst_width,
        1,
    )
}

/// `(first, second)` row kernels of the 3/4 reducer.
pub(crate) fn scale_row_down34_kernels(
    filtered: bool,
) -> (RowKernel<ScaleRowDownHandler<2>>, RowKernel<ScaleRowDownHandler<2>>) {
    if !filtered {
        let kernel = RowKernel::reference(
            "scale_row_down34",
            scale_row_down34 as ScaleRowDownHandler<2>,
        );
        return (kernel, kernel);
    }
    (
        RowKernel::reference(
            "scale_row_down34_0_box",
            scale_row_down34_0_box as ScaleRowDownHandler<2>,
        ),
        RowKernel::reference(
            "scale_row_down34_1_box",
            scale_row_down34_1_box as ScaleRowDownHandler<2>,
        ),
    )
}

/// `(three_rows, two_rows)` row kernels of the 3/8 reducer.
pub(crate) fn scale_row_down38_kernels(
    filtered: bool,
) -> (RowKernel<ScaleRowDownHandler<3>>, RowKernel<ScaleRowDownHandler<3>>) {
    if !filtered {
        let kernel = RowKernel::reference(
            "scale_row_down38",
            scale_row_down38 as ScaleRowDownHandler<3>,
        );
        return (kernel, kernel);
    }
    (
        RowKernel::reference(
            "scale_row_down38_3_box",
            scale_row_down38_3_box as ScaleRowDownHandler<3>,
        ),
        RowKernel::reference(
            "scale_row_down38_2_box",
            scale_row_down38_2_box as ScaleRowDownHandler<3>,
        ),
    )
}

pub(crate) fn scale_add_row_kernel(
    features: CpuFeatures,
    width: usize,
) -> RowKernel<ScaleAddRowHandler> {
    let candidates: &[KernelDescriptor<ScaleAddRowHandler>] = &[
        #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "avx"))]
        KernelDescriptor {
            name: "scale_add_row_avx2",
            feature: CpuFeature::Avx2,
            width: WidthRule::AtLeast(32),
            alignment: 1,
            kernel: crate::avx2::scale_add_row_avx2,
        },
        #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "sse"))]
        KernelDescriptor {
            name: "scale_add_row_sse2",
            feature: CpuFeature::Sse2,
            width: WidthRule::AtLeast(16),
            alignment: 1,
            kernel: crate::sse::scale_add_row_sse2,
        },
        #[cfg(all(target_arch = "aarch64", feature = "neon"))]
        KernelDescriptor {
            name: "scale_add_row_neon",
            feature: CpuFeature::Neon,
            width: WidthRule::AtLeast(16),
            alignment: 1,
            kernel: crate::neon::scale_add_row_neon,
        },
    ];
    select_kernel(
        "scale_add_row",
        candidates,
        scale_add_row as ScaleAddRowHandler,
        features,
        width,
        1,
    )
}

pub(crate) fn interpolate_row_kernel(
    features: CpuFeatures,
    width: usize,
) -> RowKernel<InterpolateRowHandler> {
    let candidates: &[KernelDescriptor<InterpolateRowHandler>] = &[
        #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "avx"))]
        KernelDescriptor {
            name: "interpolate_row_avx2",
            feature: CpuFeature::Avx2,
            width: WidthRule::AtLeast(32),
            alignment: 1,
            kernel: crate::avx2::interpolate_row_avx2,
        },
        #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "sse"))]
        KernelDescriptor {
            name: "interpolate_row_sse2",
            feature: CpuFeature::Sse2,
            width: WidthRule::AtLeast(16),
            alignment: 1,
            kernel: crate::sse::interpolate_row_sse2,
        },
        #[cfg(all(target_arch = "aarch64", feature = "neon"))]
        KernelDescriptor {
            name: "interpolate_row_neon",
            feature: CpuFeature::Neon,
            width: WidthRule::AtLeast(16),
            alignment: 1,
            kernel: crate::neon::interpolate_row_neon,
        },
    ];
    select_kernel(
        "interpolate_row",
        candidates,
        interpolate_row as InterpolateRowHandler,
        features,
        width,
        1,
    )
}

pub(crate) fn scale_filter_cols_kernel(
    features: CpuFeatures,
    dst_width: usize,
) -> RowKernel<ScaleColsHandler> {
    let candidates: &[KernelDescriptor<ScaleColsHandler>] = &[
        #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "sse"))]
        KernelDescriptor {
            name: "scale_filter_cols_sse4_1",
            feature: CpuFeature::Sse41,
            width: WidthRule::AtLeast(4),
            alignment: 1,
            kernel: crate::sse::scale_filter_cols_sse4_1,
        },
    ];
    select_kernel(
        "scale_filter_cols",
        candidates,
        scale_filter_cols as ScaleColsHandler,
        features,
        dst_width,
        1,
    )
}

pub(crate) fn argb_scale_row_down2_kernel(
    features: CpuFeatures,
    dst_width: usize,
    linear: bool,
    filtered: bool,
) -> RowKernel<ScaleRowDownHandler<2>> {
    let (name, reference): (&'static str, ScaleRowDownHandler<2>) = match (filtered, linear) {
        (false, _) => ("argb_scale_row_down2", argb_scale_row_down2),
        (true, true) => ("argb_scale_row_down2_linear", argb_scale_row_down2_linear),
        (true, false) => ("argb_scale_row_down2_box", argb_scale_row_down2_box),
    };
    let candidates: &[KernelDescriptor<ScaleRowDownHandler<2>>] = match (filtered, linear) {
        (false, _) => &[
            #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "sse"))]
            KernelDescriptor {
                name: "argb_scale_row_down2_sse2",
                feature: CpuFeature::Sse2,
                width: WidthRule::AtLeast(4),
                alignment: 1,
                kernel: crate::sse::argb_scale_row_down2_sse2,
            },
            #[cfg(all(target_arch = "aarch64", feature = "neon"))]
            KernelDescriptor {
                name: "argb_scale_row_down2_neon",
                feature: CpuFeature::Neon,
                width: WidthRule::AtLeast(8),
                alignment: 1,
                kernel: crate::neon::argb_scale_row_down2_neon,
            },
        ],
        (true, true) => &[
            #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "sse"))]
            KernelDescriptor {
                name: "argb_scale_row_down2_linear_sse2",
                feature: CpuFeature::Sse2,
                width: WidthRule::AtLeast(4),
                alignment: 1,
                kernel: crate::sse::argb_scale_row_down2_linear_sse2,
            },
            #[cfg(all(target_arch = "aarch64", feature = "neon"))]
            KernelDescriptor {
                name: "argb_scale_row_down2_linear_neon",
                feature: CpuFeature::Neon,
                width: WidthRule::AtLeast(8),
                alignment: 1,
                kernel: crate::neon::argb_scale_row_down2_linear_neon,
            },
        ],
        (true, false) => &[
            #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "sse"))]
            KernelDescriptor {
                name: "argb_scale_row_down2_box_sse2",
                feature: CpuFeature::Sse2,
                width: WidthRule::AtLeast(4),
                alignment: 1,
                kernel: crate::sse::argb_scale_row_down2_box_sse2,
            },
            #[cfg(all(target_arch = "aarch64", feature = "neon"))]
            KernelDescriptor {
                name: "argb_scale_row_down2_box_neon",
                feature: CpuFeature::Neon,
                width: WidthRule::AtLeast(8),
                alignment: 1,
                kernel: crate::neon::argb_scale_row_down2_box_neon,
            },
        ],
    };
    select_kernel(name, candidates, reference, features, dst_width, 1)
}

/// Runs a row reducer over `dst_width` output pixels of `bpp` bytes.
///
/// The remainder resumes the source at `start * num / den` pixels, `num / den` being the
/// source to destination ratio.
#[inline]
pub(crate) fn scale_row_down<const N: usize>(
    kernel: &RowKernel<ScaleRowDownHandler<N>>,
    src: [&[u8]; N],
    dst: &mut [u8],
    dst_width: usize,
    bpp: usize,
    ratio: (usize, usize),
) {
    let (num, den) = ratio;
    kernel.split(dst_width, |f, start, count| unsafe {
        let offset = start * num / den * bpp;
        f(
            src.map(|row| &row[offset..]),
            &mut dst[start * bpp..(start + count) * bpp],
        )
    });
}

/// Resamples `dst_width` pixels, the remainder continues the cursor at `x + aligned * dx`.
#[inline]
pub(crate) fn scale_cols_run(
    kernel: &RowKernel<ScaleColsHandler>,
    dst: &mut [u8],
    src: &[u8],
    dst_width: usize,
    bpp: usize,
    x: i32,
    dx: i32,
) {
    kernel.split(dst_width, |f, start, count| unsafe {
        let x = (x as i64 + start as i64 * dx as i64) as i32;
        f(&mut dst[start * bpp..(start + count) * bpp], src, x, dx)
    });
}

#[inline]
pub(crate) fn interpolate(
    kernel: &RowKernel<InterpolateRowHandler>,
    dst: &mut [u8],
    src0: &[u8],
    src1: &[u8],
    width: usize,
    fraction: i32,
) {
    kernel.split(width, |f, start, count| unsafe {
        f(
            &mut dst[start..start + count],
            &src0[start..start + count],
            &src1[start..start + count],
            fraction,
        )
    });
}

/// Rows a 16 bit accumulator takes before an all 255 column could saturate it.
pub(crate) const ADD_ROWS_CHUNK: usize = 257;

/// Column sums of `rows` into `dst`.
///
/// Rows are added into `acc` in chunks of [ADD_ROWS_CHUNK], each chunk is folded into `dst`.
pub(crate) fn scale_add_rows(
    kernel: &RowKernel<ScaleAddRowHandler>,
    rows: &mut dyn Iterator<Item = &[u8]>,
    acc: &mut [u16],
    dst: &mut [u32],
    width: usize,
) {
    let acc = &mut acc[..width];
    let dst = &mut dst[..width];
    dst.fill(0);
    loop {
        acc.fill(0);
        let mut added = 0usize;
        for src in (&mut *rows).take(ADD_ROWS_CHUNK) {
            kernel.split(width, |f, start, count| unsafe {
                f(&src[start..start + count], &mut acc[start..start + count])
            });
            added += 1;
        }
        for (d, &s) in dst.iter_mut().zip(acc.iter()) {
            *d += s as u32;
        }
        if added < ADD_ROWS_CHUNK {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_row(rng: &mut StdRng, len: usize) -> Vec<u8> {
        (0..len).map(|_| rng.random()).collect()
    }

    #[test]
    fn test_filter_cols_unit_step_is_copy() {
        let src: Vec<u8> = (0..40u8).map(|v| v * 3).collect();
        for features in [CpuFeatures::detect(), CpuFeatures::empty()] {
            let kernel = scale_filter_cols_kernel(features, 37);
            let mut dst = vec![0u8; 37];
            scale_cols_run(&kernel, &mut dst, &src, 37, 1, 0, 0x10000);
            assert_eq!(&dst[..], &src[..37]);
            scale_cols_run(&kernel, &mut dst, &src, 37, 1, 3 << 16, 0x10000);
            assert_eq!(&dst[..], &src[3..40]);
        }
        let argb: Vec<u8> = (0..64u8).collect();
        let mut dst = vec![0u8; 60];
        argb_scale_filter_cols(&mut dst, &argb, 1 << 16, 0x10000);
        assert_eq!(&dst[..], &argb[4..64]);
    }

    #[test]
    fn test_filter_cols_resumes_cursor() {
        let mut rng = StdRng::seed_from_u64(71);
        let src = random_row(&mut rng, 300);
        for dst_width in 1..120usize {
            let dx = ((300i64 << 16) / dst_width as i64) as i32;
            let x = (dx >> 1) - 32768;
            let mut reference = vec![0u8; dst_width];
            scale_filter_cols(&mut reference, &src, x, dx);
            let kernel = scale_filter_cols_kernel(CpuFeatures::detect(), dst_width);
            let mut fast = vec![0u8; dst_width];
            scale_cols_run(&kernel, &mut fast, &src, dst_width, 1, x, dx);
            assert_eq!(fast, reference, "width {}", dst_width);
        }
    }

    #[test]
    fn test_filter_cols_midpoint() {
        let src = [0u8, 100, 200];
        let mut dst = [0u8; 2];
        scale_filter_cols(&mut dst, &src, 0x8000, 0x10000);
        assert_eq!(dst, [50, 150]);
        // last column holds instead of reading past the row
        let mut tail = [0u8; 1];
        scale_filter_cols(&mut tail, &src, (2 << 16) + 0x8000, 0x10000);
        assert_eq!(tail, [200]);
    }

    #[test]
    fn test_down2_kernels_match_reference() {
        let mut rng = StdRng::seed_from_u64(73);
        for dst_width in 1..80usize {
            let r0 = random_row(&mut rng, dst_width * 2);
            let r1 = random_row(&mut rng, dst_width * 2);
            for (linear, filtered) in [(false, false), (true, true), (false, true)] {
                let mut out = Vec::new();
                for features in [CpuFeatures::detect(), CpuFeatures::empty()] {
                    let kernel = scale_row_down2_kernel(features, dst_width, linear, filtered);
                    let mut dst = vec![0u8; dst_width];
                    scale_row_down(&kernel, [&r0, &r1], &mut dst, dst_width, 1, (2, 1));
                    out.push(dst);
                }
                assert_eq!(out[0], out[1], "width {} {} {}", dst_width, linear, filtered);
            }
        }
    }

    #[test]
    fn test_down2_box_rounds() {
        let r0 = [1u8, 2, 255, 255];
        let r1 = [2u8, 2, 255, 254];
        let mut dst = [0u8; 2];
        scale_row_down2_box([&r0, &r1], &mut dst);
        assert_eq!(dst, [2, 255]);
    }

    #[test]
    fn test_down4_kernels_match_reference() {
        let mut rng = StdRng::seed_from_u64(79);
        for dst_width in 1..50usize {
            let rows: Vec<Vec<u8>> = (0..4).map(|_| random_row(&mut rng, dst_width * 4)).collect();
            let src = [&rows[0][..], &rows[1][..], &rows[2][..], &rows[3][..]];
            for filtered in [false, true] {
                let mut out = Vec::new();
                for features in [CpuFeatures::detect(), CpuFeatures::empty()] {
                    let kernel = scale_row_down4_kernel(features, dst_width, filtered);
                    let mut dst = vec![0u8; dst_width];
                    scale_row_down(&kernel, src, &mut dst, dst_width, 1, (4, 1));
                    out.push(dst);
                }
                assert_eq!(out[0], out[1], "width {} {}", dst_width, filtered);
            }
        }
    }

    #[test]
    fn test_fractional_reducers_resume_source() {
        let mut rng = StdRng::seed_from_u64(83);
        for groups in 2..20usize {
            let dst_width = groups * 3;
            let r34: Vec<Vec<u8>> = (0..2).map(|_| random_row(&mut rng, groups * 4)).collect();
            let r38: Vec<Vec<u8>> = (0..3).map(|_| random_row(&mut rng, groups * 8)).collect();
            for filtered in [false, true] {
                let (first, second) = scale_row_down34_kernels(filtered);
                for kernel in [first, second] {
                    let mut whole = vec![0u8; dst_width];
                    scale_row_down(&kernel, [&r34[0], &r34[1]], &mut whole, dst_width, 1, (4, 3));
                    // the second group reads from source column 4
                    let mut tail = vec![0u8; dst_width - 3];
                    let src = [&r34[0][4..], &r34[1][4..]];
                    scale_row_down(&kernel, src, &mut tail, dst_width - 3, 1, (4, 3));
                    assert_eq!(&whole[3..], &tail[..], "3/4 width {}", dst_width);
                }
                let (three, two) = scale_row_down38_kernels(filtered);
                for kernel in [three, two] {
                    let mut whole = vec![0u8; dst_width];
                    let src = [&r38[0][..], &r38[1][..], &r38[2][..]];
                    scale_row_down(&kernel, src, &mut whole, dst_width, 1, (8, 3));
                    let mut tail = vec![0u8; dst_width - 3];
                    let src = [&r38[0][8..], &r38[1][8..], &r38[2][8..]];
                    scale_row_down(&kernel, src, &mut tail, dst_width - 3, 1, (8, 3));
                    assert_eq!(&whole[3..], &tail[..], "3/8 width {}", dst_width);
                }
            }
        }
    }

    #[test]
    fn test_down34_box_weights() {
        let flat = [100u8; 4];
        let mut dst = [0u8; 3];
        scale_row_down34_0_box([&flat, &flat], &mut dst);
        assert_eq!(dst, [100; 3]);
        let top = [0u8; 4];
        let bottom = [200u8; 4];
        scale_row_down34_0_box([&top, &bottom], &mut dst);
        assert_eq!(dst, [50; 3]);
        scale_row_down34_1_box([&top, &bottom], &mut dst);
        assert_eq!(dst, [100; 3]);
    }

    #[test]
    fn test_add_rows_and_interpolate_match_reference() {
        let mut rng = StdRng::seed_from_u64(89);
        for width in 1..90usize {
            let rows: Vec<Vec<u8>> = (0..5).map(|_| random_row(&mut rng, width)).collect();
            let mut sums = Vec::new();
            for features in [CpuFeatures::detect(), CpuFeatures::empty()] {
                let kernel = scale_add_row_kernel(features, width);
                let mut acc = vec![7u16; width];
                let mut sum = vec![9u32; width];
                scale_add_rows(
                    &kernel,
                    &mut rows.iter().map(|r| &r[..]),
                    &mut acc,
                    &mut sum,
                    width,
                );
                sums.push(sum);
            }
            assert_eq!(sums[0], sums[1]);
            for (x, &s) in sums[1].iter().enumerate() {
                assert_eq!(s, rows.iter().map(|r| r[x] as u32).sum::<u32>());
            }
            for fraction in [0, 1, 64, 128, 255] {
                let mut out = Vec::new();
                for features in [CpuFeatures::detect(), CpuFeatures::empty()] {
                    let kernel = interpolate_row_kernel(features, width);
                    let mut dst = vec![0u8; width];
                    interpolate(&kernel, &mut dst, &rows[0], &rows[1], width, fraction);
                    out.push(dst);
                }
                assert_eq!(out[0], out[1], "width {} fraction {}", width, fraction);
            }
        }
    }

    #[test]
    fn test_add_row_saturates() {
        let src = [255u8; 4];
        let mut dst = [65500u16, 0, 65535, 65280];
        scale_add_row(&src, &mut dst);
        assert_eq!(dst, [65535, 255, 65535, 65535]);
    }

    #[test]
    fn test_argb_down2_kernels_match_reference() {
        let mut rng = StdRng::seed_from_u64(97);
        for dst_width in 1..40usize {
            let r0 = random_row(&mut rng, dst_width * 8);
            let r1 = random_row(&mut rng, dst_width * 8);
            for (linear, filtered) in [(false, false), (true, true), (false, true)] {
                let mut out = Vec::new();
                for features in [CpuFeatures::detect(), CpuFeatures::empty()] {
                    let kernel = argb_scale_row_down2_kernel(features, dst_width, linear, filtered);
                    let mut dst = vec![0u8; dst_width * 4];
                    scale_row_down(&kernel, [&r0, &r1], &mut dst, dst_width, 4, (2, 1));
                    out.push(dst);
                }
                assert_eq!(out[0], out[1], "width {} {} {}", dst_width, linear, filtered);
            }
        }
    }

    #[test]
    fn test_box_column_passes() {
        let src = [40u32, 80, 120, 160, 200, 240];
        let mut dst = [0u8; 3];
        scale_add_cols1(&mut dst, &src, 2, 0, 2 << 16);
        assert_eq!(dst, [30, 70, 110]);
        let mut dst = [0u8; 6];
        scale_add_cols0(&mut dst, &src, 2, 0, 0x10000);
        assert_eq!(dst, [20, 40, 60, 80, 100, 120]);
        let mut dst = [0u8; 4];
        scale_add_cols2(&mut dst, &src, 1, 0, 0x18000);
        // box widths 1, 2, 1, 2
        assert_eq!(dst, [40, 100, 160, 220]);
    }

    #[test]
    fn test_add_rows_folds_past_u16() {
        let rows = vec![[255u8; 20]; ADD_ROWS_CHUNK * 2 + 3];
        for features in [CpuFeatures::detect(), CpuFeatures::empty()] {
            let kernel = scale_add_row_kernel(features, 20);
            let mut acc = vec![0u16; 20];
            let mut sum = vec![0u32; 20];
            scale_add_rows(
                &kernel,
                &mut rows.iter().map(|r| &r[..]),
                &mut acc,
                &mut sum,
                20,
            );
            assert!(sum.iter().all(|&v| v == 255 * rows.len() as u32));
            let mut dst = [0u8; 10];
            scale_add_cols1(&mut dst, &sum, rows.len(), 0, 2 << 16);
            assert_eq!(dst, [255; 10]);
        }
    }
}
