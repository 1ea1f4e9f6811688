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
use crate::scale_rows::{
    argb_scale_row_down2, argb_scale_row_down2_box, argb_scale_row_down2_linear, filter_taps,
    interpolate_row, scale_add_row, scale_filter_cols, scale_row_down2, scale_row_down2_box,
    scale_row_down2_linear, scale_row_down4, scale_row_down4_box,
};
use crate::sse::utils::{_mm_deinterleave_x2_epi8, _mm_havg_epu8, _mm_loadu_si128_x2};
#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

#[target_feature(enable = "sse2")]
pub(crate) unsafe fn scale_row_down2_sse2(src: [&[u8]; 2], dst: &mut [u8]) {
    unsafe {
        let width = dst.len();
        let mut cx = 0usize;
        while cx + 16 <= width {
            let (row0, row1) = _mm_loadu_si128_x2(src[0].as_ptr().add(cx * 2));
            let (_, odd) = _mm_deinterleave_x2_epi8(row0, row1);
            _mm_storeu_si128(dst.as_mut_ptr().add(cx) as *mut __m128i, odd);
            cx += 16;
        }
        if cx < width {
            scale_row_down2([&src[0][cx * 2..], &src[1][cx * 2..]], &mut dst[cx..]);
        }
    }
}

#[target_feature(enable = "ssse3")]
pub(crate) unsafe fn scale_row_down2_linear_ssse3(src: [&[u8]; 2], dst: &mut [u8]) {
    unsafe {
        let width = dst.len();
        let mut cx = 0usize;
        while cx + 16 <= width {
            let (row0, row1) = _mm_loadu_si128_x2(src[0].as_ptr().add(cx * 2));
            _mm_storeu_si128(
                dst.as_mut_ptr().add(cx) as *mut __m128i,
                _mm_havg_epu8(row0, row1),
            );
            cx += 16;
        }
        if cx < width {
            scale_row_down2_linear([&src[0][cx * 2..], &src[1][cx * 2..]], &mut dst[cx..]);
        }
    }
}

#[target_feature(enable = "ssse3")]
pub(crate) unsafe fn scale_row_down2_box_ssse3(src: [&[u8]; 2], dst: &mut [u8]) {
    unsafe {
        let width = dst.len();
        let ones = _mm_set1_epi8(1);
        let rounding = _mm_set1_epi16(2);
        let mut cx = 0usize;
        while cx + 16 <= width {
            let (t0, t1) = _mm_loadu_si128_x2(src[0].as_ptr().add(cx * 2));
            let (b0, b1) = _mm_loadu_si128_x2(src[1].as_ptr().add(cx * 2));
            let lo = _mm_add_epi16(_mm_maddubs_epi16(t0, ones), _mm_maddubs_epi16(b0, ones));
            let hi = _mm_add_epi16(_mm_maddubs_epi16(t1, ones), _mm_maddubs_epi16(b1, ones));
            let lo = _mm_srli_epi16::<2>(_mm_add_epi16(lo, rounding));
            let hi = _mm_srli_epi16::<2>(_mm_add_epi16(hi, rounding));
            _mm_storeu_si128(
                dst.as_mut_ptr().add(cx) as *mut __m128i,
                _mm_packus_epi16(lo, hi),
            );
            cx += 16;
        }
        if cx < width {
            scale_row_down2_box([&src[0][cx * 2..], &src[1][cx * 2..]], &mut dst[cx..]);
        }
    }
}

#[target_feature(enable = "sse2")]
pub(crate) unsafe fn scale_row_down4_sse2(src: [&[u8]; 4], dst: &mut [u8]) {
    unsafe {
        let width = dst.len();
        let mask = _mm_set1_epi32(0xff);
        let mut cx = 0usize;
        while cx + 8 <= width {
            let (row0, row1) = _mm_loadu_si128_x2(src[0].as_ptr().add(cx * 4));
            let lo = _mm_and_si128(_mm_srli_epi32::<16>(row0), mask);
            let hi = _mm_and_si128(_mm_srli_epi32::<16>(row1), mask);
            let packed = _mm_packs_epi32(lo, hi);
            _mm_storel_epi64(
                dst.as_mut_ptr().add(cx) as *mut __m128i,
                _mm_packus_epi16(packed, packed),
            );
            cx += 8;
        }
        if cx < width {
            scale_row_down4(
                [
                    &src[0][cx * 4..],
                    &src[1][cx * 4..],
                    &src[2][cx * 4..],
                    &src[3][cx * 4..],
                ],
                &mut dst[cx..],
            );
        }
    }
}

#[target_feature(enable = "ssse3")]
pub(crate) unsafe fn scale_row_down4_box_ssse3(src: [&[u8]; 4], dst: &mut [u8]) {
    unsafe {
        let width = dst.len();
        let ones = _mm_set1_epi8(1);
        let ones_16 = _mm_set1_epi16(1);
        let rounding = _mm_set1_epi32(8);
        let mut cx = 0usize;
        while cx + 8 <= width {
            let mut lo = _mm_setzero_si128();
            let mut hi = _mm_setzero_si128();
            for row in src.iter() {
                let (v0, v1) = _mm_loadu_si128_x2(row.as_ptr().add(cx * 4));
                lo = _mm_add_epi16(lo, _mm_maddubs_epi16(v0, ones));
                hi = _mm_add_epi16(hi, _mm_maddubs_epi16(v1, ones));
            }
            let lo = _mm_srli_epi32::<4>(_mm_add_epi32(_mm_madd_epi16(lo, ones_16), rounding));
            let hi = _mm_srli_epi32::<4>(_mm_add_epi32(_mm_madd_epi16(hi, ones_16), rounding));
            let packed = _mm_packs_epi32(lo, hi);
            _mm_storel_epi64(
                dst.as_mut_ptr().add(cx) as *mut __m128i,
                _mm_packus_epi16(packed, packed),
            );
            cx += 8;
        }
        if cx < width {
            scale_row_down4_box(
                [
                    &src[0][cx * 4..],
                    &src[1][cx * 4..],
                    &src[2][cx * 4..],
                    &src[3][cx * 4..],
                ],
                &mut dst[cx..],
            );
        }
    }
}

#[target_feature(enable = "sse2")]
pub(crate) unsafe fn scale_add_row_sse2(src: &[u8], dst: &mut [u16]) {
    unsafe {
        let width = dst.len();
        let zeros = _mm_setzero_si128();
        let mut cx = 0usize;
        while cx + 16 <= width {
            let v = _mm_loadu_si128(src.as_ptr().add(cx) as *const __m128i);
            let dst_ptr = dst.as_mut_ptr().add(cx);
            let acc_lo = _mm_loadu_si128(dst_ptr as *const __m128i);
            let acc_hi = _mm_loadu_si128(dst_ptr.add(8) as *const __m128i);
            let acc_lo = _mm_adds_epu16(acc_lo, _mm_unpacklo_epi8(v, zeros));
            let acc_hi = _mm_adds_epu16(acc_hi, _mm_unpackhi_epi8(v, zeros));
            _mm_storeu_si128(dst_ptr as *mut __m128i, acc_lo);
            _mm_storeu_si128(dst_ptr.add(8) as *mut __m128i, acc_hi);
            cx += 16;
        }
        if cx < width {
            scale_add_row(&src[cx..], &mut dst[cx..]);
        }
    }
}

#[target_feature(enable = "sse2")]
pub(crate) unsafe fn interpolate_row_sse2(dst: &mut [u8], src0: &[u8], src1: &[u8], fraction: i32) {
    unsafe {
        if fraction == 0 {
            interpolate_row(dst, src0, src1, 0);
            return;
        }
        let width = dst.len();
        let zeros = _mm_setzero_si128();
        let f1 = _mm_set1_epi16(fraction as i16);
        let f0 = _mm_set1_epi16((256 - fraction) as i16);
        let rounding = _mm_set1_epi16(128);
        let mut cx = 0usize;
        while cx + 16 <= width {
            let a = _mm_loadu_si128(src0.as_ptr().add(cx) as *const __m128i);
            let b = _mm_loadu_si128(src1.as_ptr().add(cx) as *const __m128i);
            let lo = _mm_add_epi16(
                _mm_mullo_epi16(_mm_unpacklo_epi8(a, zeros), f0),
                _mm_mullo_epi16(_mm_unpacklo_epi8(b, zeros), f1),
            );
            let hi = _mm_add_epi16(
                _mm_mullo_epi16(_mm_unpackhi_epi8(a, zeros), f0),
                _mm_mullo_epi16(_mm_unpackhi_epi8(b, zeros), f1),
            );
            let lo = _mm_srli_epi16::<8>(_mm_add_epi16(lo, rounding));
            let hi = _mm_srli_epi16::<8>(_mm_add_epi16(hi, rounding));
            _mm_storeu_si128(
                dst.as_mut_ptr().add(cx) as *mut __m128i,
                _mm_packus_epi16(lo, hi),
            );
            cx += 16;
        }
        if cx < width {
            interpolate_row(&mut dst[cx..], &src0[cx..], &src1[cx..], fraction);
        }
    }
}

/// Four output samples per step, taps are gathered with scalar loads.
#[target_feature(enable = "sse4.1")]
pub(crate) unsafe fn scale_filter_cols_sse4_1(dst: &mut [u8], src: &[u8], x: i32, dx: i32) {
    unsafe {
        let width = dst.len();
        let last = src.len() as i32 - 1;
        let steps = _mm_mullo_epi32(_mm_setr_epi32(0, 1, 2, 3), _mm_set1_epi32(dx));
        let stride = _mm_set1_epi32(dx.wrapping_mul(4));
        let fraction_mask = _mm_set1_epi32(0xffff);
        let rounding = _mm_set1_epi32(0x8000);
        let mut cursor = _mm_add_epi32(_mm_set1_epi32(x), steps);
        let mut cx = 0usize;
        while cx + 4 <= width {
            let mut lanes = [0i32; 4];
            _mm_storeu_si128(lanes.as_mut_ptr() as *mut __m128i, cursor);
            let mut a = [0i32; 4];
            let mut b = [0i32; 4];
            for (i, &lane) in lanes.iter().enumerate() {
                let (left, right) = filter_taps(lane, last);
                a[i] = *src.get_unchecked(left) as i32;
                b[i] = *src.get_unchecked(right) as i32;
            }
            let a = _mm_loadu_si128(a.as_ptr() as *const __m128i);
            let b = _mm_loadu_si128(b.as_ptr() as *const __m128i);
            let f = _mm_and_si128(cursor, fraction_mask);
            let delta = _mm_mullo_epi32(f, _mm_sub_epi32(b, a));
            let v = _mm_add_epi32(a, _mm_srai_epi32::<16>(_mm_add_epi32(delta, rounding)));
            let packed = _mm_packus_epi32(v, v);
            let packed = _mm_packus_epi16(packed, packed);
            (dst.as_mut_ptr().add(cx) as *mut i32).write_unaligned(_mm_cvtsi128_si32(packed));
            cursor = _mm_add_epi32(cursor, stride);
            cx += 4;
        }
        if cx < width {
            let x = x.wrapping_add((cx as i32).wrapping_mul(dx));
            scale_filter_cols(&mut dst[cx..], src, x, dx);
        }
    }
}

#[inline(always)]
unsafe fn argb_split_pairs(src: *const u8) -> (__m128i, __m128i) {
    let (v0, v1) = _mm_loadu_si128_x2(src);
    let even = _mm_castps_si128(_mm_shuffle_ps::<0b10_00_10_00>(
        _mm_castsi128_ps(v0),
        _mm_castsi128_ps(v1),
    ));
    let odd = _mm_castps_si128(_mm_shuffle_ps::<0b11_01_11_01>(
        _mm_castsi128_ps(v0),
        _mm_castsi128_ps(v1),
    ));
    (even, odd)
}

#[target_feature(enable = "sse2")]
pub(crate) unsafe fn argb_scale_row_down2_sse2(src: [&[u8]; 2], dst: &mut [u8]) {
    unsafe {
        let width = dst.len() / 4;
        let mut cx = 0usize;
        while cx + 4 <= width {
            let (_, odd) = argb_split_pairs(src[0].as_ptr().add(cx * 8));
            _mm_storeu_si128(dst.as_mut_ptr().add(cx * 4) as *mut __m128i, odd);
            cx += 4;
        }
        if cx < width {
            argb_scale_row_down2([&src[0][cx * 8..], &src[1][cx * 8..]], &mut dst[cx * 4..]);
        }
    }
}

#[target_feature(enable = "sse2")]
pub(crate) unsafe fn argb_scale_row_down2_linear_sse2(src: [&[u8]; 2], dst: &mut [u8]) {
    unsafe {
        let width = dst.len() / 4;
        let mut cx = 0usize;
        while cx + 4 <= width {
            let (even, odd) = argb_split_pairs(src[0].as_ptr().add(cx * 8));
            _mm_storeu_si128(
                dst.as_mut_ptr().add(cx * 4) as *mut __m128i,
                _mm_avg_epu8(even, odd),
            );
            cx += 4;
        }
        if cx < width {
            argb_scale_row_down2_linear([&src[0][cx * 8..], &src[1][cx * 8..]], &mut dst[cx * 4..]);
        }
    }
}

#[target_feature(enable = "sse2")]
pub(crate) unsafe fn argb_scale_row_down2_box_sse2(src: [&[u8]; 2], dst: &mut [u8]) {
    unsafe {
        let width = dst.len() / 4;
        let zeros = _mm_setzero_si128();
        let rounding = _mm_set1_epi16(2);
        let mut cx = 0usize;
        while cx + 4 <= width {
            let (e0, o0) = argb_split_pairs(src[0].as_ptr().add(cx * 8));
            let (e1, o1) = argb_split_pairs(src[1].as_ptr().add(cx * 8));
            let lo = _mm_add_epi16(
                _mm_add_epi16(_mm_unpacklo_epi8(e0, zeros), _mm_unpacklo_epi8(o0, zeros)),
                _mm_add_epi16(_mm_unpacklo_epi8(e1, zeros), _mm_unpacklo_epi8(o1, zeros)),
            );
            let hi = _mm_add_epi16(
                _mm_add_epi16(_mm_unpackhi_epi8(e0, zeros), _mm_unpackhi_epi8(o0, zeros)),
                _mm_add_epi16(_mm_unpackhi_epi8(e1, zeros), _mm_unpackhi_epi8(o1, zeros)),
            );
            let lo = _mm_srli_epi16::<2>(_mm_add_epi16(lo, rounding));
            let hi = _mm_srli_epi16::<2>(_mm_add_epi16(hi, rounding));
            _mm_storeu_si128(
                dst.as_mut_ptr().add(cx * 4) as *mut __m128i,
                _mm_packus_epi16(lo, hi),
            );
            cx += 4;
        }
        if cx < width {
            argb_scale_row_down2_box([&src[0][cx * 8..], &src[1][cx * 8..]], &mut dst[cx * 4..]);
        }
    }
}
