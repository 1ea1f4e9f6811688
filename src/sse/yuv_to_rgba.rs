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
use crate::sse::utils::{sse_load_u32, sse_store_half_rgba};
use crate::y_to_rgb::gray_to_argb_row;
use crate::yuv_support::{PixelLayout, YuvChromaSample, YuvConstants};
use crate::yuv_to_rgba::yuv_to_rgba_row;
#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

#[inline(always)]
unsafe fn channel_epi32(uv: __m128i, weights: __m128i, y1: __m128i, bias: __m128i) -> __m128i {
    _mm_srai_epi32::<6>(_mm_add_epi32(_mm_add_epi32(_mm_madd_epi16(uv, weights), y1), bias))
}

/// Packs two registers of 4 signed lanes into 8 clamped bytes.
#[inline(always)]
unsafe fn pack_channel(lo: __m128i, hi: __m128i) -> __m128i {
    let packed = _mm_packs_epi32(lo, hi);
    _mm_packus_epi16(packed, packed)
}

/// Converts 8 pixels per step in 32 bit precision, only 4 channel layouts are handled.
#[target_feature(enable = "sse2")]
pub(crate) unsafe fn yuv_to_rgba_row_sse2<const LAYOUT: u8, const SAMPLING: u8>(
    y_row: &[u8],
    u_row: &[u8],
    v_row: &[u8],
    rgba: &mut [u8],
    constants: &YuvConstants,
) {
    unsafe {
        let layout: PixelLayout = LAYOUT.into();
        let sampling: YuvChromaSample = SAMPLING.into();
        let width = y_row.len();
        let zeros = _mm_setzero_si128();
        let v_yg = _mm_set1_epi16(constants.yg as i16);
        let b_weights = _mm_set1_epi32(((-constants.ub) & 0xffff) as i32);
        let g_weights = _mm_set1_epi32(
            ((-constants.ug) & 0xffff) as i32 | ((-constants.vg) << 16),
        );
        let r_weights = _mm_set1_epi32((-constants.vr) << 16);
        let v_bb = _mm_set1_epi32(constants.bb);
        let v_bg = _mm_set1_epi32(constants.bg);
        let v_br = _mm_set1_epi32(constants.br);
        let alpha = _mm_set1_epi8(-1);

        let mut cx = 0usize;
        while cx + 8 <= width {
            let y = _mm_loadl_epi64(y_row.as_ptr().add(cx) as *const __m128i);
            let (u, v) = match sampling {
                YuvChromaSample::Yuv420 | YuvChromaSample::Yuv422 => {
                    let u = sse_load_u32(u_row.as_ptr().add(cx / 2));
                    let v = sse_load_u32(v_row.as_ptr().add(cx / 2));
                    (_mm_unpacklo_epi8(u, u), _mm_unpacklo_epi8(v, v))
                }
                YuvChromaSample::Yuv444 => (
                    _mm_loadl_epi64(u_row.as_ptr().add(cx) as *const __m128i),
                    _mm_loadl_epi64(v_row.as_ptr().add(cx) as *const __m128i),
                ),
            };

            // y * 0x0101 * yg >> 16
            let y1 = _mm_mulhi_epu16(_mm_unpacklo_epi8(y, y), v_yg);
            let y1_lo = _mm_unpacklo_epi16(y1, zeros);
            let y1_hi = _mm_unpackhi_epi16(y1, zeros);

            let uv = _mm_unpacklo_epi8(u, v);
            let uv_lo = _mm_unpacklo_epi8(uv, zeros);
            let uv_hi = _mm_unpackhi_epi8(uv, zeros);

            let b = pack_channel(
                channel_epi32(uv_lo, b_weights, y1_lo, v_bb),
                channel_epi32(uv_hi, b_weights, y1_hi, v_bb),
            );
            let g = pack_channel(
                channel_epi32(uv_lo, g_weights, y1_lo, v_bg),
                channel_epi32(uv_hi, g_weights, y1_hi, v_bg),
            );
            let r = pack_channel(
                channel_epi32(uv_lo, r_weights, y1_lo, v_br),
                channel_epi32(uv_hi, r_weights, y1_hi, v_br),
            );

            let mut channels = [alpha; 4];
            channels[layout.get_r_channel_offset()] = r;
            channels[layout.get_g_channel_offset()] = g;
            channels[layout.get_b_channel_offset()] = b;
            sse_store_half_rgba(rgba.as_mut_ptr().add(cx * 4), channels);
            cx += 8;
        }

        if cx < width {
            let cc = match sampling {
                YuvChromaSample::Yuv420 | YuvChromaSample::Yuv422 => cx / 2,
                YuvChromaSample::Yuv444 => cx,
            };
            yuv_to_rgba_row::<LAYOUT, SAMPLING>(
                &y_row[cx..],
                &u_row[cc..],
                &v_row[cc..],
                &mut rgba[cx * 4..],
                constants,
            );
        }
    }
}

#[target_feature(enable = "sse2")]
pub(crate) unsafe fn gray_to_argb_row_sse2(y_row: &[u8], argb: &mut [u8]) {
    unsafe {
        let width = y_row.len();
        let alpha = _mm_set1_epi8(-1);
        let mut cx = 0usize;
        while cx + 16 <= width {
            let y = _mm_loadu_si128(y_row.as_ptr().add(cx) as *const __m128i);
            let yy_lo = _mm_unpacklo_epi8(y, y);
            let yy_hi = _mm_unpackhi_epi8(y, y);
            let ya_lo = _mm_unpacklo_epi8(y, alpha);
            let ya_hi = _mm_unpackhi_epi8(y, alpha);
            let dst_ptr = argb.as_mut_ptr().add(cx * 4);
            _mm_storeu_si128(dst_ptr as *mut __m128i, _mm_unpacklo_epi16(yy_lo, ya_lo));
            _mm_storeu_si128(dst_ptr.add(16) as *mut __m128i, _mm_unpackhi_epi16(yy_lo, ya_lo));
            _mm_storeu_si128(dst_ptr.add(32) as *mut __m128i, _mm_unpacklo_epi16(yy_hi, ya_hi));
            _mm_storeu_si128(dst_ptr.add(48) as *mut __m128i, _mm_unpackhi_epi16(yy_hi, ya_hi));
            cx += 16;
        }
        if cx < width {
            gray_to_argb_row(&y_row[cx..], &mut argb[cx * 4..]);
        }
    }
}
