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
use crate::sse::utils::{_mm_deinterleave_x2_epi8, _mm_loadu_si128_x2};
use crate::yuv_support::Yuy2Description;
use crate::yuv_to_yuy2::yuv_to_yuy2_row;
use crate::yuy2_to_yuv::yuy2_to_yuv_row;
#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

#[target_feature(enable = "sse2")]
pub(crate) unsafe fn yuy2_to_yuv_row_sse2<const YUY2_SOURCE: u8>(
    yuy2: &[u8],
    y_row: &mut [u8],
    u_row: &mut [u8],
    v_row: &mut [u8],
) {
    unsafe {
        let source: Yuy2Description = YUY2_SOURCE.into();
        let width = y_row.len();
        let mut cx = 0usize;
        while cx + 16 <= width {
            let (row0, row1) = _mm_loadu_si128_x2(yuy2.as_ptr().add(cx * 2));
            let (even, odd) = _mm_deinterleave_x2_epi8(row0, row1);
            let (y, chroma) = match source {
                Yuy2Description::YUYV => (even, odd),
                Yuy2Description::UYVY => (odd, even),
            };
            let (u, v) = _mm_deinterleave_x2_epi8(chroma, _mm_setzero_si128());
            let uv = cx / 2;
            _mm_storeu_si128(y_row.as_mut_ptr().add(cx) as *mut __m128i, y);
            _mm_storel_epi64(u_row.as_mut_ptr().add(uv) as *mut __m128i, u);
            _mm_storel_epi64(v_row.as_mut_ptr().add(uv) as *mut __m128i, v);
            cx += 16;
        }
        if cx < width {
            let uv = cx / 2;
            yuy2_to_yuv_row::<YUY2_SOURCE>(
                &yuy2[cx * 2..],
                &mut y_row[cx..],
                &mut u_row[uv..],
                &mut v_row[uv..],
            );
        }
    }
}

#[target_feature(enable = "sse2")]
pub(crate) unsafe fn yuv_to_yuy2_row_sse2<const YUY2_TARGET: u8>(
    y_row: &[u8],
    u_row: &[u8],
    v_row: &[u8],
    yuy2: &mut [u8],
) {
    unsafe {
        let target: Yuy2Description = YUY2_TARGET.into();
        let width = y_row.len();
        let mut cx = 0usize;
        while cx + 16 <= width {
            let uv = cx / 2;
            let y = _mm_loadu_si128(y_row.as_ptr().add(cx) as *const __m128i);
            let u = _mm_loadl_epi64(u_row.as_ptr().add(uv) as *const __m128i);
            let v = _mm_loadl_epi64(v_row.as_ptr().add(uv) as *const __m128i);
            let chroma = _mm_unpacklo_epi8(u, v);
            let (lo, hi) = match target {
                Yuy2Description::YUYV => (_mm_unpacklo_epi8(y, chroma), _mm_unpackhi_epi8(y, chroma)),
                Yuy2Description::UYVY => (_mm_unpacklo_epi8(chroma, y), _mm_unpackhi_epi8(chroma, y)),
            };
            let dst_ptr = yuy2.as_mut_ptr().add(cx * 2);
            _mm_storeu_si128(dst_ptr as *mut __m128i, lo);
            _mm_storeu_si128(dst_ptr.add(16) as *mut __m128i, hi);
            cx += 16;
        }
        if cx < width {
            let uv = cx / 2;
            yuv_to_yuy2_row::<YUY2_TARGET>(
                &y_row[cx..],
                &u_row[uv..],
                &v_row[uv..],
                &mut yuy2[cx * 2..],
            );
        }
    }
}
