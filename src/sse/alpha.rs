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
use crate::attenuate::attenuate_row;
use crate::blend::blend_row;
use crate::sse::utils::{sse_broadcast_alpha_epi16, sse_div_by255};
#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

#[inline(always)]
unsafe fn blend_half(bottom: __m128i, top: __m128i) -> __m128i {
    let a = sse_broadcast_alpha_epi16(top);
    let inv_a = _mm_sub_epi16(_mm_set1_epi16(255), a);
    sse_div_by255(_mm_add_epi16(_mm_mullo_epi16(top, a), _mm_mullo_epi16(bottom, inv_a)))
}

#[target_feature(enable = "sse2")]
pub(crate) unsafe fn blend_row_sse2(bottom: &[u8], top: &[u8], dst: &mut [u8]) {
    unsafe {
        let width = dst.len() / 4;
        let zeros = _mm_setzero_si128();
        let opaque = _mm_set1_epi32(0xff00_0000u32 as i32);
        let mut cx = 0usize;
        while cx + 4 <= width {
            let b = _mm_loadu_si128(bottom.as_ptr().add(cx * 4) as *const __m128i);
            let t = _mm_loadu_si128(top.as_ptr().add(cx * 4) as *const __m128i);
            let lo = blend_half(_mm_unpacklo_epi8(b, zeros), _mm_unpacklo_epi8(t, zeros));
            let hi = blend_half(_mm_unpackhi_epi8(b, zeros), _mm_unpackhi_epi8(t, zeros));
            let blended = _mm_or_si128(_mm_packus_epi16(lo, hi), opaque);
            _mm_storeu_si128(dst.as_mut_ptr().add(cx * 4) as *mut __m128i, blended);
            cx += 4;
        }
        if cx < width {
            blend_row(&bottom[cx * 4..], &top[cx * 4..], &mut dst[cx * 4..]);
        }
    }
}

#[target_feature(enable = "sse2")]
pub(crate) unsafe fn attenuate_row_sse2(src: &[u8], dst: &mut [u8]) {
    unsafe {
        let width = dst.len() / 4;
        let zeros = _mm_setzero_si128();
        let alpha_mask = _mm_set1_epi32(0xff00_0000u32 as i32);
        let mut cx = 0usize;
        while cx + 4 <= width {
            let v = _mm_loadu_si128(src.as_ptr().add(cx * 4) as *const __m128i);
            let lo = _mm_unpacklo_epi8(v, zeros);
            let hi = _mm_unpackhi_epi8(v, zeros);
            let lo = sse_div_by255(_mm_mullo_epi16(lo, sse_broadcast_alpha_epi16(lo)));
            let hi = sse_div_by255(_mm_mullo_epi16(hi, sse_broadcast_alpha_epi16(hi)));
            let scaled = _mm_andnot_si128(alpha_mask, _mm_packus_epi16(lo, hi));
            let attenuated = _mm_or_si128(scaled, _mm_and_si128(v, alpha_mask));
            _mm_storeu_si128(dst.as_mut_ptr().add(cx * 4) as *mut __m128i, attenuated);
            cx += 4;
        }
        if cx < width {
            attenuate_row(&src[cx * 4..], &mut dst[cx * 4..]);
        }
    }
}
