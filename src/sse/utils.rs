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
#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

#[inline(always)]
pub(crate) unsafe fn _mm_loadu_si96(ptr: *const u8) -> __m128i {
    let lo = _mm_loadl_epi64(ptr as *const __m128i);
    let hi = _mm_cvtsi32_si128((ptr.add(8) as *const i32).read_unaligned());
    _mm_unpacklo_epi64(lo, hi)
}

#[inline(always)]
pub(crate) unsafe fn _mm_storeu_si96(ptr: *mut u8, v: __m128i) {
    _mm_storel_epi64(ptr as *mut __m128i, v);
    (ptr.add(8) as *mut i32).write_unaligned(_mm_cvtsi128_si32(_mm_srli_si128::<8>(v)));
}

#[inline(always)]
pub(crate) unsafe fn sse_load_u32(ptr: *const u8) -> __m128i {
    _mm_cvtsi32_si128((ptr as *const i32).read_unaligned())
}

#[inline(always)]
pub(crate) unsafe fn sse_store_u32(ptr: *mut u8, v: __m128i) {
    (ptr as *mut i32).write_unaligned(_mm_cvtsi128_si32(v));
}

#[inline(always)]
pub(crate) unsafe fn _mm_loadu_si128_x2(ptr: *const u8) -> (__m128i, __m128i) {
    (
        _mm_loadu_si128(ptr as *const __m128i),
        _mm_loadu_si128(ptr.add(16) as *const __m128i),
    )
}

/// Rounded division by 255 of unsigned 16 bit lanes holding at most `255 * 255`.
#[inline(always)]
pub(crate) unsafe fn sse_div_by255(v: __m128i) -> __m128i {
    let t = _mm_add_epi16(v, _mm_set1_epi16(0x80));
    _mm_srli_epi16::<8>(_mm_add_epi16(t, _mm_srli_epi16::<8>(t)))
}

/// Broadcasts the alpha lane of each of the two pixels held as 16 bit lanes.
#[inline(always)]
pub(crate) unsafe fn sse_broadcast_alpha_epi16(v: __m128i) -> __m128i {
    const SHUFFLE: i32 = 0b11_11_11_11;
    _mm_shufflehi_epi16::<SHUFFLE>(_mm_shufflelo_epi16::<SHUFFLE>(v))
}

/// Even and odd bytes of two consecutive registers.
#[inline(always)]
pub(crate) unsafe fn _mm_deinterleave_x2_epi8(a: __m128i, b: __m128i) -> (__m128i, __m128i) {
    let mask = _mm_set1_epi16(0x00ff);
    let even = _mm_packus_epi16(_mm_and_si128(a, mask), _mm_and_si128(b, mask));
    let odd = _mm_packus_epi16(_mm_srli_epi16::<8>(a), _mm_srli_epi16::<8>(b));
    (even, odd)
}

/// Sums of adjacent byte pairs rounded to their average.
#[inline(always)]
pub(crate) unsafe fn _mm_havg_epu8(a: __m128i, b: __m128i) -> __m128i {
    let ones = _mm_set1_epi8(1);
    let ones_16 = _mm_set1_epi16(1);
    let lo = _mm_srli_epi16::<1>(_mm_add_epi16(_mm_maddubs_epi16(a, ones), ones_16));
    let hi = _mm_srli_epi16::<1>(_mm_add_epi16(_mm_maddubs_epi16(b, ones), ones_16));
    _mm_packus_epi16(lo, hi)
}

/// Interleaves four 8 byte channel vectors into 8 pixels.
#[inline(always)]
pub(crate) unsafe fn sse_store_half_rgba(ptr: *mut u8, c: [__m128i; 4]) {
    let c01 = _mm_unpacklo_epi8(c[0], c[1]);
    let c23 = _mm_unpacklo_epi8(c[2], c[3]);
    _mm_storeu_si128(ptr as *mut __m128i, _mm_unpacklo_epi16(c01, c23));
    _mm_storeu_si128(ptr.add(16) as *mut __m128i, _mm_unpackhi_epi16(c01, c23));
}
