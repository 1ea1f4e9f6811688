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
use crate::attenuate::unattenuate_row;
use crate::numerics::FIXED_INV_TABLE;
#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

#[inline(always)]
unsafe fn avx_unattenuate_channel<const SHIFT: i32>(pixels: __m256i, inverse: __m256i) -> __m256i {
    let c = _mm256_and_si256(_mm256_srli_epi32::<SHIFT>(pixels), _mm256_set1_epi32(0xff));
    // c * inverse fits 32 unsigned bits
    let scaled = _mm256_srli_epi32::<16>(_mm256_add_epi32(
        _mm256_mullo_epi32(c, inverse),
        _mm256_set1_epi32(0x8000),
    ));
    _mm256_slli_epi32::<SHIFT>(_mm256_min_epu32(scaled, _mm256_set1_epi32(255)))
}

/// Reciprocals are gathered from the table by alpha, 8 pixels per step.
#[target_feature(enable = "avx2")]
pub(crate) unsafe fn unattenuate_row_avx2(src: &[u8], dst: &mut [u8]) {
    unsafe {
        let width = dst.len() / 4;
        let alpha_mask = _mm256_set1_epi32(0xff00_0000u32 as i32);
        let zeros = _mm256_setzero_si256();
        let mut cx = 0usize;
        while cx + 8 <= width {
            let pixels = _mm256_loadu_si256(src.as_ptr().add(cx * 4) as *const __m256i);
            let a = _mm256_srli_epi32::<24>(pixels);
            let inverse =
                _mm256_i32gather_epi32::<4>(FIXED_INV_TABLE.as_ptr() as *const i32, a);
            let restored = _mm256_or_si256(
                _mm256_or_si256(
                    avx_unattenuate_channel::<0>(pixels, inverse),
                    avx_unattenuate_channel::<8>(pixels, inverse),
                ),
                _mm256_or_si256(
                    avx_unattenuate_channel::<16>(pixels, inverse),
                    _mm256_and_si256(pixels, alpha_mask),
                ),
            );
            // zero alpha passes the pixel through
            let transparent = _mm256_cmpeq_epi32(a, zeros);
            let restored = _mm256_blendv_epi8(restored, pixels, transparent);
            _mm256_storeu_si256(dst.as_mut_ptr().add(cx * 4) as *mut __m256i, restored);
            cx += 8;
        }
        if cx < width {
            unattenuate_row(&src[cx * 4..], &mut dst[cx * 4..]);
        }
    }
}
