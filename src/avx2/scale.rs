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
use crate::scale_rows::{interpolate_row, scale_add_row};
#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

#[target_feature(enable = "avx2")]
pub(crate) unsafe fn scale_add_row_avx2(src: &[u8], dst: &mut [u16]) {
    unsafe {
        let width = dst.len();
        let mut cx = 0usize;
        while cx + 32 <= width {
            let v = _mm256_loadu_si256(src.as_ptr().add(cx) as *const __m256i);
            let dst_ptr = dst.as_mut_ptr().add(cx);
            let acc_lo = _mm256_loadu_si256(dst_ptr as *const __m256i);
            let acc_hi = _mm256_loadu_si256(dst_ptr.add(16) as *const __m256i);
            let acc_lo = _mm256_adds_epu16(acc_lo, _mm256_cvtepu8_epi16(_mm256_castsi256_si128(v)));
            let acc_hi =
                _mm256_adds_epu16(acc_hi, _mm256_cvtepu8_epi16(_mm256_extracti128_si256::<1>(v)));
            _mm256_storeu_si256(dst_ptr as *mut __m256i, acc_lo);
            _mm256_storeu_si256(dst_ptr.add(16) as *mut __m256i, acc_hi);
            cx += 32;
        }
        if cx < width {
            scale_add_row(&src[cx..], &mut dst[cx..]);
        }
    }
}

#[target_feature(enable = "avx2")]
pub(crate) unsafe fn interpolate_row_avx2(dst: &mut [u8], src0: &[u8], src1: &[u8], fraction: i32) {
    unsafe {
        if fraction == 0 {
            interpolate_row(dst, src0, src1, 0);
            return;
        }
        let width = dst.len();
        let f1 = _mm256_set1_epi16(fraction as i16);
        let f0 = _mm256_set1_epi16((256 - fraction) as i16);
        let rounding = _mm256_set1_epi16(128);
        let mut cx = 0usize;
        while cx + 32 <= width {
            let a = _mm256_loadu_si256(src0.as_ptr().add(cx) as *const __m256i);
            let b = _mm256_loadu_si256(src1.as_ptr().add(cx) as *const __m256i);
            let lo = _mm256_add_epi16(
                _mm256_mullo_epi16(_mm256_cvtepu8_epi16(_mm256_castsi256_si128(a)), f0),
                _mm256_mullo_epi16(_mm256_cvtepu8_epi16(_mm256_castsi256_si128(b)), f1),
            );
            let hi = _mm256_add_epi16(
                _mm256_mullo_epi16(_mm256_cvtepu8_epi16(_mm256_extracti128_si256::<1>(a)), f0),
                _mm256_mullo_epi16(_mm256_cvtepu8_epi16(_mm256_extracti128_si256::<1>(b)), f1),
            );
            let lo = _mm256_srli_epi16::<8>(_mm256_add_epi16(lo, rounding));
            let hi = _mm256_srli_epi16::<8>(_mm256_add_epi16(hi, rounding));
            let packed = _mm256_permute4x64_epi64::<0b11_01_10_00>(_mm256_packus_epi16(lo, hi));
            _mm256_storeu_si256(dst.as_mut_ptr().add(cx) as *mut __m256i, packed);
            cx += 32;
        }
        if cx < width {
            interpolate_row(&mut dst[cx..], &src0[cx..], &src1[cx..], fraction);
        }
    }
}
