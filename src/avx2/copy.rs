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
use crate::fill::set_row;
use crate::uv_plane::split_uv_row;
#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

#[target_feature(enable = "avx2")]
pub(crate) unsafe fn copy_row_avx2(src: &[u8], dst: &mut [u8]) {
    unsafe {
        let width = dst.len();
        let mut cx = 0usize;
        while cx + 64 <= width {
            let src_ptr = src.as_ptr().add(cx);
            let dst_ptr = dst.as_mut_ptr().add(cx);
            let row0 = _mm256_loadu_si256(src_ptr as *const __m256i);
            let row1 = _mm256_loadu_si256(src_ptr.add(32) as *const __m256i);
            _mm256_storeu_si256(dst_ptr as *mut __m256i, row0);
            _mm256_storeu_si256(dst_ptr.add(32) as *mut __m256i, row1);
            cx += 64;
        }
        if cx < width {
            dst[cx..].copy_from_slice(&src[cx..width]);
        }
    }
}

#[target_feature(enable = "avx2")]
pub(crate) unsafe fn set_row_avx2(dst: &mut [u8], value: u32) {
    unsafe {
        let width = dst.len();
        let v = _mm256_set1_epi32(value as i32);
        let mut cx = 0usize;
        while cx + 32 <= width {
            _mm256_storeu_si256(dst.as_mut_ptr().add(cx) as *mut __m256i, v);
            cx += 32;
        }
        if cx < width {
            set_row(&mut dst[cx..], value);
        }
    }
}

#[target_feature(enable = "avx2")]
pub(crate) unsafe fn split_uv_row_avx2(src_uv: &[u8], dst_u: &mut [u8], dst_v: &mut [u8]) {
    unsafe {
        let width = dst_u.len();
        let mask = _mm256_set1_epi16(0x00ff);
        let mut cx = 0usize;
        while cx + 32 <= width {
            let src_ptr = src_uv.as_ptr().add(cx * 2);
            let row0 = _mm256_loadu_si256(src_ptr as *const __m256i);
            let row1 = _mm256_loadu_si256(src_ptr.add(32) as *const __m256i);
            let u = _mm256_packus_epi16(_mm256_and_si256(row0, mask), _mm256_and_si256(row1, mask));
            let v = _mm256_packus_epi16(_mm256_srli_epi16::<8>(row0), _mm256_srli_epi16::<8>(row1));
            // packus works per 128 bit lane
            let u = _mm256_permute4x64_epi64::<0b11_01_10_00>(u);
            let v = _mm256_permute4x64_epi64::<0b11_01_10_00>(v);
            _mm256_storeu_si256(dst_u.as_mut_ptr().add(cx) as *mut __m256i, u);
            _mm256_storeu_si256(dst_v.as_mut_ptr().add(cx) as *mut __m256i, v);
            cx += 32;
        }
        if cx < width {
            split_uv_row(&src_uv[cx * 2..], &mut dst_u[cx..], &mut dst_v[cx..]);
        }
    }
}
