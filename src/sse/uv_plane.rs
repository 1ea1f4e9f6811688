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
use crate::uv_plane::{merge_uv_row, split_uv_row};
#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

#[target_feature(enable = "sse2")]
pub(crate) unsafe fn split_uv_row_sse2(src_uv: &[u8], dst_u: &mut [u8], dst_v: &mut [u8]) {
    unsafe {
        let width = dst_u.len();
        let mut cx = 0usize;
        while cx + 16 <= width {
            let (row0, row1) = _mm_loadu_si128_x2(src_uv.as_ptr().add(cx * 2));
            let (u, v) = _mm_deinterleave_x2_epi8(row0, row1);
            _mm_storeu_si128(dst_u.as_mut_ptr().add(cx) as *mut __m128i, u);
            _mm_storeu_si128(dst_v.as_mut_ptr().add(cx) as *mut __m128i, v);
            cx += 16;
        }
        if cx < width {
            split_uv_row(&src_uv[cx * 2..], &mut dst_u[cx..], &mut dst_v[cx..]);
        }
    }
}

#[target_feature(enable = "sse2")]
pub(crate) unsafe fn merge_uv_row_sse2(src_u: &[u8], src_v: &[u8], dst_uv: &mut [u8]) {
    unsafe {
        let width = dst_uv.len() / 2;
        let mut cx = 0usize;
        while cx + 16 <= width {
            let u = _mm_loadu_si128(src_u.as_ptr().add(cx) as *const __m128i);
            let v = _mm_loadu_si128(src_v.as_ptr().add(cx) as *const __m128i);
            let dst_ptr = dst_uv.as_mut_ptr().add(cx * 2);
            _mm_storeu_si128(dst_ptr as *mut __m128i, _mm_unpacklo_epi8(u, v));
            _mm_storeu_si128(dst_ptr.add(16) as *mut __m128i, _mm_unpackhi_epi8(u, v));
            cx += 16;
        }
        if cx < width {
            merge_uv_row(&src_u[cx..], &src_v[cx..], &mut dst_uv[cx * 2..]);
        }
    }
}
