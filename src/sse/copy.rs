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
use crate::copy_plane::{argb_mirror_row, mirror_row};
use crate::fill::set_row;
#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

/// Rows are 16 byte aligned and a multiple of 32 bytes.
#[target_feature(enable = "sse2")]
pub(crate) unsafe fn copy_row_sse2(src: &[u8], dst: &mut [u8]) {
    unsafe {
        let width = dst.len();
        let mut cx = 0usize;
        while cx + 32 <= width {
            let src_ptr = src.as_ptr().add(cx);
            let dst_ptr = dst.as_mut_ptr().add(cx);
            let row0 = _mm_load_si128(src_ptr as *const __m128i);
            let row1 = _mm_load_si128(src_ptr.add(16) as *const __m128i);
            _mm_store_si128(dst_ptr as *mut __m128i, row0);
            _mm_store_si128(dst_ptr.add(16) as *mut __m128i, row1);
            cx += 32;
        }
        if cx < width {
            dst[cx..].copy_from_slice(&src[cx..width]);
        }
    }
}

#[target_feature(enable = "sse2")]
pub(crate) unsafe fn set_row_sse2(dst: &mut [u8], value: u32) {
    unsafe {
        let width = dst.len();
        let v = _mm_set1_epi32(value as i32);
        let mut cx = 0usize;
        while cx + 16 <= width {
            _mm_store_si128(dst.as_mut_ptr().add(cx) as *mut __m128i, v);
            cx += 16;
        }
        if cx < width {
            set_row(&mut dst[cx..], value);
        }
    }
}

#[target_feature(enable = "ssse3")]
pub(crate) unsafe fn mirror_row_ssse3(src: &[u8], dst: &mut [u8]) {
    unsafe {
        let width = dst.len();
        let reverse = _mm_setr_epi8(15, 14, 13, 12, 11, 10, 9, 8, 7, 6, 5, 4, 3, 2, 1, 0);
        let mut cx = 0usize;
        while cx + 16 <= width {
            let v = _mm_loadu_si128(src.as_ptr().add(width - cx - 16) as *const __m128i);
            _mm_storeu_si128(
                dst.as_mut_ptr().add(cx) as *mut __m128i,
                _mm_shuffle_epi8(v, reverse),
            );
            cx += 16;
        }
        if cx < width {
            mirror_row(&src[..width - cx], &mut dst[cx..]);
        }
    }
}

#[target_feature(enable = "sse2")]
pub(crate) unsafe fn argb_mirror_row_sse2(src: &[u8], dst: &mut [u8]) {
    unsafe {
        let width = dst.len();
        let mut cx = 0usize;
        while cx + 16 <= width {
            let v = _mm_loadu_si128(src.as_ptr().add(width - cx - 16) as *const __m128i);
            _mm_storeu_si128(
                dst.as_mut_ptr().add(cx) as *mut __m128i,
                _mm_shuffle_epi32::<0b00_01_10_11>(v),
            );
            cx += 16;
        }
        if cx < width {
            argb_mirror_row(&src[..width - cx], &mut dst[cx..]);
        }
    }
}
