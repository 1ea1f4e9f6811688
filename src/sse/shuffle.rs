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
use crate::rgb_to_y::rgb_to_y_row;
use crate::shuffle::shuffle_row;
use crate::sse::utils::{_mm_loadu_si96, _mm_storeu_si96, sse_store_u32};
use crate::yuv_support::PixelLayout;
#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

/// Byte shuffle for 4 pixels together with the alpha bytes to set.
///
/// Output bytes without a source are zeroed by the shuffle and then filled from the mask.
fn shuffle_tables(src: PixelLayout, dst: PixelLayout) -> ([i8; 16], [i8; 16]) {
    let src_channels = src.get_channels_count();
    let dst_channels = dst.get_channels_count();
    let mut shuffle = [-1i8; 16];
    let mut fill = [0i8; 16];
    for px in 0..4 {
        let s = px * src_channels;
        let d = px * dst_channels;
        shuffle[d + dst.get_r_channel_offset()] = (s + src.get_r_channel_offset()) as i8;
        shuffle[d + dst.get_g_channel_offset()] = (s + src.get_g_channel_offset()) as i8;
        shuffle[d + dst.get_b_channel_offset()] = (s + src.get_b_channel_offset()) as i8;
        if dst.has_alpha() {
            if src.has_alpha() {
                shuffle[d + dst.get_a_channel_offset()] = (s + src.get_a_channel_offset()) as i8;
            } else {
                fill[d + dst.get_a_channel_offset()] = -1;
            }
        }
    }
    (shuffle, fill)
}

/// Reorders 16 pixels per step between 4 and 3 byte layouts.
#[target_feature(enable = "ssse3")]
pub(crate) unsafe fn shuffle_row_ssse3<const SRC: u8, const DST: u8>(src: &[u8], dst: &mut [u8]) {
    unsafe {
        let src_layout: PixelLayout = SRC.into();
        let dst_layout: PixelLayout = DST.into();
        let src_channels = src_layout.get_channels_count();
        let dst_channels = dst_layout.get_channels_count();
        let width = dst.len() / dst_channels;

        let (shuffle, fill) = shuffle_tables(src_layout, dst_layout);
        let shuffle = _mm_loadu_si128(shuffle.as_ptr() as *const __m128i);
        let fill = _mm_loadu_si128(fill.as_ptr() as *const __m128i);

        let mut cx = 0usize;
        while cx + 16 <= width {
            for quad in 0..4 {
                let px = cx + quad * 4;
                let src_ptr = src.as_ptr().add(px * src_channels);
                let dst_ptr = dst.as_mut_ptr().add(px * dst_channels);
                let v = if src_channels == 4 {
                    _mm_loadu_si128(src_ptr as *const __m128i)
                } else {
                    _mm_loadu_si96(src_ptr)
                };
                let shuffled = _mm_or_si128(_mm_shuffle_epi8(v, shuffle), fill);
                if dst_channels == 4 {
                    _mm_storeu_si128(dst_ptr as *mut __m128i, shuffled);
                } else {
                    _mm_storeu_si96(dst_ptr, shuffled);
                }
            }
            cx += 16;
        }

        if cx < width {
            shuffle_row::<SRC, DST>(&src[cx * src_channels..], &mut dst[cx * dst_channels..]);
        }
    }
}

/// BT.601 studio luma of 4 pixels per step, `(66 * r + 129 * g + 25 * b + 0x1080) >> 8`.
#[target_feature(enable = "ssse3")]
pub(crate) unsafe fn rgb_to_y_row_ssse3<const LAYOUT: u8>(rgba: &[u8], y_row: &mut [u8]) {
    unsafe {
        let layout: PixelLayout = LAYOUT.into();
        let width = y_row.len();

        let mut weights = [0i16; 8];
        for px in 0..2 {
            weights[px * 4 + layout.get_r_channel_offset()] = 66;
            weights[px * 4 + layout.get_g_channel_offset()] = 129;
            weights[px * 4 + layout.get_b_channel_offset()] = 25;
        }
        let weights = _mm_loadu_si128(weights.as_ptr() as *const __m128i);
        let bias = _mm_set1_epi32(0x1080);
        let zeros = _mm_setzero_si128();

        let mut cx = 0usize;
        while cx + 4 <= width {
            let v = _mm_loadu_si128(rgba.as_ptr().add(cx * 4) as *const __m128i);
            let lo = _mm_madd_epi16(_mm_unpacklo_epi8(v, zeros), weights);
            let hi = _mm_madd_epi16(_mm_unpackhi_epi8(v, zeros), weights);
            let sums = _mm_srai_epi32::<8>(_mm_add_epi32(_mm_hadd_epi32(lo, hi), bias));
            let packed = _mm_packs_epi32(sums, sums);
            sse_store_u32(y_row.as_mut_ptr().add(cx), _mm_packus_epi16(packed, packed));
            cx += 4;
        }

        if cx < width {
            rgb_to_y_row::<LAYOUT>(&rgba[cx * 4..], &mut y_row[cx..]);
        }
    }
}
