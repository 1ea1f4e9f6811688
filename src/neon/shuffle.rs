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
use crate::yuv_support::PixelLayout;
use std::arch::aarch64::*;

/// Reorders 16 pixels per step between 4 and 3 byte layouts.
pub(crate) unsafe fn shuffle_row_neon<const SRC: u8, const DST: u8>(src: &[u8], dst: &mut [u8]) {
    unsafe {
        let src_layout: PixelLayout = SRC.into();
        let dst_layout: PixelLayout = DST.into();
        let src_channels = src_layout.get_channels_count();
        let dst_channels = dst_layout.get_channels_count();
        let width = dst.len() / dst_channels;

        let mut cx = 0usize;
        while cx + 16 <= width {
            let src_ptr = src.as_ptr().add(cx * src_channels);
            let pixels: [uint8x16_t; 4] = if src_channels == 4 {
                let v = vld4q_u8(src_ptr);
                [v.0, v.1, v.2, v.3]
            } else {
                let v = vld3q_u8(src_ptr);
                [v.0, v.1, v.2, vdupq_n_u8(255)]
            };
            let a = if src_layout.has_alpha() {
                pixels[src_layout.get_a_channel_offset()]
            } else {
                vdupq_n_u8(255)
            };
            let r = pixels[src_layout.get_r_channel_offset()];
            let g = pixels[src_layout.get_g_channel_offset()];
            let b = pixels[src_layout.get_b_channel_offset()];

            let mut out = [a; 4];
            out[dst_layout.get_r_channel_offset()] = r;
            out[dst_layout.get_g_channel_offset()] = g;
            out[dst_layout.get_b_channel_offset()] = b;
            let dst_ptr = dst.as_mut_ptr().add(cx * dst_channels);
            if dst_channels == 4 {
                vst4q_u8(dst_ptr, uint8x16x4_t(out[0], out[1], out[2], out[3]));
            } else {
                vst3q_u8(dst_ptr, uint8x16x3_t(out[0], out[1], out[2]));
            }
            cx += 16;
        }

        if cx < width {
            shuffle_row::<SRC, DST>(&src[cx * src_channels..], &mut dst[cx * dst_channels..]);
        }
    }
}

/// BT.601 studio luma, the weighted sum stays below 2^16.
pub(crate) unsafe fn rgb_to_y_row_neon<const LAYOUT: u8>(rgba: &[u8], y_row: &mut [u8]) {
    unsafe {
        let layout: PixelLayout = LAYOUT.into();
        let width = y_row.len();
        let bias = vdupq_n_u16(0x1080);
        let mut cx = 0usize;
        while cx + 8 <= width {
            let v = vld4_u8(rgba.as_ptr().add(cx * 4));
            let channels = [v.0, v.1, v.2, v.3];
            let r = channels[layout.get_r_channel_offset()];
            let g = channels[layout.get_g_channel_offset()];
            let b = channels[layout.get_b_channel_offset()];
            let mut acc = vmlal_u8(bias, r, vdup_n_u8(66));
            acc = vmlal_u8(acc, g, vdup_n_u8(129));
            acc = vmlal_u8(acc, b, vdup_n_u8(25));
            vst1_u8(y_row.as_mut_ptr().add(cx), vshrn_n_u16::<8>(acc));
            cx += 8;
        }
        if cx < width {
            rgb_to_y_row::<LAYOUT>(&rgba[cx * 4..], &mut y_row[cx..]);
        }
    }
}
