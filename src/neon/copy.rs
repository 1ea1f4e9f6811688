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
use crate::uv_plane::{merge_uv_row, split_uv_row};
use std::arch::aarch64::*;

pub(crate) unsafe fn copy_row_neon(src: &[u8], dst: &mut [u8]) {
    unsafe {
        let width = dst.len();
        let mut cx = 0usize;
        while cx + 32 <= width {
            let rows = vld1q_u8_x2(src.as_ptr().add(cx));
            vst1q_u8_x2(dst.as_mut_ptr().add(cx), rows);
            cx += 32;
        }
        if cx < width {
            dst[cx..].copy_from_slice(&src[cx..width]);
        }
    }
}

pub(crate) unsafe fn set_row_neon(dst: &mut [u8], value: u32) {
    unsafe {
        let width = dst.len();
        let v = vreinterpretq_u8_u32(vdupq_n_u32(value));
        let mut cx = 0usize;
        while cx + 16 <= width {
            vst1q_u8(dst.as_mut_ptr().add(cx), v);
            cx += 16;
        }
        if cx < width {
            set_row(&mut dst[cx..], value);
        }
    }
}

pub(crate) unsafe fn mirror_row_neon(src: &[u8], dst: &mut [u8]) {
    unsafe {
        let width = dst.len();
        let mut cx = 0usize;
        while cx + 16 <= width {
            let v = vrev64q_u8(vld1q_u8(src.as_ptr().add(width - cx - 16)));
            vst1q_u8(dst.as_mut_ptr().add(cx), vextq_u8::<8>(v, v));
            cx += 16;
        }
        if cx < width {
            mirror_row(&src[..width - cx], &mut dst[cx..]);
        }
    }
}

pub(crate) unsafe fn argb_mirror_row_neon(src: &[u8], dst: &mut [u8]) {
    unsafe {
        let width = dst.len();
        let mut cx = 0usize;
        while cx + 16 <= width {
            let v = vrev64q_u32(vreinterpretq_u32_u8(vld1q_u8(
                src.as_ptr().add(width - cx - 16),
            )));
            vst1q_u8(
                dst.as_mut_ptr().add(cx),
                vreinterpretq_u8_u32(vextq_u32::<2>(v, v)),
            );
            cx += 16;
        }
        if cx < width {
            argb_mirror_row(&src[..width - cx], &mut dst[cx..]);
        }
    }
}

pub(crate) unsafe fn split_uv_row_neon(src_uv: &[u8], dst_u: &mut [u8], dst_v: &mut [u8]) {
    unsafe {
        let width = dst_u.len();
        let mut cx = 0usize;
        while cx + 16 <= width {
            let uv = vld2q_u8(src_uv.as_ptr().add(cx * 2));
            vst1q_u8(dst_u.as_mut_ptr().add(cx), uv.0);
            vst1q_u8(dst_v.as_mut_ptr().add(cx), uv.1);
            cx += 16;
        }
        if cx < width {
            split_uv_row(&src_uv[cx * 2..], &mut dst_u[cx..], &mut dst_v[cx..]);
        }
    }
}

pub(crate) unsafe fn merge_uv_row_neon(src_u: &[u8], src_v: &[u8], dst_uv: &mut [u8]) {
    unsafe {
        let width = dst_uv.len() / 2;
        let mut cx = 0usize;
        while cx + 16 <= width {
            let uv = uint8x16x2_t(
                vld1q_u8(src_u.as_ptr().add(cx)),
                vld1q_u8(src_v.as_ptr().add(cx)),
            );
            vst2q_u8(dst_uv.as_mut_ptr().add(cx * 2), uv);
            cx += 16;
        }
        if cx < width {
            merge_uv_row(&src_u[cx..], &src_v[cx..], &mut dst_uv[cx * 2..]);
        }
    }
}
