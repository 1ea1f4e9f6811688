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
use crate::scale_rows::{
    argb_scale_row_down2, argb_scale_row_down2_box, argb_scale_row_down2_linear, interpolate_row,
    scale_add_row, scale_row_down2, scale_row_down2_box, scale_row_down2_linear, scale_row_down4,
    scale_row_down4_box,
};
use std::arch::aarch64::*;

pub(crate) unsafe fn scale_row_down2_neon(src: [&[u8]; 2], dst: &mut [u8]) {
    unsafe {
        let width = dst.len();
        let mut cx = 0usize;
        while cx + 16 <= width {
            let pairs = vld2q_u8(src[0].as_ptr().add(cx * 2));
            vst1q_u8(dst.as_mut_ptr().add(cx), pairs.1);
            cx += 16;
        }
        if cx < width {
            scale_row_down2([&src[0][cx * 2..], &src[1][cx * 2..]], &mut dst[cx..]);
        }
    }
}

pub(crate) unsafe fn scale_row_down2_linear_neon(src: [&[u8]; 2], dst: &mut [u8]) {
    unsafe {
        let width = dst.len();
        let mut cx = 0usize;
        while cx + 16 <= width {
            let pairs = vld2q_u8(src[0].as_ptr().add(cx * 2));
            vst1q_u8(dst.as_mut_ptr().add(cx), vrhaddq_u8(pairs.0, pairs.1));
            cx += 16;
        }
        if cx < width {
            scale_row_down2_linear([&src[0][cx * 2..], &src[1][cx * 2..]], &mut dst[cx..]);
        }
    }
}

pub(crate) unsafe fn scale_row_down2_box_neon(src: [&[u8]; 2], dst: &mut [u8]) {
    unsafe {
        let width = dst.len();
        let mut cx = 0usize;
        while cx + 16 <= width {
            let top = vld1q_u8_x2(src[0].as_ptr().add(cx * 2));
            let bottom = vld1q_u8_x2(src[1].as_ptr().add(cx * 2));
            let lo = vpadalq_u8(vpaddlq_u8(top.0), bottom.0);
            let hi = vpadalq_u8(vpaddlq_u8(top.1), bottom.1);
            vst1q_u8(
                dst.as_mut_ptr().add(cx),
                vcombine_u8(vrshrn_n_u16::<2>(lo), vrshrn_n_u16::<2>(hi)),
            );
            cx += 16;
        }
        if cx < width {
            scale_row_down2_box([&src[0][cx * 2..], &src[1][cx * 2..]], &mut dst[cx..]);
        }
    }
}

pub(crate) unsafe fn scale_row_down4_neon(src: [&[u8]; 4], dst: &mut [u8]) {
    unsafe {
        let width = dst.len();
        let mut cx = 0usize;
        while cx + 8 <= width {
            let quads = vld4_u8(src[0].as_ptr().add(cx * 4));
            vst1_u8(dst.as_mut_ptr().add(cx), quads.2);
            cx += 8;
        }
        if cx < width {
            scale_row_down4(
                [
                    &src[0][cx * 4..],
                    &src[1][cx * 4..],
                    &src[2][cx * 4..],
                    &src[3][cx * 4..],
                ],
                &mut dst[cx..],
            );
        }
    }
}

pub(crate) unsafe fn scale_row_down4_box_neon(src: [&[u8]; 4], dst: &mut [u8]) {
    unsafe {
        let width = dst.len();
        let mut cx = 0usize;
        while cx + 8 <= width {
            let mut lo = vdupq_n_u16(0);
            let mut hi = vdupq_n_u16(0);
            for row in src.iter() {
                let v = vld1q_u8_x2(row.as_ptr().add(cx * 4));
                lo = vpadalq_u8(lo, v.0);
                hi = vpadalq_u8(hi, v.1);
            }
            vst1_u8(
                dst.as_mut_ptr().add(cx),
                vrshrn_n_u16::<4>(vpaddq_u16(lo, hi)),
            );
            cx += 8;
        }
        if cx < width {
            scale_row_down4_box(
                [
                    &src[0][cx * 4..],
                    &src[1][cx * 4..],
                    &src[2][cx * 4..],
                    &src[3][cx * 4..],
                ],
                &mut dst[cx..],
            );
        }
    }
}

pub(crate) unsafe fn scale_add_row_neon(src: &[u8], dst: &mut [u16]) {
    unsafe {
        let width = dst.len();
        let mut cx = 0usize;
        while cx + 16 <= width {
            let v = vld1q_u8(src.as_ptr().add(cx));
            let dst_ptr = dst.as_mut_ptr().add(cx);
            let lo = vqaddq_u16(vld1q_u16(dst_ptr), vmovl_u8(vget_low_u8(v)));
            let hi = vqaddq_u16(vld1q_u16(dst_ptr.add(8)), vmovl_high_u8(v));
            vst1q_u16(dst_ptr, lo);
            vst1q_u16(dst_ptr.add(8), hi);
            cx += 16;
        }
        if cx < width {
            scale_add_row(&src[cx..], &mut dst[cx..]);
        }
    }
}

pub(crate) unsafe fn interpolate_row_neon(dst: &mut [u8], src0: &[u8], src1: &[u8], fraction: i32) {
    unsafe {
        if fraction == 0 {
            interpolate_row(dst, src0, src1, 0);
            return;
        }
        let width = dst.len();
        let f1 = vdupq_n_u8(fraction as u8);
        let f0 = vdupq_n_u8((256 - fraction) as u8);
        let mut cx = 0usize;
        while cx + 16 <= width {
            let a = vld1q_u8(src0.as_ptr().add(cx));
            let b = vld1q_u8(src1.as_ptr().add(cx));
            let lo = vmlal_u8(
                vmull_u8(vget_low_u8(a), vget_low_u8(f0)),
                vget_low_u8(b),
                vget_low_u8(f1),
            );
            let hi = vmlal_high_u8(vmull_high_u8(a, f0), b, f1);
            vst1q_u8(
                dst.as_mut_ptr().add(cx),
                vcombine_u8(vrshrn_n_u16::<8>(lo), vrshrn_n_u16::<8>(hi)),
            );
            cx += 16;
        }
        if cx < width {
            interpolate_row(&mut dst[cx..], &src0[cx..], &src1[cx..], fraction);
        }
    }
}

pub(crate) unsafe fn argb_scale_row_down2_neon(src: [&[u8]; 2], dst: &mut [u8]) {
    unsafe {
        let width = dst.len() / 4;
        let mut cx = 0usize;
        while cx + 8 <= width {
            let src_ptr = src[0].as_ptr().add(cx * 8);
            let dst_ptr = dst.as_mut_ptr().add(cx * 4);
            let v0 = vreinterpretq_u32_u8(vld1q_u8(src_ptr));
            let v1 = vreinterpretq_u32_u8(vld1q_u8(src_ptr.add(16)));
            let v2 = vreinterpretq_u32_u8(vld1q_u8(src_ptr.add(32)));
            let v3 = vreinterpretq_u32_u8(vld1q_u8(src_ptr.add(48)));
            vst1q_u8(dst_ptr, vreinterpretq_u8_u32(vuzp2q_u32(v0, v1)));
            vst1q_u8(dst_ptr.add(16), vreinterpretq_u8_u32(vuzp2q_u32(v2, v3)));
            cx += 8;
        }
        if cx < width {
            argb_scale_row_down2([&src[0][cx * 8..], &src[1][cx * 8..]], &mut dst[cx * 4..]);
        }
    }
}

pub(crate) unsafe fn argb_scale_row_down2_linear_neon(src: [&[u8]; 2], dst: &mut [u8]) {
    unsafe {
        let width = dst.len() / 4;
        let mut cx = 0usize;
        while cx + 8 <= width {
            let px = vld4q_u8(src[0].as_ptr().add(cx * 8));
            let out = uint8x8x4_t(
                vrshrn_n_u16::<1>(vpaddlq_u8(px.0)),
                vrshrn_n_u16::<1>(vpaddlq_u8(px.1)),
                vrshrn_n_u16::<1>(vpaddlq_u8(px.2)),
                vrshrn_n_u16::<1>(vpaddlq_u8(px.3)),
            );
            vst4_u8(dst.as_mut_ptr().add(cx * 4), out);
            cx += 8;
        }
        if cx < width {
            argb_scale_row_down2_linear([&src[0][cx * 8..], &src[1][cx * 8..]], &mut dst[cx * 4..]);
        }
    }
}

pub(crate) unsafe fn argb_scale_row_down2_box_neon(src: [&[u8]; 2], dst: &mut [u8]) {
    unsafe {
        let width = dst.len() / 4;
        let mut cx = 0usize;
        while cx + 8 <= width {
            let top = vld4q_u8(src[0].as_ptr().add(cx * 8));
            let bottom = vld4q_u8(src[1].as_ptr().add(cx * 8));
            let out = uint8x8x4_t(
                vrshrn_n_u16::<2>(vpadalq_u8(vpaddlq_u8(top.0), bottom.0)),
                vrshrn_n_u16::<2>(vpadalq_u8(vpaddlq_u8(top.1), bottom.1)),
                vrshrn_n_u16::<2>(vpadalq_u8(vpaddlq_u8(top.2), bottom.2)),
                vrshrn_n_u16::<2>(vpadalq_u8(vpaddlq_u8(top.3), bottom.3)),
            );
            vst4_u8(dst.as_mut_ptr().add(cx * 4), out);
            cx += 8;
        }
        if cx < width {
            argb_scale_row_down2_box([&src[0][cx * 8..], &src[1][cx * 8..]], &mut dst[cx * 4..]);
        }
    }
}
