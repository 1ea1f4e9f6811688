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
use crate::y_to_rgb::gray_to_argb_row;
use crate::yuv_support::{PixelLayout, YuvChromaSample, YuvConstants};
use crate::yuv_to_rgba::yuv_to_rgba_row;
use std::arch::aarch64::*;

#[inline(always)]
unsafe fn widen_s32(v: uint8x8_t) -> (int32x4_t, int32x4_t) {
    let v = vreinterpretq_s16_u16(vmovl_u8(v));
    (vmovl_s16(vget_low_s16(v)), vmovl_high_s16(v))
}

#[inline(always)]
unsafe fn narrow_channel(lo: int32x4_t, hi: int32x4_t) -> uint8x8_t {
    let lo = vqmovun_s32(vshrq_n_s32::<6>(lo));
    let hi = vqmovun_s32(vshrq_n_s32::<6>(hi));
    vqmovn_u16(vcombine_u16(lo, hi))
}

/// 8 pixels per step in 32 bit precision, only 4 channel layouts are handled.
pub(crate) unsafe fn yuv_to_rgba_row_neon<const LAYOUT: u8, const SAMPLING: u8>(
    y_row: &[u8],
    u_row: &[u8],
    v_row: &[u8],
    rgba: &mut [u8],
    constants: &YuvConstants,
) {
    unsafe {
        let layout: PixelLayout = LAYOUT.into();
        let sampling: YuvChromaSample = SAMPLING.into();
        let width = y_row.len();
        let v_yg = vdup_n_u16(constants.yg as u16);
        let v_ub = vdupq_n_s32(constants.ub);
        let v_ug = vdupq_n_s32(constants.ug);
        let v_vg = vdupq_n_s32(constants.vg);
        let v_vr = vdupq_n_s32(constants.vr);
        let v_bb = vdupq_n_s32(constants.bb);
        let v_bg = vdupq_n_s32(constants.bg);
        let v_br = vdupq_n_s32(constants.br);
        let alpha = vdup_n_u8(255);

        let mut cx = 0usize;
        while cx + 8 <= width {
            let y = vmovl_u8(vld1_u8(y_row.as_ptr().add(cx)));
            let (u, v) = match sampling {
                YuvChromaSample::Yuv420 | YuvChromaSample::Yuv422 => {
                    let u = vcreate_u8(
                        (u_row.as_ptr().add(cx / 2) as *const u32).read_unaligned() as u64,
                    );
                    let v = vcreate_u8(
                        (v_row.as_ptr().add(cx / 2) as *const u32).read_unaligned() as u64,
                    );
                    (vzip1_u8(u, u), vzip1_u8(v, v))
                }
                YuvChromaSample::Yuv444 => (
                    vld1_u8(u_row.as_ptr().add(cx)),
                    vld1_u8(v_row.as_ptr().add(cx)),
                ),
            };

            // y * 0x0101 * yg >> 16
            let yy = vorrq_u16(y, vshlq_n_u16::<8>(y));
            let y1_lo = vreinterpretq_s32_u32(vshrq_n_u32::<16>(vmull_u16(vget_low_u16(yy), v_yg)));
            let y1_hi = vreinterpretq_s32_u32(vshrq_n_u32::<16>(vmull_u16(vget_high_u16(yy), v_yg)));
            let (u_lo, u_hi) = widen_s32(u);
            let (v_lo, v_hi) = widen_s32(v);

            let b = narrow_channel(
                vmlsq_s32(vaddq_s32(y1_lo, v_bb), u_lo, v_ub),
                vmlsq_s32(vaddq_s32(y1_hi, v_bb), u_hi, v_ub),
            );
            let g = narrow_channel(
                vmlsq_s32(vmlsq_s32(vaddq_s32(y1_lo, v_bg), u_lo, v_ug), v_lo, v_vg),
                vmlsq_s32(vmlsq_s32(vaddq_s32(y1_hi, v_bg), u_hi, v_ug), v_hi, v_vg),
            );
            let r = narrow_channel(
                vmlsq_s32(vaddq_s32(y1_lo, v_br), v_lo, v_vr),
                vmlsq_s32(vaddq_s32(y1_hi, v_br), v_hi, v_vr),
            );

            let mut channels = [alpha; 4];
            channels[layout.get_r_channel_offset()] = r;
            channels[layout.get_g_channel_offset()] = g;
            channels[layout.get_b_channel_offset()] = b;
            vst4_u8(
                rgba.as_mut_ptr().add(cx * 4),
                uint8x8x4_t(channels[0], channels[1], channels[2], channels[3]),
            );
            cx += 8;
        }

        if cx < width {
            let cc = match sampling {
                YuvChromaSample::Yuv420 | YuvChromaSample::Yuv422 => cx / 2,
                YuvChromaSample::Yuv444 => cx,
            };
            yuv_to_rgba_row::<LAYOUT, SAMPLING>(
                &y_row[cx..],
                &u_row[cc..],
                &v_row[cc..],
                &mut rgba[cx * 4..],
                constants,
            );
        }
    }
}

pub(crate) unsafe fn gray_to_argb_row_neon(y_row: &[u8], argb: &mut [u8]) {
    unsafe {
        let width = y_row.len();
        let alpha = vdupq_n_u8(255);
        let mut cx = 0usize;
        while cx + 16 <= width {
            let y = vld1q_u8(y_row.as_ptr().add(cx));
            vst4q_u8(argb.as_mut_ptr().add(cx * 4), uint8x16x4_t(y, y, y, alpha));
            cx += 16;
        }
        if cx < width {
            gray_to_argb_row(&y_row[cx..], &mut argb[cx * 4..]);
        }
    }
}
