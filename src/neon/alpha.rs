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
use crate::attenuate::attenuate_row;
use crate::blend::blend_row;
use std::arch::aarch64::*;

/// Rounded division by 255 of products up to `255 * 255`.
#[inline(always)]
unsafe fn vdiv_by255_u16(v: uint16x8_t) -> uint8x8_t {
    let t = vaddq_u16(v, vdupq_n_u16(0x80));
    vshrn_n_u16::<8>(vaddq_u16(t, vshrq_n_u16::<8>(t)))
}

pub(crate) unsafe fn blend_row_neon(bottom: &[u8], top: &[u8], dst: &mut [u8]) {
    unsafe {
        let width = dst.len() / 4;
        let v_255 = vdup_n_u8(255);
        let mut cx = 0usize;
        while cx + 8 <= width {
            let b = vld4_u8(bottom.as_ptr().add(cx * 4));
            let t = vld4_u8(top.as_ptr().add(cx * 4));
            let a = t.3;
            let inv_a = vsub_u8(v_255, a);
            let c0 = vdiv_by255_u16(vmlal_u8(vmull_u8(t.0, a), b.0, inv_a));
            let c1 = vdiv_by255_u16(vmlal_u8(vmull_u8(t.1, a), b.1, inv_a));
            let c2 = vdiv_by255_u16(vmlal_u8(vmull_u8(t.2, a), b.2, inv_a));
            vst4_u8(dst.as_mut_ptr().add(cx * 4), uint8x8x4_t(c0, c1, c2, v_255));
            cx += 8;
        }
        if cx < width {
            blend_row(&bottom[cx * 4..], &top[cx * 4..], &mut dst[cx * 4..]);
        }
    }
}

pub(crate) unsafe fn attenuate_row_neon(src: &[u8], dst: &mut [u8]) {
    unsafe {
        let width = dst.len() / 4;
        let mut cx = 0usize;
        while cx + 8 <= width {
            let px = vld4_u8(src.as_ptr().add(cx * 4));
            let a = px.3;
            let c0 = vdiv_by255_u16(vmull_u8(px.0, a));
            let c1 = vdiv_by255_u16(vmull_u8(px.1, a));
            let c2 = vdiv_by255_u16(vmull_u8(px.2, a));
            vst4_u8(dst.as_mut_ptr().add(cx * 4), uint8x8x4_t(c0, c1, c2, a));
            cx += 8;
        }
        if cx < width {
            attenuate_row(&src[cx * 4..], &mut dst[cx * 4..]);
        }
    }
}
