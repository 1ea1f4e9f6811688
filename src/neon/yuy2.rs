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
use crate::yuv_support::Yuy2Description;
use crate::yuv_to_yuy2::yuv_to_yuy2_row;
use crate::yuy2_to_yuv::yuy2_to_yuv_row;
use std::arch::aarch64::*;

pub(crate) unsafe fn yuy2_to_yuv_row_neon<const YUY2_SOURCE: u8>(
    yuy2: &[u8],
    y_row: &mut [u8],
    u_row: &mut [u8],
    v_row: &mut [u8],
) {
    unsafe {
        let source: Yuy2Description = YUY2_SOURCE.into();
        let width = y_row.len();
        let mut cx = 0usize;
        while cx + 16 <= width {
            let px = vld4_u8(yuy2.as_ptr().add(cx * 2));
            let (y0, u, y1, v) = match source {
                Yuy2Description::YUYV => (px.0, px.1, px.2, px.3),
                Yuy2Description::UYVY => (px.1, px.0, px.3, px.2),
            };
            let uv = cx / 2;
            vst2_u8(y_row.as_mut_ptr().add(cx), uint8x8x2_t(y0, y1));
            vst1_u8(u_row.as_mut_ptr().add(uv), u);
            vst1_u8(v_row.as_mut_ptr().add(uv), v);
            cx += 16;
        }
        if cx < width {
            let uv = cx / 2;
            yuy2_to_yuv_row::<YUY2_SOURCE>(
                &yuy2[cx * 2..],
                &mut y_row[cx..],
                &mut u_row[uv..],
                &mut v_row[uv..],
            );
        }
    }
}

pub(crate) unsafe fn yuv_to_yuy2_row_neon<const YUY2_TARGET: u8>(
    y_row: &[u8],
    u_row: &[u8],
    v_row: &[u8],
    yuy2: &mut [u8],
) {
    unsafe {
        let target: Yuy2Description = YUY2_TARGET.into();
        let width = y_row.len();
        let mut cx = 0usize;
        while cx + 16 <= width {
            let uv = cx / 2;
            let y = vld2_u8(y_row.as_ptr().add(cx));
            let u = vld1_u8(u_row.as_ptr().add(uv));
            let v = vld1_u8(v_row.as_ptr().add(uv));
            let px = match target {
                Yuy2Description::YUYV => uint8x8x4_t(y.0, u, y.1, v),
                Yuy2Description::UYVY => uint8x8x4_t(u, y.0, v, y.1),
            };
            vst4_u8(yuy2.as_mut_ptr().add(cx * 2), px);
            cx += 16;
        }
        if cx < width {
            let uv = cx / 2;
            yuv_to_yuy2_row::<YUY2_TARGET>(
                &y_row[cx..],
                &u_row[uv..],
                &v_row[uv..],
                &mut yuy2[cx * 2..],
            );
        }
    }
}
