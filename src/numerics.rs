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
#![forbid(unsafe_code)]
use crate::yuv_support::{PixelLayout, YuvConstants};

#[inline(always)]
pub(crate) fn clamp255(v: i32) -> u8 {
    num_traits::clamp(v, 0, 255) as u8
}

#[inline]
/// Integer division by 255 with rounding to nearest
///
/// Matches `(v + 127) / 255` for every `v` up to `255 * 255`.
pub(crate) fn div_by_255(v: u16) -> u8 {
    ((((v + 0x80) >> 8) + v + 0x80) >> 8) as u8
}

/// Fixed point YUV to BGR for one sample triple.
#[inline(always)]
pub(crate) fn yuv_pixel(y: u8, u: u8, v: u8, c: &YuvConstants) -> (u8, u8, u8) {
    let y1 = ((y as u32 * 0x0101 * c.yg as u32) >> 16) as i32;
    let u = u as i32;
    let v = v as i32;
    let b = clamp255((-(u * c.ub) + y1 + c.bb) >> 6);
    let g = clamp255((-(u * c.ug + v * c.vg) + y1 + c.bg) >> 6);
    let r = clamp255((-(v * c.vr) + y1 + c.br) >> 6);
    (b, g, r)
}

/// BT.601 studio luma from R, G, B.
#[inline(always)]
pub(crate) fn rgb_to_y(r: u8, g: u8, b: u8) -> u8 {
    let y = (66 * r as i32 + 129 * g as i32 + 25 * b as i32 + 0x1080) >> 8;
    clamp255(y)
}

#[inline(always)]
pub(crate) fn pack_rgb565(r: u8, g: u8, b: u8) -> u16 {
    let r5 = ((r as u16 + 4) >> 3).min(31);
    let g6 = ((g as u16 + 2) >> 2).min(63);
    let b5 = ((b as u16 + 4) >> 3).min(31);
    b5 | (g6 << 5) | (r5 << 11)
}

/// Writes one pixel in `LAYOUT` order, `dst` must hold at least one pixel.
#[inline(always)]
pub(crate) fn store_pixel<const LAYOUT: u8>(dst: &mut [u8], r: u8, g: u8, b: u8, a: u8) {
    let layout: PixelLayout = LAYOUT.into();
    if layout == PixelLayout::Rgb565 {
        let packed = pack_rgb565(r, g, b).to_le_bytes();
        dst[0] = packed[0];
        dst[1] = packed[1];
        return;
    }
    dst[layout.get_r_channel_offset()] = r;
    dst[layout.get_g_channel_offset()] = g;
    dst[layout.get_b_channel_offset()] = b;
    if layout.has_alpha() {
        dst[layout.get_a_channel_offset()] = a;
    }
}

/// `round(2^24 / a)` with `0` for `a == 0`.
const fn make_inverse_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut a = 1u32;
    while a < 256 {
        table[a as usize] = ((1u32 << 24) + a / 2) / a;
        a += 1;
    }
    table
}

pub(crate) static FIXED_INV_TABLE: [u32; 256] = make_inverse_table();

#[inline(always)]
pub(crate) fn attenuate_channel(c: u8, a: u8) -> u8 {
    div_by_255(c as u16 * a as u16)
}

#[inline(always)]
pub(crate) fn unattenuate_channel(c: u8, a: u8) -> u8 {
    if a == 0 {
        return c;
    }
    let v = (c as u32 * FIXED_INV_TABLE[a as usize] + 0x8000) >> 16;
    v.min(255) as u8
}

/// `(a * fg + (255 - a) * bg + 127) / 255`
#[inline(always)]
pub(crate) fn blend_channel(fg: u8, bg: u8, a: u8) -> u8 {
    div_by_255(a as u16 * fg as u16 + (255 - a as u16) * bg as u16)
}

/// 16.16 bilinear blend between two samples.
#[inline(always)]
pub(crate) fn blend_fraction(a: u8, b: u8, f: i32) -> u8 {
    (a as i32 + ((f * (b as i32 - a as i32) + 0x8000) >> 16)) as u8
}
