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
#![no_main]
use libfuzzer_sys::fuzz_target;
use yuvplane::{scale_argb, scale_plane, FilterMode};

fuzz_target!(|data: (u8, u8, u8, u8, u8, u8)| {
    let filter = match data.5 % 4 {
        0 => FilterMode::None,
        1 => FilterMode::Linear,
        2 => FilterMode::Bilinear,
        _ => FilterMode::Box,
    };
    fuzz_scale(data.0, data.1, data.2, data.3, data.4, filter);
});

fn fuzz_scale(
    src_width: u8,
    src_height: u8,
    dst_width: u8,
    dst_height: u8,
    value: u8,
    filter: FilterMode,
) {
    if src_width == 0 || src_height == 0 || dst_width == 0 || dst_height == 0 {
        return;
    }
    let (sw, sh) = (src_width as usize, src_height as usize);
    let (dw, dh) = (dst_width as usize, dst_height as usize);

    let src_plane: Vec<u8> = (0..sw * sh).map(|i| (i as u8).wrapping_add(value)).collect();
    let mut dst_plane = vec![0u8; dw * dh];
    scale_plane(
        &src_plane,
        sw as i32,
        sw as i32,
        sh as i32,
        &mut dst_plane,
        dw as i32,
        dw as i32,
        dh as i32,
        filter,
    )
    .unwrap();

    let src_argb: Vec<u8> = (0..sw * sh * 4)
        .map(|i| (i as u8).wrapping_mul(value))
        .collect();
    let mut dst_argb = vec![0u8; dw * dh * 4];
    scale_argb(
        &src_argb,
        sw as i32 * 4,
        sw as i32,
        sh as i32,
        &mut dst_argb,
        dw as i32 * 4,
        dw as i32,
        dh as i32,
        filter,
    )
    .unwrap();
}
