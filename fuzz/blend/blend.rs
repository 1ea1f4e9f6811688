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
use yuvplane::{argb_attenuate, argb_blend, argb_unattenuate};

fuzz_target!(|data: (u8, u8, u8, u8, u8)| {
    fuzz_blend(data.0, data.1, data.2, data.3, data.4);
});

fn fuzz_blend(i_width: u8, i_height: u8, bottom_value: u8, top_value: u8, alpha: u8) {
    if i_height == 0 || i_width == 0 {
        return;
    }
    let width = i_width as usize;
    let height = i_height as usize;
    let stride = width as i32 * 4;

    let bottom = vec![bottom_value; width * height * 4];
    let top: Vec<u8> = [top_value, top_value, top_value, alpha]
        .iter()
        .copied()
        .cycle()
        .take(width * height * 4)
        .collect();
    let mut blended = vec![0u8; width * height * 4];
    argb_blend(
        &bottom,
        stride,
        &top,
        stride,
        &mut blended,
        stride,
        width as i32,
        height as i32,
    )
    .unwrap();
    assert!(blended.chunks_exact(4).all(|px| px[3] == 255));

    let mut premultiplied = vec![0u8; width * height * 4];
    argb_attenuate(
        &top,
        stride,
        &mut premultiplied,
        stride,
        width as i32,
        height as i32,
    )
    .unwrap();

    let mut restored = vec![0u8; width * height * 4];
    argb_unattenuate(
        &premultiplied,
        stride,
        &mut restored,
        stride,
        width as i32,
        height as i32,
    )
    .unwrap();
}
