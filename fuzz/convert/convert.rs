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
use yuvplane::{
    i420_to_argb, i420_to_rgb24, i420_to_rgb565, i422_to_argb, i444_to_argb, nv12_to_argb,
    nv21_to_argb, yuy2_to_argb, YuvBiPlanarImage, YuvPlanarImage, YuvStandardMatrix,
};

fuzz_target!(|data: (u8, u8, u8, u8, u8, bool)| {
    let matrix = match data.4 % 3 {
        0 => YuvStandardMatrix::Bt601,
        1 => YuvStandardMatrix::Jpeg,
        _ => YuvStandardMatrix::Bt709,
    };
    fuzz_planar(data.0, data.1, data.2, data.3, matrix, data.5);
    fuzz_packed(data.0, data.1, data.2, matrix);
});

fn fuzz_planar(
    i_width: u8,
    i_height: u8,
    y_value: u8,
    uv_value: u8,
    matrix: YuvStandardMatrix,
    flip: bool,
) {
    if i_height == 0 || i_width == 0 {
        return;
    }
    let width = i_width as usize;
    let height = i_height as usize;
    let chroma_width = width.div_ceil(2);
    let chroma_height = height.div_ceil(2);
    let signed_height = if flip { -(height as i32) } else { height as i32 };

    let y_plane = vec![y_value; width * height];
    let u_plane = vec![uv_value; width * height];
    let v_plane = vec![uv_value; width * height];

    let i420 = YuvPlanarImage {
        y_plane: &y_plane,
        y_stride: width as i32,
        u_plane: &u_plane[..chroma_width * chroma_height],
        u_stride: chroma_width as i32,
        v_plane: &v_plane[..chroma_width * chroma_height],
        v_stride: chroma_width as i32,
        width: width as i32,
        height: signed_height,
    };

    let mut argb = vec![0u8; width * height * 4];
    i420_to_argb(&i420, &mut argb, width as i32 * 4, matrix).unwrap();

    let mut rgb24 = vec![0u8; width * height * 3];
    i420_to_rgb24(&i420, &mut rgb24, width as i32 * 3, matrix).unwrap();

    let mut rgb565 = vec![0u8; width * height * 2];
    i420_to_rgb565(&i420, &mut rgb565, width as i32 * 2, matrix).unwrap();

    let i422 = YuvPlanarImage {
        u_plane: &u_plane[..chroma_width * height],
        v_plane: &v_plane[..chroma_width * height],
        ..i420
    };
    i422_to_argb(&i422, &mut argb, width as i32 * 4, matrix).unwrap();

    let i444 = YuvPlanarImage {
        u_plane: &u_plane,
        u_stride: width as i32,
        v_plane: &v_plane,
        v_stride: width as i32,
        ..i420
    };
    i444_to_argb(&i444, &mut argb, width as i32 * 4, matrix).unwrap();

    let uv_plane = vec![uv_value; chroma_width * 2 * chroma_height];
    let nv12 = YuvBiPlanarImage {
        y_plane: &y_plane,
        y_stride: width as i32,
        uv_plane: &uv_plane,
        uv_stride: chroma_width as i32 * 2,
        width: width as i32,
        height: signed_height,
    };
    nv12_to_argb(&nv12, &mut argb, width as i32 * 4, matrix).unwrap();
    nv21_to_argb(&nv12, &mut argb, width as i32 * 4, matrix).unwrap();
}

fn fuzz_packed(i_width: u8, i_height: u8, value: u8, matrix: YuvStandardMatrix) {
    if i_height == 0 || i_width == 0 {
        return;
    }
    let width = i_width as usize;
    let height = i_height as usize;
    let yuy2_stride = width.div_ceil(2) * 4;
    let yuy2 = vec![value; yuy2_stride * height];
    let mut argb = vec![0u8; width * height * 4];
    yuy2_to_argb(
        &yuy2,
        yuy2_stride as i32,
        &mut argb,
        width as i32 * 4,
        width as i32,
        height as i32,
        matrix,
    )
    .unwrap();
}
