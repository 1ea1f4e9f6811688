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
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Instant;
use yuvplane::{
    argb_blend, argb_to_i400, i420_scale, i420_to_argb, scale_argb, CpuFeature, CpuFeatures,
    FilterMode, YuvPlanarImage, YuvPlanarImageMut, YuvStandardMatrix,
};

fn main() {
    let features = CpuFeatures::detect();
    println!("Detected features: {:#x}", features.bits());
    for feature in CpuFeature::ALL {
        println!("  {:?}: {}", feature, features.has(feature));
    }

    let width = 1283usize;
    let height = 721usize;
    let chroma_width = width.div_ceil(2);
    let chroma_height = height.div_ceil(2);

    let mut rng = StdRng::seed_from_u64(42);
    let y_plane: Vec<u8> = (0..width * height).map(|_| rng.random::<u8>()).collect();
    let u_plane = vec![128u8; chroma_width * chroma_height];
    let v_plane = vec![128u8; chroma_width * chroma_height];

    let planar_image = YuvPlanarImage {
        y_plane: &y_plane,
        y_stride: width as i32,
        u_plane: &u_plane,
        u_stride: chroma_width as i32,
        v_plane: &v_plane,
        v_stride: chroma_width as i32,
        width: width as i32,
        height: height as i32,
    };

    let mut argb = vec![0u8; width * height * 4];
    let start = Instant::now();
    i420_to_argb(
        &planar_image,
        &mut argb,
        width as i32 * 4,
        YuvStandardMatrix::Bt601,
    )
    .unwrap();
    println!("I420 -> ARGB: {:?}", start.elapsed());

    let mut luma = vec![0u8; width * height];
    argb_to_i400(
        &argb,
        width as i32 * 4,
        &mut luma,
        width as i32,
        width as i32,
        height as i32,
    )
    .unwrap();
    let max_diff = y_plane
        .iter()
        .zip(luma.iter())
        .map(|(&a, &b)| (a as i32 - b as i32).abs())
        .max()
        .unwrap_or(0);
    println!("Luma round trip max divergence: {max_diff}");

    let mut blended = vec![0u8; width * height * 4];
    let top: Vec<u8> = (0..width * height * 4).map(|_| rng.random::<u8>()).collect();
    argb_blend(
        &argb,
        width as i32 * 4,
        &top,
        width as i32 * 4,
        &mut blended,
        width as i32 * 4,
        width as i32,
        height as i32,
    )
    .unwrap();

    let dst_width = width / 3;
    let dst_height = height / 3;
    let mut scaled = vec![0u8; dst_width * dst_height * 4];
    for filter in [
        FilterMode::None,
        FilterMode::Linear,
        FilterMode::Bilinear,
        FilterMode::Box,
    ] {
        let start = Instant::now();
        scale_argb(
            &blended,
            width as i32 * 4,
            width as i32,
            height as i32,
            &mut scaled,
            dst_width as i32 * 4,
            dst_width as i32,
            dst_height as i32,
            filter,
        )
        .unwrap();
        println!(
            "ARGB {width}x{height} -> {dst_width}x{dst_height} {:?}: {:?}",
            filter,
            start.elapsed()
        );
    }

    let half_width = width / 2;
    let half_height = height / 2;
    let half_chroma_width = half_width.div_ceil(2);
    let half_chroma_height = half_height.div_ceil(2);
    let mut dst_y = vec![0u8; half_width * half_height];
    let mut dst_u = vec![0u8; half_chroma_width * half_chroma_height];
    let mut dst_v = vec![0u8; half_chroma_width * half_chroma_height];
    let mut dst_image = YuvPlanarImageMut {
        y_plane: &mut dst_y,
        y_stride: half_width as i32,
        u_plane: &mut dst_u,
        u_stride: half_chroma_width as i32,
        v_plane: &mut dst_v,
        v_stride: half_chroma_width as i32,
    };
    i420_scale(
        &planar_image,
        &mut dst_image,
        half_width as i32,
        half_height as i32,
        FilterMode::Box,
    )
    .unwrap();
    println!("I420 {width}x{height} -> {half_width}x{half_height} done");
}
