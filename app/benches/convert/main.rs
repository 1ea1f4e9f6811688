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
use criterion::{criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use yuvplane::{
    argb_attenuate, argb_blend, argb_to_rgb24, i420_to_argb, nv12_to_argb, YuvBiPlanarImage,
    YuvPlanarImage, YuvStandardMatrix,
};

const WIDTH: usize = 1920;
const HEIGHT: usize = 1080;

fn random_plane(rng: &mut StdRng, len: usize) -> Vec<u8> {
    (0..len).map(|_| rng.random::<u8>()).collect()
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let chroma_width = WIDTH.div_ceil(2);
    let chroma_height = HEIGHT.div_ceil(2);

    let y_plane = random_plane(&mut rng, WIDTH * HEIGHT);
    let u_plane = random_plane(&mut rng, chroma_width * chroma_height);
    let v_plane = random_plane(&mut rng, chroma_width * chroma_height);
    let uv_plane = random_plane(&mut rng, chroma_width * 2 * chroma_height);
    let argb0 = random_plane(&mut rng, WIDTH * HEIGHT * 4);
    let argb1 = random_plane(&mut rng, WIDTH * HEIGHT * 4);

    let planar_image = YuvPlanarImage {
        y_plane: &y_plane,
        y_stride: WIDTH as i32,
        u_plane: &u_plane,
        u_stride: chroma_width as i32,
        v_plane: &v_plane,
        v_stride: chroma_width as i32,
        width: WIDTH as i32,
        height: HEIGHT as i32,
    };

    let bi_planar_image = YuvBiPlanarImage {
        y_plane: &y_plane,
        y_stride: WIDTH as i32,
        uv_plane: &uv_plane,
        uv_stride: chroma_width as i32 * 2,
        width: WIDTH as i32,
        height: HEIGHT as i32,
    };

    let mut argb = vec![0u8; WIDTH * HEIGHT * 4];
    let mut rgb24 = vec![0u8; WIDTH * HEIGHT * 3];

    c.bench_function("yuvplane I420 -> ARGB", |b| {
        b.iter(|| {
            i420_to_argb(
                &planar_image,
                &mut argb,
                WIDTH as i32 * 4,
                YuvStandardMatrix::Bt601,
            )
            .unwrap();
        })
    });

    c.bench_function("yuvplane NV12 -> ARGB", |b| {
        b.iter(|| {
            nv12_to_argb(
                &bi_planar_image,
                &mut argb,
                WIDTH as i32 * 4,
                YuvStandardMatrix::Bt709,
            )
            .unwrap();
        })
    });

    c.bench_function("yuvplane ARGB blend", |b| {
        b.iter(|| {
            argb_blend(
                &argb0,
                WIDTH as i32 * 4,
                &argb1,
                WIDTH as i32 * 4,
                &mut argb,
                WIDTH as i32 * 4,
                WIDTH as i32,
                HEIGHT as i32,
            )
            .unwrap();
        })
    });

    c.bench_function("yuvplane ARGB attenuate", |b| {
        b.iter(|| {
            argb_attenuate(
                &argb0,
                WIDTH as i32 * 4,
                &mut argb,
                WIDTH as i32 * 4,
                WIDTH as i32,
                HEIGHT as i32,
            )
            .unwrap();
        })
    });

    c.bench_function("yuvplane ARGB -> RGB24", |b| {
        b.iter(|| {
            argb_to_rgb24(
                &argb0,
                WIDTH as i32 * 4,
                &mut rgb24,
                WIDTH as i32 * 3,
                WIDTH as i32,
                HEIGHT as i32,
            )
            .unwrap();
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
