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
use yuvplane::{scale_argb, scale_plane, FilterMode};

const SRC_WIDTH: usize = 1920;
const SRC_HEIGHT: usize = 1080;

pub fn criterion_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0x5ca1e);
    let plane: Vec<u8> = (0..SRC_WIDTH * SRC_HEIGHT)
        .map(|_| rng.random::<u8>())
        .collect();
    let argb: Vec<u8> = (0..SRC_WIDTH * SRC_HEIGHT * 4)
        .map(|_| rng.random::<u8>())
        .collect();

    let targets = [(960usize, 540usize), (480, 270), (1280, 720), (2560, 1440)];
    let filters = [
        (FilterMode::None, "None"),
        (FilterMode::Linear, "Linear"),
        (FilterMode::Bilinear, "Bilinear"),
        (FilterMode::Box, "Box"),
    ];

    for &(dst_width, dst_height) in targets.iter() {
        let mut dst_plane = vec![0u8; dst_width * dst_height];
        let mut dst_argb = vec![0u8; dst_width * dst_height * 4];
        for &(filter, filter_name) in filters.iter() {
            c.bench_function(
                &format!("yuvplane plane {dst_width}x{dst_height} {filter_name}"),
                |b| {
                    b.iter(|| {
                        scale_plane(
                            &plane,
                            SRC_WIDTH as i32,
                            SRC_WIDTH as i32,
                            SRC_HEIGHT as i32,
                            &mut dst_plane,
                            dst_width as i32,
                            dst_width as i32,
                            dst_height as i32,
                            filter,
                        )
                        .unwrap();
                    })
                },
            );
            c.bench_function(
                &format!("yuvplane ARGB {dst_width}x{dst_height} {filter_name}"),
                |b| {
                    b.iter(|| {
                        scale_argb(
                            &argb,
                            SRC_WIDTH as i32 * 4,
                            SRC_WIDTH as i32,
                            SRC_HEIGHT as i32,
                            &mut dst_argb,
                            dst_width as i32 * 4,
                            dst_width as i32,
                            dst_height as i32,
                            filter,
                        )
                        .unwrap();
                    })
                },
            );
        }
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
