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
use crate::yuv_support::{PixelLayout, YuvChromaSample, YuvConstants};
use crate::yuv_to_rgba::yuv_to_rgba_row;
#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

#[inline(always)]
unsafe fn avx_clamp_channel(v: __m256i, shift: usize) -> __m256i {
    let v = _mm256_min_epi32(_mm256_max_epi32(v, _mm256_setzero_si256()), _mm256_set1_epi32(255));
    _mm256_sllv_epi32(v, _mm256_set1_epi32((shift * 8) as i32))
}

/// 16 pixels per step, each 8 pixel half is computed as packed 32 bit words.
#[target_feature(enable = "avx2")]
pub(crate) unsafe fn yuv_to_rgba_row_avx2<const LAYOUT: u8, const SAMPLING: u8>(
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
        let v_yg = _mm256_set1_epi32(constants.yg);
        let v_257 = _mm256_set1_epi32(0x0101);
        let v_ub = _mm256_set1_epi32(constants.ub);
        let v_ug = _mm256_set1_epi32(constants.ug);
        let v_vg = _mm256_set1_epi32(constants.vg);
        let v_vr = _mm256_set1_epi32(constants.vr);
        let v_bb = _mm256_set1_epi32(constants.bb);
        let v_bg = _mm256_set1_epi32(constants.bg);
        let v_br = _mm256_set1_epi32(constants.br);
        let alpha = _mm256_set1_epi32((255u32 << (layout.get_a_channel_offset() * 8)) as i32);
        let duplicate = _mm256_setr_epi32(0, 0, 1, 1, 2, 2, 3, 3);

        let mut cx = 0usize;
        while cx + 16 <= width {
            for half in 0..2 {
                let px = cx + half * 8;
                let y = _mm256_cvtepu8_epi32(_mm_loadl_epi64(
                    y_row.as_ptr().add(px) as *const __m128i
                ));
                let (u, v) = match sampling {
                    YuvChromaSample::Yuv420 | YuvChromaSample::Yuv422 => {
                        let u = _mm256_cvtepu8_epi32(_mm_cvtsi32_si128(
                            (u_row.as_ptr().add(px / 2) as *const i32).read_unaligned(),
                        ));
                        let v = _mm256_cvtepu8_epi32(_mm_cvtsi32_si128(
                            (v_row.as_ptr().add(px / 2) as *const i32).read_unaligned(),
                        ));
                        (
                            _mm256_permutevar8x32_epi32(u, duplicate),
                            _mm256_permutevar8x32_epi32(v, duplicate),
                        )
                    }
                    YuvChromaSample::Yuv444 => (
                        _mm256_cvtepu8_epi32(_mm_loadl_epi64(
                            u_row.as_ptr().add(px) as *const __m128i
                        )),
                        _mm256_cvtepu8_epi32(_mm_loadl_epi64(
                            v_row.as_ptr().add(px) as *const __m128i
                        )),
                    ),
                };

                let y1 = _mm256_srli_epi32::<16>(_mm256_mullo_epi32(
                    _mm256_mullo_epi32(y, v_257),
                    v_yg,
                ));
                let b = _mm256_srai_epi32::<6>(_mm256_sub_epi32(
                    _mm256_add_epi32(y1, v_bb),
                    _mm256_mullo_epi32(u, v_ub),
                ));
                let g = _mm256_srai_epi32::<6>(_mm256_sub_epi32(
                    _mm256_add_epi32(y1, v_bg),
                    _mm256_add_epi32(_mm256_mullo_epi32(u, v_ug), _mm256_mullo_epi32(v, v_vg)),
                ));
                let r = _mm256_srai_epi32::<6>(_mm256_sub_epi32(
                    _mm256_add_epi32(y1, v_br),
                    _mm256_mullo_epi32(v, v_vr),
                ));

                let pixels = _mm256_or_si256(
                    _mm256_or_si256(
                        avx_clamp_channel(r, layout.get_r_channel_offset()),
                        avx_clamp_channel(g, layout.get_g_channel_offset()),
                    ),
                    _mm256_or_si256(avx_clamp_channel(b, layout.get_b_channel_offset()), alpha),
                );
                _mm256_storeu_si256(rgba.as_mut_ptr().add(px * 4) as *mut __m256i, pixels);
            }
            cx += 16;
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
