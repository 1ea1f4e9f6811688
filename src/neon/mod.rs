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
#![deny(unreachable_code, unreachable_pub)]
mod alpha;
mod copy;
mod scale;
mod shuffle;
mod yuv_to_rgba;
mod yuy2;

pub(crate) use alpha::{attenuate_row_neon, blend_row_neon};
pub(crate) use copy::{
    argb_mirror_row_neon, copy_row_neon, merge_uv_row_neon, mirror_row_neon, set_row_neon,
    split_uv_row_neon,
};
pub(crate) use scale::{
    argb_scale_row_down2_box_neon, argb_scale_row_down2_linear_neon, argb_scale_row_down2_neon,
    interpolate_row_neon, scale_add_row_neon, scale_row_down2_box_neon,
    scale_row_down2_linear_neon, scale_row_down2_neon, scale_row_down4_box_neon,
    scale_row_down4_neon,
};
pub(crate) use shuffle::{rgb_to_y_row_neon, shuffle_row_neon};
pub(crate) use yuv_to_rgba::{gray_to_argb_row_neon, yuv_to_rgba_row_neon};
pub(crate) use yuy2::{yuv_to_yuy2_row_neon, yuy2_to_yuv_row_neon};
