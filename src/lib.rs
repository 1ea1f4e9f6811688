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
#![deny(deprecated)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::manual_range_contains)]
//! Pixel buffer conversion, compositing and scaling over strided planes.
//!
//! Every operation is driven row by row: a row kernel is selected once per call from the
//! accelerated candidates the running CPU supports, with the portable kernel finishing
//! whatever the accelerated kernel cannot take.

#[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "avx"))]
mod avx2;
#[cfg(all(target_arch = "aarch64", feature = "neon"))]
mod neon;
#[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "sse"))]
mod sse;

mod attenuate;
mod blend;
mod copy_plane;
mod cpu;
mod dispatch;
mod fill;
mod images;
mod numerics;
mod plane;
mod rgb_to_y;
mod scale;
mod scale_argb;
mod scale_rows;
mod shuffle;
mod uv_plane;
mod y_to_rgb;
mod yuv_error;
mod yuv_nv;
mod yuv_support;
mod yuv_to_rgba;
mod yuv_to_yuy2;
mod yuy2_to_rgb;
mod yuy2_to_yuv;

pub use cpu::{has_cpu_feature, CpuFeature, CpuFeatures};
pub use images::{YuvBiPlanarImage, YuvPlanarImage, YuvPlanarImageMut};
pub use plane::MAX_STRIDE;
pub use yuv_error::{status, MismatchedSize, YuvError};
pub use yuv_support::{PixelLayout, YuvChromaSample, YuvConstants, YuvStandardMatrix};

pub use copy_plane::{argb_copy, argb_mirror, copy_plane, i420_copy, i420_mirror, mirror_plane};
pub use fill::{argb_rect, i420_rect, set_plane};
pub use uv_plane::{merge_uv_plane, nv12_to_i420, nv21_to_i420, split_uv_plane};

pub use yuv_to_rgba::i420_to_abgr;
pub use yuv_to_rgba::i420_to_argb;
pub use yuv_to_rgba::i420_to_bgra;
pub use yuv_to_rgba::i420_to_raw;
pub use yuv_to_rgba::i420_to_rgb24;
pub use yuv_to_rgba::i420_to_rgb565;
pub use yuv_to_rgba::i420_to_rgba;
pub use yuv_to_rgba::i422_to_argb;
pub use yuv_to_rgba::i444_to_argb;

pub use yuv_nv::{nv12_to_argb, nv12_to_rgb565, nv21_to_argb};
pub use y_to_rgb::{i400_to_argb, y_to_argb};

pub use shuffle::abgr_to_argb;
pub use shuffle::argb_to_abgr;
pub use shuffle::argb_to_bgra;
pub use shuffle::argb_to_raw;
pub use shuffle::argb_to_rgb24;
pub use shuffle::argb_to_rgb565;
pub use shuffle::argb_to_rgba;
pub use shuffle::bgra_to_argb;
pub use shuffle::raw_to_argb;
pub use shuffle::rgb24_to_argb;
pub use shuffle::rgba_to_argb;

pub use rgb_to_y::argb_to_i400;

pub use yuv_to_yuy2::{i422_to_uyvy, i422_to_yuy2};
pub use yuy2_to_rgb::{uyvy_to_argb, yuy2_to_argb};
pub use yuy2_to_yuv::{uyvy_to_i422, yuy2_to_i422};

pub use attenuate::{argb_attenuate, argb_unattenuate};
pub use blend::argb_blend;

pub use scale::{i420_scale, scale_plane, FilterMode};
pub use scale_argb::scale_argb;
