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
/// Byte order of a packed pixel in memory.
///
/// Names follow the little-endian word convention: `Argb` is stored as B, G, R, A.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PixelLayout {
    Argb = 0,
    Abgr = 1,
    Bgra = 2,
    Rgba = 3,
    Rgb24 = 4,
    Raw = 5,
    Rgb565 = 6,
}

impl From<u8> for PixelLayout {
    #[inline(always)]
    fn from(value: u8) -> Self {
        match value {
            0 => PixelLayout::Argb,
            1 => PixelLayout::Abgr,
            2 => PixelLayout::Bgra,
            3 => PixelLayout::Rgba,
            4 => PixelLayout::Rgb24,
            5 => PixelLayout::Raw,
            6 => PixelLayout::Rgb565,
            _ => {
                panic!("Unknown value")
            }
        }
    }
}

impl PixelLayout {
    #[inline(always)]
    pub const fn get_channels_count(&self) -> usize {
        match self {
            PixelLayout::Argb | PixelLayout::Abgr | PixelLayout::Bgra | PixelLayout::Rgba => 4,
            PixelLayout::Rgb24 | PixelLayout::Raw => 3,
            PixelLayout::Rgb565 => 2,
        }
    }

    #[inline(always)]
    pub const fn has_alpha(&self) -> bool {
        match self {
            PixelLayout::Argb | PixelLayout::Abgr | PixelLayout::Bgra | PixelLayout::Rgba => true,
            PixelLayout::Rgb24 | PixelLayout::Raw | PixelLayout::Rgb565 => false,
        }
    }
}

impl PixelLayout {
    #[inline(always)]
    pub const fn get_r_channel_offset(&self) -> usize {
        match self {
            PixelLayout::Argb => 2,
            PixelLayout::Abgr => 0,
            PixelLayout::Bgra => 1,
            PixelLayout::Rgba => 3,
            PixelLayout::Rgb24 => 2,
            PixelLayout::Raw => 0,
            PixelLayout::Rgb565 => 0,
        }
    }

    #[inline(always)]
    pub const fn get_g_channel_offset(&self) -> usize {
        match self {
            PixelLayout::Argb | PixelLayout::Abgr | PixelLayout::Rgb24 | PixelLayout::Raw => 1,
            PixelLayout::Bgra | PixelLayout::Rgba => 2,
            PixelLayout::Rgb565 => 0,
        }
    }

    #[inline(always)]
    pub const fn get_b_channel_offset(&self) -> usize {
        match self {
            PixelLayout::Argb => 0,
            PixelLayout::Abgr => 2,
            PixelLayout::Bgra => 3,
            PixelLayout::Rgba => 1,
            PixelLayout::Rgb24 => 0,
            PixelLayout::Raw => 2,
            PixelLayout::Rgb565 => 0,
        }
    }

    #[inline(always)]
    pub const fn get_a_channel_offset(&self) -> usize {
        match self {
            PixelLayout::Argb | PixelLayout::Abgr => 3,
            PixelLayout::Bgra | PixelLayout::Rgba => 0,
            PixelLayout::Rgb24 | PixelLayout::Raw | PixelLayout::Rgb565 => 0,
        }
    }
}

/// Chroma subsampling of a planar YUV image.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum YuvChromaSample {
    Yuv420 = 0,
    Yuv422 = 1,
    Yuv444 = 2,
}

impl From<u8> for YuvChromaSample {
    #[inline(always)]
    fn from(value: u8) -> Self {
        match value {
            0 => YuvChromaSample::Yuv420,
            1 => YuvChromaSample::Yuv422,
            2 => YuvChromaSample::Yuv444,
            _ => {
                panic!("Unknown value")
            }
        }
    }
}

impl YuvChromaSample {
    #[inline]
    pub const fn chroma_width(&self, width: usize) -> usize {
        match self {
            YuvChromaSample::Yuv420 | YuvChromaSample::Yuv422 => (width + 1) >> 1,
            YuvChromaSample::Yuv444 => width,
        }
    }

    #[inline]
    pub const fn chroma_height(&self, height: usize) -> usize {
        match self {
            YuvChromaSample::Yuv420 => (height + 1) >> 1,
            YuvChromaSample::Yuv422 | YuvChromaSample::Yuv444 => height,
        }
    }

    /// Luma row to chroma row
    #[inline(always)]
    pub(crate) const fn chroma_row(&self, y: usize) -> usize {
        match self {
            YuvChromaSample::Yuv420 => y >> 1,
            YuvChromaSample::Yuv422 | YuvChromaSample::Yuv444 => y,
        }
    }
}

/// Integer YUV to RGB matrix coefficients, 6 bit fixed point.
///
/// `bb`, `bg` and `br` already fold the 128 chroma offset and the luma bias in.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct YuvConstants {
    pub ub: i32,
    pub ug: i32,
    pub vg: i32,
    pub vr: i32,
    pub bb: i32,
    pub bg: i32,
    pub br: i32,
    pub yg: i32,
}

impl YuvConstants {
    const fn new(yg: i32, ygb: i32, ub: i32, ug: i32, vg: i32, vr: i32) -> YuvConstants {
        YuvConstants {
            ub,
            ug,
            vg,
            vr,
            bb: ub * 128 + ygb,
            bg: ug * 128 + vg * 128 + ygb,
            br: vr * 128 + ygb,
            yg,
        }
    }
}

const BT601_CONSTANTS: YuvConstants = YuvConstants::new(18997, -1160, -128, 25, 52, -102);
const JPEG_CONSTANTS: YuvConstants = YuvConstants::new(16320, 32, -113, 22, 46, -90);
const BT709_CONSTANTS: YuvConstants = YuvConstants::new(18997, -1160, -128, 14, 34, -115);

/// Declares the YUV color matrix.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum YuvStandardMatrix {
    /// BT.601, limited range
    #[default]
    Bt601,
    /// BT.601, full range
    Jpeg,
    /// BT.709, limited range
    Bt709,
}

impl YuvStandardMatrix {
    #[inline]
    pub const fn constants(self) -> YuvConstants {
        match self {
            YuvStandardMatrix::Bt601 => BT601_CONSTANTS,
            YuvStandardMatrix::Jpeg => JPEG_CONSTANTS,
            YuvStandardMatrix::Bt709 => BT709_CONSTANTS,
        }
    }
}

/// Byte positions inside a packed 4:2:2 macropixel.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Yuy2Description {
    YUYV = 0,
    UYVY = 1,
}

impl From<u8> for Yuy2Description {
    fn from(value: u8) -> Self {
        match value {
            0 => Yuy2Description::YUYV,
            1 => Yuy2Description::UYVY,
            _ => {
                panic!("Not supported value {}", value)
            }
        }
    }
}

impl Yuy2Description {
    #[inline]
    pub(crate) const fn get_u_position(&self) -> usize {
        match self {
            Yuy2Description::YUYV => 1,
            Yuy2Description::UYVY => 0,
        }
    }

    #[inline]
    pub(crate) const fn get_v_position(&self) -> usize {
        match self {
            Yuy2Description::YUYV => 3,
            Yuy2Description::UYVY => 2,
        }
    }

    #[inline(always)]
    pub(crate) const fn get_first_y_position(&self) -> usize {
        match self {
            Yuy2Description::YUYV => 0,
            Yuy2Description::UYVY => 1,
        }
    }

    #[inline]
    pub(crate) const fn get_second_y_position(&self) -> usize {
        match self {
            Yuy2Description::YUYV => 2,
            Yuy2Description::UYVY => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_offsets_are_distinct() {
        for layout in [
            PixelLayout::Argb,
            PixelLayout::Abgr,
            PixelLayout::Bgra,
            PixelLayout::Rgba,
            PixelLayout::Rgb24,
            PixelLayout::Raw,
        ] {
            let mut seen = [false; 4];
            let mut offsets = vec![
                layout.get_r_channel_offset(),
                layout.get_g_channel_offset(),
                layout.get_b_channel_offset(),
            ];
            if layout.has_alpha() {
                offsets.push(layout.get_a_channel_offset());
            }
            for o in offsets {
                assert!(o < layout.get_channels_count());
                assert!(!seen[o], "{:?}", layout);
                seen[o] = true;
            }
            assert_eq!(PixelLayout::from(layout as u8), layout);
        }
    }

    #[test]
    fn test_chroma_geometry() {
        assert_eq!(YuvChromaSample::Yuv420.chroma_width(5), 3);
        assert_eq!(YuvChromaSample::Yuv420.chroma_height(5), 3);
        assert_eq!(YuvChromaSample::Yuv422.chroma_height(5), 5);
        assert_eq!(YuvChromaSample::Yuv444.chroma_width(5), 5);
        assert_eq!(YuvChromaSample::Yuv420.chroma_row(3), 1);
    }

    #[test]
    fn test_bt601_biases() {
        let c = YuvStandardMatrix::Bt601.constants();
        assert_eq!(c.bb, -128 * 128 - 1160);
        assert_eq!(c.bg, 25 * 128 + 52 * 128 - 1160);
        assert_eq!(c.br, -102 * 128 - 1160);
    }
}
