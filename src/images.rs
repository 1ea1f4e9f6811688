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
use crate::plane::{PlaneMut, PlaneRef};
use crate::yuv_support::YuvChromaSample;
use crate::YuvError;

#[derive(Debug, Clone)]
/// Non-representation of planar YUV image
///
/// Negative `height` means the image is stored bottom-up.
pub struct YuvPlanarImage<'a> {
    pub y_plane: &'a [u8],
    /// Stride here always means bytes per row, may be negative
    pub y_stride: i32,
    pub u_plane: &'a [u8],
    pub u_stride: i32,
    pub v_plane: &'a [u8],
    pub v_stride: i32,
    pub width: i32,
    pub height: i32,
}

impl<'a> YuvPlanarImage<'a> {
    /// Luma, U and V planes for `width x rows` luma samples.
    pub(crate) fn planes(
        &self,
        sampling: YuvChromaSample,
        width: usize,
        rows: usize,
    ) -> Result<(PlaneRef<'a>, PlaneRef<'a>, PlaneRef<'a>), YuvError> {
        let chroma_width = sampling.chroma_width(width);
        let chroma_rows = sampling.chroma_height(rows);
        let y = PlaneRef::new(self.y_plane, self.y_stride, width, rows)?;
        let u = PlaneRef::new(self.u_plane, self.u_stride, chroma_width, chroma_rows)?;
        let v = PlaneRef::new(self.v_plane, self.v_stride, chroma_width, chroma_rows)?;
        Ok((y, u, v))
    }
}

#[derive(Debug)]
/// Mutable planar YUV destination. Geometry comes from the operation writing into it.
pub struct YuvPlanarImageMut<'a> {
    pub y_plane: &'a mut [u8],
    pub y_stride: i32,
    pub u_plane: &'a mut [u8],
    pub u_stride: i32,
    pub v_plane: &'a mut [u8],
    pub v_stride: i32,
}

impl YuvPlanarImageMut<'_> {
    pub(crate) fn planes(
        &mut self,
        sampling: YuvChromaSample,
        width: usize,
        rows: usize,
    ) -> Result<(PlaneMut<'_>, PlaneMut<'_>, PlaneMut<'_>), YuvError> {
        let chroma_width = sampling.chroma_width(width);
        let chroma_rows = sampling.chroma_height(rows);
        let y = PlaneMut::new(self.y_plane, self.y_stride, width, rows)?;
        let u = PlaneMut::new(self.u_plane, self.u_stride, chroma_width, chroma_rows)?;
        let v = PlaneMut::new(self.v_plane, self.v_stride, chroma_width, chroma_rows)?;
        Ok((y, u, v))
    }
}

#[derive(Debug, Clone)]
/// Non-representation of Bi-Planar YUV image, interleaved chroma is always 4:2:0
pub struct YuvBiPlanarImage<'a> {
    pub y_plane: &'a [u8],
    pub y_stride: i32,
    pub uv_plane: &'a [u8],
    pub uv_stride: i32,
    pub width: i32,
    pub height: i32,
}

impl<'a> YuvBiPlanarImage<'a> {
    pub(crate) fn planes(
        &self,
        width: usize,
        rows: usize,
    ) -> Result<(PlaneRef<'a>, PlaneRef<'a>), YuvError> {
        let chroma_width = YuvChromaSample::Yuv420.chroma_width(width);
        let chroma_rows = YuvChromaSample::Yuv420.chroma_height(rows);
        let y = PlaneRef::new(self.y_plane, self.y_stride, width, rows)?;
        let uv = PlaneRef::new(self.uv_plane, self.uv_stride, chroma_width * 2, chroma_rows)?;
        Ok((y, uv))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_planar_image_geometry() {
        let y = vec![0u8; 5 * 3];
        let u = vec![0u8; 3 * 2];
        let v = vec![0u8; 3 * 2];
        let image = YuvPlanarImage {
            y_plane: &y,
            y_stride: 5,
            u_plane: &u,
            u_stride: 3,
            v_plane: &v,
            v_stride: 3,
            width: 5,
            height: 3,
        };
        assert!(image.planes(YuvChromaSample::Yuv420, 5, 3).is_ok());
        assert!(image.planes(YuvChromaSample::Yuv422, 5, 3).is_err());
    }

    #[test]
    fn test_bi_planar_geometry() {
        let y = vec![0u8; 4 * 4];
        let uv = vec![0u8; 4 * 2];
        let image = YuvBiPlanarImage {
            y_plane: &y,
            y_stride: 4,
            uv_plane: &uv,
            uv_stride: 4,
            width: 4,
            height: 4,
        };
        assert!(image.planes(4, 4).is_ok());
        assert!(image.planes(4, 5).is_err());
    }
}
