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
use crate::cpu::{CpuFeature, CpuFeatures};

/// Width predicate of an accelerated row kernel.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum WidthRule {
    /// Handles any width by itself
    Any,
    /// Whole row must be a multiple of the block
    MultipleOf(usize),
    /// Kernel runs over the aligned prefix, the reference kernel finishes the tail
    AtLeast(usize),
}

impl WidthRule {
    #[inline]
    pub(crate) const fn admits(self, width: usize) -> bool {
        match self {
            WidthRule::Any => true,
            WidthRule::MultipleOf(block) => width % block == 0,
            WidthRule::AtLeast(block) => width >= block,
        }
    }

    #[inline]
    pub(crate) const fn block(self) -> usize {
        match self {
            WidthRule::Any => 1,
            WidthRule::MultipleOf(block) | WidthRule::AtLeast(block) => block,
        }
    }
}

/// One accelerated candidate for a row operation.
///
/// `alignment` is the byte alignment every row pointer and stride touched by the kernel
/// must have; `1` means unaligned access is fine.
#[derive(Copy, Clone)]
pub(crate) struct KernelDescriptor<F> {
    pub(crate) name: &'static str,
    pub(crate) feature: CpuFeature,
    pub(crate) width: WidthRule,
    pub(crate) alignment: usize,
    pub(crate) kernel: F,
}

impl<F> KernelDescriptor<F> {
    #[inline]
    fn is_eligible(&self, features: CpuFeatures, width: usize, alignment: usize) -> bool {
        features.has(self.feature)
            && self.width.admits(width)
            && alignment % self.alignment.max(1) == 0
    }
}

/// Row kernel chosen for one invocation together with its reference fallback.
#[derive(Copy, Clone)]
pub(crate) struct RowKernel<F> {
    pub(crate) name: &'static str,
    pub(crate) kernel: F,
    pub(crate) reference: F,
    pub(crate) block: usize,
}

impl<F: Copy> RowKernel<F> {
    /// Reference kernel only.
    #[inline]
    pub(crate) const fn reference(name: &'static str, reference: F) -> RowKernel<F> {
        RowKernel {
            name,
            kernel: reference,
            reference,
            block: 1,
        }
    }

    /// Splits `width` into the aligned bulk and the remainder and hands each part to `apply`
    /// as `(kernel, start, count)`.
    ///
    /// The bulk always starts at zero and the remainder starts at the end of the bulk, so
    /// every column is visited exactly once.
    #[inline(always)]
    pub(crate) fn split<A: FnMut(F, usize, usize)>(&self, width: usize, mut apply: A) {
        let (aligned, remainder) = split_width(width, self.block);
        if aligned > 0 {
            apply(self.kernel, 0, aligned);
        }
        if remainder > 0 {
            apply(self.reference, aligned, remainder);
        }
    }
}

/// `(aligned, remainder)` such that `aligned + remainder == width` and `aligned` is a multiple
/// of `block`.
#[inline]
pub(crate) const fn split_width(width: usize, block: usize) -> (usize, usize) {
    if block <= 1 {
        return (width, 0);
    }
    let remainder = width % block;
    (width - remainder, remainder)
}

/// Picks the first eligible candidate or the reference kernel.
///
/// Candidates are ordered most specialized first. Evaluated once per call.
pub(crate) fn select_kernel<F: Copy>(
    operation: &'static str,
    candidates: &[KernelDescriptor<F>],
    reference: F,
    features: CpuFeatures,
    width: usize,
    alignment: usize,
) -> RowKernel<F> {
    let selected = candidates
        .iter()
        .find(|c| c.is_eligible(features, width, alignment))
        .map(|c| RowKernel {
            name: c.name,
            kernel: c.kernel,
            reference,
            block: c.width.block(),
        })
        .unwrap_or(RowKernel::reference(operation, reference));
    log::trace!(
        "{}: width {} alignment {} -> {} (block {})",
        operation,
        width,
        alignment,
        selected.name,
        selected.block
    );
    selected
}

/// Largest power of two, up to 64, dividing every value.
#[inline]
pub(crate) fn common_alignment(values: &[usize]) -> usize {
    let combined = values.iter().fold(64usize, |acc, &v| acc | v);
    1 << combined.trailing_zeros()
}

#[cfg(test)]
mod tests {
    use super::*;

    type Handler = fn(&mut Vec<(usize, usize, u8)>, usize, usize);

    fn mark_fast(out: &mut Vec<(usize, usize, u8)>, start: usize, count: usize) {
        out.push((start, count, 1));
    }

    fn mark_reference(out: &mut Vec<(usize, usize, u8)>, start: usize, count: usize) {
        out.push((start, count, 0));
    }

    fn all_features() -> CpuFeatures {
        CpuFeatures::detect()
    }

    #[test]
    fn test_split_width_covers_row() {
        for block in [1usize, 2, 3, 4, 8, 16, 24, 32] {
            for width in 0..200usize {
                let (aligned, remainder) = split_width(width, block);
                assert_eq!(aligned + remainder, width);
                assert_eq!(aligned % block, 0);
                assert!(remainder < block.max(1));
            }
        }
    }

    #[test]
    fn test_split_visits_each_column_once() {
        let kernel = RowKernel::<Handler> {
            name: "test",
            kernel: mark_fast,
            reference: mark_reference,
            block: 16,
        };
        for width in 0..70usize {
            let mut visited = vec![0u8; width];
            let mut log = Vec::new();
            kernel.split(width, |f, start, count| {
                f(&mut log, start, count);
                for v in visited.iter_mut().skip(start).take(count) {
                    *v += 1;
                }
            });
            assert!(visited.iter().all(|&v| v == 1), "width {}", width);
            if width >= 16 {
                assert_eq!(log[0], (0, width - width % 16, 1));
            }
        }
    }

    #[test]
    fn test_selector_respects_predicates() {
        let features = all_features();
        let Some(feature) = CpuFeature::ALL.iter().copied().find(|&f| features.has(f)) else {
            return;
        };
        let candidates: &[KernelDescriptor<Handler>] = &[KernelDescriptor {
            name: "fast",
            feature,
            width: WidthRule::MultipleOf(16),
            alignment: 16,
            kernel: mark_fast,
        }];
        let k = select_kernel("t", candidates, mark_reference as Handler, features, 32, 16);
        assert_eq!(k.name, "fast");
        assert_eq!(k.block, 16);
        let k = select_kernel("t", candidates, mark_reference as Handler, features, 33, 16);
        assert_eq!(k.name, "t");
        let k = select_kernel("t", candidates, mark_reference as Handler, features, 32, 8);
        assert_eq!(k.name, "t");
        let k = select_kernel(
            "t",
            candidates,
            mark_reference as Handler,
            features.without(feature),
            32,
            64,
        );
        assert_eq!(k.name, "t");
        assert_eq!(k.block, 1);
    }

    #[test]
    fn test_selector_first_eligible_wins() {
        let features = all_features();
        let Some(feature) = CpuFeature::ALL.iter().copied().find(|&f| features.has(f)) else {
            return;
        };
        let candidates: &[KernelDescriptor<Handler>] = &[
            KernelDescriptor {
                name: "wide",
                feature,
                width: WidthRule::AtLeast(32),
                alignment: 1,
                kernel: mark_fast,
            },
            KernelDescriptor {
                name: "narrow",
                feature,
                width: WidthRule::AtLeast(8),
                alignment: 1,
                kernel: mark_fast,
            },
        ];
        assert_eq!(
            select_kernel("t", candidates, mark_reference as Handler, features, 40, 1).name,
            "wide"
        );
        assert_eq!(
            select_kernel("t", candidates, mark_reference as Handler, features, 20, 1).name,
            "narrow"
        );
        assert_eq!(
            select_kernel("t", candidates, mark_reference as Handler, features, 7, 1).name,
            "t"
        );
    }

    #[test]
    fn test_common_alignment() {
        assert_eq!(common_alignment(&[]), 64);
        assert_eq!(common_alignment(&[0]), 64);
        assert_eq!(common_alignment(&[128, 256]), 64);
        assert_eq!(common_alignment(&[32, 48]), 16);
        assert_eq!(common_alignment(&[17]), 1);
    }
}
