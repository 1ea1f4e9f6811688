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
use std::sync::OnceLock;

/// Acceleration tier a row kernel may require.
#[repr(u32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CpuFeature {
    Sse2 = 1 << 0,
    Ssse3 = 1 << 1,
    Sse41 = 1 << 2,
    Avx2 = 1 << 3,
    Neon = 1 << 4,
}

impl CpuFeature {
    pub const ALL: [CpuFeature; 5] = [
        CpuFeature::Sse2,
        CpuFeature::Ssse3,
        CpuFeature::Sse41,
        CpuFeature::Avx2,
        CpuFeature::Neon,
    ];

    #[inline]
    const fn env_name(self) -> &'static str {
        match self {
            CpuFeature::Sse2 => "YUVPLANE_DISABLE_SSE2",
            CpuFeature::Ssse3 => "YUVPLANE_DISABLE_SSSE3",
            CpuFeature::Sse41 => "YUVPLANE_DISABLE_SSE41",
            CpuFeature::Avx2 => "YUVPLANE_DISABLE_AVX2",
            CpuFeature::Neon => "YUVPLANE_DISABLE_NEON",
        }
    }
}

/// Disables every accelerated tier at once.
const DISABLE_ALL_ENV: &str = "YUVPLANE_DISABLE_ASM";

/// Set of acceleration tiers available to the process.
///
/// The detected set is computed on first use and never changes afterwards. Only subsets of
/// the detected set can be produced, so a kernel gated on a tier never runs on a CPU
/// lacking it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct CpuFeatures(u32);

impl CpuFeatures {
    /// No accelerated tiers, every operation runs its reference kernel.
    #[inline]
    pub const fn empty() -> Self {
        CpuFeatures(0)
    }

    #[inline]
    pub const fn has(self, feature: CpuFeature) -> bool {
        self.0 & feature as u32 != 0
    }

    #[inline]
    pub const fn without(self, feature: CpuFeature) -> Self {
        CpuFeatures(self.0 & !(feature as u32))
    }

    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[inline]
    const fn with(self, feature: CpuFeature) -> Self {
        CpuFeatures(self.0 | feature as u32)
    }

    /// Process-wide capability set, detected once.
    pub fn detect() -> CpuFeatures {
        static INSTANCE: OnceLock<CpuFeatures> = OnceLock::new();
        *INSTANCE.get_or_init(|| {
            let probed = probe();
            let features = mask_features(probed, |name| std::env::var(name).ok());
            log::debug!(
                "cpu features probed {:#x}, enabled {:#x}",
                probed.bits(),
                features.bits()
            );
            features
        })
    }
}

/// Whether `feature` is available in the process-wide capability set.
#[inline]
pub fn has_cpu_feature(feature: CpuFeature) -> bool {
    CpuFeatures::detect().has(feature)
}

#[inline]
fn is_disabled(value: Option<String>) -> bool {
    match value {
        Some(v) => v != "0",
        None => false,
    }
}

fn mask_features<L: Fn(&str) -> Option<String>>(features: CpuFeatures, lookup: L) -> CpuFeatures {
    if is_disabled(lookup(DISABLE_ALL_ENV)) {
        return CpuFeatures::empty();
    }
    let mut masked = features;
    for feature in CpuFeature::ALL {
        if is_disabled(lookup(feature.env_name())) {
            masked = masked.without(feature);
        }
    }
    masked
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
fn probe() -> CpuFeatures {
    let mut features = CpuFeatures::empty();
    if std::arch::is_x86_feature_detected!("sse2") {
        features = features.with(CpuFeature::Sse2);
    }
    if std::arch::is_x86_feature_detected!("ssse3") {
        features = features.with(CpuFeature::Ssse3);
    }
    if std::arch::is_x86_feature_detected!("sse4.1") {
        features = features.with(CpuFeature::Sse41);
    }
    if std::arch::is_x86_feature_detected!("avx2") {
        features = features.with(CpuFeature::Avx2);
    }
    features
}

#[cfg(target_arch = "aarch64")]
fn probe() -> CpuFeatures {
    let mut features = CpuFeatures::empty();
    if std::arch::is_aarch64_feature_detected!("neon") {
        features = features.with(CpuFeature::Neon);
    }
    features
}

#[cfg(not(any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")))]
fn probe() -> CpuFeatures {
    CpuFeatures::empty()
}
