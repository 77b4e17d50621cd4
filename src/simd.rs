//! Runtime instruction-set tier detection and metadata.

/// Vector capability tier requested for the LCS engines.
///
/// Fixed at facade construction time. Requesting a tier the host cannot
/// run is not an error; the facade degrades to the scalar engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimdTier {
    /// Scalar `u64` automaton, always available.
    None,
    /// 128-bit VEX path, two candidate automatons per register (x86_64).
    Avx,
    /// 256-bit path, four candidate automatons per register (x86_64).
    Avx2,
    /// 128-bit NEON path, two candidate automatons per register (aarch64).
    Neon,
}

impl SimdTier {
    /// Detect the widest tier that is safe on this CPU.
    ///
    /// Environment override for testing and triage:
    /// `QUADLCS_FORCE_SCALAR=1` skips vector engines entirely.
    pub fn detect() -> Self {
        if std::env::var("QUADLCS_FORCE_SCALAR")
            .map(|v| v == "1")
            .unwrap_or(false)
        {
            log::info!("QUADLCS_FORCE_SCALAR=1: using scalar LCS engine");
            return SimdTier::None;
        }

        #[cfg(target_arch = "x86_64")]
        {
            if is_x86_feature_detected!("avx2") {
                return SimdTier::Avx2;
            }
            if is_x86_feature_detected!("avx") {
                return SimdTier::Avx;
            }
            SimdTier::None
        }

        #[cfg(target_arch = "aarch64")]
        {
            SimdTier::Neon
        }

        #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
        {
            SimdTier::None
        }
    }

    /// Whether this tier can actually run on the current target and CPU.
    pub fn is_supported(self) -> bool {
        match self {
            SimdTier::None => true,
            #[cfg(target_arch = "x86_64")]
            SimdTier::Avx => is_x86_feature_detected!("avx"),
            #[cfg(target_arch = "x86_64")]
            SimdTier::Avx2 => is_x86_feature_detected!("avx2"),
            #[cfg(target_arch = "aarch64")]
            SimdTier::Neon => true,
            #[cfg(not(target_arch = "x86_64"))]
            SimdTier::Avx | SimdTier::Avx2 => false,
            #[cfg(not(target_arch = "aarch64"))]
            SimdTier::Neon => false,
        }
    }

    /// Candidate automatons advanced per vector register.
    pub fn lanes(self) -> usize {
        match self {
            SimdTier::None => 1,
            SimdTier::Avx | SimdTier::Neon => 2,
            SimdTier::Avx2 => 4,
        }
    }

    /// Human-readable engine description.
    pub fn description(self) -> &'static str {
        match self {
            SimdTier::None => "scalar (64-bit, 1 automaton)",
            SimdTier::Avx => "AVX (128-bit, 2 automatons)",
            SimdTier::Avx2 => "AVX2 (256-bit, 4 automatons)",
            SimdTier::Neon => "NEON (128-bit, 2 automatons)",
        }
    }
}
