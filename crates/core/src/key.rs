//! Deterministic transform-key derivation.

use crate::params::ParamSet;
use sha2::{Digest, Sha256};
use std::fmt::Write;

/// Derive the canonical storage key for a validated parameter set.
///
/// The key is a hex-encoded SHA-256 digest over the source path plus every
/// contributing parameter in a fixed field order, suffixed with the output
/// format extension. Identical parameter sets derive identical keys across
/// requests and process restarts; that stability is what makes the store
/// lookup tier a valid cache.
///
/// Contribution rules: mode and quality always contribute; width, height and
/// degree contribute only when positive (zero means "derived", so it must
/// alias the absent case); upscale contributes only when enabled; direction
/// contributes when present. Segments carry field tags so adjacent numeric
/// values cannot run together.
pub fn transform_key(params: &ParamSet) -> String {
    let mut material = params.path.clone();

    let _ = write!(material, "|mode={}", params.mode.as_str());
    if let Some(w) = params.width.filter(|w| *w > 0) {
        let _ = write!(material, "|w={w}");
    }
    if let Some(h) = params.height.filter(|h| *h > 0) {
        let _ = write!(material, "|h={h}");
    }
    if params.upscale {
        material.push_str("|upscale=true");
    }
    let _ = write!(material, "|q={}", params.quality);
    if let Some(direction) = params.direction {
        let _ = write!(material, "|d={}", direction.as_str());
    }
    if let Some(degree) = params.degree.filter(|d| *d > 0.0) {
        let _ = write!(material, "|r={degree}");
    }

    let mut hasher = Sha256::new();
    hasher.update(material.as_bytes());
    let digest = hasher.finalize();

    let mut key = String::with_capacity(70);
    for byte in digest {
        let _ = write!(key, "{byte:02x}");
    }
    let _ = write!(key, ".{}", params.format.extension());
    key
}
