//! DDH group operations over NIST P-256.
//!
//! `hash_to_curve` uses the standardized RFC 9380 SSWU construction instead of
//! the try-and-increment loop in the Python reference (`ddh_psi_sum.py`'s
//! `DDHGroup.hash_to_curve`), which leaks timing through its retry count and
//! biases the output distribution. `scalar_mul` defers entirely to the
//! underlying curve arithmetic rather than the reference's (incorrect, and
//! non-constant-time) loop of repeated point "addition" of raw coordinates.

use elliptic_curve::{
    group::Group,
    hash2curve::{ExpandMsgXmd, GroupDigest},
    sec1::{FromEncodedPoint, ToEncodedPoint},
};
use p256::{AffinePoint, EncodedPoint, NistP256, ProjectivePoint, Scalar};
use rand::rngs::OsRng;
use sha2::Sha256;
use zeroize::Zeroize;

use crate::error::{Error, Result};

/// Fixed, protocol-wide domain-separation tag for hash-to-curve.
///
/// RFC 9380 §3.1 specifies the DST as a fixed per-protocol string, not a
/// per-session value; the session `seed` (spec.md §3/§4.1) is instead folded
/// into the hashed message alongside the identifier, giving the same
/// deterministic-per-`(seed, identifier)` / independent-across-seeds property
/// the spec requires.
const DST: &[u8] = b"PSI-SUM-v1-P256_XMD:SHA-256_SSWU_RO_";

/// SEC1 compressed-point length for P-256: one tag byte plus a 32-byte x-coordinate.
pub const ENCODED_POINT_LEN: usize = 33;

/// A session-scoped secret scalar (`k1` or `k2`), zeroized on drop.
///
/// Never implements `Clone`/`Copy`/`Debug`/`Serialize` — it must never leave
/// the party that owns it (spec.md §3, §5 "Shared resources").
pub struct SessionScalar(Scalar);

impl SessionScalar {
    /// Draws a fresh scalar uniformly from `[1, q-1]` using a cryptographically
    /// secure RNG, per spec.md's REDESIGN FLAG on the reference's non-crypto RNG.
    pub fn random() -> Self {
        let nz = p256::NonZeroScalar::random(&mut OsRng);
        SessionScalar(*nz.as_ref())
    }

    pub(crate) fn as_scalar(&self) -> &Scalar {
        &self.0
    }
}

impl Zeroize for SessionScalar {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl Drop for SessionScalar {
    fn drop(&mut self) {
        self.zeroize();
    }
}

/// Deterministic random-oracle map from `(identifier, seed)` to a point of
/// the P-256 prime-order group. P-256 has cofactor 1, so every non-identity
/// output is automatically of order `q`.
pub fn hash_to_curve(identifier: &[u8], seed: &[u8]) -> ProjectivePoint {
    NistP256::hash_from_bytes::<ExpandMsgXmd<Sha256>>(&[seed, identifier], DST)
        .expect("expand_message input within RFC 9380 bounds for PSI-SUM identifiers")
}

/// Multiplies `point` by a session scalar. Rejects the identity element.
pub fn scalar_mul(point: ProjectivePoint, scalar: &SessionScalar) -> Result<ProjectivePoint> {
    if bool::from(point.is_identity()) {
        return Err(Error::invalid_point("scalar_mul on identity point"));
    }
    Ok(point * *scalar.as_scalar())
}

/// SEC1 compressed encoding (33 bytes for P-256).
pub fn encode_point(point: &ProjectivePoint) -> [u8; ENCODED_POINT_LEN] {
    let encoded = point.to_affine().to_encoded_point(true);
    let mut out = [0u8; ENCODED_POINT_LEN];
    out.copy_from_slice(encoded.as_bytes());
    out
}

/// Decodes and validates a compressed point: well-formed, on-curve, non-identity.
pub fn decode_point(bytes: &[u8]) -> Result<ProjectivePoint> {
    if bytes.len() != ENCODED_POINT_LEN {
        return Err(Error::invalid_point("wrong compressed point length"));
    }
    let encoded =
        EncodedPoint::from_bytes(bytes).map_err(|_| Error::invalid_point("malformed SEC1 encoding"))?;
    let affine: AffinePoint = Option::from(AffinePoint::from_encoded_point(&encoded))
        .ok_or_else(|| Error::invalid_point("point is not on the curve"))?;
    let point = ProjectivePoint::from(affine);
    if bool::from(point.is_identity()) {
        return Err(Error::invalid_point("identity point is not permitted on the wire"));
    }
    Ok(point)
}
