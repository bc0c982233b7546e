//! Additively homomorphic cipher: Paillier over a 3072-bit modulus.
//!
//! Built on `kzen-paillier` with `curv-kzen`'s `BigInt` as the plaintext and
//! ciphertext integer representation, the same big-integer type this
//! codebase's curve arithmetic already depends on.

use curv::arithmetic::{BitManipulation, Converter};
use curv::BigInt;
use paillier::{Decrypt, Encrypt, EncryptionKey, KeyGeneration, Paillier, RawCiphertext, RawPlaintext};

use crate::error::{Error, Result};

/// `N >= 2^3072`, per spec.md §6's "≥128-bit security" requirement for the
/// homomorphic primitive.
pub const PLAINTEXT_MODULUS_BITS: usize = 3072;

/// Safety margin (spec.md §3 invariant 5: `n · vmax < plaintext_modulus`).
pub const OVERFLOW_MARGIN_BITS: usize = 128;

/// P₂'s homomorphic public key, as received and used by P₁.
#[derive(Clone)]
pub struct PublicKey(EncryptionKey);

/// P₂'s homomorphic key pair. The private half never leaves `Party2`.
pub struct KeyPair {
    pub_key: PublicKey,
    priv_key: paillier::DecryptionKey,
}

/// An additively homomorphic ciphertext (a value in `Z_{n^2}`).
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Ciphertext(BigInt);

impl PublicKey {
    pub fn plaintext_modulus(&self) -> &BigInt {
        &self.0.n
    }

    /// Probabilistic encryption of `m` (spec.md §4.2's `encrypt`).
    pub fn encrypt(&self, m: u64) -> Ciphertext {
        let raw = Paillier::encrypt(&self.0, RawPlaintext::from(BigInt::from(m)));
        Ciphertext(raw.0.into_owned())
    }

    /// Ciphertext addition (spec.md §4.2's `add`).
    pub fn add(&self, a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext> {
        let nn = &self.0.n * &self.0.n;
        if a.0 >= nn || b.0 >= nn {
            return Err(Error::invalid_ciphertext("ciphertext exceeds this key's modulus"));
        }
        let sum = Paillier::add(
            &self.0,
            RawCiphertext::from(a.0.clone()),
            RawCiphertext::from(b.0.clone()),
        );
        Ok(Ciphertext(sum.0.into_owned()))
    }

    /// `rerandomize(pk, c) = add(c, encrypt(pk, 0))` (spec.md §4.2): produces a
    /// fresh-looking ciphertext encrypting the same plaintext, unlinkable to
    /// `c`. Always called, including on the empty-intersection ciphertext, per
    /// the REDESIGN FLAG in spec.md §9 (the reference only rerandomized the
    /// non-empty case).
    pub fn rerandomize(&self, c: &Ciphertext) -> Result<Ciphertext> {
        let zero = self.encrypt(0);
        self.add(c, &zero)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.0.n.to_bytes()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(Error::invalid_ciphertext("empty public key encoding"));
        }
        let n = BigInt::from_bytes(bytes);
        let nn = &n * &n;
        Ok(PublicKey(EncryptionKey { n, nn }))
    }
}

impl KeyPair {
    /// Key generation (spec.md §4.2's `keygen`).
    pub fn generate() -> Self {
        let (ek, dk) = Paillier::keypair_with_modulus_size(PLAINTEXT_MODULUS_BITS).keys();
        KeyPair {
            pub_key: PublicKey(ek),
            priv_key: dk,
        }
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.pub_key
    }

    /// Recovers the plaintext (spec.md §4.2's `decrypt`). Values in this
    /// protocol are bounded `u64` sums (spec_full.md §3); the modular
    /// reduction guaranteed by `OverflowRisk` at setup means the mod-N
    /// reduction never actually wraps for a well-formed session.
    pub fn decrypt(&self, c: &Ciphertext) -> u64 {
        let raw = Paillier::decrypt(&self.priv_key, RawCiphertext::from(c.0.clone()));
        bigint_to_u64(&raw.0)
    }
}

impl Ciphertext {
    pub fn to_bytes(&self) -> Vec<u8> {
        self.0.to_bytes()
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        Ciphertext(BigInt::from_bytes(bytes))
    }
}

fn bigint_to_u64(v: &BigInt) -> u64 {
    let bytes = v.to_bytes();
    let take = bytes.len().min(8);
    let mut buf = [0u8; 8];
    buf[8 - take..].copy_from_slice(&bytes[bytes.len() - take..]);
    u64::from_be_bytes(buf)
}

/// `n · vmax < plaintext_modulus(pk) / 2^OVERFLOW_MARGIN_BITS`, per spec.md
/// §3 invariant 5 and the `OverflowRisk` error kind in spec.md §7. Checked
/// once at `Party2` construction, not per-round.
pub fn check_overflow_risk(n_pairs: usize, vmax: u64, pk: &PublicKey) -> Result<()> {
    let modulus_bits = pk.plaintext_modulus().bit_length();
    let usage = BigInt::from(n_pairs as u64) * BigInt::from(vmax);
    let usage_bits = usage.bit_length();
    if usage_bits + OVERFLOW_MARGIN_BITS >= modulus_bits {
        Err(Error::OverflowRisk)
    } else {
        Ok(())
    }
}
