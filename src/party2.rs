//! P₂ role: holds identifier/value pairs, learns `Σ{t : (w,t) ∈ W ∧ w ∈ V}`.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::rngs::OsRng;
use rayon::prelude::*;

use crate::cipher::{self, KeyPair};
use crate::error::{Error, Result};
use crate::group::{self, SessionScalar};
use crate::wire::{Round1Msg, Round2Msg, Round3Msg, SetupMsg};

/// P₂'s session state: identifier/value pairs, secret scalar `k₂`, and the
/// homomorphic key pair (the private half never leaves this type).
pub struct Party2 {
    pairs: Vec<(Vec<u8>, u64)>,
    k2: SessionScalar,
    seed: Vec<u8>,
    keys: KeyPair,
}

impl Party2 {
    /// Builds a fresh session over `pairs`, generating the homomorphic key
    /// pair and a fresh session seed immediately. `vmax` bounds the largest
    /// value P₂ will submit and is checked against the key's plaintext
    /// modulus per spec.md §3 invariant 5.
    pub fn new(pairs: Vec<(Vec<u8>, u64)>, vmax: u64) -> Result<Self> {
        let mut seen = HashSet::with_capacity(pairs.len());
        for (id, _) in &pairs {
            if !seen.insert(id.clone()) {
                return Err(Error::protocol_violation("duplicate identifier in own input"));
            }
        }

        let keys = KeyPair::generate();
        cipher::check_overflow_risk(pairs.len(), vmax, keys.public_key())?;

        let mut seed = vec![0u8; 16];
        use rand::RngCore;
        OsRng.fill_bytes(&mut seed);

        Ok(Party2 {
            pairs,
            k2: SessionScalar::random(),
            seed,
            keys,
        })
    }

    /// Setup: publishes the homomorphic public key and the shared seed to P₁.
    pub fn begin(&self) -> SetupMsg {
        SetupMsg {
            seed: self.seed.clone(),
            pk: self.keys.public_key().to_bytes(),
        }
    }

    /// Round 2: re-masks P₁'s points with `k₂`, and emits `(hash_to_curve(wⱼ)^k₂, encrypt(tⱼ))`
    /// pairs for every owned identifier, both independently shuffled.
    pub fn round2(&self, msg: &Round1Msg) -> Result<Round2Msg> {
        let z: Vec<Vec<u8>> = msg
            .points
            .par_iter()
            .map(|p| -> Result<Vec<u8>> {
                let point = group::decode_point(p)?;
                let masked = group::scalar_mul(point, &self.k2)?;
                Ok(group::encode_point(&masked).to_vec())
            })
            .collect::<Result<Vec<_>>>()?;

        let mut w_pairs: Vec<(Vec<u8>, Vec<u8>)> = self
            .pairs
            .par_iter()
            .map(|(w, t)| {
                let h = group::hash_to_curve(w, &self.seed);
                let b = group::scalar_mul(h, &self.k2)?;
                let point_bytes = group::encode_point(&b).to_vec();
                let ct = self.keys.public_key().encrypt(*t).to_bytes();
                Ok((point_bytes, ct))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut z = z;
        z.shuffle(&mut OsRng);
        w_pairs.shuffle(&mut OsRng);

        Ok(Round2Msg { z, w_pairs })
    }

    /// Decrypts the round-3 ciphertext to recover the intersection sum. The
    /// cardinality is passed through as received (spec.md §4.4 "Output").
    pub fn finalize(&self, msg: &Round3Msg) -> Result<(u64, u64)> {
        let ciphertext = cipher::Ciphertext::from_bytes(&msg.ciphertext);
        let sum = self.keys.decrypt(&ciphertext);
        Ok((msg.cardinality, sum))
    }
}
