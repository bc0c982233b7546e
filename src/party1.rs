//! P₁ role: holds a set of identifiers, learns `|V ∩ W|`.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::rngs::OsRng;
use rayon::prelude::*;

use crate::cipher::PublicKey;
use crate::error::{Error, Result};
use crate::group::{self, SessionScalar, ENCODED_POINT_LEN};
use crate::wire::{Round2Msg, Round3Msg};

/// P₁'s session state: identifier set, secret scalar `k₁`, P₂'s public key and the shared seed.
pub struct Party1 {
    identifiers: Vec<Vec<u8>>,
    k1: SessionScalar,
    seed: Option<Vec<u8>>,
    pk2: Option<PublicKey>,
}

impl Party1 {
    /// Builds a fresh session over `identifiers`, drawing `k₁` immediately.
    /// Rejects duplicate identifiers (spec.md §4.3 "Tie-breaks / edge cases").
    pub fn new(identifiers: Vec<Vec<u8>>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(identifiers.len());
        for id in &identifiers {
            if !seen.insert(id.clone()) {
                return Err(Error::protocol_violation("duplicate identifier in own input"));
            }
        }
        Ok(Party1 {
            identifiers,
            k1: SessionScalar::random(),
            seed: None,
            pk2: None,
        })
    }

    /// Records P₂'s homomorphic public key and the shared per-session seed.
    pub fn accept_setup(&mut self, pk2: PublicKey, seed: Vec<u8>) {
        self.pk2 = Some(pk2);
        self.seed = Some(seed);
    }

    /// Round 1: `Aᵢ = scalar_mul(hash_to_curve(vᵢ, seed), k₁)` for each identifier, shuffled.
    pub fn round1(&self) -> Result<Vec<Vec<u8>>> {
        let seed = self
            .seed
            .as_ref()
            .ok_or_else(|| Error::protocol_violation("round1 called before setup"))?;

        let mut points: Vec<Vec<u8>> = self
            .identifiers
            .par_iter()
            .map(|id| -> Result<Vec<u8>> {
                let h = group::hash_to_curve(id, seed);
                let a = group::scalar_mul(h, &self.k1)?;
                Ok(group::encode_point(&a).to_vec())
            })
            .collect::<Result<Vec<_>>>()?;

        points.shuffle(&mut OsRng);
        Ok(points)
    }

    /// Round 3: decodes `Z` and `W_pairs` from P₂'s round-2 message, matches, and
    /// folds the matched ciphertexts into the output (spec.md §4.3 algorithm).
    pub fn round3(&self, msg: &Round2Msg) -> Result<Round3Msg> {
        let pk2 = self
            .pk2
            .as_ref()
            .ok_or_else(|| Error::protocol_violation("round3 called before setup"))?;

        let s: HashSet<Vec<u8>> = msg
            .z
            .par_iter()
            .map(|p| {
                if p.len() != ENCODED_POINT_LEN {
                    return Err(Error::invalid_point("Z element has wrong length"));
                }
                group::decode_point(p)?;
                Ok(p.clone())
            })
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .collect();

        let matched_cts: Vec<Vec<u8>> = msg
            .w_pairs
            .par_iter()
            .map(|(b_j, c_j)| -> Result<Option<Vec<u8>>> {
                let b = group::decode_point(b_j)?;
                let b_prime = group::scalar_mul(b, &self.k1)?;
                let encoded = group::encode_point(&b_prime);
                if s.contains(encoded.as_slice()) {
                    Ok(Some(c_j.clone()))
                } else {
                    Ok(None)
                }
            })
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .flatten()
            .collect();

        let cardinality = matched_cts.len() as u64;

        let summed = if matched_cts.is_empty() {
            pk2.encrypt(0)
        } else {
            let mut acc = crate::cipher::Ciphertext::from_bytes(&matched_cts[0]);
            for bytes in &matched_cts[1..] {
                let c = crate::cipher::Ciphertext::from_bytes(bytes);
                acc = pk2.add(&acc, &c)?;
            }
            acc
        };
        let output = pk2.rerandomize(&summed)?;

        Ok(Round3Msg {
            cardinality,
            ciphertext: output.to_bytes(),
        })
    }
}
