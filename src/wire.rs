//! Normative wire format (spec.md §6).
//!
//! A message is a length-prefixed sequence of elements, all integers
//! big-endian. Each `Round*Msg` / `SetupMsg` also derives `serde::Serialize`
//! for in-process use (tests, the demo binary) in addition to the manual
//! `to_bytes`/`from_bytes` codec that implements the exact normative layout.
//! Points are carried as `Vec<u8>` rather than `[u8; 33]` so the derived
//! `serde` impls don't depend on array-size support; `ENCODED_POINT_LEN` is
//! enforced at decode time instead.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::group::ENCODED_POINT_LEN;

/// `u32 count + count x (u16 len + len bytes)`, one SEC1-compressed point per element.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round1Msg {
    pub points: Vec<Vec<u8>>,
}

/// `Round1Msg` (= `Z`) followed by `u32 count + count x (u16 point_len + point_bytes + u32 ct_len + ct_bytes)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round2Msg {
    pub z: Vec<Vec<u8>>,
    pub w_pairs: Vec<(Vec<u8>, Vec<u8>)>,
}

/// `u64 cardinality + u32 ct_len + ct_bytes`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round3Msg {
    pub cardinality: u64,
    pub ciphertext: Vec<u8>,
}

/// P₂ → P₁ setup message: `u16 seed_len + seed_bytes + u32 pk_len + pk_bytes`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupMsg {
    pub seed: Vec<u8>,
    pub pk: Vec<u8>,
}

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Reader { buf, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.buf.len() - self.pos < n {
            return Err(Error::protocol_violation("wire message truncated"));
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn u16(&mut self) -> Result<u16> {
        Ok(u16::from_be_bytes(self.take(2)?.try_into().unwrap()))
    }

    fn u32(&mut self) -> Result<u32> {
        Ok(u32::from_be_bytes(self.take(4)?.try_into().unwrap()))
    }

    fn u64(&mut self) -> Result<u64> {
        Ok(u64::from_be_bytes(self.take(8)?.try_into().unwrap()))
    }

    fn finish(self) -> Result<()> {
        if self.pos != self.buf.len() {
            return Err(Error::protocol_violation("wire message has trailing bytes"));
        }
        Ok(())
    }
}

fn encode_point_field(out: &mut Vec<u8>, point: &[u8]) {
    out.extend_from_slice(&(point.len() as u16).to_be_bytes());
    out.extend_from_slice(point);
}

fn decode_point_field(r: &mut Reader) -> Result<Vec<u8>> {
    let len = r.u16()? as usize;
    if len != ENCODED_POINT_LEN {
        return Err(Error::invalid_point("unexpected compressed point length on the wire"));
    }
    Ok(r.take(len)?.to_vec())
}

impl Round1Msg {
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(4 + self.points.len() * (2 + ENCODED_POINT_LEN));
        out.extend_from_slice(&(self.points.len() as u32).to_be_bytes());
        for p in &self.points {
            encode_point_field(&mut out, p);
        }
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut r = Reader::new(bytes);
        let count = r.u32()? as usize;
        let mut points = Vec::with_capacity(count);
        for _ in 0..count {
            points.push(decode_point_field(&mut r)?);
        }
        r.finish()?;
        Ok(Round1Msg { points })
    }
}

impl Round2Msg {
    pub fn to_bytes(&self) -> Vec<u8> {
        let z_msg = Round1Msg { points: self.z.clone() };
        let mut out = z_msg.to_bytes();
        out.extend_from_slice(&(self.w_pairs.len() as u32).to_be_bytes());
        for (point, ct) in &self.w_pairs {
            encode_point_field(&mut out, point);
            out.extend_from_slice(&(ct.len() as u32).to_be_bytes());
            out.extend_from_slice(ct);
        }
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut r = Reader::new(bytes);
        let z_count = r.u32()? as usize;
        let mut z = Vec::with_capacity(z_count);
        for _ in 0..z_count {
            z.push(decode_point_field(&mut r)?);
        }
        let pair_count = r.u32()? as usize;
        let mut w_pairs = Vec::with_capacity(pair_count);
        for _ in 0..pair_count {
            let point = decode_point_field(&mut r)?;
            let ct_len = r.u32()? as usize;
            let ct = r.take(ct_len)?.to_vec();
            w_pairs.push((point, ct));
        }
        r.finish()?;
        Ok(Round2Msg { z, w_pairs })
    }
}

impl Round3Msg {
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(8 + 4 + self.ciphertext.len());
        out.extend_from_slice(&self.cardinality.to_be_bytes());
        out.extend_from_slice(&(self.ciphertext.len() as u32).to_be_bytes());
        out.extend_from_slice(&self.ciphertext);
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut r = Reader::new(bytes);
        let cardinality = r.u64()?;
        let ct_len = r.u32()? as usize;
        let ciphertext = r.take(ct_len)?.to_vec();
        r.finish()?;
        Ok(Round3Msg { cardinality, ciphertext })
    }
}

impl SetupMsg {
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(2 + self.seed.len() + 4 + self.pk.len());
        out.extend_from_slice(&(self.seed.len() as u16).to_be_bytes());
        out.extend_from_slice(&self.seed);
        out.extend_from_slice(&(self.pk.len() as u32).to_be_bytes());
        out.extend_from_slice(&self.pk);
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut r = Reader::new(bytes);
        let seed_len = r.u16()? as usize;
        let seed = r.take(seed_len)?.to_vec();
        let pk_len = r.u32()? as usize;
        let pk = r.take(pk_len)?.to_vec();
        r.finish()?;
        Ok(SetupMsg { seed, pk })
    }
}
