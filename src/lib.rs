//! Two-party Private Intersection-Sum with Cardinality (PSI-SUM) over DDH and
//! an additively homomorphic cipher.
//!
//! See [`party1::Party1`] and [`party2::Party2`] for the two roles; [`wire`]
//! for the normative message encodings exchanged between them.

pub mod cipher;
pub mod error;
pub mod group;
pub mod party1;
pub mod party2;
pub mod wire;

pub use cipher::{KeyPair, PublicKey};
pub use error::{Error, Result};
pub use party1::Party1;
pub use party2::Party2;
