//! End-to-end scenarios for the PSI-SUM protocol, run against the public
//! `Party1`/`Party2` API and the wire encodings exchanged between them.

use psi_sum::wire::Round1Msg;
use psi_sum::{Error, Party1, Party2, PublicKey};

fn ids(items: &[&str]) -> Vec<Vec<u8>> {
    items.iter().map(|s| s.as_bytes().to_vec()).collect()
}

fn pairs(items: &[(&str, u64)]) -> Vec<(Vec<u8>, u64)> {
    items.iter().map(|(id, v)| (id.as_bytes().to_vec(), *v)).collect()
}

/// Runs one full session and returns (P1's learned cardinality, P2's learned cardinality, P2's learned sum).
fn run_session(v: Vec<Vec<u8>>, w: Vec<(Vec<u8>, u64)>, vmax: u64) -> (u64, u64, u64) {
    let mut p1 = Party1::new(v).unwrap();
    let mut p2 = Party2::new(w, vmax).unwrap();

    let setup = p2.begin();
    p1.accept_setup(PublicKey::from_bytes(&setup.pk).unwrap(), setup.seed.clone());

    let round1 = Round1Msg {
        points: p1.round1().unwrap(),
    };
    // Exercise the normative byte encoding between every hop, not just the in-process structs.
    let round1 = Round1Msg::from_bytes(&round1.to_bytes()).unwrap();

    let round2 = p2.round2(&round1).unwrap();
    let round2 = psi_sum::wire::Round2Msg::from_bytes(&round2.to_bytes()).unwrap();

    let round3 = p1.round3(&round2).unwrap();
    let p1_cardinality = round3.cardinality;
    let round3 = psi_sum::wire::Round3Msg::from_bytes(&round3.to_bytes()).unwrap();

    let (p2_cardinality, sum) = p2.finalize(&round3).unwrap();
    (p1_cardinality, p2_cardinality, sum)
}

#[test]
fn scenario_1_partial_overlap() {
    let v = ids(&["user1", "user2", "user3", "user4"]);
    let w = pairs(&[("user2", 10), ("user3", 20), ("user5", 30)]);
    assert_eq!(run_session(v, w, 1_000_000), (2, 2, 30));
}

#[test]
fn scenario_2_no_overlap() {
    let v = ids(&["user1", "user2"]);
    let w = pairs(&[("user3", 10), ("user4", 20)]);
    assert_eq!(run_session(v, w, 1_000_000), (0, 0, 0));
}

#[test]
fn scenario_3_single_match() {
    let v = ids(&["user1", "user2"]);
    let w = pairs(&[("user1", 15)]);
    assert_eq!(run_session(v, w, 1_000_000), (1, 1, 15));
}

#[test]
fn scenario_4_empty_v() {
    let v = ids(&[]);
    let w = pairs(&[("user1", 10), ("user2", 20)]);
    assert_eq!(run_session(v, w, 1_000_000), (0, 0, 0));
}

#[test]
fn scenario_5_empty_w() {
    let v = ids(&["user1", "user2"]);
    let w = pairs(&[]);
    assert_eq!(run_session(v, w, 1_000_000), (0, 0, 0));
}

#[test]
fn scenario_6_full_overlap() {
    let v = ids(&["user1", "user2", "user3"]);
    let w = pairs(&[("user1", 1000), ("user2", 2000), ("user3", 3000)]);
    assert_eq!(run_session(v, w, 10_000), (3, 3, 6000));
}

#[test]
fn permutation_of_v_does_not_change_the_outcome() {
    let w = pairs(&[("user2", 10), ("user3", 20), ("user5", 30)]);

    let forward = ids(&["user1", "user2", "user3", "user4"]);
    let reversed = ids(&["user4", "user3", "user2", "user1"]);

    assert_eq!(run_session(forward, w.clone(), 1_000_000), run_session(reversed, w, 1_000_000));
}

#[test]
fn permutation_of_w_does_not_change_the_outcome() {
    let v = ids(&["user1", "user2", "user3", "user4"]);

    let forward = pairs(&[("user2", 10), ("user3", 20), ("user5", 30)]);
    let reversed = pairs(&[("user5", 30), ("user3", 20), ("user2", 10)]);

    assert_eq!(run_session(v.clone(), forward, 1_000_000), run_session(v, reversed, 1_000_000));
}

#[test]
fn fresh_seed_independence() {
    let v = ids(&["user1", "user2"]);
    let w = pairs(&[("user1", 5)]);

    let mut p1a = Party1::new(v.clone()).unwrap();
    let p2a = Party2::new(w.clone(), 1000).unwrap();
    let setup_a = p2a.begin();
    p1a.accept_setup(PublicKey::from_bytes(&setup_a.pk).unwrap(), setup_a.seed.clone());
    let round1_a = Round1Msg { points: p1a.round1().unwrap() };

    let mut p1b = Party1::new(v).unwrap();
    let p2b = Party2::new(w, 1000).unwrap();
    let setup_b = p2b.begin();
    p1b.accept_setup(PublicKey::from_bytes(&setup_b.pk).unwrap(), setup_b.seed.clone());
    let round1_b = Round1Msg { points: p1b.round1().unwrap() };

    assert_ne!(setup_a.seed, setup_b.seed);
    for pa in &round1_a.points {
        for pb in &round1_b.points {
            assert_ne!(pa, pb, "points from independent seeds must never collide");
        }
    }
}

#[test]
fn tampered_point_in_round2_is_rejected() {
    let v = ids(&["user1", "user2"]);
    let w = pairs(&[("user1", 5)]);

    let mut p1 = Party1::new(v).unwrap();
    let p2 = Party2::new(w, 1000).unwrap();
    let setup = p2.begin();
    p1.accept_setup(PublicKey::from_bytes(&setup.pk).unwrap(), setup.seed.clone());

    let round1 = Round1Msg { points: p1.round1().unwrap() };
    let mut round2 = p2.round2(&round1).unwrap();
    round2.z[0][1] ^= 0xff;

    assert_eq!(
        p1.round3(&round2),
        Err(Error::InvalidPoint { reason: "point is not on the curve" })
    );
}

#[test]
fn tampered_ciphertext_exceeding_the_modulus_is_rejected() {
    let w = pairs(&[("user1", 5)]);
    let p2 = Party2::new(w, 1000).unwrap();
    let setup = p2.begin();
    let pk = PublicKey::from_bytes(&setup.pk).unwrap();

    let oversized_bytes = vec![0xffu8; pk.to_bytes().len() * 2 + 64];
    let oversized = psi_sum::cipher::Ciphertext::from_bytes(&oversized_bytes);
    let zero = pk.encrypt(0);

    assert_eq!(
        pk.add(&oversized, &zero),
        Err(Error::InvalidCiphertext { reason: "ciphertext exceeds this key's modulus" })
    );
}

#[test]
fn duplicate_identifier_in_p1_input_is_rejected_at_construction() {
    let v = ids(&["user1", "user1"]);
    assert!(Party1::new(v).is_err());
}

#[test]
fn duplicate_identifier_in_p2_input_is_rejected_at_construction() {
    let w = pairs(&[("user1", 1), ("user1", 2)]);
    assert!(Party2::new(w, 1000).is_err());
}

#[test]
fn overflow_risk_rejected_at_setup() {
    let huge_pairs: Vec<(Vec<u8>, u64)> = (0..4).map(|i| (format!("user{i}").into_bytes(), u64::MAX)).collect();
    assert_eq!(Party2::new(huge_pairs, u64::MAX), Err(Error::OverflowRisk));
}
