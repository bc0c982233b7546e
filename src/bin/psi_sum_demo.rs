//! Runs one local PSI-SUM session between a P₁ reading identifiers from
//! stdin and a P₂ with a fixed demonstration dataset, and prints the
//! cardinality and sum each party learns.

use std::io::{self, BufRead};

use psi_sum::wire::Round1Msg;
use psi_sum::{Party1, Party2, PublicKey};

fn main() {
    tracing_subscriber::fmt::init();

    println!("Enter identifiers for P1's set, one per line (blank line to finish):");
    let stdin = io::stdin();
    let mut identifiers = Vec::new();
    for line in stdin.lock().lines() {
        let line = line.expect("failed to read line");
        if line.trim().is_empty() {
            break;
        }
        identifiers.push(line.trim().as_bytes().to_vec());
    }

    let p2_pairs: Vec<(Vec<u8>, u64)> = vec![
        (b"user2".to_vec(), 10),
        (b"user3".to_vec(), 20),
        (b"user5".to_vec(), 30),
    ];

    let mut p1 = Party1::new(identifiers).expect("duplicate identifier in P1's input");
    let mut p2 = Party2::new(p2_pairs, 1_000_000).expect("P2 setup failed");

    let setup = p2.begin();
    p1.accept_setup(
        PublicKey::from_bytes(&setup.pk).expect("malformed public key"),
        setup.seed.clone(),
    );

    let round1_points = p1.round1().expect("round1 failed");
    let round1 = Round1Msg { points: round1_points };

    let round2 = p2.round2(&round1).expect("round2 failed");
    let round3 = p1.round3(&round2).expect("round3 failed");
    let (cardinality, sum) = p2.finalize(&round3).expect("finalize failed");

    println!("-----------------------------------");
    println!("P1 learns: |V ∩ W| = {}", round3.cardinality);
    println!("P2 learns: cardinality = {}, sum = {}", cardinality, sum);
    println!("-----------------------------------");
}
