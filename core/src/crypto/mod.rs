// Copyright (c) 2023 The Bytecoin Developers

//! Cryptographic primitives for the Amethyst output scheme
//!
//! - [keccak]: Keccak-256 contexts, varints and digest reduction
//! - [curve]: generators `G` / `H`, point validation and hash-to-point
//!
//! Group arithmetic is provided by [curve25519_dalek], the field layer
//! here exists only to support [curve::map_to_point].

mod field;

pub mod curve;
pub mod keccak;

pub use curve25519_dalek::{
    edwards::{CompressedEdwardsY, EdwardsPoint},
    scalar::Scalar,
};

pub use curve::{hash_to_point, mul_g, mul_h};
pub use keccak::{Hash, Hasher};
