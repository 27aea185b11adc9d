// Copyright (c) 2023 The Bytecoin Developers

//! Ed25519 group helpers, the second generator `H` and the hash-to-point map

use curve25519_dalek::{
    edwards::{CompressedEdwardsY, EdwardsPoint},
    scalar::Scalar,
};

use super::{
    field::FieldElement,
    keccak::{fast_hash, Hash},
};
use crate::engine::Error;

/// Compressed generator `H = 8 * decompress(keccak(G))`, with no known
/// discrete log relation to `G`
pub const H_COMPRESSED: CompressedEdwardsY = CompressedEdwardsY([
    0x8b, 0x65, 0x59, 0x70, 0x15, 0x37, 0x99, 0xaf, 0x2a, 0xea, 0xdc, 0x9f, 0xf1, 0xad, 0xd0, 0xea,
    0x6c, 0x72, 0x51, 0xd5, 0x41, 0x54, 0xcf, 0xa9, 0x2c, 0x17, 0x3a, 0x0d, 0xd3, 0x9c, 0x1f, 0x94,
]);

/// Generator `H`
pub fn generator_h() -> EdwardsPoint {
    // H_COMPRESSED is a valid encoding, see `generator_h_derivation`
    H_COMPRESSED.decompress().unwrap_or_default()
}

/// `s * G`
#[inline]
pub fn mul_g(s: &Scalar) -> EdwardsPoint {
    EdwardsPoint::mul_base(s)
}

/// `s * H`
pub fn mul_h(s: &Scalar) -> EdwardsPoint {
    generator_h() * s
}

/// Decompress a host-supplied point, rejecting encodings that are not on the curve
pub fn decompress(p: &CompressedEdwardsY) -> Result<EdwardsPoint, Error> {
    match p.decompress() {
        Some(v) => Ok(v),
        None => {
            #[cfg(feature = "log")]
            log::warn!("invalid point encoding: {:02x?}", p.as_bytes());

            Err(Error::InvalidPoint)
        }
    }
}

/// Map a 256-bit value onto the curve (Elligator-style, no cofactor clearing).
///
/// Branches select one of four square root constants from public data and
/// must be preserved exactly, outputs are checked by public verifiers.
#[cfg_attr(feature = "noinline", inline(never))]
pub fn map_to_point(h: &Hash) -> EdwardsPoint {
    let u = FieldElement::from_bytes_reduced(h);

    // v = 2u^2, w = 2u^2 + 1, x = w^2 - 2A^2u^2
    let v = u.square().add(&u.square());
    let w = v.add(&FieldElement::ONE);
    let mut x = w.square().add(&FieldElement::MINUS_A2.mul(&v));

    // rx = (w / x)^((p + 3) / 8), computed as w x^3 (w x^7)^((p - 5) / 8)
    let x3 = x.square().mul(&x);
    let wx7 = x3.square().mul(&x).mul(&w);
    let mut rx = wx7.pow_p58().mul(&x3).mul(&w);

    x = rx.square().mul(&x);

    let mut z = FieldElement::MINUS_A;
    let negative;

    if !w.sub(&x).is_zero() {
        if !w.add(&x).is_zero() {
            negative = true;
        } else {
            rx = rx.mul(&FieldElement::FFFB1);
            negative = false;
        }
    } else {
        rx = rx.mul(&FieldElement::FFFB2);
        negative = false;
    }

    if !negative {
        rx = rx.mul(&u);
        z = z.mul(&v);
    } else {
        x = x.mul(&FieldElement::SQRT_M1);
        if !w.sub(&x).is_zero() {
            rx = rx.mul(&FieldElement::FFFB3);
        } else {
            rx = rx.mul(&FieldElement::FFFB4);
        }
    }

    if rx.is_negative() != negative {
        rx = rx.neg();
    }

    // Projective (rx * (z + w) : z - w : z + w), so affine x = rx
    let y = z.sub(&w).mul(&z.add(&w).invert());

    let mut b = y.to_bytes();
    b[31] |= (rx.is_negative() as u8) << 7;

    // The map always yields a point on the curve
    let p = CompressedEdwardsY(b).decompress();
    debug_assert!(p.is_some(), "map_to_point left the curve");
    p.unwrap_or_default()
}

/// Hash arbitrary data to a point in the prime order subgroup,
/// `8 * map_to_point(keccak(data))`
pub fn hash_to_point(data: impl AsRef<[u8]>) -> EdwardsPoint {
    map_to_point(&fast_hash(data)).mul_by_cofactor()
}

#[cfg(test)]
mod test {
    use curve25519_dalek::{constants::ED25519_BASEPOINT_POINT, traits::IsIdentity};

    use super::*;
    use crate::crypto::keccak::{encode_varint, hash_to_scalar};

    fn message(i: u64) -> heapless::Vec<u8, 32> {
        let mut m = heapless::Vec::new();
        m.extend_from_slice(b"bytecoin").unwrap();
        m.extend_from_slice(&encode_varint(i)).unwrap();
        m
    }

    #[test]
    fn generator_h_derivation() {
        let g = ED25519_BASEPOINT_POINT.compress();
        let h = CompressedEdwardsY(fast_hash(g.as_bytes()))
            .decompress()
            .unwrap()
            .mul_by_cofactor();

        assert_eq!(h.compress(), H_COMPRESSED);
        assert!(H_COMPRESSED.decompress().is_some());
    }

    // Known answers covering each square root constant
    #[test]
    fn map_to_point_branches() {
        let tests = &[
            (
                0,
                "d526ee84a987c3914748933ea4f89120598c55eaed88c9610a85dab3c1458d46",
                "93c35711c1633a2cade69ad35961fa4b1fc7fb1e45d972aca6ebb9f664df0db5",
            ),
            (
                1,
                "905134af71c9d92b616b884e94ad58ec25f6fe3e0bdfaaff67e05359289c1036",
                "93f02a8e600457209e1f2dbd78f486dd8d2e3f8cc4fedf515251f410b490b4a1",
            ),
            (
                2,
                "bb4b3bbce53ddb94b3ee645aadfc2a68db5ea569ccef7bac39d9185ec62310cb",
                "648424eb792dc90a77dd3db3a1adb7927d77926a232429b74d00530784c945eb",
            ),
            (
                15,
                "d16c29b30619dc300ad809c3b3359e3664dffdb3efa31d8ad06afa18852a84f3",
                "1cd8872a82f2ae789c486a06da712483e02289cf00504b3a4935f5c92dc6a124",
            ),
        ];

        for (i, mapped, cleared) in tests {
            let m = message(*i);

            let p = map_to_point(&fast_hash(&m));
            assert_eq!(hex::encode(p.compress().as_bytes()), *mapped, "map {i}");

            let q = hash_to_point(&m);
            assert_eq!(hex::encode(q.compress().as_bytes()), *cleared, "hash {i}");
        }
    }

    #[test]
    fn hash_to_point_is_deterministic() {
        for i in 0..8 {
            let m = message(100 + i);
            let a = hash_to_point(&m);
            let b = hash_to_point(&m);

            assert_eq!(a.compress(), b.compress());
            assert!(a.is_torsion_free());
            assert!(!a.is_identity());
        }
    }

    #[test]
    fn reject_invalid_point() {
        // y = 2 has no corresponding x on ed25519
        let mut b = [0u8; 32];
        b[0] = 2;
        assert_eq!(
            decompress(&CompressedEdwardsY(b)),
            Err(Error::InvalidPoint)
        );

        assert!(decompress(&H_COMPRESSED).is_ok());
    }

    #[test]
    fn scalar_laws() {
        for i in 0..8u64 {
            let a = hash_to_scalar(message(i));
            let b = hash_to_scalar(message(i + 10));
            let c = hash_to_scalar(message(i + 20));

            assert_eq!(a + (b + c), (a + b) + c);
            assert_eq!(a * (b + c), a * b + a * c);
            assert_eq!(a * a.invert(), Scalar::ONE);

            assert_eq!(mul_g(&(a + b)), mul_g(&a) + mul_g(&b));
            assert_eq!(mul_h(&(a * b)), mul_h(&a) * b);
        }
    }
}
