// Copyright (c) 2023 The Bytecoin Developers

//! Arithmetic modulo `p = 2^255 - 19`, radix 2^51.
//!
//! This is only used by the hash-to-point map, which needs field operations
//! that curve25519-dalek does not export. Values are not constant time with
//! respect to branch selection, the map branches on public data only.

use byteorder::{ByteOrder, LittleEndian};

const MASK: u64 = (1 << 51) - 1;

/// Field element, five 51-bit limbs (limbs may exceed 51 bits between reductions)
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct FieldElement(pub(crate) [u64; 5]);

impl FieldElement {
    pub const ZERO: Self = Self([0, 0, 0, 0, 0]);
    pub const ONE: Self = Self([1, 0, 0, 0, 0]);

    /// `-A^2` for the Montgomery curve coefficient `A = 486662`
    pub const MINUS_A2: Self = Self([
        2251562973782985,
        2251799813685247,
        2251799813685247,
        2251799813685247,
        2251799813685247,
    ]);

    /// `-A`
    pub const MINUS_A: Self = Self([
        2251799813198567,
        2251799813685247,
        2251799813685247,
        2251799813685247,
        2251799813685247,
    ]);

    /// `sqrt(-2 * A * (A + 2))`
    pub const FFFB1: Self = Self([
        2086276909777390,
        1432823880852564,
        2230254366511122,
        1560826899241888,
        2224448371273057,
    ]);

    /// `sqrt(2 * A * (A + 2))`
    pub const FFFB2: Self = Self([
        1799365282536160,
        211702679075419,
        98401882961933,
        1824402956671968,
        1355018705847714,
    ]);

    /// `sqrt(-sqrt(-1) * A * (A + 2))`
    pub const FFFB3: Self = Self([
        982444093221990,
        515339305954051,
        1185873571910653,
        1257687935557663,
        1817084980972576,
    ]);

    /// `sqrt(sqrt(-1) * A * (A + 2))`
    pub const FFFB4: Self = Self([
        1434878624371078,
        303636626878631,
        1087471688948720,
        1685084792570943,
        462066275124861,
    ]);

    /// `sqrt(-1)`
    pub const SQRT_M1: Self = Self([
        1718705420411056,
        234908883556509,
        2233514472574048,
        2117202627021982,
        765476049583133,
    ]);

    /// Load a little-endian 256-bit value, reducing the full value mod p.
    ///
    /// Unlike point decoding, bit 255 is significant here (`2^255 = 19 mod p`).
    pub fn from_bytes_reduced(b: &[u8; 32]) -> Self {
        let w0 = LittleEndian::read_u64(&b[0..]);
        let w1 = LittleEndian::read_u64(&b[8..]);
        let w2 = LittleEndian::read_u64(&b[16..]);
        let w3 = LittleEndian::read_u64(&b[24..]);

        let l = [
            (w0 & MASK) + 19 * (w3 >> 63),
            ((w0 >> 51) | (w1 << 13)) & MASK,
            ((w1 >> 38) | (w2 << 26)) & MASK,
            ((w2 >> 25) | (w3 << 39)) & MASK,
            (w3 >> 12) & MASK,
        ];

        Self::weak_reduce(l)
    }

    /// Encode to canonical little-endian bytes
    pub fn to_bytes(&self) -> [u8; 32] {
        let mut l = Self::weak_reduce(self.0).0;

        // Compute the quotient of (h + 19) / 2^255 to detect values >= p
        let mut q = (l[0] + 19) >> 51;
        q = (l[1] + q) >> 51;
        q = (l[2] + q) >> 51;
        q = (l[3] + q) >> 51;
        q = (l[4] + q) >> 51;

        l[0] += 19 * q;

        l[1] += l[0] >> 51;
        l[0] &= MASK;
        l[2] += l[1] >> 51;
        l[1] &= MASK;
        l[3] += l[2] >> 51;
        l[2] &= MASK;
        l[4] += l[3] >> 51;
        l[3] &= MASK;
        l[4] &= MASK;

        let mut b = [0u8; 32];
        LittleEndian::write_u64(&mut b[0..], l[0] | (l[1] << 51));
        LittleEndian::write_u64(&mut b[8..], (l[1] >> 13) | (l[2] << 38));
        LittleEndian::write_u64(&mut b[16..], (l[2] >> 26) | (l[3] << 25));
        LittleEndian::write_u64(&mut b[24..], (l[3] >> 39) | (l[4] << 12));
        b
    }

    /// Sign of the canonical encoding (odd values are negative)
    pub fn is_negative(&self) -> bool {
        self.to_bytes()[0] & 1 == 1
    }

    pub fn is_zero(&self) -> bool {
        self.to_bytes() == [0u8; 32]
    }

    fn weak_reduce(mut l: [u64; 5]) -> Self {
        let c0 = l[0] >> 51;
        let c1 = l[1] >> 51;
        let c2 = l[2] >> 51;
        let c3 = l[3] >> 51;
        let c4 = l[4] >> 51;

        l[0] = (l[0] & MASK) + c4 * 19;
        l[1] = (l[1] & MASK) + c0;
        l[2] = (l[2] & MASK) + c1;
        l[3] = (l[3] & MASK) + c2;
        l[4] = (l[4] & MASK) + c3;

        Self(l)
    }

    pub fn add(&self, rhs: &Self) -> Self {
        let (a, b) = (&self.0, &rhs.0);
        Self::weak_reduce([a[0] + b[0], a[1] + b[1], a[2] + b[2], a[3] + b[3], a[4] + b[4]])
    }

    pub fn sub(&self, rhs: &Self) -> Self {
        // Add 16p before subtracting so limbs never underflow
        let (a, b) = (&self.0, &Self::weak_reduce(rhs.0).0);
        Self::weak_reduce([
            (a[0] + 36028797018963664) - b[0],
            (a[1] + 36028797018963952) - b[1],
            (a[2] + 36028797018963952) - b[2],
            (a[3] + 36028797018963952) - b[3],
            (a[4] + 36028797018963952) - b[4],
        ])
    }

    pub fn neg(&self) -> Self {
        Self::ZERO.sub(self)
    }

    pub fn mul(&self, rhs: &Self) -> Self {
        #[inline(always)]
        fn m(x: u64, y: u64) -> u128 {
            (x as u128) * (y as u128)
        }

        let a = &Self::weak_reduce(self.0).0;
        let b = &Self::weak_reduce(rhs.0).0;

        let b1_19 = b[1] * 19;
        let b2_19 = b[2] * 19;
        let b3_19 = b[3] * 19;
        let b4_19 = b[4] * 19;

        let c0 = m(a[0], b[0]) + m(a[4], b1_19) + m(a[3], b2_19) + m(a[2], b3_19) + m(a[1], b4_19);
        let mut c1 =
            m(a[1], b[0]) + m(a[0], b[1]) + m(a[4], b2_19) + m(a[3], b3_19) + m(a[2], b4_19);
        let mut c2 =
            m(a[2], b[0]) + m(a[1], b[1]) + m(a[0], b[2]) + m(a[4], b3_19) + m(a[3], b4_19);
        let mut c3 =
            m(a[3], b[0]) + m(a[2], b[1]) + m(a[1], b[2]) + m(a[0], b[3]) + m(a[4], b4_19);
        let mut c4 = m(a[4], b[0]) + m(a[3], b[1]) + m(a[2], b[2]) + m(a[1], b[3]) + m(a[0], b[4]);

        let mut out = [0u64; 5];

        c1 += c0 >> 51;
        out[0] = (c0 as u64) & MASK;
        c2 += c1 >> 51;
        out[1] = (c1 as u64) & MASK;
        c3 += c2 >> 51;
        out[2] = (c2 as u64) & MASK;
        c4 += c3 >> 51;
        out[3] = (c3 as u64) & MASK;
        out[4] = (c4 as u64) & MASK;

        // Fold the top carry back in via 2^255 = 19
        let c = (out[0] as u128) + ((c4 >> 51) * 19);
        out[0] = (c as u64) & MASK;
        out[1] += (c >> 51) as u64;

        Self(out)
    }

    pub fn square(&self) -> Self {
        self.mul(self)
    }

    /// `self^(2^k)`
    fn pow2k(&self, k: u32) -> Self {
        let mut v = *self;
        for _ in 0..k {
            v = v.square();
        }
        v
    }

    /// Returns `(self^(2^250 - 1), self^11)`
    fn pow22501(&self) -> (Self, Self) {
        let t0 = self.square();
        let t1 = t0.pow2k(2);
        let t2 = self.mul(&t1);
        let t3 = t0.mul(&t2);
        let t4 = t3.square();
        let t5 = t2.mul(&t4);
        let t7 = t5.pow2k(5).mul(&t5);
        let t9 = t7.pow2k(10).mul(&t7);
        let t11 = t9.pow2k(20).mul(&t9);
        let t13 = t11.pow2k(10).mul(&t7);
        let t15 = t13.pow2k(50).mul(&t13);
        let t17 = t15.pow2k(100).mul(&t15);
        let t19 = t17.pow2k(50).mul(&t13);

        (t19, t3)
    }

    /// `self^(p - 2)`, zero maps to zero
    pub fn invert(&self) -> Self {
        let (t19, t3) = self.pow22501();
        t19.pow2k(5).mul(&t3)
    }

    /// `self^((p - 5) / 8)`
    pub fn pow_p58(&self) -> Self {
        let (t19, _) = self.pow22501();
        t19.pow2k(2).mul(self)
    }
}

impl PartialEq for FieldElement {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn fe(s: &str) -> FieldElement {
        let mut b = [0u8; 32];
        hex::decode_to_slice(s, &mut b).unwrap();
        FieldElement::from_bytes_reduced(&b)
    }

    #[test]
    fn constants_match_encoding() {
        let tests = &[
            (
                FieldElement::MINUS_A2,
                "c9e33ddbc8ffffffffffffffffffffffffffffffffffffffffffffffffffff7f",
            ),
            (
                FieldElement::MINUS_A,
                "e792f8ffffffffffffffffffffffffffffffffffffffffffffffffffffffff7f",
            ),
            (
                FieldElement::FFFB1,
                "ee411c327569a7228d732ab9a80494d1e319fb4137c5a920171bd6daeffb717e",
            ),
            (
                FieldElement::FFFB2,
                "e09a7c608364ded2dff756044603de51be5f16c0b751d491f62c5a040a1e064d",
            ),
            (
                FieldElement::FFFB3,
                "662c3017877d1b58294296a54eff2440eda20d3f404695b8ef08c2140d114a67",
            ),
            (
                FieldElement::FFFB4,
                "8691b3b603193d85494a3fa108fc46ee2e43f77e88f4c026f9db671003f3431a",
            ),
            (
                FieldElement::SQRT_M1,
                "b0a00e4a271beec478e42fad0618432fa7d7fb3d99004d2b0bdfc14f8024832b",
            ),
        ];

        for (c, s) in tests {
            assert_eq!(hex::encode(c.to_bytes()), *s);
        }
    }

    #[test]
    fn sqrt_m1_squares_to_minus_one() {
        let m1 = FieldElement::ONE.neg();
        assert_eq!(FieldElement::SQRT_M1.square(), m1);
    }

    #[test]
    fn top_bit_is_reduced() {
        // 2^255 = 19 mod p
        let mut b = [0u8; 32];
        b[31] = 0x80;
        let v = FieldElement::from_bytes_reduced(&b);

        let mut expected = [0u8; 32];
        expected[0] = 19;
        assert_eq!(v.to_bytes(), expected);

        // p itself encodes to zero
        let p = fe("edffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff7f");
        assert!(p.is_zero());
    }

    #[test]
    fn invert_and_pow() {
        for _ in 0..16 {
            let b: [u8; 32] = rand::random();
            let a = FieldElement::from_bytes_reduced(&b);
            if a.is_zero() {
                continue;
            }

            assert_eq!(a.mul(&a.invert()), FieldElement::ONE);

            // (a^((p - 5) / 8))^8 * a^4 = a^(p - 1) = 1
            assert_eq!(a.pow_p58().pow2k(3).mul(&a.pow2k(2)), FieldElement::ONE);
        }
    }

    #[test]
    fn add_sub_neg() {
        for _ in 0..16 {
            let a = FieldElement::from_bytes_reduced(&rand::random());
            let b = FieldElement::from_bytes_reduced(&rand::random());

            assert_eq!(a.add(&b).sub(&b), a);
            assert_eq!(a.add(&a.neg()), FieldElement::ZERO);
            assert_eq!(a.sub(&b), b.sub(&a).neg());
        }
    }
}
