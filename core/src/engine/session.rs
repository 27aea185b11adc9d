// Copyright (c) 2023 The Bytecoin Developers

//! Transaction signing session
//!
//! A [Session] threads a single ring-signature transaction through the
//! sequence of host requests. Every operation checks the session state
//! and arguments before mutating anything, so a rejected request leaves
//! the session exactly as it was.

use curve25519_dalek::constants::ED25519_BASEPOINT_POINT;
use rand_core::CryptoRngCore;
use zeroize::Zeroize;

use ledger_bcn_apdu::state::SigState;

use super::Error;
use crate::{
    crypto::{
        curve::{decompress, generator_h, hash_to_point},
        keccak::{Hash, Hasher},
        CompressedEdwardsY, EdwardsPoint, Scalar,
    },
    wallet::{encrypt_scalar, AddressTag, OutputKey, OutputSecrets, PublicAddress, Wallet},
};

/// Key tag hashed ahead of each input
const INPUT_KEY_TAG: u8 = 2;

/// Key tag hashed ahead of each output
const OUTPUT_KEY_TAG: u8 = 2;

const KA: &[u8; 2] = b"ka";
const KS: &[u8; 2] = b"ks";
const KR: &[u8; 2] = b"kr";

const RA: &[u8; 2] = b"ra";
const RS: &[u8; 2] = b"rs";
const RR: &[u8; 2] = b"rr";

/// Destination address locked by the first non-change output
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Destination {
    pub tag: AddressTag,
    pub s: CompressedEdwardsY,
    pub sv: CompressedEdwardsY,
}

/// Keys produced for a newly added output
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct AddedOutput {
    pub key: OutputKey,
    /// Address tag masked by the output secret address type
    pub encrypted_address_type: u8,
}

/// Step A commitments for an input
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct StepA {
    pub sig_p: EdwardsPoint,
    pub y: EdwardsPoint,
    pub z: EdwardsPoint,
}

/// Encrypted step B responses for an input
#[derive(Clone, PartialEq, Debug)]
pub struct StepB {
    pub rr: Hash,
    pub rs: Hash,
    pub ra: Hash,
    /// Response encryption key, zero except on the final input
    /// (and zeroed on integrity failure)
    pub encryption_key: Hash,
}

/// Signing session state
pub struct Session {
    state: SigState,

    inputs_num: u32,
    outputs_num: u32,
    extra_size: u32,

    inputs_counter: u32,
    outputs_counter: u32,
    mixin_counter: u32,
    mixin_num: u32,
    extra_counter: u32,

    inputs_amount: u64,
    dst_amount: u64,
    change_amount: u64,
    fee: u64,

    destination: Option<Destination>,

    tx_prefix_hasher: Hasher,
    tx_inputs_hasher: Hasher,
    tx_inputs_hash: Hash,
    step_args_hash: Hash,

    c0: Scalar,
    random_seed: Hash,
    encryption_key: Hash,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Create a new (finished) session
    pub fn new() -> Self {
        Self {
            state: SigState::Finished,
            inputs_num: 0,
            outputs_num: 0,
            extra_size: 0,
            inputs_counter: 0,
            outputs_counter: 0,
            mixin_counter: 0,
            mixin_num: 0,
            extra_counter: 0,
            inputs_amount: 0,
            dst_amount: 0,
            change_amount: 0,
            fee: 0,
            destination: None,
            tx_prefix_hasher: Hasher::new(),
            tx_inputs_hasher: Hasher::new(),
            tx_inputs_hash: [0u8; 32],
            step_args_hash: [0u8; 32],
            c0: Scalar::ZERO,
            random_seed: [0u8; 32],
            encryption_key: [0u8; 32],
        }
    }

    /// Reset session to [SigState::Finished], clearing all secrets
    pub fn reset(&mut self) {
        self.zeroize();
        *self = Self::new();
    }

    /// Current session state
    pub fn state(&self) -> SigState {
        self.state
    }

    /// Inputs processed in the current phase
    pub fn inputs_counter(&self) -> u32 {
        self.inputs_counter
    }

    /// Outputs processed
    pub fn outputs_counter(&self) -> u32 {
        self.outputs_counter
    }

    /// Total of all declared inputs
    pub fn inputs_amount(&self) -> u64 {
        self.inputs_amount
    }

    /// Total paid to the destination
    pub fn dst_amount(&self) -> u64 {
        self.dst_amount
    }

    /// Total returned as change
    pub fn change_amount(&self) -> u64 {
        self.change_amount
    }

    /// Transaction fee, available once all outputs are added
    pub fn fee(&self) -> u64 {
        self.fee
    }

    /// Locked destination address, if any non-change outputs were added
    pub fn destination(&self) -> Option<&Destination> {
        self.destination.as_ref()
    }

    /// Hash binding outputs to the input set, available once all inputs are added
    pub fn tx_inputs_hash(&self) -> &Hash {
        &self.tx_inputs_hash
    }

    /// Start a transaction, resetting any prior session
    #[cfg_attr(feature = "noinline", inline(never))]
    pub fn start(
        &mut self,
        version: u32,
        unlock_time: u64,
        inputs_num: u32,
        outputs_num: u32,
        extra_size: u32,
    ) -> Result<(), Error> {
        if inputs_num == 0 || outputs_num == 0 || version == 0 {
            return Err(Error::InvalidArgument);
        }

        self.reset();

        self.inputs_num = inputs_num;
        self.outputs_num = outputs_num;
        self.extra_size = extra_size;

        self.tx_prefix_hasher.update_varint(version as u64);
        self.tx_prefix_hasher.update_varint(unlock_time);
        self.tx_prefix_hasher.update_varint(inputs_num as u64);

        self.tx_inputs_hasher.update_varint(inputs_num as u64);

        self.set_state(SigState::ExpectInputStart);

        Ok(())
    }

    /// Start a single input proof, proceeding directly to extra chunks
    #[cfg_attr(feature = "noinline", inline(never))]
    pub fn proof_start(&mut self, extra_size: u32) -> Result<(), Error> {
        self.reset();

        self.inputs_num = 1;
        self.extra_size = extra_size;

        self.tx_prefix_hasher.update_byte(0);

        self.set_state(SigState::ExpectExtraChunk);

        Ok(())
    }

    /// Start the next input
    pub fn add_input_start(&mut self, amount: u64, ring_size: u32) -> Result<(), Error> {
        self.expect(
            self.state == SigState::ExpectInputStart && self.inputs_counter < self.inputs_num,
        )?;

        let inputs_amount = self
            .inputs_amount
            .checked_add(amount)
            .ok_or(Error::ArithmeticOverflow)?;

        self.inputs_amount = inputs_amount;

        for h in [&mut self.tx_prefix_hasher, &mut self.tx_inputs_hasher] {
            h.update_byte(INPUT_KEY_TAG);
            h.update_varint(amount);
            h.update_varint(ring_size as u64);
        }

        self.mixin_counter = 0;
        self.mixin_num = ring_size;

        self.set_state(SigState::ExpectInputIndexes);

        Ok(())
    }

    /// Add ring member indexes for the current input
    pub fn add_input_indexes(&mut self, indexes: &[u32]) -> Result<(), Error> {
        let mixin_counter = self.mixin_counter.checked_add(indexes.len() as u32);

        self.expect(
            self.state == SigState::ExpectInputIndexes
                && matches!(mixin_counter, Some(c) if c <= self.mixin_num),
        )?;

        for i in indexes {
            self.tx_prefix_hasher.update_varint(*i as u64);
            self.tx_inputs_hasher.update_varint(*i as u64);
        }

        self.mixin_counter += indexes.len() as u32;

        if self.mixin_counter == self.mixin_num {
            self.set_state(SigState::ExpectInputFinish);
        }

        Ok(())
    }

    /// Finish the current input, hashing the input key image
    #[cfg_attr(feature = "noinline", inline(never))]
    pub fn add_input_finish(
        &mut self,
        wallet: &mut Wallet,
        secret_material: &[u8],
        address_index: u32,
    ) -> Result<(), Error> {
        self.expect(self.state == SigState::ExpectInputFinish)?;

        let key_image = wallet.key_image_for_address(secret_material, address_index);

        self.tx_prefix_hasher.update(key_image.as_bytes());
        self.tx_inputs_hasher.update(key_image.as_bytes());

        self.inputs_counter += 1;
        if self.inputs_counter < self.inputs_num {
            self.set_state(SigState::ExpectInputStart);
            return Ok(());
        }

        self.tx_inputs_hash = core::mem::take(&mut self.tx_inputs_hasher).finalize();
        self.tx_prefix_hasher.update_varint(self.outputs_num as u64);

        self.set_state(SigState::ExpectOutput);

        Ok(())
    }

    /// Add an output, either change to the wallet address at `change_index`
    /// or a payment to the (single) destination address
    #[cfg_attr(feature = "noinline", inline(never))]
    #[allow(clippy::too_many_arguments)]
    pub fn add_output(
        &mut self,
        wallet: &mut Wallet,
        change: bool,
        amount: u64,
        change_index: u32,
        dst_tag: u8,
        dst_s: &CompressedEdwardsY,
        dst_sv: &CompressedEdwardsY,
    ) -> Result<AddedOutput, Error> {
        self.expect(
            self.state == SigState::ExpectOutput && self.outputs_counter < self.outputs_num,
        )?;

        // Resolve output address and accumulate amounts
        let mut dst_amount = self.dst_amount;
        let mut change_amount = self.change_amount;
        let mut destination = self.destination;

        let (tag, address) = match change {
            true => {
                change_amount = change_amount
                    .checked_add(amount)
                    .ok_or(Error::ArithmeticOverflow)?;

                (AddressTag::Unlinkable, wallet.address_public(change_index))
            }
            false => {
                let tag = AddressTag::try_from(dst_tag).map_err(|_| Error::InvalidArgument)?;
                let d = Destination {
                    tag,
                    s: *dst_s,
                    sv: *dst_sv,
                };

                match &destination {
                    Some(locked) if locked != &d => {
                        #[cfg(feature = "log")]
                        log::warn!("destination address mismatch");

                        return Err(Error::AddressMismatch);
                    }
                    Some(_) => (),
                    None => destination = Some(d),
                }

                dst_amount = dst_amount
                    .checked_add(amount)
                    .ok_or(Error::ArithmeticOverflow)?;

                let address = PublicAddress {
                    s: decompress(dst_s)?,
                    sv: decompress(dst_sv)?,
                };

                (tag, address)
            }
        };

        // Check totals on the final output
        let outputs_counter = self.outputs_counter + 1;
        let fee = match outputs_counter == self.outputs_num {
            true => {
                let outputs_amount = dst_amount
                    .checked_add(change_amount)
                    .ok_or(Error::ArithmeticOverflow)?;

                match self.inputs_amount.checked_sub(outputs_amount) {
                    Some(fee) => Some(fee),
                    None => {
                        #[cfg(feature = "log")]
                        log::warn!(
                            "outputs {} exceed inputs {}",
                            outputs_amount,
                            self.inputs_amount
                        );

                        return Err(Error::InsufficientFunds);
                    }
                }
            }
            false => None,
        };

        // Derive output keys
        let seed = wallet.output_seed(&self.tx_inputs_hash, self.outputs_counter);
        let secrets = OutputSecrets::derive(&seed);

        let encrypted_address_type = (tag as u8) ^ secrets.address_type;
        let key = OutputKey::derive(
            tag,
            &secrets,
            &self.tx_inputs_hash,
            self.outputs_counter,
            &address,
        );

        // Commit output
        let h = &mut self.tx_prefix_hasher;
        h.update_byte(OUTPUT_KEY_TAG);
        h.update_varint(amount);
        h.update(key.public.compress().as_bytes());
        h.update(key.encrypted_secret.compress().as_bytes());
        h.update_byte(encrypted_address_type);

        self.dst_amount = dst_amount;
        self.change_amount = change_amount;
        self.destination = destination;
        self.outputs_counter = outputs_counter;

        if let Some(fee) = fee {
            self.fee = fee;
            self.tx_prefix_hasher.update_varint(self.extra_size as u64);
            self.set_state(SigState::ExpectUserConfirmation);
        }

        Ok(AddedOutput {
            key,
            encrypted_address_type,
        })
    }

    /// Continue following user confirmation of outputs
    pub fn confirm_outputs(&mut self) -> Result<(), Error> {
        self.expect(
            self.state == SigState::ExpectUserConfirmation
                && self.outputs_counter == self.outputs_num,
        )?;

        self.set_state(SigState::ExpectExtraChunk);

        Ok(())
    }

    /// Add a chunk of transaction extra, on completion the transaction
    /// prefix hash is finalised and fresh signing keys are generated
    #[cfg_attr(feature = "noinline", inline(never))]
    pub fn add_extra<RNG: CryptoRngCore>(
        &mut self,
        rng: &mut RNG,
        data: &[u8],
    ) -> Result<(), Error> {
        let extra_counter = self.extra_counter.checked_add(data.len() as u32);

        self.expect(
            self.state == SigState::ExpectExtraChunk
                && matches!(extra_counter, Some(c) if c <= self.extra_size),
        )?;

        self.tx_prefix_hasher.update(data);
        self.extra_counter += data.len() as u32;

        if self.extra_counter < self.extra_size {
            return Ok(());
        }

        let tx_prefix_hash = core::mem::take(&mut self.tx_prefix_hasher).finalize();
        self.inputs_counter = 0;

        self.tx_inputs_hasher = Hasher::new();
        self.tx_inputs_hasher.update(tx_prefix_hash);

        rng.fill_bytes(&mut self.random_seed);
        rng.fill_bytes(&mut self.encryption_key);

        self.set_state(SigState::ExpectStepA);

        Ok(())
    }

    /// Step A (commitment) for the next input
    #[cfg_attr(feature = "noinline", inline(never))]
    pub fn step_a(
        &mut self,
        wallet: &mut Wallet,
        secret_material: &[u8],
        address_index: u32,
    ) -> Result<StepA, Error> {
        // Repeated calls advance to the next input
        let (state, i) = match self.state {
            SigState::ExpectStepAMoreData if self.inputs_counter + 1 < self.inputs_num => {
                (SigState::ExpectStepA, self.inputs_counter + 1)
            }
            s => (s, self.inputs_counter),
        };

        self.expect(state == SigState::ExpectStepA && i < self.inputs_num)?;

        let keys = wallet.input_keys(secret_material, address_index);
        let key_image = keys.key_image();

        self.tx_prefix_hasher.update(keys.inv_hash_be());
        self.tx_prefix_hasher.update_varint(address_index as u64);

        let b_coin = hash_to_point(key_image.compress().as_bytes());

        let sig_p = generator_h() * keys.s - b_coin * keys.a;
        self.tx_inputs_hasher.update(sig_p.compress().as_bytes());

        let mut ks = wallet.sign_secret(&self.random_seed, KS, i);
        let mut ka = wallet.sign_secret(&self.random_seed, KA, i);
        let x = generator_h() * ks + b_coin * ka;
        self.tx_inputs_hasher.update(x.compress().as_bytes());
        ks.zeroize();
        ka.zeroize();

        let mut kr = wallet.sign_secret(&self.random_seed, KR, i);
        let y = (ED25519_BASEPOINT_POINT + b_coin) * kr;
        let z = hash_to_point(keys.public.compress().as_bytes()) * kr;
        kr.zeroize();

        self.inputs_counter = i;
        self.set_state(SigState::ExpectStepAMoreData);

        Ok(StepA { sig_p, y, z })
    }

    /// Add ring member data for the current input
    pub fn step_a_more_data(&mut self, data: &[u8]) -> Result<(), Error> {
        self.expect(self.state == SigState::ExpectStepAMoreData)?;

        self.tx_inputs_hasher.update(data);

        Ok(())
    }

    /// Finalise the ring challenge once step A is complete for all inputs
    pub fn get_c0(&mut self) -> Result<Scalar, Error> {
        self.expect(
            self.state == SigState::ExpectStepAMoreData
                && self.inputs_counter + 1 == self.inputs_num,
        )?;

        self.c0 = core::mem::take(&mut self.tx_inputs_hasher).finalize_scalar();
        self.inputs_counter = 0;

        self.step_args_hash = core::mem::take(&mut self.tx_prefix_hasher).finalize();

        self.set_state(SigState::ExpectStepB);

        Ok(self.c0)
    }

    /// Step B (response) for the next input
    #[cfg_attr(feature = "noinline", inline(never))]
    pub fn step_b(
        &mut self,
        wallet: &mut Wallet,
        secret_material: &[u8],
        address_index: u32,
        my_c: &Scalar,
    ) -> Result<StepB, Error> {
        self.expect(
            self.state == SigState::ExpectStepB && self.inputs_counter < self.inputs_num,
        )?;

        let i = self.inputs_counter;
        let keys = wallet.input_keys(secret_material, address_index);

        self.tx_prefix_hasher.update(keys.inv_hash_be());
        self.tx_prefix_hasher.update_varint(address_index as u64);

        let mut ks = wallet.sign_secret(&self.random_seed, KS, i);
        let mut rsig_rs = ks - self.c0 * keys.s;
        let rs = encrypt_scalar(&self.encryption_key, &rsig_rs, i, RS);
        ks.zeroize();
        rsig_rs.zeroize();

        let mut ka = wallet.sign_secret(&self.random_seed, KA, i);
        let mut rsig_ra = ka + self.c0 * keys.a;
        let ra = encrypt_scalar(&self.encryption_key, &rsig_ra, i, RA);
        ka.zeroize();
        rsig_ra.zeroize();

        let mut kr = wallet.sign_secret(&self.random_seed, KR, i);
        let mut rsig_rr = kr - my_c * keys.a;
        let rr = encrypt_scalar(&self.encryption_key, &rsig_rr, i, RR);
        kr.zeroize();
        rsig_rr.zeroize();

        self.inputs_counter += 1;
        if self.inputs_counter < self.inputs_num {
            return Ok(StepB {
                rr,
                rs,
                ra,
                encryption_key: [0u8; 32],
            });
        }

        let step_args_hash = core::mem::take(&mut self.tx_prefix_hasher).finalize();
        if step_args_hash != self.step_args_hash {
            #[cfg(feature = "log")]
            log::warn!("step arguments mismatch, discarding encryption key");

            self.encryption_key.zeroize();
        }

        let encryption_key = self.encryption_key;

        self.set_state(SigState::Finished);

        Ok(StepB {
            rr,
            rs,
            ra,
            encryption_key,
        })
    }

    /// Check a state condition, logging rejected calls
    fn expect(&self, ok: bool) -> Result<(), Error> {
        match ok {
            true => Ok(()),
            false => {
                #[cfg(feature = "log")]
                log::warn!(
                    "operation not allowed in state {} (inputs {}/{}, outputs {}/{})",
                    self.state,
                    self.inputs_counter,
                    self.inputs_num,
                    self.outputs_counter,
                    self.outputs_num
                );

                Err(Error::SequenceViolation)
            }
        }
    }

    fn set_state(&mut self, state: SigState) {
        #[cfg(feature = "log")]
        log::debug!("session state: {} -> {}", self.state, state);

        self.state = state;
    }
}

impl Zeroize for Session {
    fn zeroize(&mut self) {
        self.c0.zeroize();
        self.random_seed.zeroize();
        self.encryption_key.zeroize();
        self.tx_inputs_hash.zeroize();
        self.step_args_hash.zeroize();
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl core::fmt::Debug for Session {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("inputs_counter", &self.inputs_counter)
            .field("inputs_num", &self.inputs_num)
            .field("outputs_counter", &self.outputs_counter)
            .field("outputs_num", &self.outputs_num)
            .finish_non_exhaustive()
    }
}
