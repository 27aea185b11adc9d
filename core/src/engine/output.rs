// Copyright (c) 2023 The Bytecoin Developers

use encdec::Encode;

use ledger_bcn_apdu::prelude::*;
use ledger_proto::ApduError;

use crate::crypto::{CompressedEdwardsY, Hash, Scalar};

use super::{APP_NAME, APP_SPEC, APP_VERSION, APP_VERSION_STR};

/// [`Engine`][super::Engine] outputs (in response to events), typically encoded to response [APDUs][crate::apdu]
#[derive(Clone, PartialEq, Debug)]
pub enum Output {
    None,

    /// Application information
    AppInfo,

    /// Signing state
    State {
        state: SigState,
        inputs_counter: u32,
        outputs_counter: u32,
    },

    /// Public wallet keys
    WalletKeys {
        wallet_key: Hash,
        a_plus_sh: CompressedEdwardsY,
        v_mul_a_plus_sh: CompressedEdwardsY,
        view_public: CompressedEdwardsY,
    },

    /// Scanned output points
    ScanResults { results: ScanPoints },

    /// Computed key image
    KeyImage { key_image: CompressedEdwardsY },

    /// Per-output seed
    OutputSeed { seed: Hash },

    /// View-only wallet export
    ViewOnly {
        audit_base_secret: Scalar,
        view_secret: Scalar,
        view_seed: Hash,
        proof_c: Scalar,
        proof_r: Scalar,
    },

    /// Keys for an added output
    OutputKey {
        public: CompressedEdwardsY,
        encrypted_secret: CompressedEdwardsY,
        encrypted_address_type: u8,
    },

    /// Step A commitments
    StepA {
        sig_p: CompressedEdwardsY,
        y: CompressedEdwardsY,
        z: CompressedEdwardsY,
    },

    /// Ring challenge
    C0 { c0: Scalar },

    /// Encrypted step B responses
    StepB {
        rr: Hash,
        rs: Hash,
        ra: Hash,
        encryption_key: Hash,
    },
}

impl Output {
    /// Encode an [`Output`] object to an APDU
    #[cfg_attr(feature = "noinline", inline(never))]
    pub fn encode(&self, buff: &mut [u8]) -> Result<usize, ApduError> {
        match self {
            Output::None => Ok(0),
            Output::AppInfo => {
                AppInfoResp::new(APP_VERSION, APP_NAME, APP_VERSION_STR, APP_SPEC).encode(buff)
            }
            Output::State {
                state,
                inputs_counter,
                outputs_counter,
            } => SigInfo::new(*state, *inputs_counter, *outputs_counter).encode(buff),
            Output::WalletKeys {
                wallet_key,
                a_plus_sh,
                v_mul_a_plus_sh,
                view_public,
            } => WalletKeyResp::new(*wallet_key, *a_plus_sh, *v_mul_a_plus_sh, *view_public)
                .encode(buff),
            Output::ScanResults { results } => ScanOutputsResp::new(results.clone()).encode(buff),
            Output::KeyImage { key_image } => KeyImageResp::new(*key_image).encode(buff),
            Output::OutputSeed { seed } => OutputSeedResp::new(*seed).encode(buff),
            Output::ViewOnly {
                audit_base_secret,
                view_secret,
                view_seed,
                proof_c,
                proof_r,
            } => ViewOnlyResp {
                audit_base_secret: *audit_base_secret,
                view_secret: *view_secret,
                view_seed: *view_seed,
                proof_c: *proof_c,
                proof_r: *proof_r,
            }
            .encode(buff),
            Output::OutputKey {
                public,
                encrypted_secret,
                encrypted_address_type,
            } => SigOutputKey::new(*public, *encrypted_secret, *encrypted_address_type)
                .encode(buff),
            Output::StepA { sig_p, y, z } => SigStepAResp::new(*sig_p, *y, *z).encode(buff),
            Output::C0 { c0 } => SigC0::new(*c0).encode(buff),
            Output::StepB {
                rr,
                rs,
                ra,
                encryption_key,
            } => SigStepBResp {
                rr: *rr,
                rs: *rs,
                ra: *ra,
                encryption_key: *encryption_key,
            }
            .encode(buff),
        }
    }

    /// Fetch signing state if this output carries it
    pub fn state(&self) -> Option<SigState> {
        match self {
            Output::State { state, .. } => Some(*state),
            _ => None,
        }
    }
}
