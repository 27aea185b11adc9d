// Copyright (c) 2023 The Bytecoin Developers

//! Prelude to simplify downstream use of APDU objects
//!

pub use crate::{
    app_info::{AppInfoReq, AppInfoResp},
    key_image::{KeyImageReq, KeyImageResp},
    output_seed::{OutputSeedReq, OutputSeedResp},
    scan::{ScanOutputsReq, ScanOutputsResp, ScanPoints},
    sig::{
        OutputIndexes, SigAddExtra, SigAddInputFinish, SigAddInputIndexes, SigAddInputStart,
        SigAddOutput, SigC0, SigConfirmOutputs, SigGetC0, SigOutputKey, SigProofStart, SigStart,
        SigStepA, SigStepAMoreData, SigStepAResp, SigStepB, SigStepBResp,
    },
    state::{ResetReq, SigInfo, SigInfoReq, SigState},
    view_only::{ViewOnlyReq, ViewOnlyResp},
    wallet_keys::{WalletKeyReq, WalletKeyResp},
    Instruction, StatusWord, BCN_APDU_CLA,
};
