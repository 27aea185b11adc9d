// Copyright (c) 2023 The Bytecoin Developers

//! Bytecoin (Amethyst) hardware wallet core
//!
//! This provides a common [Engine][engine] supporting wallet key derivation and
//! transaction signing for execution on hardware wallets.
//!
//! Interactions with the [Engine][engine] are performed via [Event][engine::Event]s and [Output][engine::Output]s,
//! see [ledger_bcn_apdu] for APDU objects and wire encodings.
//!
//! ## Operations
//!
//! Prior to interacting with a hardware wallet the client should issue an
//! [`AppInfoReq`][ledger_bcn_apdu::app_info::AppInfoReq] to fetch an
//! [`AppInfoResp`][ledger_bcn_apdu::app_info::AppInfoResp] containing the
//! application name, version and protocol version.
//!
//! ### Wallet keys and scanning
//!
//! Public wallet keys are requested via [`WalletKeyReq`][ledger_bcn_apdu::wallet_keys::WalletKeyReq],
//! returning a [`WalletKeyResp`][ledger_bcn_apdu::wallet_keys::WalletKeyResp].
//!
//! Output keys may be multiplied by the view secret via
//! [`ScanOutputsReq`][ledger_bcn_apdu::scan::ScanOutputsReq], key images recovered with
//! [`KeyImageReq`][ledger_bcn_apdu::key_image::KeyImageReq] and output seeds computed with
//! [`OutputSeedReq`][ledger_bcn_apdu::output_seed::OutputSeedReq].
//!
//! A view-only wallet may be exported with [`ViewOnlyReq`][ledger_bcn_apdu::view_only::ViewOnlyReq]
//! once the user approves the export, the request returns `ApprovalPending` until then.
//!
//! ### Executing a transaction
//!
//! Unless otherwise documented each signing operation returns a
//! [`SigInfo`][ledger_bcn_apdu::state::SigInfo] response containing the current
//! [signing state][ledger_bcn_apdu::state::SigState] and input / output counters.
//! Any operation issued outside of its expected state is rejected without
//! modifying the session.
//!
//! 1. Issue [`SigStart`][ledger_bcn_apdu::sig::SigStart] with the transaction version,
//!    unlock time and input / output / extra counts
//! 2. For each input
//!     1. Issue [`SigAddInputStart`][ledger_bcn_apdu::sig::SigAddInputStart] with the input amount and ring size
//!     2. Issue [`SigAddInputIndexes`][ledger_bcn_apdu::sig::SigAddInputIndexes] until all ring member indexes are loaded
//!     3. Issue [`SigAddInputFinish`][ledger_bcn_apdu::sig::SigAddInputFinish] with the owned output secret material
//! 3. For each output issue [`SigAddOutput`][ledger_bcn_apdu::sig::SigAddOutput], returning the
//!    [`SigOutputKey`][ledger_bcn_apdu::sig::SigOutputKey] for inclusion in the transaction.
//!    All non-change outputs must pay the same destination.
//! 4. Once the user has approved the destination, amount and fee, issue
//!    [`SigConfirmOutputs`][ledger_bcn_apdu::sig::SigConfirmOutputs]
//! 5. Issue [`SigAddExtra`][ledger_bcn_apdu::sig::SigAddExtra] with chunks of the transaction extra
//! 6. For each input issue [`SigStepA`][ledger_bcn_apdu::sig::SigStepA] followed by
//!    [`SigStepAMoreData`][ledger_bcn_apdu::sig::SigStepAMoreData] with the ring data
//! 7. Issue [`SigGetC0`][ledger_bcn_apdu::sig::SigGetC0] to fetch the ring challenge
//! 8. For each input issue [`SigStepB`][ledger_bcn_apdu::sig::SigStepB] to fetch the encrypted responses,
//!    the final call returns the response encryption key
//!
//! [`SigProofStart`][ledger_bcn_apdu::sig::SigProofStart] starts a single input proof session,
//! continuing from step 5.
//!

#![cfg_attr(not(feature = "std"), no_std)]

pub use ledger_bcn_apdu::{self as apdu};

pub mod crypto;

pub mod wallet;

pub mod engine;
