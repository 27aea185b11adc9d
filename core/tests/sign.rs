use ledger_bcn_apdu::prelude::*;
use ledger_bcn_core::{
    crypto::{mul_g, CompressedEdwardsY, Scalar},
    engine::{Approval, Error},
    wallet::{address_prefix, encode_address, AddressTag},
};

mod helpers;
use helpers::*;

const INPUT_AMOUNT: u64 = 1_000_000_000;
const DST_AMOUNT: u64 = 900_000_000;
const CHANGE_AMOUNT: u64 = 50_000_000;

const EXTRA: [u8; 3] = [0x01, 0x02, 0x03];
const RING_DATA: [u8; 64] = [0x42; 64];

fn destination() -> (CompressedEdwardsY, CompressedEdwardsY) {
    (
        mul_g(&Scalar::from(1001u64)).compress(),
        mul_g(&Scalar::from(2002u64)).compress(),
    )
}

fn info(e: &mut TestEngine) -> SigInfo {
    e.exchange::<_, SigInfo>(&SigInfoReq).unwrap()
}

/// Add a single member ring input
fn add_input(e: &mut TestEngine, amount: u64, address_index: u32) -> anyhow::Result<()> {
    e.exchange::<_, SigInfo>(&SigAddInputStart::new(amount, 1))?;
    e.exchange::<_, SigInfo>(&SigAddInputIndexes::new(&[17]).unwrap())?;
    e.exchange::<_, SigInfo>(&SigAddInputFinish::new(&OUTPUT_SECRET, address_index))?;
    Ok(())
}

/// Start a one input transaction paying a destination and change
fn prepare(e: &mut TestEngine, address_index: u32) -> anyhow::Result<()> {
    let (s, sv) = destination();

    let r = e.exchange::<_, SigInfo>(&SigStart::new(1, 0, 1, 2, EXTRA.len() as u32))?;
    assert_eq!(r.state, SigState::ExpectInputStart);

    add_input(e, INPUT_AMOUNT, address_index)?;
    assert_eq!(info(e), SigInfo::new(SigState::ExpectOutput, 1, 0));

    let k = e.exchange::<_, SigOutputKey>(&SigAddOutput::destination(
        DST_AMOUNT,
        AddressTag::Unlinkable as u8,
        s,
        sv,
    ))?;
    assert!(k.public.decompress().is_some());

    e.exchange::<_, SigOutputKey>(&SigAddOutput::change(CHANGE_AMOUNT, 0))?;
    assert_eq!(
        info(e),
        SigInfo::new(SigState::ExpectUserConfirmation, 1, 2)
    );

    Ok(())
}

#[test]
fn sign_tx() -> anyhow::Result<()> {
    let mut e = TestEngine::new();

    prepare(&mut e, 3)?;

    // Check details presented for approval
    let (s, sv) = destination();
    let p = e.engine.pending_tx().unwrap();
    assert_eq!(p.amount, DST_AMOUNT);
    assert_eq!(p.fee, INPUT_AMOUNT - DST_AMOUNT - CHANGE_AMOUNT);
    assert_eq!(
        p.address,
        encode_address(address_prefix(AddressTag::Unlinkable), &s, &sv).ok()
    );

    e.approve_tx();
    let r = e.exchange::<_, SigInfo>(&SigConfirmOutputs)?;
    assert_eq!(r.state, SigState::ExpectExtraChunk);

    let r = e.exchange::<_, SigInfo>(&SigAddExtra::new(&EXTRA))?;
    assert_eq!(r.state, SigState::ExpectStepA);

    // Phase A
    let a = e.exchange::<_, SigStepAResp>(&SigStepA::new(&OUTPUT_SECRET, 3))?;
    assert!(a.sig_p.decompress().is_some());

    let r = e.exchange::<_, SigInfo>(&SigStepAMoreData::new(&RING_DATA))?;
    assert_eq!(r.state, SigState::ExpectStepAMoreData);

    let c0 = e.exchange::<_, SigC0>(&SigGetC0)?;
    assert_ne!(c0.c0, Scalar::ZERO);
    assert_eq!(info(&mut e).state, SigState::ExpectStepB);

    // Phase B
    let b = e.exchange::<_, SigStepBResp>(&SigStepB::new(
        &OUTPUT_SECRET,
        3,
        Scalar::from(77u64),
    ))?;
    assert_ne!(b.encryption_key, [0u8; 32]);

    assert_eq!(info(&mut e).state, SigState::Finished);

    Ok(())
}

#[test]
fn integrity_mismatch_zeroes_key() -> anyhow::Result<()> {
    let mut e = TestEngine::new();

    prepare(&mut e, 3)?;
    e.approve_tx();
    e.exchange::<_, SigInfo>(&SigConfirmOutputs)?;
    e.exchange::<_, SigInfo>(&SigAddExtra::new(&EXTRA))?;

    e.exchange::<_, SigStepAResp>(&SigStepA::new(&OUTPUT_SECRET, 3))?;
    e.exchange::<_, SigC0>(&SigGetC0)?;

    // Step B with a different address index from the ones committed
    let b = e.exchange::<_, SigStepBResp>(&SigStepB::new(
        &OUTPUT_SECRET,
        4,
        Scalar::from(77u64),
    ))?;

    assert_eq!(b.encryption_key, [0u8; 32]);
    assert_ne!(b.rs, [0u8; 32]);
    assert_eq!(info(&mut e).state, SigState::Finished);

    Ok(())
}

#[test]
fn confirm_gated_by_approval() -> anyhow::Result<()> {
    let mut e = TestEngine::new();

    prepare(&mut e, 0)?;
    assert_eq!(e.engine.approval(), Approval::Pending);

    let r = e.exchange::<_, SigInfo>(&SigConfirmOutputs);
    assert_eq!(r.err(), Some(Error::ApprovalPending));

    e.deny_tx();
    let r = e.exchange::<_, SigInfo>(&SigConfirmOutputs);
    assert_eq!(r.err(), Some(Error::ApprovalDenied));

    // Session stays parked
    assert_eq!(
        info(&mut e),
        SigInfo::new(SigState::ExpectUserConfirmation, 1, 2)
    );

    // Reset clears the session
    let r = e.exchange::<_, SigInfo>(&ResetReq)?;
    assert_eq!(r.state, SigState::Finished);
    assert_eq!(e.engine.approval(), Approval::Idle);

    Ok(())
}

#[test]
fn input_overflow() -> anyhow::Result<()> {
    let mut e = TestEngine::new();

    e.exchange::<_, SigInfo>(&SigStart::new(1, 0, 2, 1, 0))?;
    add_input(&mut e, u64::MAX, 0)?;

    let r = e.exchange::<_, SigInfo>(&SigAddInputStart::new(1, 1));
    assert_eq!(r.err(), Some(Error::ArithmeticOverflow));

    // Counters unchanged
    assert_eq!(info(&mut e), SigInfo::new(SigState::ExpectInputStart, 1, 0));

    Ok(())
}

#[test]
fn single_destination() -> anyhow::Result<()> {
    let mut e = TestEngine::new();
    let (s, sv) = destination();

    e.exchange::<_, SigInfo>(&SigStart::new(1, 0, 1, 3, 0))?;
    add_input(&mut e, INPUT_AMOUNT, 0)?;

    e.exchange::<_, SigOutputKey>(&SigAddOutput::destination(100, 1, s, sv))?;

    // Identical destinations accumulate
    e.exchange::<_, SigOutputKey>(&SigAddOutput::destination(200, 1, s, sv))?;

    // A second destination is rejected
    let other = mul_g(&Scalar::from(3003u64)).compress();
    let r = e.exchange::<_, SigOutputKey>(&SigAddOutput::destination(300, 1, other, sv));
    assert_eq!(r.err(), Some(Error::AddressMismatch));
    assert_eq!(info(&mut e), SigInfo::new(SigState::ExpectOutput, 1, 2));

    // Changing the tag is rejected too
    let r = e.exchange::<_, SigOutputKey>(&SigAddOutput::destination(300, 0, s, sv));
    assert_eq!(r.err(), Some(Error::AddressMismatch));

    e.exchange::<_, SigOutputKey>(&SigAddOutput::destination(300, 1, s, sv))?;
    assert_eq!(e.engine.session().dst_amount(), 600);
    assert_eq!(e.engine.session().fee(), INPUT_AMOUNT - 600);

    Ok(())
}

#[test]
fn insufficient_funds() -> anyhow::Result<()> {
    let mut e = TestEngine::new();
    let (s, sv) = destination();

    e.exchange::<_, SigInfo>(&SigStart::new(1, 0, 1, 1, 0))?;
    add_input(&mut e, 100, 0)?;

    let r = e.exchange::<_, SigOutputKey>(&SigAddOutput::destination(101, 1, s, sv));
    assert_eq!(r.err(), Some(Error::InsufficientFunds));
    assert_eq!(info(&mut e), SigInfo::new(SigState::ExpectOutput, 1, 0));
    assert_eq!(e.engine.approval(), Approval::Idle);

    Ok(())
}

#[test]
fn sequence_violations() -> anyhow::Result<()> {
    let mut e = TestEngine::new();

    // Nothing but start is accepted when idle
    let r = e.exchange::<_, SigC0>(&SigGetC0);
    assert_eq!(r.err(), Some(Error::SequenceViolation));

    e.exchange::<_, SigInfo>(&SigStart::new(1, 0, 1, 1, 0))?;
    add_input(&mut e, INPUT_AMOUNT, 0)?;

    // Finishing another input while expecting outputs
    let r = e.exchange::<_, SigInfo>(&SigAddInputFinish::new(&OUTPUT_SECRET, 0));
    assert_eq!(r.err(), Some(Error::SequenceViolation));

    // Fetching the challenge early
    let r = e.exchange::<_, SigC0>(&SigGetC0);
    assert_eq!(r.err(), Some(Error::SequenceViolation));

    assert_eq!(info(&mut e), SigInfo::new(SigState::ExpectOutput, 1, 0));
    assert_eq!(e.engine.session().inputs_amount(), INPUT_AMOUNT);

    Ok(())
}

#[test]
fn proof_session() -> anyhow::Result<()> {
    let mut e = TestEngine::new();

    let r = e.exchange::<_, SigInfo>(&SigProofStart::new(2))?;
    assert_eq!(r.state, SigState::ExpectExtraChunk);

    let r = e.exchange::<_, SigInfo>(&SigAddExtra::new(&[0xaa, 0xbb]))?;
    assert_eq!(r.state, SigState::ExpectStepA);

    e.exchange::<_, SigStepAResp>(&SigStepA::new(&OUTPUT_SECRET, 1))?;
    e.exchange::<_, SigC0>(&SigGetC0)?;

    let b = e.exchange::<_, SigStepBResp>(&SigStepB::new(&OUTPUT_SECRET, 1, Scalar::ONE))?;
    assert_ne!(b.encryption_key, [0u8; 32]);
    assert_eq!(info(&mut e).state, SigState::Finished);

    Ok(())
}
