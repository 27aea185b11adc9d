use encdec::Decode;

use ledger_bcn_apdu::prelude::*;
use ledger_bcn_apdu::ApduStatic;
use ledger_bcn_core::{
    crypto::{mul_g, CompressedEdwardsY, Scalar},
    engine::{Error, Event, APP_NAME, APP_VERSION_STR},
    wallet::{verify_proof_h, ProofH},
};

mod helpers;
use helpers::*;

#[test]
fn app_info() -> anyhow::Result<()> {
    let mut e = TestEngine::new();

    let mut buff = [0u8; 256];
    let n = e.request(&AppInfoReq, &mut buff)?;

    let (i, _) = AppInfoResp::decode(&buff[..n]).unwrap();
    assert_eq!(i.name, APP_NAME);
    assert_eq!(i.version, APP_VERSION_STR);

    Ok(())
}

#[test]
fn wallet_keys() -> anyhow::Result<()> {
    let mut e = TestEngine::new();
    let w = wallet();

    let r = e.exchange::<_, WalletKeyResp>(&WalletKeyReq)?;

    assert_eq!(&r.wallet_key, w.keys().wallet_key());
    assert_eq!(r.a_plus_sh, w.keys().a_plus_sh().compress());
    assert_eq!(r.view_public, w.keys().view_public().compress());

    Ok(())
}

#[test]
fn scan_outputs() -> anyhow::Result<()> {
    let mut e = TestEngine::new();
    let w = wallet();

    let points: Vec<_> = (1..=7u64)
        .map(|i| mul_g(&Scalar::from(i * 31)).compress())
        .collect();

    let r = e.exchange::<_, ScanOutputsResp>(&ScanOutputsReq::new(&points).unwrap())?;
    assert_eq!(r.results.len(), points.len());

    for (p, s) in points.iter().zip(r.results.iter()) {
        let expected = w.scan_output(&p.decompress().unwrap()).compress();
        assert_eq!(s, &expected);
    }

    Ok(())
}

#[test]
fn key_image() -> anyhow::Result<()> {
    let mut e = TestEngine::new();
    let mut w = wallet();

    for index in [0, 1, 1000] {
        let r = e.exchange::<_, KeyImageResp>(&KeyImageReq::new(&OUTPUT_SECRET, index))?;
        assert_eq!(
            r.key_image,
            w.key_image_for_address(&OUTPUT_SECRET, index)
        );
    }

    // Oversized secret material is rejected at decode
    let mut cmd = [0u8; 256];
    cmd[0] = 201;
    let r = Event::parse(KeyImageReq::INS, &cmd[..206]);
    assert_eq!(r.err(), Some(Error::InvalidLength));

    Ok(())
}

#[test]
fn output_seed() -> anyhow::Result<()> {
    let mut e = TestEngine::new();
    let w = wallet();

    let tx_inputs_hash = [0x24u8; 32];
    let a = e.exchange::<_, OutputSeedResp>(&OutputSeedReq::new(tx_inputs_hash, 0))?;
    let b = e.exchange::<_, OutputSeedResp>(&OutputSeedReq::new(tx_inputs_hash, 1))?;

    assert_eq!(a.seed, w.output_seed(&tx_inputs_hash, 0));
    assert_ne!(a.seed, b.seed);

    Ok(())
}

#[test]
fn export_view_only() -> anyhow::Result<()> {
    let mut e = TestEngine::new();
    let w = wallet();

    let req = ViewOnlyReq;

    let r = e.exchange::<_, ViewOnlyResp>(&req);
    assert_eq!(r.err(), Some(Error::ApprovalPending));

    // User approves without revealing outgoing addresses
    e.engine.export_approve(Some(false));

    let r = e.exchange::<_, ViewOnlyResp>(&req)?;
    assert_eq!(r.view_seed, [0u8; 32]);
    assert_eq!(mul_g(&r.view_secret).compress(), w.keys().view_public().compress());

    // Proof of spend key knowledge checks against sH
    let proof = ProofH {
        c: r.proof_c,
        r: r.proof_r,
    };
    assert!(verify_proof_h(w.keys().sh(), &proof));

    // Approval is single use
    let r = e.exchange::<_, ViewOnlyResp>(&req);
    assert_eq!(r.err(), Some(Error::ApprovalPending));

    e.engine.export_approve(None);
    let r = e.exchange::<_, ViewOnlyResp>(&req);
    assert_eq!(r.err(), Some(Error::ApprovalDenied));

    // User approves revealing outgoing addresses
    let r = e.exchange::<_, ViewOnlyResp>(&req);
    assert_eq!(r.err(), Some(Error::ApprovalPending));

    e.engine.export_approve(Some(true));
    let r = e.exchange::<_, ViewOnlyResp>(&req)?;
    assert_ne!(r.view_seed, [0u8; 32]);

    Ok(())
}

#[test]
fn unsupported_instruction() {
    let r = Event::parse(0x7f, &[]);
    assert_eq!(r.err(), Some(Error::UnsupportedInstruction));

    // Point not on the curve
    let mut e = TestEngine::new();
    let mut bad = CompressedEdwardsY([0u8; 32]);
    while bad.decompress().is_some() {
        bad.0[0] += 1;
    }
    let r = e.exchange::<_, ScanOutputsResp>(&ScanOutputsReq::new(&[bad]).unwrap());
    assert_eq!(r.err(), Some(Error::InvalidPoint));
}
