#![allow(unused)]

use core::fmt::Debug;

use encdec::{Decode, Encode};
use log::{debug, trace};
use rand::{rngs::StdRng, SeedableRng};

use ledger_bcn_apdu::{ApduError, ApduStatic};
use ledger_bcn_core::{
    engine::{Driver, Engine, Error, Event},
    wallet::Wallet,
};

/// Fixed wallet seed for repeatable tests
pub const SEED: &str = "6f8f1ba4cf2a3c1e0d5a7b19c8e64b2f03d7a9e1f45c6b8d2e0a1f3c5b7d9e24";

/// Secret material for an owned output
pub const OUTPUT_SECRET: [u8; 32] = [0x5a; 32];

pub fn init_logger() {
    let _ = simplelog::TermLogger::init(
        log::LevelFilter::Debug,
        Default::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
}

pub fn seed() -> [u8; 32] {
    let mut s = [0u8; 32];
    hex::decode_to_slice(SEED, &mut s).unwrap();
    s
}

/// Reference wallet derived from the test seed
pub fn wallet() -> Wallet {
    Wallet::from_seed(&seed())
}

/// Driver implementation for test use
pub struct TestDriver {
    pub seed: [u8; 32],
}

impl Driver for TestDriver {
    fn root_seed(&self) -> [u8; 32] {
        self.seed
    }
}

/// Engine wrapper exchanging encoded APDUs
pub struct TestEngine {
    pub engine: Engine<TestDriver, StdRng>,
}

impl TestEngine {
    pub fn new() -> Self {
        init_logger();

        let drv = TestDriver { seed: seed() };
        Self {
            engine: Engine::new_with_rng(drv, StdRng::seed_from_u64(0x0bc7)),
        }
    }

    /// Encode a request, pass it through the engine and encode the response to `buff`
    pub fn request<REQ>(&mut self, req: &REQ, buff: &mut [u8]) -> Result<usize, Error>
    where
        REQ: Encode<Error = ApduError> + ApduStatic + Debug,
    {
        debug!("cmd: {:?}", req);

        // Encode command to APDU
        let mut cmd = [0u8; 256];
        let n = req.encode(&mut cmd).unwrap();

        assert!(
            n < 250,
            "encoded command maximum length exceeded for: {req:?} ({n} bytes)"
        );

        trace!("encoded: {:02x?}", &cmd[..n]);

        // Decode APDU to event and handle
        let evt = Event::parse(REQ::INS, &cmd[..n])?;
        let r = self.engine.update(&evt)?;

        // Encode output to response APDU
        let n = r.encode(buff).unwrap();

        assert!(
            n < 250,
            "encoded response maximum length exceeded for: {r:?} ({n} bytes)"
        );

        Ok(n)
    }

    /// Exchange a request for a decoded response
    pub fn exchange<REQ, RESP>(&mut self, req: &REQ) -> Result<RESP, Error>
    where
        REQ: Encode<Error = ApduError> + ApduStatic + Debug,
        RESP: for<'a> Decode<'a, Output = RESP, Error = ApduError> + Debug,
    {
        let mut buff = [0u8; 256];
        let n = self.request(req, &mut buff)?;

        let (a, _) = RESP::decode(&buff[..n]).unwrap();

        debug!("resp: {:?}", a);

        Ok(a)
    }

    pub fn approve_tx(&mut self) {
        debug!("Approve transaction");
        self.engine.approve();
    }

    pub fn deny_tx(&mut self) {
        debug!("Deny transaction");
        self.engine.deny();
    }
}
