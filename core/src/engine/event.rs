// Copyright (c) 2023 The Bytecoin Developers

use encdec::Decode;

use ledger_bcn_apdu::prelude::*;
use ledger_proto::{ApduError, ApduStatic};

use crate::crypto::{CompressedEdwardsY, Scalar};

use super::Error;

/// [`Engine`][super::Engine] input events, typically decoded from request [APDUs][crate::apdu]
#[derive(Clone, Debug)]
pub enum Event<'a> {
    None,

    /// Fetch application information
    GetAppInfo,

    /// Reset signing state
    Reset,

    /// Fetch public wallet keys
    GetWalletKeys,

    /// Multiply output keys by the view secret
    ScanOutputs { output_keys: ScanPoints },

    /// Compute the key image for an owned output
    GenerateKeyImage {
        secret_material: &'a [u8],
        address_index: u32,
    },

    /// Compute the seed for a transaction output
    GenerateOutputSeed {
        tx_inputs_hash: [u8; 32],
        output_index: u32,
    },

    /// Export view-only keys (requires approval)
    ExportViewOnly,

    /// Start a transaction signature
    SigStart {
        version: u32,
        unlock_time: u64,
        inputs_num: u32,
        outputs_num: u32,
        extra_size: u32,
    },

    /// Start an input
    SigAddInputStart { amount: u64, ring_size: u32 },

    /// Add ring member indexes to the current input
    SigAddInputIndexes { indexes: OutputIndexes },

    /// Finish the current input
    SigAddInputFinish {
        secret_material: &'a [u8],
        address_index: u32,
    },

    /// Add an output
    SigAddOutput {
        change: bool,
        amount: u64,
        change_index: u32,
        dst_tag: u8,
        dst_s: CompressedEdwardsY,
        dst_sv: CompressedEdwardsY,
    },

    /// Continue following output approval
    SigConfirmOutputs,

    /// Add a transaction extra chunk
    SigAddExtra(&'a [u8]),

    /// Step A for the next input
    SigStepA {
        secret_material: &'a [u8],
        address_index: u32,
    },

    /// Add ring data to the current step A
    SigStepAMoreData(&'a [u8]),

    /// Fetch ring challenge
    SigGetC0,

    /// Step B for the next input
    SigStepB {
        secret_material: &'a [u8],
        address_index: u32,
        my_c: Scalar,
    },

    /// Start a single input proof
    SigProofStart { extra_len: u32 },

    /// Fetch signing state
    SigGetInfo,
}

/// Helper for decoding APDUs to events
fn decode_event<'a, T>(buff: &'a [u8]) -> Result<Event<'a>, Error>
where
    T: Decode<'a, Error = ApduError>,
    Event<'a>: From<T::Output>,
{
    T::decode(buff)
        .map(|(v, _n)| Event::from(v))
        .map_err(Error::from)
}

impl<'a> Event<'a> {
    /// Parse an incoming APDU to engine event
    #[cfg_attr(feature = "noinline", inline(never))]
    pub fn parse(ins: u8, buff: &'a [u8]) -> Result<Self, Error> {
        match ins {
            AppInfoReq::INS => decode_event::<AppInfoReq>(buff),
            ResetReq::INS => decode_event::<ResetReq>(buff),

            WalletKeyReq::INS => decode_event::<WalletKeyReq>(buff),
            ScanOutputsReq::INS => decode_event::<ScanOutputsReq>(buff),
            KeyImageReq::INS => decode_event::<KeyImageReq>(buff),
            OutputSeedReq::INS => decode_event::<OutputSeedReq>(buff),
            ViewOnlyReq::INS => decode_event::<ViewOnlyReq>(buff),

            SigStart::INS => decode_event::<SigStart>(buff),
            SigAddInputStart::INS => decode_event::<SigAddInputStart>(buff),
            SigAddInputIndexes::INS => decode_event::<SigAddInputIndexes>(buff),
            SigAddInputFinish::INS => decode_event::<SigAddInputFinish>(buff),
            SigAddOutput::INS => decode_event::<SigAddOutput>(buff),
            SigConfirmOutputs::INS => decode_event::<SigConfirmOutputs>(buff),
            SigAddExtra::INS => decode_event::<SigAddExtra>(buff),
            SigStepA::INS => decode_event::<SigStepA>(buff),
            SigStepAMoreData::INS => decode_event::<SigStepAMoreData>(buff),
            SigGetC0::INS => decode_event::<SigGetC0>(buff),
            SigStepB::INS => decode_event::<SigStepB>(buff),
            SigProofStart::INS => decode_event::<SigProofStart>(buff),
            SigInfoReq::INS => decode_event::<SigInfoReq>(buff),

            _ => {
                #[cfg(feature = "log")]
                log::warn!("unsupported instruction: 0x{:02x}", ins);

                Err(Error::UnsupportedInstruction)
            }
        }
    }
}

impl<'a> From<AppInfoReq> for Event<'a> {
    fn from(_: AppInfoReq) -> Self {
        Event::GetAppInfo
    }
}

impl<'a> From<ResetReq> for Event<'a> {
    fn from(_: ResetReq) -> Self {
        Event::Reset
    }
}

impl<'a> From<WalletKeyReq> for Event<'a> {
    fn from(_: WalletKeyReq) -> Self {
        Event::GetWalletKeys
    }
}

impl<'a> From<ScanOutputsReq> for Event<'a> {
    fn from(a: ScanOutputsReq) -> Self {
        Event::ScanOutputs {
            output_keys: a.output_keys,
        }
    }
}

impl<'a> From<KeyImageReq<'a>> for Event<'a> {
    fn from(a: KeyImageReq<'a>) -> Self {
        Event::GenerateKeyImage {
            secret_material: a.secret_material,
            address_index: a.address_index,
        }
    }
}

impl<'a> From<OutputSeedReq> for Event<'a> {
    fn from(a: OutputSeedReq) -> Self {
        Event::GenerateOutputSeed {
            tx_inputs_hash: a.tx_inputs_hash,
            output_index: a.output_index,
        }
    }
}

impl<'a> From<ViewOnlyReq> for Event<'a> {
    fn from(_: ViewOnlyReq) -> Self {
        Event::ExportViewOnly
    }
}

impl<'a> From<SigStart> for Event<'a> {
    fn from(a: SigStart) -> Self {
        Event::SigStart {
            version: a.version,
            unlock_time: a.unlock_time,
            inputs_num: a.inputs_num,
            outputs_num: a.outputs_num,
            extra_size: a.extra_size,
        }
    }
}

impl<'a> From<SigAddInputStart> for Event<'a> {
    fn from(a: SigAddInputStart) -> Self {
        Event::SigAddInputStart {
            amount: a.amount,
            ring_size: a.ring_size,
        }
    }
}

impl<'a> From<SigAddInputIndexes> for Event<'a> {
    fn from(a: SigAddInputIndexes) -> Self {
        Event::SigAddInputIndexes { indexes: a.indexes }
    }
}

impl<'a> From<SigAddInputFinish<'a>> for Event<'a> {
    fn from(a: SigAddInputFinish<'a>) -> Self {
        Event::SigAddInputFinish {
            secret_material: a.secret_material,
            address_index: a.address_index,
        }
    }
}

impl<'a> From<SigAddOutput> for Event<'a> {
    fn from(a: SigAddOutput) -> Self {
        Event::SigAddOutput {
            change: a.change,
            amount: a.amount,
            change_index: a.change_index,
            dst_tag: a.dst_tag,
            dst_s: a.dst_s,
            dst_sv: a.dst_sv,
        }
    }
}

impl<'a> From<SigConfirmOutputs> for Event<'a> {
    fn from(_: SigConfirmOutputs) -> Self {
        Event::SigConfirmOutputs
    }
}

impl<'a> From<SigAddExtra<'a>> for Event<'a> {
    fn from(a: SigAddExtra<'a>) -> Self {
        Event::SigAddExtra(a.data)
    }
}

impl<'a> From<SigStepA<'a>> for Event<'a> {
    fn from(a: SigStepA<'a>) -> Self {
        Event::SigStepA {
            secret_material: a.secret_material,
            address_index: a.address_index,
        }
    }
}

impl<'a> From<SigStepAMoreData<'a>> for Event<'a> {
    fn from(a: SigStepAMoreData<'a>) -> Self {
        Event::SigStepAMoreData(a.data)
    }
}

impl<'a> From<SigGetC0> for Event<'a> {
    fn from(_: SigGetC0) -> Self {
        Event::SigGetC0
    }
}

impl<'a> From<SigStepB<'a>> for Event<'a> {
    fn from(a: SigStepB<'a>) -> Self {
        Event::SigStepB {
            secret_material: a.secret_material,
            address_index: a.address_index,
            my_c: a.my_c,
        }
    }
}

impl<'a> From<SigProofStart> for Event<'a> {
    fn from(a: SigProofStart) -> Self {
        Event::SigProofStart {
            extra_len: a.extra_len,
        }
    }
}

impl<'a> From<SigInfoReq> for Event<'a> {
    fn from(_: SigInfoReq) -> Self {
        Event::SigGetInfo
    }
}
