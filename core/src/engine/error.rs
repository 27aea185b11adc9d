// Copyright (c) 2023 The Bytecoin Developers

use ledger_bcn_apdu::StatusWord;
use ledger_proto::ApduError;

/// [Engine][super::Engine] errors
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "thiserror", derive(thiserror::Error))]
#[repr(u8)]
pub enum Error {
    /// Invalid argument (zero counts, unknown tags)
    #[cfg_attr(feature = "thiserror", error("Invalid argument"))]
    InvalidArgument = 0x00,

    /// Operation called outside the required session state
    #[cfg_attr(feature = "thiserror", error("Operation not allowed in current session state"))]
    SequenceViolation = 0x01,

    /// Amount accumulation overflow
    #[cfg_attr(feature = "thiserror", error("Amount overflow"))]
    ArithmeticOverflow = 0x02,

    /// Outputs exceed inputs
    #[cfg_attr(feature = "thiserror", error("Insufficient funds"))]
    InsufficientFunds = 0x03,

    /// Destination differs from the locked session destination
    #[cfg_attr(feature = "thiserror", error("Destination address mismatch"))]
    AddressMismatch = 0x04,

    /// Step A / step B argument mismatch.
    ///
    /// Reserved: `step_b` reports a mismatch by returning a zeroed
    /// encryption key rather than this error, so the session never
    /// constructs it.
    #[cfg_attr(feature = "thiserror", error("Signing integrity check failed"))]
    IntegrityFailure = 0x05,

    /// Invalid point (decompression failed)
    #[cfg_attr(feature = "thiserror", error("invalid ed25519 point"))]
    InvalidPoint = 0x06,

    /// Invalid argument length
    #[cfg_attr(feature = "thiserror", error("Invalid argument length"))]
    InvalidLength = 0x07,

    /// Output buffer too small
    #[cfg_attr(feature = "thiserror", error("Buffer overflow"))]
    BufferOverflow = 0x08,

    /// Pending user approval
    #[cfg_attr(feature = "thiserror", error("pending user approval"))]
    ApprovalPending = 0x09,

    /// Rejected by user
    #[cfg_attr(feature = "thiserror", error("request denied by user"))]
    ApprovalDenied = 0x0a,

    /// Unknown instruction
    #[cfg_attr(feature = "thiserror", error("Unsupported instruction"))]
    UnsupportedInstruction = 0x0b,

    /// Unexpected event
    #[cfg_attr(feature = "thiserror", error("Unexpected event"))]
    UnexpectedEvent = 0x0c,

    /// Message encoding failed
    #[cfg_attr(feature = "thiserror", error("message encoding failed"))]
    EncodingFailed = 0x0d,
}

impl Error {
    /// Map an error to the response status word
    pub fn status_word(&self) -> StatusWord {
        use Error::*;

        match self {
            InvalidArgument | ArithmeticOverflow | InsufficientFunds | AddressMismatch
            | InvalidPoint | IntegrityFailure => StatusWord::WrongData,
            SequenceViolation | UnexpectedEvent => StatusWord::CommandNotAllowed,
            ApprovalDenied => StatusWord::SecurityStatusNotSatisfied,
            ApprovalPending => StatusWord::ConditionsNotSatisfied,
            InvalidLength => StatusWord::WrongLength,
            BufferOverflow => StatusWord::NotEnoughMemory,
            UnsupportedInstruction => StatusWord::InsNotSupported,
            EncodingFailed => StatusWord::Unknown,
        }
    }
}

impl From<ApduError> for Error {
    fn from(e: ApduError) -> Self {
        match e {
            ApduError::InvalidLength => Error::InvalidLength,
            _ => Error::InvalidArgument,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn status_words() {
        let tests = &[
            (Error::InvalidArgument, 0x6a80),
            (Error::ArithmeticOverflow, 0x6a80),
            (Error::AddressMismatch, 0x6a80),
            (Error::IntegrityFailure, 0x6a80),
            (Error::SequenceViolation, 0x6986),
            (Error::ApprovalDenied, 0x6982),
            (Error::ApprovalPending, 0x6985),
            (Error::InvalidLength, 0x6700),
            (Error::BufferOverflow, 0x6a84),
            (Error::UnsupportedInstruction, 0x6d00),
        ];

        for (e, sw) in tests {
            assert_eq!(e.status_word() as u16, *sw, "status for {e:?}");
        }
    }
}
