// Copyright (c) 2023 The Bytecoin Developers

//! The [Engine] provides functionality required by hardware wallets.
//!
//! This handles [Event] inputs and returns [Output] responses to the caller,
//! see [apdu][crate::apdu] for APDU protocol / encoding specifications.

use rand_core::{CryptoRngCore, OsRng};
use strum::{Display, EnumIter, EnumString, EnumVariantNames};
use zeroize::Zeroize;

use ledger_bcn_apdu::state::SigState;

use crate::{
    crypto::{curve::decompress, Hash},
    wallet::{address_prefix, encode_address, EncodedAddress, Wallet},
};

mod event;
pub use event::Event;

mod output;
pub use output::Output;

mod error;
pub use error::Error;

mod session;
pub use session::{AddedOutput, Destination, Session, StepA, StepB};

/// Application name reported by [`Event::GetAppInfo`]
pub const APP_NAME: &str = "Bytecoin";

/// Application version string
pub const APP_VERSION_STR: &str = env!("CARGO_PKG_VERSION");

/// Application version as `(major, minor, patch)`
pub const APP_VERSION: (u8, u8, u8) = (
    parse_u8(env!("CARGO_PKG_VERSION_MAJOR")),
    parse_u8(env!("CARGO_PKG_VERSION_MINOR")),
    parse_u8(env!("CARGO_PKG_VERSION_PATCH")),
);

/// Protocol version implemented by this application
pub const APP_SPEC: &str = "1";

const fn parse_u8(s: &str) -> u8 {
    let b = s.as_bytes();
    let mut v = 0u8;
    let mut i = 0;

    while i < b.len() {
        v = v * 10 + (b[i] - b'0');
        i += 1;
    }

    v
}

/// Human approval state for transactions and view-only exports
#[derive(Copy, Clone, PartialEq, Debug, EnumString, Display, EnumVariantNames, EnumIter)]
pub enum Approval {
    /// No request outstanding
    Idle,
    /// Awaiting user decision
    Pending,
    /// Request approved by the user
    Approved,
    /// Request denied by the user
    Denied,
}

/// Outstanding view-only export request
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct ExportRequest {
    /// Reveal the view seed, set by the user on approval
    pub view_outgoing_addresses: bool,
    pub approval: Approval,
}

/// Transaction details presented to the user for approval
#[derive(Clone, PartialEq, Debug)]
pub struct PendingTx {
    /// Assembled destination address bytes, `None` for change-only transactions
    pub address: Option<EncodedAddress>,
    /// Amount paid to the destination
    pub amount: u64,
    /// Transaction fee
    pub fee: u64,
}

/// [Engine] provides hardware-independent support for Bytecoin wallet operations
///
pub struct Engine<DRV: Driver, RNG: CryptoRngCore = OsRng> {
    session: Session,
    approval: Approval,
    export: Option<ExportRequest>,

    wallet: Option<Wallet>,

    drv: DRV,
    rng: RNG,
}

/// [`Driver`] trait provides platform support for [`Engine`] instances
pub trait Driver {
    /// Fetch the 256-bit wallet root seed
    fn root_seed(&self) -> Hash;
}

impl<T: Driver> Driver for &mut T {
    fn root_seed(&self) -> Hash {
        T::root_seed(self)
    }
}

impl<DRV: Driver> Engine<DRV> {
    /// Create a new engine instance with the provided driver,
    /// using the default [OsRng]
    pub fn new(drv: DRV) -> Self {
        Self::new_with_rng(drv, OsRng {})
    }
}

impl<DRV: Driver, RNG: CryptoRngCore> Engine<DRV, RNG> {
    /// Create a new engine instance with the provided driver and rng
    pub fn new_with_rng(drv: DRV, rng: RNG) -> Self {
        Self {
            session: Session::new(),
            approval: Approval::Idle,
            export: None,
            wallet: None,
            drv,
            rng,
        }
    }

    /// Handle incoming events
    #[cfg_attr(feature = "noinline", inline(never))]
    pub fn update(&mut self, evt: &Event) -> Result<Output, Error> {
        #[cfg(feature = "log")]
        log::debug!("event: {:02x?}", evt);

        match (self.session.state(), evt) {
            // Empty event, do nothing
            (_, Event::None) => return Ok(Output::None),

            (_, Event::GetAppInfo) => return Ok(Output::AppInfo),

            (_, Event::Reset) => self.reset(),

            // Fetch public wallet keys
            (_, Event::GetWalletKeys) => {
                let p = Self::wallet(&mut self.wallet, &self.drv).wallet_public();

                return Ok(Output::WalletKeys {
                    wallet_key: p.wallet_key,
                    a_plus_sh: p.a_plus_sh,
                    v_mul_a_plus_sh: p.v_mul_a_plus_sh,
                    view_public: p.view_public,
                });
            }

            // Multiply supplied output keys by the view secret
            (_, Event::ScanOutputs { output_keys }) => {
                let wallet = Self::wallet(&mut self.wallet, &self.drv);

                // Decompress all points prior to computing results
                let mut results = heapless::Vec::new();
                for k in output_keys {
                    let p = decompress(k)?;
                    results
                        .push(wallet.scan_output(&p).compress())
                        .map_err(|_| Error::BufferOverflow)?;
                }

                return Ok(Output::ScanResults { results });
            }

            (
                _,
                Event::GenerateKeyImage {
                    secret_material,
                    address_index,
                },
            ) => {
                let key_image = Self::wallet(&mut self.wallet, &self.drv)
                    .key_image_for_address(secret_material, *address_index);

                return Ok(Output::KeyImage { key_image });
            }

            (
                _,
                Event::GenerateOutputSeed {
                    tx_inputs_hash,
                    output_index,
                },
            ) => {
                let seed = Self::wallet(&mut self.wallet, &self.drv)
                    .output_seed(tx_inputs_hash, *output_index);

                return Ok(Output::OutputSeed { seed });
            }

            // View-only export, unavailable while a transaction awaits approval
            (_, Event::ExportViewOnly) if self.approval != Approval::Pending => {
                return self.export_view_only();
            }

            (
                _,
                Event::SigStart {
                    version,
                    unlock_time,
                    inputs_num,
                    outputs_num,
                    extra_size,
                },
            ) => {
                self.session.start(
                    *version,
                    *unlock_time,
                    *inputs_num,
                    *outputs_num,
                    *extra_size,
                )?;
                self.approval = Approval::Idle;
            }

            (_, Event::SigProofStart { extra_len }) => {
                self.session.proof_start(*extra_len)?;
                self.approval = Approval::Idle;
            }

            (_, Event::SigAddInputStart { amount, ring_size }) => {
                self.session.add_input_start(*amount, *ring_size)?;
            }

            (_, Event::SigAddInputIndexes { indexes }) => {
                self.session.add_input_indexes(indexes)?;
            }

            (
                _,
                Event::SigAddInputFinish {
                    secret_material,
                    address_index,
                },
            ) => {
                let wallet = Self::wallet(&mut self.wallet, &self.drv);
                self.session
                    .add_input_finish(wallet, secret_material, *address_index)?;
            }

            (
                _,
                Event::SigAddOutput {
                    change,
                    amount,
                    change_index,
                    dst_tag,
                    dst_s,
                    dst_sv,
                },
            ) => {
                let wallet = Self::wallet(&mut self.wallet, &self.drv);
                let o = self.session.add_output(
                    wallet,
                    *change,
                    *amount,
                    *change_index,
                    *dst_tag,
                    dst_s,
                    dst_sv,
                )?;

                // Raise the approval gate once all outputs are registered
                if self.session.state() == SigState::ExpectUserConfirmation {
                    self.approval = Approval::Pending;
                }

                return Ok(Output::OutputKey {
                    public: o.key.public.compress(),
                    encrypted_secret: o.key.encrypted_secret.compress(),
                    encrypted_address_type: o.encrypted_address_type,
                });
            }

            // Out of sequence confirmations are rejected by the session
            // before the approval gate is consulted
            (state, Event::SigConfirmOutputs) => {
                if state != SigState::ExpectUserConfirmation {
                    return self.session.confirm_outputs().map(|_| self.sig_info());
                }

                // Check approval state
                match self.approval {
                    Approval::Approved => (),
                    Approval::Denied => return Err(Error::ApprovalDenied),
                    Approval::Idle | Approval::Pending => return Err(Error::ApprovalPending),
                }

                self.session.confirm_outputs()?;
                self.approval = Approval::Idle;
            }

            (_, Event::SigAddExtra(data)) => {
                self.session.add_extra(&mut self.rng, data)?;
            }

            (
                _,
                Event::SigStepA {
                    secret_material,
                    address_index,
                },
            ) => {
                let wallet = Self::wallet(&mut self.wallet, &self.drv);
                let r = self
                    .session
                    .step_a(wallet, secret_material, *address_index)?;

                return Ok(Output::StepA {
                    sig_p: r.sig_p.compress(),
                    y: r.y.compress(),
                    z: r.z.compress(),
                });
            }

            (_, Event::SigStepAMoreData(data)) => {
                self.session.step_a_more_data(data)?;
            }

            (_, Event::SigGetC0) => {
                let c0 = self.session.get_c0()?;
                return Ok(Output::C0 { c0 });
            }

            (
                _,
                Event::SigStepB {
                    secret_material,
                    address_index,
                    my_c,
                },
            ) => {
                let wallet = Self::wallet(&mut self.wallet, &self.drv);
                let r = self
                    .session
                    .step_b(wallet, secret_material, *address_index, my_c)?;

                return Ok(Output::StepB {
                    rr: r.rr,
                    rs: r.rs,
                    ra: r.ra,
                    encryption_key: r.encryption_key,
                });
            }

            // Fetch signing state
            (_, Event::SigGetInfo) => (),

            // Handle unexpected events
            _e => {
                #[cfg(feature = "log")]
                log::error!(
                    "Unexpected event in state {:?}: {:02x?}",
                    self.session.state(),
                    _e
                );

                return Err(Error::UnexpectedEvent);
            }
        }

        // Default to returning updated state
        Ok(self.sig_info())
    }

    /// Fetch current signing state
    pub fn state(&self) -> SigState {
        self.session.state()
    }

    /// Fetch the signing session
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Fetch transaction approval state
    pub fn approval(&self) -> Approval {
        self.approval
    }

    /// Fetch outstanding view-only export request
    pub fn export_request(&self) -> Option<&ExportRequest> {
        self.export.as_ref()
    }

    /// Approve a pending transaction
    pub fn approve(&mut self) {
        if let Approval::Pending = self.approval {
            self.approval = Approval::Approved;
        }
    }

    /// Deny a pending transaction, the session stays parked until restarted
    pub fn deny(&mut self) {
        if let Approval::Pending = self.approval {
            self.approval = Approval::Denied;
        }
    }

    /// Answer a pending view-only export request.
    ///
    /// `None` denies the export, `Some(v)` approves it with `v` selecting
    /// whether the view seed (and thus outgoing addresses) is revealed.
    pub fn export_approve(&mut self, view_outgoing_addresses: Option<bool>) {
        if let Some(r) = self.export.as_mut() {
            if r.approval == Approval::Pending {
                *r = match view_outgoing_addresses {
                    Some(v) => ExportRequest {
                        view_outgoing_addresses: v,
                        approval: Approval::Approved,
                    },
                    None => ExportRequest {
                        view_outgoing_addresses: false,
                        approval: Approval::Denied,
                    },
                };
            }
        }
    }

    /// Reset engine state, dropping any pending approvals
    pub fn reset(&mut self) {
        self.session.reset();
        self.approval = Approval::Idle;
        self.export = None;
    }

    /// Fetch transaction details awaiting approval
    pub fn pending_tx(&self) -> Option<PendingTx> {
        if self.approval != Approval::Pending {
            return None;
        }

        let address = self
            .session
            .destination()
            .and_then(|d| encode_address(address_prefix(d.tag), &d.s, &d.sv).ok());

        Some(PendingTx {
            address,
            amount: self.session.dst_amount(),
            fee: self.session.fee(),
        })
    }

    fn sig_info(&self) -> Output {
        Output::State {
            state: self.session.state(),
            inputs_counter: self.session.inputs_counter(),
            outputs_counter: self.session.outputs_counter(),
        }
    }

    #[cfg_attr(feature = "noinline", inline(never))]
    fn export_view_only(&mut self) -> Result<Output, Error> {
        match self.export {
            // Approved request, return keys with the options chosen by the user
            Some(ExportRequest {
                view_outgoing_addresses,
                approval: Approval::Approved,
            }) => {
                self.export = None;

                let wallet = Self::wallet(&mut self.wallet, &self.drv);
                let e = wallet.export_view_only(view_outgoing_addresses, &mut self.rng);

                Ok(Output::ViewOnly {
                    audit_base_secret: e.audit_base_secret,
                    view_secret: e.view_secret,
                    view_seed: e.view_seed,
                    proof_c: e.proof.c,
                    proof_r: e.proof.r,
                })
            }
            // Denied request, report once then clear
            Some(ExportRequest {
                approval: Approval::Denied,
                ..
            }) => {
                self.export = None;
                Err(Error::ApprovalDenied)
            }
            // Still waiting on the user
            Some(ExportRequest {
                approval: Approval::Pending,
                ..
            }) => Err(Error::ApprovalPending),
            // New request, await approval
            _ => {
                #[cfg(feature = "log")]
                log::debug!("view-only export requested");

                self.export = Some(ExportRequest {
                    view_outgoing_addresses: false,
                    approval: Approval::Pending,
                });
                Err(Error::ApprovalPending)
            }
        }
    }

    /// Fetch the wallet instance, deriving keys from the driver on first use
    fn wallet<'w>(wallet: &'w mut Option<Wallet>, drv: &DRV) -> &'w mut Wallet {
        wallet.get_or_insert_with(|| {
            let mut seed = drv.root_seed();
            let w = Wallet::from_seed(&seed);
            seed.zeroize();
            w
        })
    }
}
