//! # Types
//!
//! Typed datums and redeemers read by the project-script validator. Only
//! [`Datum`] and [`Redeemer`] belong to this validator; the rest are owned by
//! companion scripts and are decoded here read-only.
//!
//! ## Project status
//!
//! [`ProjectStatus`] lives on the companion project record:
//!
//! ```text
//! Active ──► PreClosed ──► Closed
//!    └─────► PreDelisted ──► Delisted
//! ```
//!
//! The project-script record can only be closed from `PreClosed` or
//! `Closed`, and only delisted once the project reads `Delisted`.

use std::collections::BTreeMap;

use crate::data::{expect_arity, Data, DecodeError, FromData, ToData};
use crate::ledger::{byte_string, Address, StakingValidatorHash, TxOutputId};

byte_string!(
    /// Identifier shared by a project and all of its companion records.
    ProjectId
);

fn unknown(type_name: &'static str, tag: u64) -> DecodeError {
    DecodeError::UnknownConstructor { type_name, tag }
}

/// Decode a sum type whose variants carry no fields.
fn decode_unit<T: Clone>(
    type_name: &'static str,
    data: &Data,
    variants: &[T],
) -> Result<T, DecodeError> {
    let (tag, fields) = data.as_constr()?;
    let variant = usize::try_from(tag)
        .ok()
        .and_then(|index| variants.get(index))
        .ok_or_else(|| unknown(type_name, tag))?;
    expect_arity(type_name, fields, 0)?;
    Ok(variant.clone())
}

// ── Project-script datum and redeemer ─────────────────────────────────

/// Datum locked with the project-script UTxO.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Datum {
    pub project_id: ProjectId,
    /// Deposit paid when the staking credential was registered.
    pub stake_key_deposit: i128,
}

impl FromData for Datum {
    fn from_data(data: &Data) -> Result<Self, DecodeError> {
        let fields = data.record("Datum", 2)?;
        Ok(Self {
            project_id: ProjectId::from_data(&fields[0])?,
            stake_key_deposit: fields[1].as_int()?,
        })
    }
}

impl ToData for Datum {
    fn to_data(&self) -> Data {
        Data::constr(
            0,
            vec![self.project_id.to_data(), self.stake_key_deposit.to_data()],
        )
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Redeemer {
    Migrate,
    Close,
    Delist,
}

impl FromData for Redeemer {
    fn from_data(data: &Data) -> Result<Self, DecodeError> {
        decode_unit(
            "Redeemer",
            data,
            &[Redeemer::Migrate, Redeemer::Close, Redeemer::Delist],
        )
    }
}

impl ToData for Redeemer {
    fn to_data(&self) -> Data {
        let tag = match self {
            Redeemer::Migrate => 0,
            Redeemer::Close => 1,
            Redeemer::Delist => 2,
        };
        Data::constr(tag, Vec::new())
    }
}

// ── Project record ────────────────────────────────────────────────────

/// Lifecycle status of the companion project record.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ProjectStatus {
    Active,
    /// Close requested; `pending_until` is a POSIX time in milliseconds.
    PreClosed { pending_until: i128 },
    PreDelisted { pending_until: i128 },
    Closed,
    Delisted,
}

impl FromData for ProjectStatus {
    fn from_data(data: &Data) -> Result<Self, DecodeError> {
        let (tag, fields) = data.as_constr()?;
        match tag {
            0 => expect_arity("ProjectStatus", fields, 0).map(|_| ProjectStatus::Active),
            1 => {
                let fields = expect_arity("ProjectStatus", fields, 1)?;
                Ok(ProjectStatus::PreClosed {
                    pending_until: fields[0].as_int()?,
                })
            }
            2 => {
                let fields = expect_arity("ProjectStatus", fields, 1)?;
                Ok(ProjectStatus::PreDelisted {
                    pending_until: fields[0].as_int()?,
                })
            }
            3 => expect_arity("ProjectStatus", fields, 0).map(|_| ProjectStatus::Closed),
            4 => expect_arity("ProjectStatus", fields, 0).map(|_| ProjectStatus::Delisted),
            tag => Err(unknown("ProjectStatus", tag)),
        }
    }
}

impl ToData for ProjectStatus {
    fn to_data(&self) -> Data {
        match self {
            ProjectStatus::Active => Data::constr(0, Vec::new()),
            ProjectStatus::PreClosed { pending_until } => {
                Data::constr(1, vec![Data::Int(*pending_until)])
            }
            ProjectStatus::PreDelisted { pending_until } => {
                Data::constr(2, vec![Data::Int(*pending_until)])
            }
            ProjectStatus::Closed => Data::constr(3, Vec::new()),
            ProjectStatus::Delisted => Data::constr(4, Vec::new()),
        }
    }
}

/// Datum of the companion project record.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectDatum {
    pub project_id: ProjectId,
    pub owner_address: Address,
    pub status: ProjectStatus,
    pub milestone_reached: i128,
    pub is_staking_delegation_managed_by_protocol: bool,
}

impl FromData for ProjectDatum {
    fn from_data(data: &Data) -> Result<Self, DecodeError> {
        let fields = data.record("ProjectDatum", 5)?;
        Ok(Self {
            project_id: ProjectId::from_data(&fields[0])?,
            owner_address: Address::from_data(&fields[1])?,
            status: ProjectStatus::from_data(&fields[2])?,
            milestone_reached: fields[3].as_int()?,
            is_staking_delegation_managed_by_protocol: bool::from_data(&fields[4])?,
        })
    }
}

impl ToData for ProjectDatum {
    fn to_data(&self) -> Data {
        Data::constr(
            0,
            vec![
                self.project_id.to_data(),
                self.owner_address.to_data(),
                self.status.to_data(),
                self.milestone_reached.to_data(),
                self.is_staking_delegation_managed_by_protocol.to_data(),
            ],
        )
    }
}

// ── Companion script redeemers ────────────────────────────────────────

/// Redeemer of the project authentication-token minting policy.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ProjectAtRedeemer {
    NewProject { project_seed: TxOutputId },
    AllocateStaking,
    DeallocateStaking,
    MigrateOut,
    MigrateIn,
}

impl FromData for ProjectAtRedeemer {
    fn from_data(data: &Data) -> Result<Self, DecodeError> {
        let (tag, fields) = data.as_constr()?;
        let unit = |variant: ProjectAtRedeemer| {
            expect_arity("ProjectAtRedeemer", fields, 0).map(|_| variant)
        };
        match tag {
            0 => {
                let fields = expect_arity("ProjectAtRedeemer", fields, 1)?;
                Ok(ProjectAtRedeemer::NewProject {
                    project_seed: TxOutputId::from_data(&fields[0])?,
                })
            }
            1 => unit(ProjectAtRedeemer::AllocateStaking),
            2 => unit(ProjectAtRedeemer::DeallocateStaking),
            3 => unit(ProjectAtRedeemer::MigrateOut),
            4 => unit(ProjectAtRedeemer::MigrateIn),
            tag => Err(unknown("ProjectAtRedeemer", tag)),
        }
    }
}

impl ToData for ProjectAtRedeemer {
    fn to_data(&self) -> Data {
        match self {
            ProjectAtRedeemer::NewProject { project_seed } => {
                Data::constr(0, vec![project_seed.to_data()])
            }
            ProjectAtRedeemer::AllocateStaking => Data::constr(1, Vec::new()),
            ProjectAtRedeemer::DeallocateStaking => Data::constr(2, Vec::new()),
            ProjectAtRedeemer::MigrateOut => Data::constr(3, Vec::new()),
            ProjectAtRedeemer::MigrateIn => Data::constr(4, Vec::new()),
        }
    }
}

/// Spending redeemer of the project-detail validator.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProjectDetailRedeemer {
    WithdrawFunds,
    Update,
    Close,
    Delist,
    Migrate,
}

const PROJECT_DETAIL_REDEEMERS: [ProjectDetailRedeemer; 5] = [
    ProjectDetailRedeemer::WithdrawFunds,
    ProjectDetailRedeemer::Update,
    ProjectDetailRedeemer::Close,
    ProjectDetailRedeemer::Delist,
    ProjectDetailRedeemer::Migrate,
];

impl FromData for ProjectDetailRedeemer {
    fn from_data(data: &Data) -> Result<Self, DecodeError> {
        decode_unit("ProjectDetailRedeemer", data, &PROJECT_DETAIL_REDEEMERS)
    }
}

impl ToData for ProjectDetailRedeemer {
    fn to_data(&self) -> Data {
        let tag = match self {
            ProjectDetailRedeemer::WithdrawFunds => 0,
            ProjectDetailRedeemer::Update => 1,
            ProjectDetailRedeemer::Close => 2,
            ProjectDetailRedeemer::Delist => 3,
            ProjectDetailRedeemer::Migrate => 4,
        };
        Data::constr(tag, Vec::new())
    }
}

/// Spending redeemer of the open-treasury validator.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum OpenTreasuryRedeemer {
    /// Rewards too small for their own treasury UTxO, collected into an
    /// existing one. Keyed by the staking validator they were withdrawn from.
    CollectDelayedStakingRewards {
        staking_withdrawals: BTreeMap<StakingValidatorHash, i128>,
    },
    WithdrawAda,
    Revoke,
    Migrate,
}

impl FromData for OpenTreasuryRedeemer {
    fn from_data(data: &Data) -> Result<Self, DecodeError> {
        let (tag, fields) = data.as_constr()?;
        let unit = |variant: OpenTreasuryRedeemer| {
            expect_arity("OpenTreasuryRedeemer", fields, 0).map(|_| variant)
        };
        match tag {
            0 => {
                let fields = expect_arity("OpenTreasuryRedeemer", fields, 1)?;
                let mut staking_withdrawals = BTreeMap::new();
                for (key, amount) in fields[0].as_map()? {
                    staking_withdrawals
                        .entry(StakingValidatorHash::from_data(key)?)
                        .or_insert(amount.as_int()?);
                }
                Ok(OpenTreasuryRedeemer::CollectDelayedStakingRewards {
                    staking_withdrawals,
                })
            }
            1 => unit(OpenTreasuryRedeemer::WithdrawAda),
            2 => unit(OpenTreasuryRedeemer::Revoke),
            3 => unit(OpenTreasuryRedeemer::Migrate),
            tag => Err(unknown("OpenTreasuryRedeemer", tag)),
        }
    }
}

impl ToData for OpenTreasuryRedeemer {
    fn to_data(&self) -> Data {
        match self {
            OpenTreasuryRedeemer::CollectDelayedStakingRewards {
                staking_withdrawals,
            } => Data::constr(
                0,
                vec![Data::Map(
                    staking_withdrawals
                        .iter()
                        .map(|(hash, amount)| (hash.to_data(), Data::Int(*amount)))
                        .collect(),
                )],
            ),
            OpenTreasuryRedeemer::WithdrawAda => Data::constr(1, Vec::new()),
            OpenTreasuryRedeemer::Revoke => Data::constr(2, Vec::new()),
            OpenTreasuryRedeemer::Migrate => Data::constr(3, Vec::new()),
        }
    }
}

// ── Treasury and user tags ────────────────────────────────────────────

/// Why a payment was made; carried on treasury and owner outputs.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum UserTag {
    TagProjectFundsWithdrawal {
        project_id: ProjectId,
    },
    TagProjectDelayedStakingRewards {
        staking_validator: Option<StakingValidatorHash>,
    },
    TagProjectClosed {
        project_id: ProjectId,
    },
    TagProjectDelisted {
        project_id: ProjectId,
    },
    TagProjectScriptClosed {
        project_id: ProjectId,
        staking_validator: StakingValidatorHash,
    },
    TagProjectScriptDelisted {
        project_id: ProjectId,
        staking_validator: StakingValidatorHash,
    },
}

impl FromData for UserTag {
    fn from_data(data: &Data) -> Result<Self, DecodeError> {
        let (tag, fields) = data.as_constr()?;
        match tag {
            0 => {
                let fields = expect_arity("UserTag", fields, 1)?;
                Ok(UserTag::TagProjectFundsWithdrawal {
                    project_id: ProjectId::from_data(&fields[0])?,
                })
            }
            1 => {
                let fields = expect_arity("UserTag", fields, 1)?;
                Ok(UserTag::TagProjectDelayedStakingRewards {
                    staking_validator: Option::from_data(&fields[0])?,
                })
            }
            2 => {
                let fields = expect_arity("UserTag", fields, 1)?;
                Ok(UserTag::TagProjectClosed {
                    project_id: ProjectId::from_data(&fields[0])?,
                })
            }
            3 => {
                let fields = expect_arity("UserTag", fields, 1)?;
                Ok(UserTag::TagProjectDelisted {
                    project_id: ProjectId::from_data(&fields[0])?,
                })
            }
            4 => {
                let fields = expect_arity("UserTag", fields, 2)?;
                Ok(UserTag::TagProjectScriptClosed {
                    project_id: ProjectId::from_data(&fields[0])?,
                    staking_validator: StakingValidatorHash::from_data(&fields[1])?,
                })
            }
            5 => {
                let fields = expect_arity("UserTag", fields, 2)?;
                Ok(UserTag::TagProjectScriptDelisted {
                    project_id: ProjectId::from_data(&fields[0])?,
                    staking_validator: StakingValidatorHash::from_data(&fields[1])?,
                })
            }
            tag => Err(unknown("UserTag", tag)),
        }
    }
}

impl ToData for UserTag {
    fn to_data(&self) -> Data {
        match self {
            UserTag::TagProjectFundsWithdrawal { project_id } => {
                Data::constr(0, vec![project_id.to_data()])
            }
            UserTag::TagProjectDelayedStakingRewards { staking_validator } => {
                Data::constr(1, vec![staking_validator.to_data()])
            }
            UserTag::TagProjectClosed { project_id } => Data::constr(2, vec![project_id.to_data()]),
            UserTag::TagProjectDelisted { project_id } => {
                Data::constr(3, vec![project_id.to_data()])
            }
            UserTag::TagProjectScriptClosed {
                project_id,
                staking_validator,
            } => Data::constr(4, vec![project_id.to_data(), staking_validator.to_data()]),
            UserTag::TagProjectScriptDelisted {
                project_id,
                staking_validator,
            } => Data::constr(5, vec![project_id.to_data(), staking_validator.to_data()]),
        }
    }
}

/// Datum of an open-treasury UTxO.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OpenTreasuryDatum {
    /// Governor's share of the ada held by the UTxO.
    pub governor_ada: i128,
    pub tag: UserTag,
}

impl FromData for OpenTreasuryDatum {
    fn from_data(data: &Data) -> Result<Self, DecodeError> {
        let fields = data.record("OpenTreasuryDatum", 2)?;
        Ok(Self {
            governor_ada: fields[0].as_int()?,
            tag: UserTag::from_data(&fields[1])?,
        })
    }
}

impl ToData for OpenTreasuryDatum {
    fn to_data(&self) -> Data {
        Data::constr(0, vec![Data::Int(self.governor_ada), self.tag.to_data()])
    }
}
