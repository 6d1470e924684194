//! Labeled hard failures.
//!
//! Every variant aborts evaluation and rejects the transaction. The
//! `Display` text is the diagnostic label surfaced to tooling.

use thiserror::Error;

use crate::data::DecodeError;

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ValidationError {
    #[error("Wrong script version")]
    WrongScriptVersion,

    #[error("Missing protocol params reference input")]
    MissingProtocolParams,

    #[error("Invalid protocol params UTxO: missing inline datum")]
    InvalidProtocolParamsUtxo,

    #[error("Missing migration asset class for script version")]
    MissingMigration,

    #[error("Missing current input")]
    MissingCurrentInput,

    #[error("Current input is not locked by a validator")]
    NotScriptLocked,

    #[error("Missing staking script reference")]
    MissingStakingScriptRef,

    #[error("Missing project UTxO")]
    MissingProjectUtxo,

    #[error("Invalid project UTxO: datum is not an inline project datum")]
    InvalidProjectUtxo,

    #[error("Incorrect project UTxO")]
    IncorrectProjectUtxo,

    #[error("Missing project auth token redeemer")]
    MissingProjectAtRedeemer,

    #[error("Burn project auth token with incorrect redeemer")]
    IncorrectBurnRedeemer,

    #[error("Burn project auth token incorrect amount")]
    IncorrectBurnAmount,

    #[error("Deregister incorrect staking credential")]
    IncorrectDeregistration,

    #[error("Missing project detail input")]
    MissingProjectDetailInput,

    #[error("Missing project detail redeemer")]
    MissingProjectDetailRedeemer,

    #[error("Incorrect project detail redeemer")]
    IncorrectProjectDetailRedeemer,

    #[error("Missing stake withdrawals")]
    MissingStakeWithdrawals,

    #[error("Missing open treasury input")]
    MissingOpenTreasuryInput,

    #[error("Missing open treasury redeemer")]
    MissingOpenTreasuryRedeemer,

    #[error("Incorrect open treasury redeemer")]
    IncorrectOpenTreasuryRedeemer,

    #[error("Missing staking withdrawal entry")]
    MissingStakingWithdrawalEntry,

    #[error("Missing staking validator in treasury tag")]
    MissingTreasuryTagStakingValidator,

    #[error("Wrong project status")]
    WrongProjectStatus,

    #[error("Arithmetic overflow")]
    ArithmeticOverflow,

    #[error("Data decoding failed: {0}")]
    Decode(#[from] DecodeError),
}

pub type Result<T> = std::result::Result<T, ValidationError>;
