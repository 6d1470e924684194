//! # Treasury payouts
//!
//! Checks that a transaction pays the open treasury correctly. A qualifying
//! output:
//!
//! - sits at the current open-treasury address, staked with the protocol
//!   staking validator;
//! - carries the expected ada (exact or minimum, per [`PayoutAmount`]);
//! - has an inline [`OpenTreasuryDatum`] whose `governor_ada` is the floor of
//!   `ada * governor_share_ratio / RATIO_MULTIPLIER`;
//! - is tagged with the expected [`PayoutTag`].
//!
//! Rounding always favors the treasury and is never compensated elsewhere.

use crate::constants::RATIO_MULTIPLIER;
use crate::context::{Tx, TxOutput};
use crate::data::FromData;
use crate::errors::{Result, ValidationError};
use crate::ledger::{StakingValidatorHash, Value};
use crate::registry::ProtocolParamsDatum;
use crate::types::{OpenTreasuryDatum, ProjectId, UserTag};

/// Governor's share of `ada`, truncated toward zero.
///
/// Both operands are non-negative on the ledger, so truncation is floor.
pub fn governor_share(ada: i128, governor_share_ratio: i128) -> Result<i128> {
    ada.checked_mul(governor_share_ratio)
        .map(|scaled| scaled / RATIO_MULTIPLIER)
        .ok_or(ValidationError::ArithmeticOverflow)
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PayoutAmount {
    /// The output holds exactly this much ada and nothing else.
    Exact(i128),
    /// The output holds at least this much ada.
    AtLeast(i128),
}

impl PayoutAmount {
    fn accepts(&self, value: &Value) -> bool {
        match self {
            PayoutAmount::Exact(ada) => *value == Value::lovelace(*ada),
            PayoutAmount::AtLeast(ada) => value.ada() >= *ada,
        }
    }
}

/// Which tag the treasury datum must carry.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PayoutTag<'a> {
    /// Staking rewards withdrawn while closing.
    DelayedStakingRewards {
        staking_validator: &'a StakingValidatorHash,
    },
    /// The project-script record's funds after a delist.
    ScriptDelisted {
        project_id: &'a ProjectId,
        staking_validator: &'a StakingValidatorHash,
    },
}

impl PayoutTag<'_> {
    fn accepts(&self, tag: &UserTag) -> Result<bool> {
        match (self, tag) {
            (
                PayoutTag::DelayedStakingRewards { staking_validator },
                UserTag::TagProjectDelayedStakingRewards {
                    staking_validator: tagged,
                },
            ) => tagged
                .as_ref()
                .map(|tagged| tagged == *staking_validator)
                .ok_or(ValidationError::MissingTreasuryTagStakingValidator),
            (
                PayoutTag::ScriptDelisted {
                    project_id,
                    staking_validator,
                },
                UserTag::TagProjectScriptDelisted {
                    project_id: tagged_project,
                    staking_validator: tagged_validator,
                },
            ) => Ok(tagged_project == *project_id && tagged_validator == *staking_validator),
            _ => Ok(false),
        }
    }
}

/// Decide whether `output` is a qualifying treasury payout.
///
/// A non-inline datum disqualifies the output; an inline datum that does
/// not decode aborts evaluation.
pub fn is_treasury_payout(
    output: &TxOutput,
    pparams: &ProtocolParamsDatum,
    amount: PayoutAmount,
    tag: PayoutTag<'_>,
) -> Result<bool> {
    if output.address != pparams.open_treasury_address() || !amount.accepts(&output.value) {
        return Ok(false);
    }
    let Some(data) = output.datum.inline() else {
        return Ok(false);
    };
    let datum = OpenTreasuryDatum::from_data(data)?;

    let expected_governor_ada = governor_share(output.value.ada(), pparams.governor_share_ratio)?;
    if datum.governor_ada != expected_governor_ada {
        return Ok(false);
    }
    tag.accepts(&datum.tag)
}

/// True when any output of `tx` is a qualifying treasury payout.
///
/// Outputs are scanned in order and the first hard failure aborts.
pub fn has_treasury_payout(
    tx: &Tx,
    pparams: &ProtocolParamsDatum,
    amount: PayoutAmount,
    tag: PayoutTag<'_>,
) -> Result<bool> {
    for output in &tx.outputs {
        if is_treasury_payout(output, pparams, amount, tag)? {
            return Ok(true);
        }
    }
    Ok(false)
}
