//! # Actions
//!
//! `Close` and `Delist` bodies. Both run after every precondition in
//! [`crate::preconditions`] has passed and receive the values those checks
//! produced through [`ActionContext`].

use tracing::debug;

use crate::auth::is_tx_authorized_by;
use crate::constants::{
    PROJECT_SCRIPT_CLOSE_DISCOUNT_CENTS, PROJECT_SCRIPT_DELIST_DISCOUNT_CENTS,
    TREASURY_UTXO_MIN_ADA,
};
use crate::context::{Tx, TxInput, TxOutput};
use crate::data::FromData;
use crate::errors::{Result, ValidationError};
use crate::ledger::{Credential, StakingCredential, StakingValidatorHash, Value};
use crate::registry::ProtocolParamsDatum;
use crate::treasury::{has_treasury_payout, PayoutAmount, PayoutTag};
use crate::types::{
    Datum, OpenTreasuryRedeemer, ProjectDatum, ProjectDetailRedeemer, ProjectStatus, UserTag,
};
use crate::ScriptParams;

/// Everything an action body reads.
pub struct ActionContext<'a> {
    pub tx: &'a Tx,
    pub params: &'a ScriptParams,
    pub pparams: &'a ProtocolParamsDatum,
    pub datum: &'a Datum,
    pub own_input: &'a TxInput,
    pub project: &'a ProjectDatum,
    pub staking_credential: &'a StakingCredential,
    pub staking_validator: &'a StakingValidatorHash,
}

impl ActionContext<'_> {
    fn withdrawn_rewards(&self) -> Result<i128> {
        self.tx
            .withdrawal(self.staking_credential)
            .ok_or(ValidationError::MissingStakeWithdrawals)
    }

    /// Signed off by the protocol's staking manager or the governor.
    fn is_operator_authorized(&self) -> bool {
        is_tx_authorized_by(self.tx, &self.pparams.staking_manager)
            || is_tx_authorized_by(self.tx, &self.pparams.governor_address.credential)
    }
}

// ── Close ─────────────────────────────────────────────────────────────

/// Close the record.
///
/// The owner may close unconditionally. The staking manager or governor may
/// close on the owner's behalf by refunding the record's value plus the stake
/// key deposit, less a fee discount.
///
/// The project-status sub-check still runs first: its hard failures abort
/// evaluation, but its boolean result does not gate the verdict.
pub fn close(ctx: &ActionContext<'_>) -> Result<bool> {
    let status_check = check_close_status(ctx)?;
    debug!(status_check, "close status sub-check evaluated");

    if is_tx_authorized_by(ctx.tx, &ctx.project.owner_address.credential) {
        debug!("close authorized by project owner");
        return Ok(true);
    }
    if !ctx.is_operator_authorized() {
        return Ok(false);
    }
    has_owner_refund(ctx)
}

fn check_close_status(ctx: &ActionContext<'_>) -> Result<bool> {
    match &ctx.project.status {
        ProjectStatus::PreClosed { .. } => check_detail_withdraws_funds(ctx),
        ProjectStatus::Closed => check_rewards_routed_to_treasury(ctx),
        ProjectStatus::Active | ProjectStatus::PreDelisted { .. } | ProjectStatus::Delisted => {
            Err(ValidationError::WrongProjectStatus)
        }
    }
}

/// While `PreClosed`, the project-detail record must be spent with
/// `WithdrawFunds` in the same transaction.
fn check_detail_withdraws_funds(ctx: &ActionContext<'_>) -> Result<bool> {
    let project_detail_at = ctx.params.project_detail_at();
    let input = ctx
        .tx
        .find_input(|input| input.output.holds_unit(&project_detail_at))
        .ok_or(ValidationError::MissingProjectDetailInput)?;
    let redeemer = ctx
        .tx
        .spending_redeemer(input)
        .ok_or(ValidationError::MissingProjectDetailRedeemer)?;

    match ProjectDetailRedeemer::from_data(redeemer)? {
        ProjectDetailRedeemer::WithdrawFunds => Ok(true),
        ProjectDetailRedeemer::Update
        | ProjectDetailRedeemer::Close
        | ProjectDetailRedeemer::Delist
        | ProjectDetailRedeemer::Migrate => Err(ValidationError::IncorrectProjectDetailRedeemer),
    }
}

/// Once `Closed`, withdrawn staking rewards must reach the treasury: small
/// amounts through a delayed-rewards collection, larger ones as their own
/// treasury UTxO.
fn check_rewards_routed_to_treasury(ctx: &ActionContext<'_>) -> Result<bool> {
    let withdrawn_rewards = ctx.withdrawn_rewards()?;

    if withdrawn_rewards == 0 {
        Ok(true)
    } else if withdrawn_rewards < TREASURY_UTXO_MIN_ADA {
        check_delayed_rewards_collected(ctx, withdrawn_rewards)
    } else {
        has_treasury_payout(
            ctx.tx,
            ctx.pparams,
            PayoutAmount::Exact(withdrawn_rewards),
            PayoutTag::DelayedStakingRewards {
                staking_validator: ctx.staking_validator,
            },
        )
    }
}

fn check_delayed_rewards_collected(ctx: &ActionContext<'_>, withdrawn_rewards: i128) -> Result<bool> {
    let open_treasury = Credential::Validator(
        ctx.pparams
            .registry
            .open_treasury_validator
            .latest
            .clone(),
    );
    let input = ctx
        .tx
        .find_input(|input| input.output.address.credential == open_treasury)
        .ok_or(ValidationError::MissingOpenTreasuryInput)?;
    let redeemer = ctx
        .tx
        .spending_redeemer(input)
        .ok_or(ValidationError::MissingOpenTreasuryRedeemer)?;

    match OpenTreasuryRedeemer::from_data(redeemer)? {
        OpenTreasuryRedeemer::CollectDelayedStakingRewards {
            staking_withdrawals,
        } => staking_withdrawals
            .get(ctx.staking_validator)
            .map(|collected| *collected == withdrawn_rewards)
            .ok_or(ValidationError::MissingStakingWithdrawalEntry),
        OpenTreasuryRedeemer::WithdrawAda
        | OpenTreasuryRedeemer::Revoke
        | OpenTreasuryRedeemer::Migrate => Err(ValidationError::IncorrectOpenTreasuryRedeemer),
    }
}

/// Some output refunds the owner and is tagged as this record's close.
fn has_owner_refund(ctx: &ActionContext<'_>) -> Result<bool> {
    let refund_ada = ctx
        .datum
        .stake_key_deposit
        .checked_sub(ctx.pparams.discount(PROJECT_SCRIPT_CLOSE_DISCOUNT_CENTS)?)
        .ok_or(ValidationError::ArithmeticOverflow)?;
    let min_refund = ctx
        .own_input
        .output
        .value
        .checked_add(&Value::lovelace(refund_ada))
        .ok_or(ValidationError::ArithmeticOverflow)?;

    for output in ctx.tx.outputs_to(&ctx.project.owner_address) {
        if output.value.contains(&min_refund) && is_tagged_script_closed(ctx, output)? {
            return Ok(true);
        }
    }
    Ok(false)
}

fn is_tagged_script_closed(ctx: &ActionContext<'_>, output: &TxOutput) -> Result<bool> {
    let Some(data) = output.datum.inline() else {
        return Ok(false);
    };
    Ok(match UserTag::from_data(data)? {
        UserTag::TagProjectScriptClosed {
            project_id,
            staking_validator,
        } => project_id == ctx.datum.project_id && &staking_validator == ctx.staking_validator,
        UserTag::TagProjectFundsWithdrawal { .. }
        | UserTag::TagProjectDelayedStakingRewards { .. }
        | UserTag::TagProjectClosed { .. }
        | UserTag::TagProjectDelisted { .. }
        | UserTag::TagProjectScriptDelisted { .. } => false,
    })
}

// ── Delist ────────────────────────────────────────────────────────────

/// Delist the record once the project itself is `Delisted`.
///
/// The record's ada, the withdrawn rewards and the stake key deposit, less a
/// fee discount, must all go to the treasury. Only the staking manager or the
/// governor may delist.
pub fn delist(ctx: &ActionContext<'_>) -> Result<bool> {
    let withdrawn_rewards = ctx.withdrawn_rewards()?;

    let is_project_delisted = matches!(ctx.project.status, ProjectStatus::Delisted);

    let treasury_ada = delist_treasury_ada(
        ctx.own_input.output.value.ada(),
        withdrawn_rewards,
        ctx.datum.stake_key_deposit,
        ctx.pparams.discount(PROJECT_SCRIPT_DELIST_DISCOUNT_CENTS)?,
    )?;

    let has_payout = has_treasury_payout(
        ctx.tx,
        ctx.pparams,
        PayoutAmount::AtLeast(treasury_ada),
        PayoutTag::ScriptDelisted {
            project_id: &ctx.datum.project_id,
            staking_validator: ctx.staking_validator,
        },
    )?;

    let authorized = ctx.is_operator_authorized();
    debug!(
        authorized,
        is_project_delisted, has_payout, treasury_ada, "delist checks evaluated"
    );
    Ok(authorized && is_project_delisted && has_payout)
}

/// `own_ada + withdrawn_rewards + stake_key_deposit - discount`, checked.
pub fn delist_treasury_ada(
    own_ada: i128,
    withdrawn_rewards: i128,
    stake_key_deposit: i128,
    discount: i128,
) -> Result<i128> {
    own_ada
        .checked_add(withdrawn_rewards)
        .and_then(|sum| sum.checked_add(stake_key_deposit))
        .and_then(|sum| sum.checked_sub(discount))
        .ok_or(ValidationError::ArithmeticOverflow)
}
