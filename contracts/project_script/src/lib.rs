//! # Project Script Validator
//!
//! Spending validator for a project's **project-script** record: the UTxO
//! that carries the reference to the project's staking script and the stake
//! key deposit paid to register it. The validator decides whether a
//! transaction may consume that record.
//!
//! | Redeemer  | Allowed when                                                   |
//! |-----------|----------------------------------------------------------------|
//! | `Migrate` | the registry's migration token for this version moves          |
//! | `Close`   | preconditions hold; owner signs, or operator refunds the owner |
//! | `Delist`  | preconditions hold; project delisted; funds go to the treasury |
//!
//! ## Architecture
//!
//! Evaluation is a pure function of `(datum, redeemer, script context)`:
//!
//! 1. [`registry`] locates the protocol params among reference inputs.
//! 2. `Migrate` is decided by [`preconditions::check_migration`] alone.
//! 3. Otherwise [`preconditions`] gates on the script version, the companion
//!    project record, the auth-token burn and the staking deregistration.
//! 4. [`actions`] runs the `Close` or `Delist` body, using [`auth`] and
//!    [`treasury`].
//!
//! A failed precondition aborts with a [`ValidationError`] whose `Display`
//! text is the diagnostic label. A composed check that is merely false
//! returns `Ok(false)`. Either way the transaction is rejected.

pub mod actions;
pub mod auth;
pub mod constants;
pub mod context;
pub mod data;
pub mod errors;
pub mod ledger;
pub mod preconditions;
pub mod registry;
pub mod treasury;
pub mod types;

#[cfg(test)]
mod test_delist;
#[cfg(test)]
mod test_fixtures;
#[cfg(test)]
mod test_properties;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use actions::ActionContext;
use constants::{
    PROJECT_AT_TOKEN_NAME, PROJECT_DETAIL_AT_TOKEN_NAME, PROJECT_SCRIPT_AT_TOKEN_NAME,
};
use ledger::{AssetClass, MintingPolicyHash, StakingCredential, TokenName};

pub use context::ScriptContext;
pub use data::{Data, FromData, ToData};
pub use errors::{Result, ValidationError};
pub use types::{Datum, ProjectStatus, Redeemer};

/// Parameters the validator is compiled with.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScriptParams {
    /// Policy minting the project, project-detail and project-script tokens.
    pub project_at_mph: MintingPolicyHash,
    /// Policy of the protocol-params NFT.
    pub protocol_nft_mph: MintingPolicyHash,
}

impl ScriptParams {
    pub fn project_at(&self) -> AssetClass {
        AssetClass::new(
            self.project_at_mph.clone(),
            TokenName::new(PROJECT_AT_TOKEN_NAME),
        )
    }

    pub fn project_detail_at(&self) -> AssetClass {
        AssetClass::new(
            self.project_at_mph.clone(),
            TokenName::new(PROJECT_DETAIL_AT_TOKEN_NAME),
        )
    }

    pub fn project_script_at(&self) -> AssetClass {
        AssetClass::new(
            self.project_at_mph.clone(),
            TokenName::new(PROJECT_SCRIPT_AT_TOKEN_NAME),
        )
    }
}

#[derive(Clone, Debug)]
pub struct ProjectScript {
    params: ScriptParams,
}

impl ProjectScript {
    pub fn new(params: ScriptParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ScriptParams {
        &self.params
    }

    /// Decode the raw datum and redeemer, then [`evaluate`](Self::evaluate).
    pub fn validate(&self, datum: &Data, redeemer: &Data, ctx: &ScriptContext) -> Result<bool> {
        let datum = Datum::from_data(datum).inspect_err(|e| warn!(%e, "undecodable datum"))?;
        let redeemer =
            Redeemer::from_data(redeemer).inspect_err(|e| warn!(%e, "undecodable redeemer"))?;
        self.evaluate(&datum, redeemer, ctx)
    }

    /// Decide whether `ctx.tx` may spend the record locked with `datum`.
    pub fn evaluate(&self, datum: &Datum, redeemer: Redeemer, ctx: &ScriptContext) -> Result<bool> {
        let verdict = self.run(datum, redeemer, ctx);
        match &verdict {
            Ok(approved) => debug!(?redeemer, project_id = %datum.project_id, approved, "evaluated"),
            Err(e) => warn!(?redeemer, project_id = %datum.project_id, %e, "evaluation aborted"),
        }
        verdict
    }

    fn run(&self, datum: &Datum, redeemer: Redeemer, ctx: &ScriptContext) -> Result<bool> {
        let tx = &ctx.tx;
        let own_input = ctx.current_input()?;
        let own_validator_hash = ctx.current_validator_hash()?;
        let pparams = registry::find_pparams_datum(&tx.ref_inputs, &self.params.protocol_nft_mph)?;

        let action_body: fn(&ActionContext<'_>) -> Result<bool> = match redeemer {
            Redeemer::Migrate => {
                return preconditions::check_migration(tx, &pparams, &own_validator_hash)
            }
            Redeemer::Close => actions::close,
            Redeemer::Delist => actions::delist,
        };

        preconditions::check_script_version(&pparams, &own_validator_hash)?;

        let staking_validator = preconditions::bound_staking_validator(own_input)?;
        let staking_credential = StakingCredential::from_script_hash(staking_validator.clone());

        let project = preconditions::find_project_datum(tx, &self.params.project_at(), datum)?;
        preconditions::check_auth_token_burn(tx, &self.params.project_at_mph)?;
        preconditions::check_staking_deregistration(tx, &staking_credential)?;
        debug!(project_id = %datum.project_id, status = ?project.status, "preconditions passed");

        let action = ActionContext {
            tx,
            params: &self.params,
            pparams: &pparams,
            datum,
            own_input,
            project: &project,
            staking_credential: &staking_credential,
            staking_validator: &staking_validator,
        };

        action_body(&action)
    }
}
