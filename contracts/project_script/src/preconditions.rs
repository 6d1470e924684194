//! # Preconditions
//!
//! Checks shared by every non-migration action, run in this order:
//!
//! 1. the running script is the registry's latest project-script version;
//! 2. the companion project record is found and belongs to this project;
//! 3. the project auth tokens are burned under `DeallocateStaking`;
//! 4. the bound staking credential is deregistered.
//!
//! Each failure is a labeled hard failure. Migration is gated separately by
//! [`check_migration`] and skips all of the above.

use tracing::{debug, warn};

use crate::context::{DCert, ScriptPurpose, Tx, TxInput, TxOutput};
use crate::data::FromData;
use crate::errors::{Result, ValidationError};
use crate::ledger::{
    AssetClass, MintingPolicyHash, StakingCredential, StakingValidatorHash, ValidatorHash,
};
use crate::registry::ProtocolParamsDatum;
use crate::types::{Datum, ProjectAtRedeemer, ProjectDatum};

/// Migration is allowed when the version-specific migration token moves:
/// any nonzero net mint or burn of it.
pub fn check_migration(
    tx: &Tx,
    pparams: &ProtocolParamsDatum,
    own_validator_hash: &ValidatorHash,
) -> Result<bool> {
    let migration_asset_class = pparams.project_script_migration(own_validator_hash)?;
    let moved = tx.minted.get_safe(migration_asset_class) != 0;
    debug!(version = %own_validator_hash, moved, "migration token checked");
    Ok(moved)
}

pub fn check_script_version(
    pparams: &ProtocolParamsDatum,
    own_validator_hash: &ValidatorHash,
) -> Result<()> {
    if own_validator_hash != &pparams.registry.project_script_validator.latest {
        return Err(ValidationError::WrongScriptVersion);
    }
    Ok(())
}

/// Staking validator bound to the record: the script referenced by the
/// record's own UTxO.
pub fn bound_staking_validator(own_input: &TxInput) -> Result<StakingValidatorHash> {
    own_input
        .output
        .ref_script_hash
        .clone()
        .ok_or(ValidationError::MissingStakingScriptRef)
}

/// Find the companion project record: reference inputs first, then
/// outputs. The first output holding one project auth token wins.
pub fn find_project_output<'a>(tx: &'a Tx, project_at: &AssetClass) -> Result<&'a TxOutput> {
    tx.ref_inputs
        .iter()
        .map(|input| &input.output)
        .find(|output| output.holds_unit(project_at))
        .or_else(|| tx.outputs.iter().find(|output| output.holds_unit(project_at)))
        .ok_or(ValidationError::MissingProjectUtxo)
}

/// Decode the companion project record and check it belongs to `datum`.
pub fn find_project_datum(tx: &Tx, project_at: &AssetClass, datum: &Datum) -> Result<ProjectDatum> {
    let output = find_project_output(tx, project_at)?;
    let data = output
        .datum
        .inline()
        .ok_or(ValidationError::InvalidProjectUtxo)?;
    let project = ProjectDatum::from_data(data).map_err(|e| {
        warn!(%e, "undecodable project datum");
        ValidationError::InvalidProjectUtxo
    })?;

    if project.project_id != datum.project_id {
        return Err(ValidationError::IncorrectProjectUtxo);
    }
    Ok(project)
}

/// The auth-token policy must run with `DeallocateStaking` and burn only.
pub fn check_auth_token_burn(tx: &Tx, project_at_mph: &MintingPolicyHash) -> Result<()> {
    let redeemer = tx
        .redeemer(&ScriptPurpose::Minting(project_at_mph.clone()))
        .ok_or(ValidationError::MissingProjectAtRedeemer)?;

    match ProjectAtRedeemer::from_data(redeemer)? {
        ProjectAtRedeemer::DeallocateStaking => {}
        ProjectAtRedeemer::NewProject { .. }
        | ProjectAtRedeemer::AllocateStaking
        | ProjectAtRedeemer::MigrateOut
        | ProjectAtRedeemer::MigrateIn => return Err(ValidationError::IncorrectBurnRedeemer),
    }

    // No entry under the policy means nothing was burned.
    let burns_only = tx.minted.get_policy(project_at_mph).is_some_and(|tokens| {
        !tokens.is_empty() && tokens.values().all(|amount| *amount < 0)
    });
    if !burns_only {
        return Err(ValidationError::IncorrectBurnAmount);
    }
    Ok(())
}

pub fn check_staking_deregistration(tx: &Tx, staking_credential: &StakingCredential) -> Result<()> {
    let deregisters = tx.dcerts.iter().any(|dcert| match dcert {
        DCert::Deregister(credential) => credential == staking_credential,
        DCert::Register(_) | DCert::Delegate { .. } => false,
    });
    if !deregisters {
        return Err(ValidationError::IncorrectDeregistration);
    }
    Ok(())
}
