//! Shared builders for the scenario suites.
//!
//! `base_tx` produces a transaction that passes every precondition; each
//! test then adds or breaks exactly what it is about.

use std::collections::BTreeMap;

use crate::context::{DCert, OutputDatum, ScriptPurpose, Tx, TxInput, TxOutput};
use crate::data::{Data, ToData};
use crate::ledger::{
    Address, AssetClass, Credential, PubKeyHash, ScriptHash, StakingCredential, TokenName, TxId,
    TxOutputId, Value,
};
use crate::registry::{protocol_params_nft, MigratableScript, ProtocolParamsDatum, Registry};
use crate::treasury::governor_share;
use crate::types::{
    Datum, OpenTreasuryDatum, OpenTreasuryRedeemer, ProjectAtRedeemer, ProjectDatum,
    ProjectDetailRedeemer, ProjectId, ProjectStatus, UserTag,
};
use crate::{ProjectScript, Redeemer, Result, ScriptContext, ScriptParams};

pub const OWN_INPUT_ADA: i128 = 25_000_000;
pub const STAKE_KEY_DEPOSIT: i128 = 2_000_000;
pub const DISCOUNT_CENT_PRICE: i128 = 100;
pub const GOVERNOR_SHARE_RATIO: i128 = 100_000;

fn hash(byte: u8) -> ScriptHash {
    ScriptHash::new(vec![byte; 28])
}

fn key(byte: u8) -> PubKeyHash {
    PubKeyHash::new(vec![byte; 28])
}

pub fn latest_version() -> ScriptHash {
    hash(0x01)
}

pub fn retired_version() -> ScriptHash {
    hash(0x02)
}

pub fn staking_validator() -> ScriptHash {
    hash(0x03)
}

pub fn staking_credential() -> StakingCredential {
    StakingCredential::from_script_hash(staking_validator())
}

pub fn open_treasury_validator() -> ScriptHash {
    hash(0x05)
}

pub fn owner_key() -> PubKeyHash {
    key(0x11)
}

pub fn staking_manager_key() -> PubKeyHash {
    key(0x12)
}

pub fn governor_key() -> PubKeyHash {
    key(0x13)
}

pub fn stranger_key() -> PubKeyHash {
    key(0x14)
}

pub fn owner_address() -> Address {
    Address::new(Credential::PubKey(owner_key()), None)
}

pub fn migration_token() -> AssetClass {
    AssetClass::new(hash(0xc0), TokenName::new(b"migrate-project-script".to_vec()))
}

pub fn params() -> ScriptParams {
    ScriptParams {
        project_at_mph: hash(0xa0),
        protocol_nft_mph: hash(0xb0),
    }
}

pub fn project_id() -> ProjectId {
    ProjectId::new(b"project-0001".to_vec())
}

pub fn datum() -> Datum {
    Datum {
        project_id: project_id(),
        stake_key_deposit: STAKE_KEY_DEPOSIT,
    }
}

pub fn pparams() -> ProtocolParamsDatum {
    ProtocolParamsDatum {
        registry: Registry {
            protocol_staking_validator: hash(0x04),
            project_script_validator: MigratableScript {
                latest: latest_version(),
                migrations: BTreeMap::from([(retired_version(), migration_token())]),
            },
            open_treasury_validator: MigratableScript {
                latest: open_treasury_validator(),
                migrations: BTreeMap::new(),
            },
            ..Registry::default()
        },
        governor_address: Address::new(Credential::PubKey(governor_key()), None),
        governor_share_ratio: GOVERNOR_SHARE_RATIO,
        protocol_funds_share_ratio: 0,
        discount_cent_price: DISCOUNT_CENT_PRICE,
        project_pledge: 50_000_000,
        staking_manager: Credential::PubKey(staking_manager_key()),
    }
}

pub fn project_datum(status: ProjectStatus) -> ProjectDatum {
    ProjectDatum {
        project_id: project_id(),
        owner_address: owner_address(),
        status,
        milestone_reached: 0,
        is_staking_delegation_managed_by_protocol: true,
    }
}

pub fn output_id(index: u32) -> TxOutputId {
    TxOutputId {
        tx_id: TxId::new(vec![0xee; 32]),
        index,
    }
}

pub fn own_output_id() -> TxOutputId {
    output_id(0)
}

pub fn own_input(version: ScriptHash) -> TxInput {
    TxInput {
        output_id: own_output_id(),
        output: TxOutput {
            address: Address::new(Credential::Validator(version), None),
            value: Value::lovelace(OWN_INPUT_ADA),
            datum: OutputDatum::Inline(datum().to_data()),
            ref_script_hash: Some(staking_validator()),
        },
    }
}

pub fn pparams_ref_input(pparams: &ProtocolParamsDatum) -> TxInput {
    TxInput {
        output_id: output_id(100),
        output: TxOutput {
            address: Address::new(Credential::Validator(hash(0x06)), None),
            value: Value::lovelace(2_000_000)
                .with(&protocol_params_nft(&params().protocol_nft_mph), 1),
            datum: OutputDatum::Inline(pparams.to_data()),
            ref_script_hash: None,
        },
    }
}

pub fn project_output(project: &ProjectDatum) -> TxOutput {
    TxOutput {
        address: Address::new(Credential::Validator(hash(0x07)), None),
        value: Value::lovelace(2_000_000).with(&params().project_at(), 1),
        datum: OutputDatum::Inline(project.to_data()),
        ref_script_hash: None,
    }
}

pub fn project_ref_input(project: &ProjectDatum) -> TxInput {
    TxInput {
        output_id: output_id(101),
        output: project_output(project),
    }
}

/// A transaction passing every precondition for a record running the
/// latest version, with the project record in `status`.
pub fn base_tx(status: ProjectStatus) -> Tx {
    let mut tx = Tx {
        id: TxId::new(vec![0xdd; 32]),
        inputs: vec![own_input(latest_version())],
        ref_inputs: vec![
            pparams_ref_input(&pparams()),
            project_ref_input(&project_datum(status)),
        ],
        minted: Value::asset(&params().project_script_at(), -1),
        dcerts: vec![DCert::Deregister(staking_credential())],
        ..Tx::default()
    };
    tx.redeemers.insert(
        ScriptPurpose::Minting(params().project_at_mph),
        ProjectAtRedeemer::DeallocateStaking.to_data(),
    );
    tx
}

pub fn signed_by(mut tx: Tx, signer: PubKeyHash) -> Tx {
    tx.signatories.push(signer);
    tx
}

pub fn with_withdrawal(mut tx: Tx, amount: i128) -> Tx {
    tx.withdrawals.insert(staking_credential(), amount);
    tx
}

/// Spend the project-detail record with `redeemer`.
pub fn with_project_detail(mut tx: Tx, redeemer: ProjectDetailRedeemer) -> Tx {
    let input = TxInput {
        output_id: output_id(1),
        output: TxOutput {
            address: Address::new(Credential::Validator(hash(0x08)), None),
            value: Value::lovelace(2_000_000).with(&params().project_detail_at(), 1),
            datum: OutputDatum::Inline(Data::constr(0, vec![])),
            ref_script_hash: None,
        },
    };
    tx.redeemers
        .insert(ScriptPurpose::Spending(input.output_id.clone()), redeemer.to_data());
    tx.inputs.push(input);
    tx
}

/// Spend an open-treasury UTxO with `redeemer`.
pub fn with_treasury_input(mut tx: Tx, redeemer: OpenTreasuryRedeemer) -> Tx {
    let input = TxInput {
        output_id: output_id(2),
        output: TxOutput {
            address: pparams().open_treasury_address(),
            value: Value::lovelace(10_000_000),
            datum: OutputDatum::Inline(
                OpenTreasuryDatum {
                    governor_ada: 1_000_000,
                    tag: UserTag::TagProjectDelayedStakingRewards {
                        staking_validator: None,
                    },
                }
                .to_data(),
            ),
            ref_script_hash: None,
        },
    };
    tx.redeemers
        .insert(ScriptPurpose::Spending(input.output_id.clone()), redeemer.to_data());
    tx.inputs.push(input);
    tx
}

/// A treasury output holding `value` with a correctly split datum.
pub fn treasury_output(value: Value, tag: UserTag) -> TxOutput {
    let governor_ada = governor_share(value.ada(), GOVERNOR_SHARE_RATIO).unwrap();
    treasury_output_with_governor_ada(value, tag, governor_ada)
}

pub fn treasury_output_with_governor_ada(
    value: Value,
    tag: UserTag,
    governor_ada: i128,
) -> TxOutput {
    TxOutput {
        address: pparams().open_treasury_address(),
        value,
        datum: OutputDatum::Inline(OpenTreasuryDatum { governor_ada, tag }.to_data()),
        ref_script_hash: None,
    }
}

pub fn script_delisted_tag() -> UserTag {
    UserTag::TagProjectScriptDelisted {
        project_id: project_id(),
        staking_validator: staking_validator(),
    }
}

pub fn delayed_rewards_tag() -> UserTag {
    UserTag::TagProjectDelayedStakingRewards {
        staking_validator: Some(staking_validator()),
    }
}

pub fn script_closed_tag() -> UserTag {
    UserTag::TagProjectScriptClosed {
        project_id: project_id(),
        staking_validator: staking_validator(),
    }
}

/// An output refunding the owner after an operator close.
pub fn owner_refund(ada: i128, tag: UserTag) -> TxOutput {
    TxOutput {
        address: owner_address(),
        value: Value::lovelace(ada),
        datum: OutputDatum::Inline(tag.to_data()),
        ref_script_hash: None,
    }
}

pub fn with_output(mut tx: Tx, output: TxOutput) -> Tx {
    tx.outputs.push(output);
    tx
}

pub fn context(tx: Tx) -> ScriptContext {
    ScriptContext::new(tx, own_output_id())
}

pub fn evaluate(tx: Tx, redeemer: Redeemer) -> Result<bool> {
    ProjectScript::new(params()).evaluate(&datum(), redeemer, &context(tx))
}
