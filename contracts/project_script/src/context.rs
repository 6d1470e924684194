//! # Transaction view
//!
//! A read-only projection of the proposed transaction, plus the purpose
//! under which this validator is being run. Lookups are linear scans in list
//! order or ordered-map lookups, so every "first match" is reproducible.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::data::Data;
use crate::errors::ValidationError;
use crate::ledger::{
    Address, AssetClass, Credential, DatumHash, MintingPolicyHash, PubKeyHash, ScriptHash,
    StakingCredential, TxId, TxOutputId, ValidatorHash, Value,
};

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputDatum {
    #[default]
    None,
    Hash(DatumHash),
    Inline(Data),
}

impl OutputDatum {
    pub fn inline(&self) -> Option<&Data> {
        match self {
            OutputDatum::Inline(data) => Some(data),
            OutputDatum::None | OutputDatum::Hash(_) => None,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TxOutput {
    pub address: Address,
    pub value: Value,
    #[serde(default)]
    pub datum: OutputDatum,
    #[serde(default)]
    pub ref_script_hash: Option<ScriptHash>,
}

impl TxOutput {
    /// True when the output holds exactly one unit of `asset_class`.
    pub fn holds_unit(&self, asset_class: &AssetClass) -> bool {
        self.value.get_safe(asset_class) == 1
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TxInput {
    pub output_id: TxOutputId,
    pub output: TxOutput,
}

#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DCert {
    Register(StakingCredential),
    Deregister(StakingCredential),
    Delegate {
        delegator: StakingCredential,
        pool_id: PubKeyHash,
    },
}

#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptPurpose {
    Minting(MintingPolicyHash),
    Spending(TxOutputId),
    Rewarding(StakingCredential),
    Certifying(DCert),
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RedeemerEntry {
    pub purpose: ScriptPurpose,
    pub data: Data,
}

/// Redeemers of every script run by the transaction, keyed by purpose.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<RedeemerEntry>", into = "Vec<RedeemerEntry>")]
pub struct Redeemers(BTreeMap<ScriptPurpose, Data>);

impl Redeemers {
    pub fn get(&self, purpose: &ScriptPurpose) -> Option<&Data> {
        self.0.get(purpose)
    }

    pub fn insert(&mut self, purpose: ScriptPurpose, data: Data) {
        self.0.insert(purpose, data);
    }
}

impl From<Vec<RedeemerEntry>> for Redeemers {
    fn from(entries: Vec<RedeemerEntry>) -> Self {
        let mut map = BTreeMap::new();
        for entry in entries {
            // A purpose appears at most once on the ledger; keep the first.
            map.entry(entry.purpose).or_insert(entry.data);
        }
        Self(map)
    }
}

impl From<Redeemers> for Vec<RedeemerEntry> {
    fn from(redeemers: Redeemers) -> Self {
        redeemers
            .0
            .into_iter()
            .map(|(purpose, data)| RedeemerEntry { purpose, data })
            .collect()
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct WithdrawalEntry {
    pub credential: StakingCredential,
    pub amount: i128,
}

/// Reward withdrawals per staking credential.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<WithdrawalEntry>", into = "Vec<WithdrawalEntry>")]
pub struct Withdrawals(BTreeMap<StakingCredential, i128>);

impl Withdrawals {
    pub fn get(&self, credential: &StakingCredential) -> Option<i128> {
        self.0.get(credential).copied()
    }

    pub fn insert(&mut self, credential: StakingCredential, amount: i128) {
        self.0.insert(credential, amount);
    }
}

impl From<Vec<WithdrawalEntry>> for Withdrawals {
    fn from(entries: Vec<WithdrawalEntry>) -> Self {
        let mut map = BTreeMap::new();
        for entry in entries {
            map.entry(entry.credential).or_insert(entry.amount);
        }
        Self(map)
    }
}

impl From<Withdrawals> for Vec<WithdrawalEntry> {
    fn from(withdrawals: Withdrawals) -> Self {
        withdrawals
            .0
            .into_iter()
            .map(|(credential, amount)| WithdrawalEntry { credential, amount })
            .collect()
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tx {
    pub id: TxId,
    pub inputs: Vec<TxInput>,
    pub ref_inputs: Vec<TxInput>,
    pub outputs: Vec<TxOutput>,
    /// Net minted (positive) and burned (negative) amounts.
    pub minted: Value,
    pub dcerts: Vec<DCert>,
    pub withdrawals: Withdrawals,
    pub signatories: Vec<PubKeyHash>,
    pub redeemers: Redeemers,
}

impl Tx {
    pub fn is_signed_by(&self, pub_key_hash: &PubKeyHash) -> bool {
        self.signatories.contains(pub_key_hash)
    }

    pub fn redeemer(&self, purpose: &ScriptPurpose) -> Option<&Data> {
        self.redeemers.get(purpose)
    }

    /// Redeemer of the spending script guarding `input`.
    pub fn spending_redeemer(&self, input: &TxInput) -> Option<&Data> {
        self.redeemer(&ScriptPurpose::Spending(input.output_id.clone()))
    }

    pub fn withdrawal(&self, credential: &StakingCredential) -> Option<i128> {
        self.withdrawals.get(credential)
    }

    pub fn find_input(&self, predicate: impl Fn(&TxInput) -> bool) -> Option<&TxInput> {
        self.inputs.iter().find(|input| predicate(input))
    }

    pub fn outputs_to<'a>(&'a self, address: &'a Address) -> impl Iterator<Item = &'a TxOutput> {
        self.outputs
            .iter()
            .filter(move |output| &output.address == address)
    }
}

/// The transaction together with the input this validator is spending.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScriptContext {
    pub tx: Tx,
    pub purpose: ScriptPurpose,
}

impl ScriptContext {
    pub fn new(tx: Tx, spending: TxOutputId) -> Self {
        Self {
            tx,
            purpose: ScriptPurpose::Spending(spending),
        }
    }

    pub fn current_input(&self) -> Result<&TxInput, ValidationError> {
        let ScriptPurpose::Spending(output_id) = &self.purpose else {
            return Err(ValidationError::MissingCurrentInput);
        };
        self.tx
            .find_input(|input| &input.output_id == output_id)
            .ok_or(ValidationError::MissingCurrentInput)
    }

    pub fn current_validator_hash(&self) -> Result<ValidatorHash, ValidationError> {
        match &self.current_input()?.output.address.credential {
            Credential::Validator(hash) => Ok(hash.clone()),
            Credential::PubKey(_) => Err(ValidationError::NotScriptLocked),
        }
    }
}
