//! # Ledger primitives
//!
//! Hashes, multi-asset values, credentials and addresses as the validator
//! sees them. Everything here is plain data: the transaction view lives in
//! [`crate::context`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::data::{expect_arity, Data, DecodeError, FromData, ToData};

macro_rules! byte_string {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Default, Eq, Hash, Ord, PartialEq, PartialOrd,
            ::serde::Serialize, ::serde::Deserialize,
        )]
        pub struct $name(#[serde(with = "hex::serde")] Vec<u8>);

        impl $name {
            pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
                Self(bytes.into())
            }

            pub fn as_bytes(&self) -> &[u8] {
                &self.0
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(&hex::encode(&self.0))
            }
        }

        impl ::std::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{}({})", stringify!($name), hex::encode(&self.0))
            }
        }

        impl $crate::data::FromData for $name {
            fn from_data(
                data: &$crate::data::Data,
            ) -> Result<Self, $crate::data::DecodeError> {
                Ok(Self(data.as_bytes()?.to_vec()))
            }
        }

        impl $crate::data::ToData for $name {
            fn to_data(&self) -> $crate::data::Data {
                $crate::data::Data::Bytes(self.0.clone())
            }
        }
    };
}

pub(crate) use byte_string;

byte_string!(
    /// Hash of a script: spending validator, staking validator or minting policy.
    ScriptHash
);
byte_string!(
    /// Hash of a payment or staking verification key.
    PubKeyHash
);
byte_string!(TxId);
byte_string!(DatumHash);
byte_string!(TokenName);

pub type ValidatorHash = ScriptHash;
pub type StakingValidatorHash = ScriptHash;
pub type MintingPolicyHash = ScriptHash;

/// A native token type: minting policy plus token name.
#[derive(Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct AssetClass {
    pub mph: MintingPolicyHash,
    pub token_name: TokenName,
}

impl AssetClass {
    pub fn new(mph: MintingPolicyHash, token_name: TokenName) -> Self {
        Self { mph, token_name }
    }

    /// The ada asset class: empty policy, empty token name.
    pub fn ada() -> Self {
        Self::default()
    }
}

impl FromData for AssetClass {
    fn from_data(data: &Data) -> Result<Self, DecodeError> {
        let fields = data.record("AssetClass", 2)?;
        Ok(Self {
            mph: MintingPolicyHash::from_data(&fields[0])?,
            token_name: TokenName::from_data(&fields[1])?,
        })
    }
}

impl ToData for AssetClass {
    fn to_data(&self) -> Data {
        Data::constr(0, vec![self.mph.to_data(), self.token_name.to_data()])
    }
}

/// Multi-asset value: `policy -> token -> amount`.
///
/// Amounts are signed so the same type carries mint/burn deltas. Zero
/// entries are never stored, so a policy present in the map holds at least
/// one nonzero amount.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(from = "ValueMap")]
pub struct Value(ValueMap);

type ValueMap = BTreeMap<MintingPolicyHash, BTreeMap<TokenName, i128>>;

/// Zero amounts and policies left without tokens are dropped.
impl From<ValueMap> for Value {
    fn from(map: ValueMap) -> Self {
        let mut value = Self::zero();
        for (mph, tokens) in map {
            for (token_name, amount) in tokens {
                value.insert(&AssetClass::new(mph.clone(), token_name), amount);
            }
        }
        value
    }
}

impl Value {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn lovelace(amount: i128) -> Self {
        Self::asset(&AssetClass::ada(), amount)
    }

    pub fn asset(asset_class: &AssetClass, amount: i128) -> Self {
        let mut value = Self::zero();
        value.insert(asset_class, amount);
        value
    }

    /// Builder form of [`Value::insert`].
    pub fn with(mut self, asset_class: &AssetClass, amount: i128) -> Self {
        self.insert(asset_class, amount);
        self
    }

    /// Overwrite the amount held for `asset_class`. A zero amount removes
    /// the entry, and the policy with it once it holds no tokens.
    pub fn insert(&mut self, asset_class: &AssetClass, amount: i128) {
        if amount != 0 {
            self.0
                .entry(asset_class.mph.clone())
                .or_default()
                .insert(asset_class.token_name.clone(), amount);
            return;
        }
        if let Some(tokens) = self.0.get_mut(&asset_class.mph) {
            tokens.remove(&asset_class.token_name);
            if tokens.is_empty() {
                self.0.remove(&asset_class.mph);
            }
        }
    }

    /// Amount of `asset_class`, zero when absent.
    pub fn get_safe(&self, asset_class: &AssetClass) -> i128 {
        self.0
            .get(&asset_class.mph)
            .and_then(|tokens| tokens.get(&asset_class.token_name))
            .copied()
            .unwrap_or(0)
    }

    pub fn ada(&self) -> i128 {
        self.get_safe(&AssetClass::ada())
    }

    /// All token amounts under one policy, if the policy appears at all.
    pub fn get_policy(&self, mph: &MintingPolicyHash) -> Option<&BTreeMap<TokenName, i128>> {
        self.0.get(mph)
    }

    fn asset_classes(&self) -> impl Iterator<Item = AssetClass> + '_ {
        self.0.iter().flat_map(|(mph, tokens)| {
            tokens
                .keys()
                .map(move |name| AssetClass::new(mph.clone(), name.clone()))
        })
    }

    /// Sum of two values; `None` on overflow.
    pub fn checked_add(&self, other: &Value) -> Option<Value> {
        let mut sum = self.clone();
        for asset_class in other.asset_classes() {
            let amount = sum
                .get_safe(&asset_class)
                .checked_add(other.get_safe(&asset_class))?;
            sum.insert(&asset_class, amount);
        }
        Some(sum)
    }

    /// Ledger partial order: every asset held by either side is held in at
    /// least the same amount by `self`.
    pub fn contains(&self, other: &Value) -> bool {
        self.asset_classes()
            .chain(other.asset_classes())
            .all(|asset_class| self.get_safe(&asset_class) >= other.get_safe(&asset_class))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.asset_classes()
            .chain(other.asset_classes())
            .all(|asset_class| self.get_safe(&asset_class) == other.get_safe(&asset_class))
    }
}

impl Eq for Value {}

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Credential {
    PubKey(PubKeyHash),
    Validator(ValidatorHash),
}

impl FromData for Credential {
    fn from_data(data: &Data) -> Result<Self, DecodeError> {
        match data.as_constr()? {
            (0, fields) => {
                let fields = expect_arity("Credential", fields, 1)?;
                Ok(Credential::PubKey(PubKeyHash::from_data(&fields[0])?))
            }
            (1, fields) => {
                let fields = expect_arity("Credential", fields, 1)?;
                Ok(Credential::Validator(ValidatorHash::from_data(&fields[0])?))
            }
            (tag, _) => Err(DecodeError::UnknownConstructor {
                type_name: "Credential",
                tag,
            }),
        }
    }
}

impl ToData for Credential {
    fn to_data(&self) -> Data {
        match self {
            Credential::PubKey(hash) => Data::constr(0, vec![hash.to_data()]),
            Credential::Validator(hash) => Data::constr(1, vec![hash.to_data()]),
        }
    }
}

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StakingCredential {
    Hash(Credential),
    Ptr(i128, i128, i128),
}

impl StakingCredential {
    /// Staking credential of a staking validator script.
    pub fn from_script_hash(hash: ScriptHash) -> Self {
        StakingCredential::Hash(Credential::Validator(hash))
    }
}

impl FromData for StakingCredential {
    fn from_data(data: &Data) -> Result<Self, DecodeError> {
        match data.as_constr()? {
            (0, fields) => {
                let fields = expect_arity("StakingCredential", fields, 1)?;
                Ok(StakingCredential::Hash(Credential::from_data(&fields[0])?))
            }
            (1, fields) => {
                let fields = expect_arity("StakingCredential", fields, 3)?;
                Ok(StakingCredential::Ptr(
                    fields[0].as_int()?,
                    fields[1].as_int()?,
                    fields[2].as_int()?,
                ))
            }
            (tag, _) => Err(DecodeError::UnknownConstructor {
                type_name: "StakingCredential",
                tag,
            }),
        }
    }
}

impl ToData for StakingCredential {
    fn to_data(&self) -> Data {
        match self {
            StakingCredential::Hash(credential) => Data::constr(0, vec![credential.to_data()]),
            StakingCredential::Ptr(a, b, c) => {
                Data::constr(1, vec![Data::Int(*a), Data::Int(*b), Data::Int(*c)])
            }
        }
    }
}

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Address {
    pub credential: Credential,
    pub staking_credential: Option<StakingCredential>,
}

impl Address {
    pub fn new(credential: Credential, staking_credential: Option<StakingCredential>) -> Self {
        Self {
            credential,
            staking_credential,
        }
    }
}

impl FromData for Address {
    fn from_data(data: &Data) -> Result<Self, DecodeError> {
        let fields = data.record("Address", 2)?;
        Ok(Self {
            credential: Credential::from_data(&fields[0])?,
            staking_credential: Option::<StakingCredential>::from_data(&fields[1])?,
        })
    }
}

impl ToData for Address {
    fn to_data(&self) -> Data {
        Data::constr(
            0,
            vec![self.credential.to_data(), self.staking_credential.to_data()],
        )
    }
}

/// Reference to a transaction output.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct TxOutputId {
    pub tx_id: TxId,
    pub index: u32,
}

impl FromData for TxOutputId {
    fn from_data(data: &Data) -> Result<Self, DecodeError> {
        let fields = data.record("TxOutputId", 2)?;
        let index = fields[1].as_int()?;
        Ok(Self {
            tx_id: TxId::from_data(&fields[0])?,
            index: u32::try_from(index).map_err(|_| DecodeError::UnexpectedShape {
                expected: "output index",
                found: "out-of-range int",
            })?,
        })
    }
}

impl ToData for TxOutputId {
    fn to_data(&self) -> Data {
        Data::constr(0, vec![self.tx_id.to_data(), Data::Int(self.index.into())])
    }
}
