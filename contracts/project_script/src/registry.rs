//! # Protocol parameters
//!
//! The protocol-params record is a reference input identified by the
//! protocol NFT. It is owned by governance; this validator only reads the
//! script registry, the governance credentials and the pricing knobs.

use std::collections::BTreeMap;

use tracing::debug;

use crate::constants::PROTOCOL_PARAMS_NFT_TOKEN_NAME;
use crate::context::TxInput;
use crate::data::{Data, DecodeError, FromData, ToData};
use crate::errors::{Result, ValidationError};
use crate::ledger::{
    Address, AssetClass, Credential, MintingPolicyHash, StakingCredential, StakingValidatorHash,
    TokenName, ValidatorHash,
};

/// A validator that can be upgraded: the current version plus, for each
/// retired version, the token whose movement authorizes migrating away.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MigratableScript {
    pub latest: ValidatorHash,
    pub migrations: BTreeMap<ValidatorHash, AssetClass>,
}

impl FromData for MigratableScript {
    fn from_data(data: &Data) -> std::result::Result<Self, DecodeError> {
        let fields = data.record("MigratableScript", 2)?;
        let mut migrations = BTreeMap::new();
        for (hash, asset_class) in fields[1].as_map()? {
            migrations
                .entry(ValidatorHash::from_data(hash)?)
                .or_insert(AssetClass::from_data(asset_class)?);
        }
        Ok(Self {
            latest: ValidatorHash::from_data(&fields[0])?,
            migrations,
        })
    }
}

impl ToData for MigratableScript {
    fn to_data(&self) -> Data {
        Data::constr(
            0,
            vec![
                self.latest.to_data(),
                Data::Map(
                    self.migrations
                        .iter()
                        .map(|(hash, asset_class)| (hash.to_data(), asset_class.to_data()))
                        .collect(),
                ),
            ],
        )
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Registry {
    pub protocol_staking_validator: StakingValidatorHash,
    pub project_validator: MigratableScript,
    pub project_detail_validator: MigratableScript,
    pub project_script_validator: MigratableScript,
    pub open_treasury_validator: MigratableScript,
}

impl FromData for Registry {
    fn from_data(data: &Data) -> std::result::Result<Self, DecodeError> {
        let fields = data.record("Registry", 5)?;
        Ok(Self {
            protocol_staking_validator: StakingValidatorHash::from_data(&fields[0])?,
            project_validator: MigratableScript::from_data(&fields[1])?,
            project_detail_validator: MigratableScript::from_data(&fields[2])?,
            project_script_validator: MigratableScript::from_data(&fields[3])?,
            open_treasury_validator: MigratableScript::from_data(&fields[4])?,
        })
    }
}

impl ToData for Registry {
    fn to_data(&self) -> Data {
        Data::constr(
            0,
            vec![
                self.protocol_staking_validator.to_data(),
                self.project_validator.to_data(),
                self.project_detail_validator.to_data(),
                self.project_script_validator.to_data(),
                self.open_treasury_validator.to_data(),
            ],
        )
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProtocolParamsDatum {
    pub registry: Registry,
    pub governor_address: Address,
    /// Governor's cut of treasury inflows, scaled by `RATIO_MULTIPLIER`.
    pub governor_share_ratio: i128,
    pub protocol_funds_share_ratio: i128,
    /// Price of one cent in lovelace, used to size fee discounts.
    pub discount_cent_price: i128,
    pub project_pledge: i128,
    pub staking_manager: Credential,
}

impl ProtocolParamsDatum {
    /// Address of the current open-treasury validator, staked with the
    /// protocol staking validator.
    pub fn open_treasury_address(&self) -> Address {
        Address::new(
            Credential::Validator(self.registry.open_treasury_validator.latest.clone()),
            Some(StakingCredential::from_script_hash(
                self.registry.protocol_staking_validator.clone(),
            )),
        )
    }

    /// Token whose movement authorizes migrating away from `version`.
    pub fn project_script_migration(&self, version: &ValidatorHash) -> Result<&AssetClass> {
        self.registry
            .project_script_validator
            .migrations
            .get(version)
            .ok_or(ValidationError::MissingMigration)
    }

    /// `discount_cent_price * cents`, checked.
    pub fn discount(&self, cents: i128) -> Result<i128> {
        self.discount_cent_price
            .checked_mul(cents)
            .ok_or(ValidationError::ArithmeticOverflow)
    }
}

impl FromData for ProtocolParamsDatum {
    fn from_data(data: &Data) -> std::result::Result<Self, DecodeError> {
        let fields = data.record("ProtocolParamsDatum", 7)?;
        Ok(Self {
            registry: Registry::from_data(&fields[0])?,
            governor_address: Address::from_data(&fields[1])?,
            governor_share_ratio: fields[2].as_int()?,
            protocol_funds_share_ratio: fields[3].as_int()?,
            discount_cent_price: fields[4].as_int()?,
            project_pledge: fields[5].as_int()?,
            staking_manager: Credential::from_data(&fields[6])?,
        })
    }
}

impl ToData for ProtocolParamsDatum {
    fn to_data(&self) -> Data {
        Data::constr(
            0,
            vec![
                self.registry.to_data(),
                self.governor_address.to_data(),
                Data::Int(self.governor_share_ratio),
                Data::Int(self.protocol_funds_share_ratio),
                Data::Int(self.discount_cent_price),
                Data::Int(self.project_pledge),
                self.staking_manager.to_data(),
            ],
        )
    }
}

/// Asset class of the protocol-params NFT minted under `protocol_nft_mph`.
pub fn protocol_params_nft(protocol_nft_mph: &MintingPolicyHash) -> AssetClass {
    AssetClass::new(
        protocol_nft_mph.clone(),
        TokenName::new(PROTOCOL_PARAMS_NFT_TOKEN_NAME),
    )
}

/// Locate and decode the protocol-params record among `ref_inputs`.
///
/// The first reference input holding the protocol NFT wins; the minting
/// policy guarantees there is only one.
pub fn find_pparams_datum(
    ref_inputs: &[TxInput],
    protocol_nft_mph: &MintingPolicyHash,
) -> Result<ProtocolParamsDatum> {
    let nft = protocol_params_nft(protocol_nft_mph);
    let input = ref_inputs
        .iter()
        .find(|input| input.output.holds_unit(&nft))
        .ok_or(ValidationError::MissingProtocolParams)?;

    let data = input
        .output
        .datum
        .inline()
        .ok_or(ValidationError::InvalidProtocolParamsUtxo)?;

    let pparams = ProtocolParamsDatum::from_data(data)?;
    debug!(
        latest = %pparams.registry.project_script_validator.latest,
        "protocol params located"
    );
    Ok(pparams)
}
