use crate::context::{OutputDatum, Tx};
use crate::data::Data;
use crate::errors::ValidationError;
use crate::invariants::{assert_governor_split, assert_labeled, assert_rejected};
use crate::ledger::Value;
use crate::test_fixtures::*;
use crate::types::{OpenTreasuryDatum, ProjectStatus, UserTag};
use crate::Redeemer;

/// 25 ada record + 10 ada rewards + 2 ada deposit - 100 * 50 discount.
const TREASURY_ADA: i128 = 36_995_000;
const WITHDRAWN: i128 = 10_000_000;

fn setup(status: ProjectStatus) -> Tx {
    with_withdrawal(base_tx(status), WITHDRAWN)
}

fn delisted_with_payout(ada: i128) -> Tx {
    with_output(
        setup(ProjectStatus::Delisted),
        treasury_output(Value::lovelace(ada), script_delisted_tag()),
    )
}

#[test]
fn test_delist_by_staking_manager_pays_treasury() {
    let tx = signed_by(delisted_with_payout(TREASURY_ADA), staking_manager_key());
    assert_eq!(evaluate(tx, Redeemer::Delist), Ok(true));
}

#[test]
fn test_delist_payout_datum_splits_for_governor() {
    let tx = delisted_with_payout(TREASURY_ADA);
    let data = tx.outputs[0].datum.inline().cloned().unwrap();
    let datum: OpenTreasuryDatum = crate::data::FromData::from_data(&data).unwrap();
    assert_eq!(datum.governor_ada, 3_699_500);
    assert_governor_split(&datum, TREASURY_ADA, GOVERNOR_SHARE_RATIO);
}

#[test]
fn test_delist_by_governor() {
    let tx = signed_by(delisted_with_payout(TREASURY_ADA), governor_key());
    assert_eq!(evaluate(tx, Redeemer::Delist), Ok(true));
}

#[test]
fn test_delist_accepts_overpayment() {
    let tx = signed_by(delisted_with_payout(40_000_000), staking_manager_key());
    assert_eq!(evaluate(tx, Redeemer::Delist), Ok(true));
}

#[test]
fn test_delist_by_owner_only_is_rejected() {
    let tx = signed_by(delisted_with_payout(TREASURY_ADA), owner_key());
    assert_eq!(evaluate(tx, Redeemer::Delist), Ok(false));
}

#[test]
fn test_delist_unsigned_is_rejected() {
    let tx = delisted_with_payout(TREASURY_ADA);
    assert_eq!(evaluate(tx, Redeemer::Delist), Ok(false));
}

#[test]
fn test_delist_requires_delisted_project() {
    for status in [
        ProjectStatus::Active,
        ProjectStatus::PreDelisted { pending_until: 10 },
        ProjectStatus::Closed,
    ] {
        let tx = with_output(
            signed_by(setup(status), staking_manager_key()),
            treasury_output(Value::lovelace(TREASURY_ADA), script_delisted_tag()),
        );
        assert_eq!(evaluate(tx, Redeemer::Delist), Ok(false));
    }
}

#[test]
fn test_delist_payout_one_lovelace_short() {
    let tx = signed_by(delisted_with_payout(TREASURY_ADA - 1), staking_manager_key());
    assert_eq!(evaluate(tx, Redeemer::Delist), Ok(false));
}

#[test]
fn test_delist_governor_ada_off_by_one() {
    for governor_ada in [3_699_499, 3_699_501] {
        let tx = with_output(
            signed_by(setup(ProjectStatus::Delisted), staking_manager_key()),
            treasury_output_with_governor_ada(
                Value::lovelace(TREASURY_ADA),
                script_delisted_tag(),
                governor_ada,
            ),
        );
        assert_eq!(evaluate(tx, Redeemer::Delist), Ok(false));
    }
}

#[test]
fn test_delist_payout_with_wrong_tag() {
    let wrong_project = UserTag::TagProjectScriptDelisted {
        project_id: crate::types::ProjectId::new(b"other".to_vec()),
        staking_validator: staking_validator(),
    };
    for tag in [script_closed_tag(), delayed_rewards_tag(), wrong_project] {
        let tx = with_output(
            signed_by(setup(ProjectStatus::Delisted), staking_manager_key()),
            treasury_output(Value::lovelace(TREASURY_ADA), tag),
        );
        assert_eq!(evaluate(tx, Redeemer::Delist), Ok(false));
    }
}

#[test]
fn test_delist_payout_at_unstaked_treasury_address() {
    let mut output = treasury_output(Value::lovelace(TREASURY_ADA), script_delisted_tag());
    output.address.staking_credential = None;
    let tx = with_output(
        signed_by(setup(ProjectStatus::Delisted), staking_manager_key()),
        output,
    );
    assert_eq!(evaluate(tx, Redeemer::Delist), Ok(false));
}

#[test]
fn test_delist_payout_with_hashed_datum() {
    let mut output = treasury_output(Value::lovelace(TREASURY_ADA), script_delisted_tag());
    output.datum = OutputDatum::Hash(crate::ledger::DatumHash::new(vec![0x42; 32]));
    let tx = with_output(
        signed_by(setup(ProjectStatus::Delisted), staking_manager_key()),
        output,
    );
    assert_eq!(evaluate(tx, Redeemer::Delist), Ok(false));
}

#[test]
fn test_delist_payout_with_undecodable_datum_aborts() {
    let mut output = treasury_output(Value::lovelace(TREASURY_ADA), script_delisted_tag());
    output.datum = OutputDatum::Inline(Data::Int(7));
    let tx = with_output(
        signed_by(setup(ProjectStatus::Delisted), staking_manager_key()),
        output,
    );
    assert!(matches!(
        evaluate(tx, Redeemer::Delist),
        Err(ValidationError::Decode(_))
    ));
}

#[test]
fn test_delist_without_withdrawal_aborts() {
    let tx = with_output(
        signed_by(base_tx(ProjectStatus::Delisted), staking_manager_key()),
        treasury_output(Value::lovelace(TREASURY_ADA), script_delisted_tag()),
    );
    assert_labeled(
        &evaluate(tx, Redeemer::Delist),
        ValidationError::MissingStakeWithdrawals,
        "Missing stake withdrawals",
    );
}

#[test]
fn test_delist_counts_zero_withdrawal() {
    // 25 ada + 0 + 2 ada - 5_000
    let tx = with_output(
        signed_by(
            with_withdrawal(base_tx(ProjectStatus::Delisted), 0),
            staking_manager_key(),
        ),
        treasury_output(Value::lovelace(26_995_000), script_delisted_tag()),
    );
    assert_eq!(evaluate(tx, Redeemer::Delist), Ok(true));
}

#[test]
fn test_delist_picks_any_qualifying_output() {
    let tx = with_output(
        with_output(
            signed_by(setup(ProjectStatus::Delisted), staking_manager_key()),
            owner_refund(5_000_000, script_closed_tag()),
        ),
        treasury_output(Value::lovelace(TREASURY_ADA), script_delisted_tag()),
    );
    assert_eq!(evaluate(tx, Redeemer::Delist), Ok(true));
    assert_rejected(&evaluate(
        signed_by(setup(ProjectStatus::Delisted), staking_manager_key()),
        Redeemer::Delist,
    ));
}
