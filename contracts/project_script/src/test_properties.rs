use proptest::prelude::*;

use crate::errors::ValidationError;
use crate::invariants::assert_governor_split;
use crate::ledger::{ScriptHash, Value};
use crate::test_fixtures::*;
use crate::treasury::{governor_share, is_treasury_payout, PayoutAmount, PayoutTag};
use crate::types::{OpenTreasuryDatum, ProjectStatus};
use crate::Redeemer;

fn foreign_version() -> impl Strategy<Value = ScriptHash> {
    any::<u8>()
        .prop_filter("must differ from the latest version", |byte| *byte != 0x01)
        .prop_map(|byte| ScriptHash::new(vec![byte; 28]))
}

proptest! {
    /// Close and Delist abort on any version other than the latest.
    #[test]
    fn non_latest_version_always_aborts(version in foreign_version(), delist in any::<bool>()) {
        let mut tx = signed_by(with_withdrawal(base_tx(ProjectStatus::Delisted), 0), staking_manager_key());
        tx.inputs[0] = own_input(version);
        let redeemer = if delist { Redeemer::Delist } else { Redeemer::Close };
        prop_assert_eq!(evaluate(tx, redeemer), Err(ValidationError::WrongScriptVersion));
    }

    /// A non-negative entry under the auth-token policy is never a burn.
    #[test]
    fn non_negative_auth_token_amount_aborts(amount in 0i128..=i64::MAX as i128) {
        let mut tx = signed_by(with_withdrawal(base_tx(ProjectStatus::Closed), 0), owner_key());
        tx.minted = Value::asset(&params().project_script_at(), amount);
        prop_assert_eq!(evaluate(tx, Redeemer::Close), Err(ValidationError::IncorrectBurnAmount));
    }

    /// Only the floored governor share qualifies a treasury payout.
    #[test]
    fn governor_ada_must_be_the_floored_share(
        ada in 0i128..=45_000_000_000_000_000,
        ratio in 0i128..=1_000_000,
    ) {
        let mut pparams = pparams();
        pparams.governor_share_ratio = ratio;
        let staking = staking_validator();
        let project = project_id();
        let tag = PayoutTag::ScriptDelisted { project_id: &project, staking_validator: &staking };
        let amount = PayoutAmount::AtLeast(0);

        let governor_ada = governor_share(ada, ratio).unwrap();
        assert_governor_split(
            &OpenTreasuryDatum { governor_ada, tag: script_delisted_tag() },
            ada,
            ratio,
        );

        let exact = treasury_output_with_governor_ada(Value::lovelace(ada), script_delisted_tag(), governor_ada);
        prop_assert_eq!(is_treasury_payout(&exact, &pparams, amount, tag), Ok(true));

        for off_by_one in [governor_ada - 1, governor_ada + 1] {
            let output = treasury_output_with_governor_ada(Value::lovelace(ada), script_delisted_tag(), off_by_one);
            prop_assert_eq!(is_treasury_payout(&output, &pparams, amount, tag), Ok(false));
        }
    }

    /// Migration depends only on the migration token moving.
    #[test]
    fn migration_ignores_everything_but_the_token(
        minted in -1_000i128..=1_000,
        signed in any::<bool>(),
        withdrawal in proptest::option::of(0i128..=100_000_000),
    ) {
        let mut tx = base_tx(ProjectStatus::Active);
        tx.inputs[0] = own_input(retired_version());
        tx.minted = Value::asset(&migration_token(), minted);
        if signed {
            tx = signed_by(tx, stranger_key());
        }
        if let Some(amount) = withdrawal {
            tx = with_withdrawal(tx, amount);
        }
        prop_assert_eq!(evaluate(tx, Redeemer::Migrate), Ok(minted != 0));
    }

    /// The owner closes a Closed record however the rewards were routed.
    #[test]
    fn owner_close_ignores_rewards_routing(withdrawal in 2_000_000i128..=1_000_000_000_000) {
        let tx = signed_by(with_withdrawal(base_tx(ProjectStatus::Closed), withdrawal), owner_key());
        prop_assert_eq!(evaluate(tx, Redeemer::Close), Ok(true));
    }

    /// Delist approves exactly when the payout reaches the computed threshold.
    #[test]
    fn delist_threshold(payout in 30_000_000i128..=40_000_000, withdrawal in 0i128..=5_000_000) {
        // record ada + rewards + deposit - 100 * 50
        let threshold = OWN_INPUT_ADA + withdrawal + STAKE_KEY_DEPOSIT - DISCOUNT_CENT_PRICE * 50;
        let tx = with_output(
            signed_by(with_withdrawal(base_tx(ProjectStatus::Delisted), withdrawal), governor_key()),
            treasury_output(Value::lovelace(payout), script_delisted_tag()),
        );
        prop_assert_eq!(evaluate(tx, Redeemer::Delist), Ok(payout >= threshold));
    }
}
