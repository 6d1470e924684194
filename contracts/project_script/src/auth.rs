//! Proof of consent from a credential.
//!
//! A key credential consents by signing the transaction. A script
//! credential consents by having one of its UTxOs spent in the same
//! transaction, which delegates the decision to that script.

use crate::context::Tx;
use crate::ledger::Credential;

pub fn is_tx_authorized_by(tx: &Tx, credential: &Credential) -> bool {
    match credential {
        Credential::PubKey(pub_key_hash) => tx.is_signed_by(pub_key_hash),
        Credential::Validator(_) => tx
            .inputs
            .iter()
            .any(|input| &input.output.address.credential == credential),
    }
}
