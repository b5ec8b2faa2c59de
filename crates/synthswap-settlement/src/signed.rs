//! Signed transactions: an instruction, the accounts it declares, a signer
//! nonce and an ed25519 signature over all of it.

use ed25519_dalek::{Signature, Signer, SigningKey};
use serde::{Deserialize, Serialize};
use synthswap_types::{Address, Instruction, Result, SynthswapError};

/// Domain prefix of the signing payload.
const SIGNING_DOMAIN: &[u8] = b"synthswap:tx:v1:";

/// Everything the signer commits to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionMessage {
    pub signer: Address,
    /// Distinguishes otherwise identical messages from the same signer.
    pub nonce: u64,
    /// Every address the instruction may read or write.
    pub accounts: Vec<Address>,
    pub instruction: Instruction,
}

impl TransactionMessage {
    /// Canonical signing payload: `"synthswap:tx:v1:" || json(message)`.
    pub fn signing_payload(&self) -> Result<Vec<u8>> {
        let body = serde_json::to_vec(self)?;
        let mut payload = Vec::with_capacity(SIGNING_DOMAIN.len() + body.len());
        payload.extend_from_slice(SIGNING_DOMAIN);
        payload.extend_from_slice(&body);
        Ok(payload)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    pub message: TransactionMessage,
    /// Ed25519 signature over [`TransactionMessage::signing_payload`].
    pub signature: Vec<u8>,
}

impl SignedTransaction {
    /// Sign `message` with `key`.
    ///
    /// # Errors
    /// Returns `Unauthorized` if `key` does not belong to `message.signer`.
    pub fn sign(message: TransactionMessage, key: &SigningKey) -> Result<Self> {
        let owner = Address::from_verifying_key(&key.verifying_key());
        if owner != message.signer {
            return Err(SynthswapError::Unauthorized { signer: owner });
        }
        let signature = key.sign(&message.signing_payload()?);
        Ok(Self {
            message,
            signature: signature.to_bytes().to_vec(),
        })
    }

    /// Check the signature against the declared signer and return it.
    ///
    /// # Errors
    /// Returns `SignatureInvalid` for a malformed signature, a signer that is
    /// not a public key, or a signature that does not verify.
    pub fn verify(&self) -> Result<Signature> {
        let signature =
            Signature::from_slice(&self.signature).map_err(|_| SynthswapError::SignatureInvalid)?;
        let key = self.message.signer.to_verifying_key()?;
        key.verify_strict(&self.message.signing_payload()?, &signature)
            .map_err(|_| SynthswapError::SignatureInvalid)?;
        Ok(signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use synthswap_types::fixtures::{principal, signing_key};

    fn message(signer: Address) -> TransactionMessage {
        TransactionMessage {
            signer,
            nonce: 7,
            accounts: vec![Address([3u8; 32])],
            instruction: Instruction::DepositVaultFunds { amount: 10 },
        }
    }

    #[test]
    fn sign_then_verify() {
        let tx = SignedTransaction::sign(message(principal(1)), &signing_key(1)).unwrap();
        assert!(tx.verify().is_ok());
    }

    #[test]
    fn wrong_key_refused_at_signing() {
        let err = SignedTransaction::sign(message(principal(1)), &signing_key(2)).unwrap_err();
        assert!(matches!(err, SynthswapError::Unauthorized { .. }));
    }

    #[test]
    fn tampered_message_fails_verification() {
        let mut tx = SignedTransaction::sign(message(principal(1)), &signing_key(1)).unwrap();
        tx.message.instruction = Instruction::WithdrawVaultFunds { amount: 10 };
        assert_eq!(tx.verify().unwrap_err(), SynthswapError::SignatureInvalid);
    }

    #[test]
    fn truncated_signature_rejected() {
        let mut tx = SignedTransaction::sign(message(principal(1)), &signing_key(1)).unwrap();
        tx.signature.truncate(10);
        assert_eq!(tx.verify().unwrap_err(), SynthswapError::SignatureInvalid);
    }

    #[test]
    fn json_roundtrip_still_verifies() {
        let tx = SignedTransaction::sign(message(principal(4)), &signing_key(4)).unwrap();
        let json = serde_json::to_string(&tx).unwrap();
        let back: SignedTransaction = serde_json::from_str(&json).unwrap();
        assert!(back.verify().is_ok());
    }
}
