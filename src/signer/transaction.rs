//! Decoding of signed transactions returned by the remote signer.

use alloy::consensus::TxEnvelope;
use alloy::eips::eip2718::Decodable2718;

use crate::error::{Error, Result};

/// Decode the canonical EIP-2718 encoding of a signed transaction.
///
/// The whole buffer must be consumed; trailing bytes are an error.
pub fn decode_signed_transaction(raw: &[u8]) -> Result<TxEnvelope> {
    if raw.is_empty() {
        return Err(Error::Decode("empty response".to_string()));
    }

    let mut buf = raw;
    let envelope = TxEnvelope::decode_2718(&mut buf).map_err(|e| Error::Decode(e.to_string()))?;

    if !buf.is_empty() {
        return Err(Error::Decode(format!(
            "{} trailing bytes after transaction",
            buf.len()
        )));
    }

    Ok(envelope)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::consensus::{SignableTransaction, Transaction, TxEip1559, TxLegacy};
    use alloy::eips::eip2718::Encodable2718;
    use alloy::primitives::{address, Address, TxKind, U256};
    use alloy::signers::local::PrivateKeySigner;
    use alloy::signers::SignerSync;

    const KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const TO: Address = address!("abc0000000000000000000000000000000000abc");

    fn signed_eip1559() -> (TxEnvelope, Address) {
        let signer: PrivateKeySigner = KEY.parse().unwrap();
        let tx = TxEip1559 {
            chain_id: 1,
            nonce: 5,
            gas_limit: 21_000,
            max_fee_per_gas: 30_000_000_000,
            max_priority_fee_per_gas: 1_000_000_000,
            to: TxKind::Call(TO),
            value: U256::from(1000),
            ..Default::default()
        };
        let sig = signer.sign_hash_sync(&tx.signature_hash()).unwrap();
        (TxEnvelope::from(tx.into_signed(sig)), signer.address())
    }

    #[test]
    fn test_decode_eip1559() {
        let (envelope, from) = signed_eip1559();
        let raw = envelope.encoded_2718();

        let decoded = decode_signed_transaction(&raw).unwrap();
        assert_eq!(decoded.tx_hash(), envelope.tx_hash());
        assert_eq!(decoded.nonce(), 5);
        assert_eq!(decoded.to(), Some(TO));
        assert_eq!(decoded.value(), U256::from(1000));
        assert_eq!(decoded.chain_id(), Some(1));

        let signed = decoded.as_eip1559().unwrap();
        let recovered = signed
            .signature()
            .recover_address_from_prehash(&signed.signature_hash())
            .unwrap();
        assert_eq!(recovered, from);
    }

    #[test]
    fn test_decode_legacy() {
        let signer: PrivateKeySigner = KEY.parse().unwrap();
        let tx = TxLegacy {
            chain_id: Some(1),
            nonce: 0,
            gas_price: 1_000_000_000,
            gas_limit: 21_000,
            to: TxKind::Call(TO),
            value: U256::from(1),
            ..Default::default()
        };
        let sig = signer.sign_hash_sync(&tx.signature_hash()).unwrap();
        let envelope = TxEnvelope::from(tx.into_signed(sig));

        let decoded = decode_signed_transaction(&envelope.encoded_2718()).unwrap();
        assert!(decoded.is_legacy());
        assert_eq!(decoded.tx_hash(), envelope.tx_hash());
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(decode_signed_transaction(&[]), Err(Error::Decode(_))));
    }

    #[test]
    fn test_garbage_input() {
        let err = decode_signed_transaction(&[0x02, 0xde, 0xad, 0xbe, 0xef]).unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let (envelope, _) = signed_eip1559();
        let mut raw = envelope.encoded_2718();
        raw.push(0x00);

        let err = decode_signed_transaction(&raw).unwrap_err();
        assert!(matches!(err, Error::Decode(ref m) if m.contains("trailing")));
    }

    #[test]
    fn test_truncated_input() {
        let (envelope, _) = signed_eip1559();
        let raw = envelope.encoded_2718();
        let err = decode_signed_transaction(&raw[..raw.len() - 4]).unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }
}
