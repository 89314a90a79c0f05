//! Signing request projection.
//!
//! # Responsibilities
//! - Project a transaction onto its sender-independent fields
//! - Serialize them in the `eth_signTransaction` argument schema
//! - Rebuild the unsigned transaction from a request
//!
//! The wire shape is alloy's `TransactionRequest`; this module only pins down
//! which of its fields a signing request carries.

use alloy::consensus::TypedTransaction;
use alloy::primitives::{Address, TxKind};
use alloy::rpc::types::{TransactionInput, TransactionRequest};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Arguments of `eth_signTransaction`.
///
/// Quantities are `0x`-prefixed hex. The payload is sent both as `data` and
/// `input` since signers differ in which one they read.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SigningRequest(TransactionRequest);

impl SigningRequest {
    /// Project `tx` onto the fields the remote signer needs.
    ///
    /// `from` is left unset, contract creation omits `to` and any blob
    /// sidecar is dropped.
    pub fn from_transaction(tx: impl Into<TypedTransaction>) -> Self {
        let mut request = <TransactionRequest as From<TypedTransaction>>::from(tx.into());

        let payload = std::mem::take(&mut request.input).into_input().unwrap_or_default();
        request.input = TransactionInput::both(payload);
        request.from = None;
        request.sidecar = None;
        if request.to == Some(TxKind::Create) {
            request.to = None;
        }

        Self(request)
    }

    /// Attach the signing address.
    pub fn with_from(mut self, from: Address) -> Self {
        self.0.from = Some(from);
        self
    }

    /// The `from` address, if one was attached.
    pub fn sender(&self) -> Option<Address> {
        self.0.from
    }

    /// The underlying alloy request.
    pub fn as_request(&self) -> &TransactionRequest {
        &self.0
    }

    /// Rebuild the unsigned transaction this request describes.
    ///
    /// Fails if `data` and `input` disagree or required fields are missing.
    pub fn to_transaction(&self) -> Result<TypedTransaction> {
        let mut request = self.0.clone();

        let payload = request
            .input
            .clone()
            .try_into_unique_input()
            .map_err(|e| Error::Unsupported(e.to_string()))?;
        request.input = TransactionInput::maybe_input(payload);
        request.to.get_or_insert(TxKind::Create);

        let tx_type = request.transaction_type;
        request.build_typed_tx().map_err(|_| {
            Error::Unsupported(format!(
                "incomplete signing request for transaction type {tx_type:?}"
            ))
        })
    }
}

impl From<TransactionRequest> for SigningRequest {
    fn from(request: TransactionRequest) -> Self {
        Self(request)
    }
}
