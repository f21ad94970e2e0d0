// Path: crates/client/src/writes.rs
//! Signer-bound write operations on the sale contract.
//!
//! Each operation submits, then waits for block inclusion, and only reports
//! success for a mined transaction whose receipt shows success. The caller
//! owns the busy flag around the whole call.

use crate::resolver::SigningConnection;
use mint_api::{PendingTransaction, SaleWriter};
use mint_types::{
    app::{TxReceipt, WriteKind},
    error::{ChainError, WriteError},
    Address, U256,
};
use std::sync::Arc;

pub struct SaleWrites {
    writer: Arc<dyn SaleWriter>,
    account: Address,
    unit_price: U256,
}

impl SaleWrites {
    /// `unit_price` is sent, in wei, with each mint.
    pub fn new(conn: &SigningConnection, contract: Address, unit_price: U256) -> Self {
        Self {
            writer: conn.provider().sale_writer(contract, conn.account()),
            account: conn.account(),
            unit_price,
        }
    }

    pub fn account(&self) -> Address {
        self.account
    }

    pub async fn start_presale(&self) -> Result<TxReceipt, WriteError> {
        self.execute(WriteKind::StartPresale).await
    }

    pub async fn presale_mint(&self) -> Result<TxReceipt, WriteError> {
        self.execute(WriteKind::PresaleMint).await
    }

    pub async fn public_mint(&self) -> Result<TxReceipt, WriteError> {
        self.execute(WriteKind::PublicMint).await
    }

    pub async fn execute(&self, kind: WriteKind) -> Result<TxReceipt, WriteError> {
        let method = kind.method();
        let pending = self
            .submit(kind)
            .await
            .map_err(|source| WriteError::Submit { method, source })?;
        let tx_hash = pending.tx_hash();
        tracing::info!(
            target: "writes",
            event = "submitted",
            method,
            account = %self.account,
            tx_hash = %tx_hash
        );

        let receipt = pending
            .wait()
            .await
            .map_err(|source| WriteError::Confirm { method, source })?;
        if !receipt.success {
            return Err(WriteError::Reverted { method, tx_hash });
        }
        tracing::info!(
            target: "writes",
            event = "confirmed",
            method,
            tx_hash = %tx_hash,
            block = ?receipt.block_number
        );
        Ok(receipt)
    }

    async fn submit(&self, kind: WriteKind) -> Result<Box<dyn PendingTransaction>, ChainError> {
        match kind {
            WriteKind::StartPresale => self.writer.start_presale().await,
            WriteKind::PresaleMint => self.writer.presale_mint(self.unit_price).await,
            WriteKind::PublicMint => self.writer.mint(self.unit_price).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConnectionResolver;
    use mint_test_utils::{assert_err, assert_ok, MockChain, RecordingNotifier};
    use mint_types::app::ChainId;

    async fn writes(chain: &MockChain) -> SaleWrites {
        let resolver = ConnectionResolver::new(
            Arc::new(chain.clone()),
            ChainId(4),
            "Rinkeby",
            Arc::new(RecordingNotifier::default()),
        );
        let conn = resolver.resolve(true).await.unwrap().into_signing().unwrap();
        SaleWrites::new(&conn, Address::ZERO, U256::from(10u64).pow(U256::from(16u64)))
    }

    #[tokio::test]
    async fn start_presale_confirms_before_returning() {
        let owner = Address::repeat_byte(0x01);
        let chain = MockChain::new(4, owner, owner);
        let w = writes(&chain).await;
        let receipt = assert_ok!(w.start_presale().await);
        assert!(receipt.success);
        assert!(chain.is_started());
    }

    #[tokio::test]
    async fn submission_failure_is_reported_as_submit() {
        let chain = MockChain::new(4, Address::ZERO, Address::ZERO);
        chain.fail_submit(true);
        let w = writes(&chain).await;
        let err = assert_err!(w.presale_mint().await);
        assert!(matches!(err, WriteError::Submit { method: "presaleMint", .. }));
    }

    #[tokio::test]
    async fn confirmation_failure_is_reported_as_confirm() {
        let owner = Address::repeat_byte(0x01);
        let chain = MockChain::new(4, owner, owner);
        chain.fail_confirm(true);
        let w = writes(&chain).await;
        let err = assert_err!(w.start_presale().await);
        assert!(matches!(err, WriteError::Confirm { method: "startPresale", .. }));
        assert!(!chain.is_started());
    }

    #[tokio::test]
    async fn failed_receipt_is_reported_as_reverted() {
        let chain = MockChain::new(4, Address::ZERO, Address::repeat_byte(0x02));
        let w = writes(&chain).await;
        // Public mint before the sale started is rejected by the contract.
        let err = assert_err!(w.public_mint().await);
        assert!(matches!(err, WriteError::Reverted { method: "mint", .. }));
        assert_eq!(chain.token_ids(), U256::ZERO);
    }
}
