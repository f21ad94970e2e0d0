// Path: crates/client/src/reads.rs
//! Typed read accessors for the sale contract.
//!
//! Every query is independent and idempotent. A failure is returned as a
//! `ReadError` for the caller to swallow; none of them is fatal.

use crate::resolver::ChainConnection;
use mint_api::SaleReader;
use mint_types::{
    error::{ChainError, ReadError},
    Address, U256,
};
use std::future::Future;
use std::sync::Arc;

pub struct SaleReads {
    reader: Arc<dyn SaleReader>,
}

impl SaleReads {
    pub fn new(conn: &ChainConnection, contract: Address) -> Self {
        Self {
            reader: conn.provider().sale_reader(contract),
        }
    }

    pub async fn presale_started(&self) -> Result<bool, ReadError> {
        call("presaleStarted", self.reader.presale_started()).await
    }

    /// The presale end as seconds since epoch, unbounded.
    pub async fn presale_end(&self) -> Result<U256, ReadError> {
        call("presaleEnded", self.reader.presale_ended()).await
    }

    pub async fn owner(&self) -> Result<Address, ReadError> {
        call("owner", self.reader.owner()).await
    }

    pub async fn minted(&self) -> Result<U256, ReadError> {
        call("tokenIds", self.reader.token_ids()).await
    }
}

async fn call<T, F>(method: &'static str, fut: F) -> Result<T, ReadError>
where
    F: Future<Output = Result<T, ChainError>>,
{
    fut.await
        .map_err(|source| ReadError::Call { method, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConnectionResolver;
    use mint_test_utils::{assert_err, MockChain};
    use mint_types::app::ChainId;

    async fn reads(chain: &MockChain) -> SaleReads {
        let resolver = ConnectionResolver::new(
            Arc::new(chain.clone()),
            ChainId(4),
            "Rinkeby",
            Arc::new(mint_test_utils::RecordingNotifier::default()),
        );
        let conn = resolver.resolve(false).await.unwrap();
        SaleReads::new(&conn, Address::ZERO)
    }

    #[tokio::test]
    async fn reads_report_contract_state() {
        let owner = Address::repeat_byte(0x01);
        let chain = MockChain::new(4, owner, owner);
        chain.set_started(true);
        chain.set_presale_end(U256::from(1000u64));
        chain.set_token_ids(7);
        let r = reads(&chain).await;
        assert!(r.presale_started().await.unwrap());
        assert_eq!(r.presale_end().await.unwrap(), U256::from(1000u64));
        assert_eq!(r.owner().await.unwrap(), owner);
        assert_eq!(r.minted().await.unwrap(), U256::from(7u64));
    }

    #[tokio::test]
    async fn failures_name_the_method() {
        let chain = MockChain::new(4, Address::ZERO, Address::ZERO);
        chain.fail_read("tokenIds");
        let r = reads(&chain).await;
        assert!(r.presale_started().await.is_ok());
        let err = assert_err!(r.minted().await);
        assert!(matches!(err, ReadError::Call { method: "tokenIds", .. }));
    }

    #[tokio::test]
    async fn repeated_reads_are_stable() {
        let chain = MockChain::new(4, Address::ZERO, Address::ZERO);
        chain.set_started(true);
        let r = reads(&chain).await;
        let first = r.presale_started().await.unwrap();
        let second = r.presale_started().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(chain.calls("startPresale"), 0);
    }
}
