// Path: crates/test_utils/src/chain.rs
//! An in-memory wallet and sale contract.
//!
//! `MockChain` is a cheap handle; clones share state. It implements every
//! seam in `mint-api`, so a controller can be driven end to end without a
//! network. State changes from writes apply when the pending transaction
//! is confirmed, the way they would on block inclusion.

use crate::env::ManualClock;
use async_trait::async_trait;
use mint_api::{
    Clock, PendingTransaction, SaleReader, SaleWriter, WalletConnector, WalletProvider,
};
use mint_types::{
    app::{ChainId, TxReceipt},
    error::ChainError,
    Address, TxHash, U256,
};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

/// Length of the presale window the reference contract opens.
pub const PRESALE_DURATION_SECS: u64 = 5 * 60;

#[derive(Debug)]
struct ChainState {
    chain_id: ChainId,
    owner: Address,
    account: Address,
    authorized: bool,
    reject_authorization: bool,
    started: bool,
    presale_end: U256,
    token_ids: U256,
    failing_reads: HashSet<&'static str>,
    fail_submit: bool,
    fail_confirm: bool,
    revert_next: bool,
    hold_confirmations: bool,
    read_delay: Option<Duration>,
    tx_nonce: u64,
}

#[derive(Debug)]
struct Inner {
    state: Mutex<ChainState>,
    calls: Mutex<HashMap<&'static str, usize>>,
    confirmations: Semaphore,
    clock: Arc<ManualClock>,
}

/// A shared handle to the in-memory chain.
#[derive(Debug, Clone)]
pub struct MockChain {
    inner: Arc<Inner>,
}

impl MockChain {
    /// A chain with id `chain_id` whose sale contract is owned by `owner`,
    /// with `account` as the wallet's account.
    pub fn new(chain_id: u64, owner: Address, account: Address) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(ChainState {
                    chain_id: ChainId(chain_id),
                    owner,
                    account,
                    authorized: false,
                    reject_authorization: false,
                    started: false,
                    presale_end: U256::ZERO,
                    token_ids: U256::ZERO,
                    failing_reads: HashSet::new(),
                    fail_submit: false,
                    fail_confirm: false,
                    revert_next: false,
                    hold_confirmations: false,
                    read_delay: None,
                    tx_nonce: 0,
                }),
                calls: Mutex::new(HashMap::new()),
                confirmations: Semaphore::new(0),
                clock: Arc::new(ManualClock::new(1_700_000_000)),
            }),
        }
    }

    /// The clock the contract uses for `block.timestamp`.
    pub fn clock(&self) -> Arc<ManualClock> {
        self.inner.clock.clone()
    }

    /// How many times `method` was called, including failed calls.
    pub fn calls(&self, method: &str) -> usize {
        self.inner.calls.lock().get(method).copied().unwrap_or(0)
    }

    fn record(&self, method: &'static str) {
        *self.inner.calls.lock().entry(method).or_insert(0) += 1;
    }

    pub fn set_chain_id(&self, chain_id: u64) {
        self.inner.state.lock().chain_id = ChainId(chain_id);
    }

    pub fn set_started(&self, started: bool) {
        self.inner.state.lock().started = started;
    }

    pub fn set_presale_end(&self, end: U256) {
        self.inner.state.lock().presale_end = end;
    }

    pub fn set_token_ids(&self, minted: u64) {
        self.inner.state.lock().token_ids = U256::from(minted);
    }

    pub fn token_ids(&self) -> U256 {
        self.inner.state.lock().token_ids
    }

    pub fn is_started(&self) -> bool {
        self.inner.state.lock().started
    }

    /// Makes the wallet reject its next authorization prompts.
    pub fn reject_authorization(&self, reject: bool) {
        self.inner.state.lock().reject_authorization = reject;
    }

    /// Revokes the wallet session so the next access prompts again.
    pub fn revoke_authorization(&self) {
        self.inner.state.lock().authorized = false;
    }

    /// Makes every read fail (or succeed again).
    pub fn fail_reads(&self, fail: bool) {
        let mut state = self.inner.state.lock();
        if fail {
            state.failing_reads.extend([
                "presaleStarted",
                "presaleEnded",
                "owner",
                "tokenIds",
            ]);
        } else {
            state.failing_reads.clear();
        }
    }

    /// Makes a single read method fail.
    pub fn fail_read(&self, method: &'static str) {
        self.inner.state.lock().failing_reads.insert(method);
    }

    pub fn fail_submit(&self, fail: bool) {
        self.inner.state.lock().fail_submit = fail;
    }

    pub fn fail_confirm(&self, fail: bool) {
        self.inner.state.lock().fail_confirm = fail;
    }

    /// The next confirmed transaction reports a failed receipt.
    pub fn revert_next(&self) {
        self.inner.state.lock().revert_next = true;
    }

    /// While held, confirmations wait for `release_confirmation`.
    pub fn hold_confirmations(&self, hold: bool) {
        self.inner.state.lock().hold_confirmations = hold;
    }

    /// Lets one held confirmation proceed.
    pub fn release_confirmation(&self) {
        self.inner.confirmations.add_permits(1);
    }

    /// Every read sleeps this long before answering.
    pub fn set_read_delay(&self, delay: Duration) {
        self.inner.state.lock().read_delay = Some(delay);
    }

    fn prompt(&self) -> Result<Address, ChainError> {
        let mut state = self.inner.state.lock();
        if state.authorized {
            return Ok(state.account);
        }
        self.record("prompt");
        if state.reject_authorization {
            return Err(ChainError::Rejected);
        }
        state.authorized = true;
        Ok(state.account)
    }

    async fn read<T>(
        &self,
        method: &'static str,
        f: impl FnOnce(&ChainState) -> T,
    ) -> Result<T, ChainError> {
        self.record(method);
        let delay = self.inner.state.lock().read_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let state = self.inner.state.lock();
        if state.failing_reads.contains(method) {
            return Err(ChainError::Transport(format!("{} timed out", method)));
        }
        Ok(f(&state))
    }

    fn submit(
        &self,
        method: &'static str,
        effect: Effect,
    ) -> Result<Box<dyn PendingTransaction>, ChainError> {
        self.record(method);
        let mut state = self.inner.state.lock();
        if !state.authorized {
            return Err(ChainError::NoAccount);
        }
        if state.fail_submit {
            return Err(ChainError::Transport(format!("{} submission dropped", method)));
        }
        state.tx_nonce += 1;
        let tx_hash = TxHash::left_padding_from(&state.tx_nonce.to_be_bytes());
        Ok(Box::new(MockPendingTx {
            chain: self.clone(),
            tx_hash,
            effect,
        }))
    }
}

#[derive(Debug, Clone, Copy)]
enum Effect {
    StartPresale { from: Address },
    Mint { presale: bool },
}

struct MockPendingTx {
    chain: MockChain,
    tx_hash: TxHash,
    effect: Effect,
}

#[async_trait]
impl PendingTransaction for MockPendingTx {
    fn tx_hash(&self) -> TxHash {
        self.tx_hash
    }

    async fn wait(self: Box<Self>) -> Result<TxReceipt, ChainError> {
        let hold = self.chain.inner.state.lock().hold_confirmations;
        if hold {
            let permit = self
                .chain
                .inner
                .confirmations
                .acquire()
                .await
                .map_err(|e| ChainError::Confirmation(e.to_string()))?;
            permit.forget();
        }
        let now = self.chain.inner.clock.now_unix_secs();
        let mut state = self.chain.inner.state.lock();
        if state.fail_confirm {
            return Err(ChainError::Confirmation("dropped from mempool".into()));
        }
        let mut success = !std::mem::take(&mut state.revert_next);
        if success {
            match self.effect {
                Effect::StartPresale { from } => {
                    if from != state.owner || state.started {
                        success = false;
                    } else {
                        state.started = true;
                        state.presale_end = U256::from(now + PRESALE_DURATION_SECS);
                    }
                }
                Effect::Mint { presale } => {
                    let presale_open = state.presale_end > U256::from(now);
                    if !state.started || presale != presale_open {
                        success = false;
                    } else {
                        state.token_ids += U256::from(1u64);
                    }
                }
            }
        }
        Ok(TxReceipt {
            tx_hash: self.tx_hash,
            block_number: Some(state.tx_nonce),
            success,
        })
    }
}

#[async_trait]
impl WalletConnector for MockChain {
    async fn connect(&self) -> Result<Arc<dyn WalletProvider>, ChainError> {
        self.record("connect");
        self.prompt()?;
        Ok(Arc::new(self.clone()))
    }
}

#[async_trait]
impl WalletProvider for MockChain {
    async fn chain_id(&self) -> Result<ChainId, ChainError> {
        self.record("chainId");
        Ok(self.inner.state.lock().chain_id)
    }

    async fn authorized_account(&self) -> Result<Address, ChainError> {
        self.prompt()
    }

    fn sale_reader(&self, _contract: Address) -> Arc<dyn SaleReader> {
        Arc::new(self.clone())
    }

    fn sale_writer(&self, _contract: Address, account: Address) -> Arc<dyn SaleWriter> {
        Arc::new(MockWriter {
            chain: self.clone(),
            from: account,
        })
    }
}

#[async_trait]
impl SaleReader for MockChain {
    async fn presale_started(&self) -> Result<bool, ChainError> {
        self.read("presaleStarted", |s| s.started).await
    }

    async fn presale_ended(&self) -> Result<U256, ChainError> {
        self.read("presaleEnded", |s| s.presale_end).await
    }

    async fn owner(&self) -> Result<Address, ChainError> {
        self.read("owner", |s| s.owner).await
    }

    async fn token_ids(&self) -> Result<U256, ChainError> {
        self.read("tokenIds", |s| s.token_ids).await
    }
}

struct MockWriter {
    chain: MockChain,
    from: Address,
}

#[async_trait]
impl SaleWriter for MockWriter {
    async fn start_presale(&self) -> Result<Box<dyn PendingTransaction>, ChainError> {
        self.chain
            .submit("startPresale", Effect::StartPresale { from: self.from })
    }

    async fn presale_mint(&self, _value: U256) -> Result<Box<dyn PendingTransaction>, ChainError> {
        self.chain.submit(
            "presaleMint",
            Effect::Mint { presale: true },
        )
    }

    async fn mint(&self, _value: U256) -> Result<Box<dyn PendingTransaction>, ChainError> {
        self.chain.submit(
            "mint",
            Effect::Mint { presale: false },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> Address {
        Address::repeat_byte(0x11)
    }

    #[tokio::test]
    async fn start_presale_applies_on_confirmation() {
        let chain = MockChain::new(4, owner(), owner());
        chain.prompt().unwrap();
        let writer = chain.sale_writer(Address::ZERO, owner());
        let pending = writer.start_presale().await.unwrap();
        assert!(!chain.is_started());
        let receipt = pending.wait().await.unwrap();
        assert!(receipt.success);
        assert!(chain.is_started());
    }

    #[tokio::test]
    async fn non_owner_start_presale_reverts() {
        let chain = MockChain::new(4, owner(), Address::repeat_byte(0x22));
        chain.prompt().unwrap();
        let writer = chain.sale_writer(Address::ZERO, Address::repeat_byte(0x22));
        let receipt = writer.start_presale().await.unwrap().wait().await.unwrap();
        assert!(!receipt.success);
        assert!(!chain.is_started());
    }

    #[tokio::test]
    async fn rejected_prompt_is_reported_and_counted() {
        let chain = MockChain::new(4, owner(), owner());
        chain.reject_authorization(true);
        assert_eq!(chain.connect().await.err(), Some(ChainError::Rejected));
        assert_eq!(chain.calls("prompt"), 1);
    }
}
