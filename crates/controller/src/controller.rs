// Path: crates/controller/src/controller.rs
//! The session controller: user actions in, session updates out.

use crate::machine::presale_elapsed;
use crate::poller::{PollStep, PollTarget, Poller, PollerHandle};
use crate::session::Session;
use async_trait::async_trait;
use mint_api::{Clock, Notifier, WalletConnector};
use mint_client::{ConnectionResolver, SaleReads, SaleWrites};
use mint_telemetry::{error_metrics, sale_metrics};
use mint_types::{
    app::{AccountRole, Notice, SalePhase, TxReceipt, WriteKind},
    config::SaleConfig,
    error::{ConfigError, ErrorCode, ReadError, ResolveError, WriteError},
    view::SessionView,
    Address, U256,
};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::watch;

pub struct SaleController {
    config: SaleConfig,
    contract: Address,
    unit_price: U256,
    resolver: ConnectionResolver,
    session: Session,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    poller: Mutex<Option<PollerHandle>>,
}

impl std::fmt::Debug for SaleController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SaleController")
            .field("contract", &self.contract)
            .field("expected_chain_id", &self.resolver.expected_chain_id())
            .field("phase", &self.session.phase())
            .finish_non_exhaustive()
    }
}

impl SaleController {
    pub fn new(
        config: SaleConfig,
        connector: Arc<dyn WalletConnector>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Result<Arc<Self>, ConfigError> {
        config.validate()?;
        let contract = config.contract()?;
        let unit_price = config.unit_price_wei()?;
        let resolver = ConnectionResolver::new(
            connector,
            config.expected_chain_id,
            config.network_name.clone(),
            notifier.clone(),
        );
        let session = Session::new(config.collection_size);
        Ok(Arc::new(Self {
            config,
            contract,
            unit_price,
            resolver,
            session,
            notifier,
            clock,
            poller: Mutex::new(None),
        }))
    }

    pub fn config(&self) -> &SaleConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn subscribe(&self) -> watch::Receiver<crate::session::SessionState> {
        self.session.subscribe()
    }

    pub fn view(&self) -> SessionView {
        self.session.view()
    }

    /// Connects the wallet, performs the initial full read and starts the
    /// poller. Calling it again re-reads without starting a second poller.
    ///
    /// Read failures during the initial read are logged and leave the
    /// affected flags unknown; only a failed resolution fails the call.
    pub async fn connect(self: &Arc<Self>) -> Result<SessionView, ResolveError> {
        let conn = self.resolver.resolve(false).await.map_err(|e| {
            tracing::warn!(target: "controller", event = "connect_failed", error = %e);
            e
        })?;
        if self.session.mark_connected() {
            tracing::info!(
                target: "controller",
                event = "connected",
                chain_id = %conn.chain_id(),
                contract = %self.contract
            );
        }
        let _ = self.refresh().await;
        self.ensure_polling();
        Ok(self.session.view())
    }

    /// One evaluation pass: the started flag; then the owner when not
    /// started, or the end timestamp when started; then the minted count.
    ///
    /// Every read is attempted even if an earlier one fails. Failed reads
    /// keep the previous value; the first failure is returned after the
    /// session has been updated with everything that did succeed.
    pub async fn refresh(&self) -> Result<SalePhase, ReadError> {
        let conn = self.resolver.resolve(false).await.map_err(|e| {
            tracing::warn!(target: "controller", event = "refresh_aborted", error = %e);
            ReadError::from(e)
        })?;
        let reads = SaleReads::new(&conn, self.contract);
        let mut first_err: Option<ReadError> = None;
        let mut note = |e: ReadError| {
            tracing::warn!(target: "controller", event = "read_failed", code = e.code(), error = %e);
            if !matches!(e, ReadError::Resolve(_)) {
                error_metrics().inc_error("read", e.code());
            }
            first_err.get_or_insert(e);
        };

        match reads.presale_started().await {
            Ok(false) => {
                let owner = match self.lookup_role(&reads).await {
                    Ok(found) => Some(found),
                    Err(e) => {
                        note(e);
                        None
                    }
                };
                self.session.record_started(false, owner);
            }
            Ok(true) => {
                self.session.record_started(true, None);
                match reads.presale_end().await {
                    Ok(end) => self
                        .session
                        .record_ended(presale_elapsed(end, self.clock.now_unix_secs())),
                    Err(e) => note(e),
                }
            }
            Err(e) => note(e),
        }

        match reads.minted().await {
            Ok(minted) => self.session.record_minted(minted),
            Err(e) => note(e),
        }

        if self.sale_over() {
            self.halt_polling();
        }

        match first_err {
            Some(e) => Err(e),
            None => Ok(self.session.phase()),
        }
    }

    async fn lookup_role(&self, reads: &SaleReads) -> Result<(AccountRole, Address), ReadError> {
        let owner = reads.owner().await?;
        let signer = self.resolver.resolve(true).await?;
        let role = match signer.account() {
            Some(account) => AccountRole::of(&account, &owner),
            None => AccountRole::NotOwner,
        };
        tracing::debug!(target: "controller", event = "owner_lookup", owner = %owner, role = ?role);
        Ok((role, owner))
    }

    pub async fn start_presale(&self) -> Result<TxReceipt, WriteError> {
        self.write(WriteKind::StartPresale).await
    }

    pub async fn presale_mint(&self) -> Result<TxReceipt, WriteError> {
        self.write(WriteKind::PresaleMint).await
    }

    pub async fn public_mint(&self) -> Result<TxReceipt, WriteError> {
        self.write(WriteKind::PublicMint).await
    }

    /// Performs one write while holding the session busy flag.
    ///
    /// Refused without touching the chain unless connected, idle, and in
    /// the phase that offers `kind`. No retry on failure.
    pub async fn write(&self, kind: WriteKind) -> Result<TxReceipt, WriteError> {
        let method = kind.method();
        let guard = self.session.begin_write(kind).map_err(|e| {
            tracing::warn!(target: "controller", event = "write_refused", method, error = %e);
            error_metrics().inc_error("write", e.code());
            e
        })?;
        tracing::info!(target: "controller", event = "write_started", method);

        let result = self.submit(kind).await;
        match &result {
            Ok(receipt) => {
                sale_metrics().inc_writes(method, "confirmed");
                if kind.is_payable() {
                    self.notifier.notify(&Notice::Minted {
                        kind,
                        collection_name: self.config.collection_name.clone(),
                    });
                }
                tracing::info!(
                    target: "controller",
                    event = "write_confirmed",
                    method,
                    tx_hash = %receipt.tx_hash
                );
                // Re-read while still busy so the pre-write affordance never
                // reappears between confirmation and the read.
                let _ = self.refresh().await;
            }
            Err(e) => {
                sale_metrics().inc_writes(method, "failed");
                error_metrics().inc_error("write", e.code());
                tracing::warn!(
                    target: "controller",
                    event = "write_failed",
                    method,
                    code = e.code(),
                    error = %e
                );
            }
        }
        drop(guard);
        result
    }

    async fn submit(&self, kind: WriteKind) -> Result<TxReceipt, WriteError> {
        let signing = self
            .resolver
            .resolve(true)
            .await?
            .into_signing()
            .ok_or(WriteError::Resolve(ResolveError::AuthorizationDeclined))?;
        SaleWrites::new(&signing, self.contract, self.unit_price)
            .execute(kind)
            .await
    }

    fn sale_over(&self) -> bool {
        self.session.snapshot().ended == Some(true)
    }

    fn ensure_polling(self: &Arc<Self>) {
        let mut slot = self.poller.lock();
        if slot.is_some() {
            return;
        }
        if self.sale_over() {
            tracing::debug!(target: "controller", event = "poller_not_needed");
            return;
        }
        *slot = Some(Poller::spawn(
            Arc::downgrade(self),
            self.config.poll_interval(),
        ));
    }

    /// Signals the poller to stop once public mint is observed, by any
    /// read. A tick already running still completes its final read.
    fn halt_polling(&self) {
        if let Some(handle) = self.poller.lock().as_ref() {
            if !handle.is_finished() {
                tracing::debug!(target: "controller", event = "poller_halted");
                handle.stop();
            }
        }
    }

    /// True while a poller is running for this session.
    pub fn is_polling(&self) -> bool {
        self.poller
            .lock()
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }

    /// Ticks the session poller has started, zero if none was started.
    pub fn poll_ticks(&self) -> u64 {
        self.poller.lock().as_ref().map_or(0, PollerHandle::ticks)
    }

    /// Stops the poller and hands back its handle for joining. A later
    /// `connect` starts a fresh one.
    pub fn stop_polling(&self) -> Option<PollerHandle> {
        let handle = self.poller.lock().take()?;
        handle.stop();
        Some(handle)
    }
}

#[async_trait]
impl PollTarget for SaleController {
    async fn tick(&self) -> PollStep {
        sale_metrics().inc_poll_ticks();
        let _ = self.refresh().await;
        if self.sale_over() {
            PollStep::Terminal
        } else {
            PollStep::Continue
        }
    }

    async fn finish(&self) {
        tracing::info!(target: "controller", event = "sale_terminal");
        let _ = self.refresh().await;
    }
}
