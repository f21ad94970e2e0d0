// Path: crates/controller/src/session.rs
//! Session state: the flags the phase is derived from, held for the
//! lifetime of one session and published to renderers on every visible
//! change. Nothing here outlives the process.

use crate::machine::{derive_phase, PhaseInputs};
use mint_telemetry::sale_metrics;
use mint_types::{
    app::{AccountRole, SalePhase, WriteKind},
    error::WriteError,
    view::SessionView,
    Address, U256,
};
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionState {
    pub connected: bool,
    pub busy: bool,
    pub role: Option<AccountRole>,
    pub owner: Option<Address>,
    pub started: Option<bool>,
    pub ended: Option<bool>,
    pub minted: U256,
    pub phase: SalePhase,
    /// Last phase derived from contract reads; held across failed reads.
    pub settled: SalePhase,
    pub collection_size: u64,
}

impl SessionState {
    fn new(collection_size: u64) -> Self {
        Self {
            connected: false,
            busy: false,
            role: None,
            owner: None,
            started: None,
            ended: None,
            minted: U256::ZERO,
            phase: SalePhase::NotConnected,
            settled: SalePhase::WaitingForStart,
            collection_size,
        }
    }

    pub fn inputs(&self) -> PhaseInputs {
        PhaseInputs {
            connected: self.connected,
            busy: self.busy,
            role: self.role,
            started: self.started,
            ended: self.ended,
        }
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            connected: self.connected,
            busy: self.busy,
            role: self.role,
            owner: self.owner,
            phase: self.phase,
            minted: self.minted,
            collection_size: self.collection_size,
        }
    }

    fn rederive(&mut self) {
        let phase = derive_phase(&self.inputs(), self.settled);
        if phase.is_settled() {
            self.settled = phase;
        }
        if phase != self.phase {
            tracing::info!(
                target: "machine",
                event = "transition",
                from = %self.phase,
                to = %phase
            );
            sale_metrics().set_phase(phase.as_str());
            self.phase = phase;
        }
    }
}

/// The session context. Clones share the same state.
#[derive(Clone, Debug)]
pub struct Session {
    tx: Arc<watch::Sender<SessionState>>,
}

impl Session {
    pub fn new(collection_size: u64) -> Self {
        let (tx, _) = watch::channel(SessionState::new(collection_size));
        Self { tx: Arc::new(tx) }
    }

    /// A receiver that observes every visible change.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.tx.subscribe()
    }

    pub fn snapshot(&self) -> SessionState {
        self.tx.borrow().clone()
    }

    pub fn view(&self) -> SessionView {
        self.tx.borrow().view()
    }

    pub fn phase(&self) -> SalePhase {
        self.tx.borrow().phase
    }

    /// Applies `f`, re-derives the phase, and notifies subscribers only if
    /// the renderer-visible view changed.
    pub fn update(&self, f: impl FnOnce(&mut SessionState)) {
        self.tx.send_if_modified(|s| {
            let before = s.view();
            f(s);
            s.rederive();
            s.view() != before
        });
    }

    /// Returns true the first time the session becomes connected.
    pub fn mark_connected(&self) -> bool {
        let mut first = false;
        self.update(|s| {
            first = !s.connected;
            s.connected = true;
        });
        first
    }

    pub fn record_started(&self, started: bool, owner: Option<(AccountRole, Address)>) {
        self.update(|s| {
            s.started = Some(started);
            if let Some((role, address)) = owner {
                s.role = Some(role);
                s.owner = Some(address);
            }
        });
    }

    pub fn record_ended(&self, ended: bool) {
        self.update(|s| s.ended = Some(ended));
    }

    /// The displayed count never decreases; a lower read is a stale answer.
    pub fn record_minted(&self, minted: U256) {
        self.update(|s| {
            if minted < s.minted {
                tracing::debug!(
                    target: "machine",
                    event = "stale_minted",
                    read = %minted,
                    kept = %s.minted
                );
            } else {
                s.minted = minted;
            }
        });
    }

    /// Marks a write of `kind` as in flight. Fails if the session is not
    /// connected, another write is in flight, or the current phase does not
    /// offer `kind`. Busy clears when the guard drops.
    pub fn begin_write(&self, kind: WriteKind) -> Result<BusyGuard, WriteError> {
        let mut outcome = Ok(());
        self.tx.send_if_modified(|s| {
            outcome = if !s.connected {
                Err(WriteError::NotConnected)
            } else if s.busy {
                Err(WriteError::Busy)
            } else if s.phase != kind.offered_in() {
                Err(WriteError::Unavailable {
                    action: kind,
                    phase: s.phase,
                })
            } else {
                Ok(())
            };
            if outcome.is_err() {
                return false;
            }
            s.busy = true;
            s.rederive();
            true
        });
        outcome.map(|()| BusyGuard {
            tx: self.tx.clone(),
        })
    }
}

/// Holds the session busy flag. Dropping it clears busy and re-derives the
/// phase from whatever the reads say now.
#[derive(Debug)]
pub struct BusyGuard {
    tx: Arc<watch::Sender<SessionState>>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.tx.send_if_modified(|s| {
            s.busy = false;
            s.rederive();
            true
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connected_session() -> Session {
        let session = Session::new(20);
        session.mark_connected();
        session
    }

    #[test]
    fn phase_gauge_labels_cover_every_phase() {
        let names: Vec<_> = SalePhase::ALL.iter().map(SalePhase::as_str).collect();
        assert_eq!(names, mint_telemetry::prometheus::PHASE_LABELS.to_vec());
    }

    #[test]
    fn starts_disconnected_and_becomes_waiting_on_connect() {
        let session = Session::new(20);
        assert_eq!(session.phase(), SalePhase::NotConnected);
        assert!(session.mark_connected());
        assert!(!session.mark_connected());
        assert_eq!(session.phase(), SalePhase::WaitingForStart);
    }

    #[test]
    fn busy_guard_sets_loading_and_restores_on_drop() {
        let session = connected_session();
        session.record_started(false, Some((AccountRole::Owner, Address::ZERO)));
        assert_eq!(session.phase(), SalePhase::OwnerCanStart);

        let guard = session.begin_write(WriteKind::StartPresale).unwrap();
        assert_eq!(session.phase(), SalePhase::Loading);
        assert!(session.view().busy);
        drop(guard);
        assert_eq!(session.phase(), SalePhase::OwnerCanStart);
        assert!(!session.view().busy);
    }

    #[test]
    fn second_write_is_refused_while_busy() {
        let session = connected_session();
        session.record_started(true, None);
        session.record_ended(false);
        let _guard = session.begin_write(WriteKind::PresaleMint).unwrap();
        assert_eq!(
            session.begin_write(WriteKind::PresaleMint).unwrap_err(),
            WriteError::Busy
        );
    }

    #[test]
    fn writes_are_gated_by_phase() {
        let session = Session::new(20);
        assert_eq!(
            session.begin_write(WriteKind::PublicMint).unwrap_err(),
            WriteError::NotConnected
        );
        session.mark_connected();
        session.record_started(true, None);
        session.record_ended(false);
        assert_eq!(
            session.begin_write(WriteKind::PublicMint).unwrap_err(),
            WriteError::Unavailable {
                action: WriteKind::PublicMint,
                phase: SalePhase::PresaleOpen
            }
        );
    }

    #[test]
    fn minted_count_never_decreases() {
        let session = connected_session();
        session.record_minted(U256::from(5u64));
        session.record_minted(U256::from(3u64));
        assert_eq!(session.view().minted, U256::from(5u64));
        session.record_minted(U256::from(6u64));
        assert_eq!(session.view().minted, U256::from(6u64));
    }

    #[test]
    fn role_is_kept_when_started_is_recorded_without_lookup() {
        let session = connected_session();
        session.record_started(false, Some((AccountRole::Owner, Address::ZERO)));
        session.record_started(true, None);
        assert_eq!(session.view().role, Some(AccountRole::Owner));
        assert_eq!(session.phase(), SalePhase::PresaleOpen);
    }

    #[tokio::test]
    async fn subscribers_see_only_visible_changes() {
        let session = connected_session();
        let mut rx = session.subscribe();
        rx.borrow_and_update();
        session.record_started(true, None);
        session.record_ended(false);
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().phase, SalePhase::PresaleOpen);

        session.record_ended(false);
        assert!(!rx.has_changed().unwrap());
    }
}
