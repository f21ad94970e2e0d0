// Path: crates/controller/tests/scenarios.rs
//! End-to-end sessions against the in-memory chain.

use mint_api::Clock;
use mint_controller::SaleController;
use mint_test_utils::{assert_err, assert_ok, MockChain, RecordingNotifier, PRESALE_DURATION_SECS};
use mint_types::{
    app::{AccountRole, ChainId, Notice, SalePhase, WriteKind},
    config::SaleConfig,
    error::{ReadError, ResolveError, WriteError},
    view::Affordance,
    Address, U256,
};
use std::sync::Arc;
use std::time::Duration;

const CHAIN: u64 = 4;

fn owner() -> Address {
    Address::repeat_byte(0xAA)
}

fn buyer() -> Address {
    Address::repeat_byte(0xBB)
}

fn contract() -> Address {
    Address::repeat_byte(0xCC)
}

struct Harness {
    chain: MockChain,
    notifier: Arc<RecordingNotifier>,
    controller: Arc<SaleController>,
}

fn harness(chain: MockChain) -> Harness {
    let notifier = Arc::new(RecordingNotifier::default());
    let mut config = SaleConfig::new(contract(), ChainId(CHAIN));
    config.network_name = "Rinkeby".into();
    config.collection_name = "Crypto Dev".into();
    let controller = assert_ok!(SaleController::new(
        config,
        Arc::new(chain.clone()),
        notifier.clone(),
        chain.clock(),
    ));
    Harness {
        chain,
        notifier,
        controller,
    }
}

/// A sale whose presale opened `ago` seconds before the chain's clock.
fn presale_opened(chain: &MockChain, ago: u64) {
    let now = chain.clock().now_unix_secs();
    chain.set_started(true);
    chain.set_presale_end(U256::from(now + PRESALE_DURATION_SECS - ago));
}

#[tokio::test]
async fn disconnected_session_offers_connect_then_waits_for_start() {
    let h = harness(MockChain::new(CHAIN, owner(), buyer()));
    let view = h.controller.view();
    assert_eq!(view.phase, SalePhase::NotConnected);
    assert_eq!(view.affordance().label(), "Connect your Wallet");

    let view = assert_ok!(h.controller.connect().await);
    assert_eq!(view.phase, SalePhase::WaitingForStart);
    assert_eq!(view.role, Some(AccountRole::NotOwner));
    assert_eq!(view.owner, Some(owner()));
    assert_eq!(view.affordance().label(), "Presale has not started yet.");
    assert_eq!(view.minted_line(), "0/20 have been minted");
}

#[tokio::test]
async fn owner_starts_presale_through_a_loading_phase() {
    let h = harness(MockChain::new(CHAIN, owner(), owner()));
    assert_ok!(h.controller.connect().await);
    assert_eq!(h.controller.view().affordance(), Affordance::StartPresaleButton);

    h.chain.hold_confirmations(true);
    let mut rx = h.controller.subscribe();
    let controller = h.controller.clone();
    let write = tokio::spawn(async move { controller.start_presale().await });

    assert!(rx.wait_for(|s| s.phase == SalePhase::Loading).await.is_ok());
    assert!(h.controller.view().busy);
    assert_eq!(
        assert_err!(h.controller.start_presale().await),
        WriteError::Busy
    );

    h.chain.release_confirmation();
    let receipt = assert_ok!(assert_ok!(write.await));
    assert!(receipt.success);

    let view = h.controller.view();
    assert!(!view.busy);
    assert_eq!(view.phase, SalePhase::PresaleOpen);
    assert_eq!(h.chain.calls("startPresale"), 1);
    // Starting the presale is not a mint.
    assert!(h.notifier.notices().is_empty());
}

#[tokio::test]
async fn elapsed_presale_reads_as_public() {
    let chain = MockChain::new(CHAIN, owner(), buyer());
    chain.set_started(true);
    chain.set_presale_end(U256::from(1_000u64));
    chain.clock().set(1_500);
    let h = harness(chain);

    let view = assert_ok!(h.controller.connect().await);
    assert_eq!(view.phase, SalePhase::PublicOpen);
    assert_eq!(
        view.affordance().banner("Crypto Dev").as_deref(),
        Some("Presale has ended, and public mint is live!")
    );
}

#[tokio::test]
async fn failed_reads_hold_the_previous_phase() {
    let chain = MockChain::new(CHAIN, owner(), buyer());
    presale_opened(&chain, 10);
    let h = harness(chain);
    assert_ok!(h.controller.connect().await);
    assert_eq!(h.controller.view().phase, SalePhase::PresaleOpen);

    h.chain.fail_reads(true);
    let err = assert_err!(h.controller.refresh().await);
    assert!(matches!(err, ReadError::Call { method: "presaleStarted", .. }));
    assert_eq!(h.controller.view().phase, SalePhase::PresaleOpen);

    h.chain.fail_reads(false);
    assert_eq!(assert_ok!(h.controller.refresh().await), SalePhase::PresaleOpen);
}

#[tokio::test]
async fn wrong_network_fails_before_any_contract_call() {
    let h = harness(MockChain::new(1, owner(), buyer()));

    let err = assert_err!(h.controller.connect().await);
    assert_eq!(
        err,
        ResolveError::WrongNetwork {
            expected: ChainId(CHAIN),
            actual: ChainId(1),
        }
    );
    for method in ["presaleStarted", "presaleEnded", "owner", "tokenIds"] {
        assert_eq!(h.chain.calls(method), 0, "{method} was called");
    }
    assert_eq!(h.controller.view().phase, SalePhase::NotConnected);
    assert!(!h.controller.is_polling());

    let notices = h.notifier.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].to_string(), "Change the network to Rinkeby");
}

#[tokio::test]
async fn declined_authorization_can_be_retried() {
    let chain = MockChain::new(CHAIN, owner(), buyer());
    chain.reject_authorization(true);
    let h = harness(chain);

    assert_eq!(
        assert_err!(h.controller.connect().await),
        ResolveError::AuthorizationDeclined
    );
    assert_eq!(h.controller.view().phase, SalePhase::NotConnected);

    h.chain.reject_authorization(false);
    assert_ok!(h.controller.connect().await);
    assert_eq!(h.chain.calls("prompt"), 2);
    assert_eq!(h.controller.view().phase, SalePhase::WaitingForStart);
}

#[tokio::test]
async fn repeated_reads_without_writes_are_idempotent() {
    let chain = MockChain::new(CHAIN, owner(), buyer());
    presale_opened(&chain, 60);
    chain.set_token_ids(4);
    let h = harness(chain);
    assert_ok!(h.controller.connect().await);

    let first = assert_ok!(h.controller.refresh().await);
    let view = h.controller.view();
    let second = assert_ok!(h.controller.refresh().await);
    assert_eq!(first, second);
    assert_eq!(view, h.controller.view());
    for method in ["startPresale", "presaleMint", "mint"] {
        assert_eq!(h.chain.calls(method), 0);
    }
}

#[tokio::test]
async fn owner_is_looked_up_only_before_the_sale_starts() {
    let h = harness(MockChain::new(CHAIN, owner(), owner()));
    assert_ok!(h.controller.connect().await);
    assert_eq!(h.chain.calls("owner"), 1);

    presale_opened(&h.chain, 0);
    assert_ok!(h.controller.refresh().await);
    assert_ok!(h.controller.refresh().await);
    assert_eq!(h.chain.calls("owner"), 1);
    assert_eq!(h.controller.view().role, Some(AccountRole::Owner));
    assert_eq!(h.controller.view().phase, SalePhase::PresaleOpen);
}

#[tokio::test]
async fn minted_count_never_goes_backwards() {
    let chain = MockChain::new(CHAIN, owner(), buyer());
    chain.set_token_ids(5);
    let h = harness(chain);
    assert_ok!(h.controller.connect().await);
    assert_eq!(h.controller.view().minted, U256::from(5u64));

    h.chain.set_token_ids(3);
    assert_ok!(h.controller.refresh().await);
    assert_eq!(h.controller.view().minted, U256::from(5u64));
}

#[tokio::test]
async fn presale_mint_notifies_and_rereads_the_count() {
    let chain = MockChain::new(CHAIN, owner(), buyer());
    presale_opened(&chain, 30);
    chain.set_token_ids(2);
    let h = harness(chain);
    assert_ok!(h.controller.connect().await);

    assert_ok!(h.controller.presale_mint().await);
    assert_eq!(h.controller.view().minted_line(), "3/20 have been minted");
    assert_eq!(
        h.notifier.notices(),
        vec![Notice::Minted {
            kind: WriteKind::PresaleMint,
            collection_name: "Crypto Dev".into(),
        }]
    );
    assert_eq!(
        h.notifier.notices()[0].to_string(),
        "You successfully minted a Crypto Dev!"
    );
}

#[tokio::test]
async fn reverted_mint_clears_busy_without_a_notice() {
    let chain = MockChain::new(CHAIN, owner(), buyer());
    presale_opened(&chain, 30);
    let h = harness(chain);
    assert_ok!(h.controller.connect().await);

    h.chain.revert_next();
    let err = assert_err!(h.controller.presale_mint().await);
    assert!(matches!(err, WriteError::Reverted { method: "presaleMint", .. }));
    let view = h.controller.view();
    assert!(!view.busy);
    assert_eq!(view.phase, SalePhase::PresaleOpen);
    assert_eq!(view.minted, U256::ZERO);
    assert!(h.notifier.notices().is_empty());

    // No automatic retry; a manual one goes through.
    assert_eq!(h.chain.calls("presaleMint"), 1);
    assert_ok!(h.controller.presale_mint().await);
    assert_eq!(h.controller.view().minted, U256::from(1u64));
}

#[tokio::test]
async fn failed_submission_is_reported_and_clears_busy() {
    let chain = MockChain::new(CHAIN, owner(), buyer());
    presale_opened(&chain, PRESALE_DURATION_SECS + 1);
    let h = harness(chain);
    assert_ok!(h.controller.connect().await);
    assert_eq!(h.controller.view().phase, SalePhase::PublicOpen);

    h.chain.fail_submit(true);
    let err = assert_err!(h.controller.public_mint().await);
    assert!(matches!(err, WriteError::Submit { method: "mint", .. }));
    assert!(!h.controller.view().busy);
    assert_eq!(h.controller.view().phase, SalePhase::PublicOpen);
}

#[tokio::test]
async fn writes_outside_their_phase_never_reach_the_chain() {
    let h = harness(MockChain::new(CHAIN, owner(), buyer()));
    assert_eq!(
        assert_err!(h.controller.presale_mint().await),
        WriteError::NotConnected
    );

    assert_ok!(h.controller.connect().await);
    assert_eq!(
        assert_err!(h.controller.start_presale().await),
        WriteError::Unavailable {
            action: WriteKind::StartPresale,
            phase: SalePhase::WaitingForStart,
        }
    );
    assert_eq!(h.chain.calls("startPresale"), 0);
}

#[tokio::test(start_paused = true)]
async fn poller_follows_the_sale_and_stops_at_public() {
    let chain = MockChain::new(CHAIN, owner(), buyer());
    presale_opened(&chain, 0);
    let h = harness(chain);
    assert_ok!(h.controller.connect().await);
    assert!(h.controller.is_polling());
    assert_eq!(h.chain.calls("presaleStarted"), 1);

    tokio::time::sleep(Duration::from_millis(10_100)).await;
    assert_eq!(h.controller.poll_ticks(), 2);
    assert_eq!(h.controller.view().phase, SalePhase::PresaleOpen);

    h.chain.clock().advance(PRESALE_DURATION_SECS + 1);
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(h.controller.view().phase, SalePhase::PublicOpen);
    assert!(!h.controller.is_polling());

    // Three ticks plus the final read after the terminal one.
    let reads = h.chain.calls("presaleStarted");
    assert_eq!(reads, 5);
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(h.chain.calls("presaleStarted"), reads);
    assert_eq!(h.controller.poll_ticks(), 3);
}

#[tokio::test(start_paused = true)]
async fn poller_stops_when_a_direct_read_sees_public_mint() {
    let chain = MockChain::new(CHAIN, owner(), buyer());
    presale_opened(&chain, 0);
    let h = harness(chain);
    assert_ok!(h.controller.connect().await);
    assert!(h.controller.is_polling());

    h.chain.clock().advance(PRESALE_DURATION_SECS + 1);
    assert_eq!(assert_ok!(h.controller.refresh().await), SalePhase::PublicOpen);
    let reads = h.chain.calls("presaleStarted");
    assert_eq!(reads, 2);

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(h.chain.calls("presaleStarted"), reads);
    assert_eq!(h.controller.poll_ticks(), 0);
    assert!(!h.controller.is_polling());
}

#[tokio::test(start_paused = true)]
async fn poller_is_not_started_for_a_finished_presale() {
    let chain = MockChain::new(CHAIN, owner(), buyer());
    presale_opened(&chain, PRESALE_DURATION_SECS + 1);
    let h = harness(chain);
    assert_ok!(h.controller.connect().await);
    assert_eq!(h.controller.view().phase, SalePhase::PublicOpen);
    assert!(!h.controller.is_polling());

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(h.chain.calls("presaleStarted"), 1);
}

#[tokio::test(start_paused = true)]
async fn poller_keeps_going_through_failed_reads() {
    let chain = MockChain::new(CHAIN, owner(), buyer());
    presale_opened(&chain, 0);
    let h = harness(chain);
    assert_ok!(h.controller.connect().await);

    h.chain.fail_reads(true);
    tokio::time::sleep(Duration::from_millis(15_100)).await;
    assert_eq!(h.controller.poll_ticks(), 3);
    assert_eq!(h.controller.view().phase, SalePhase::PresaleOpen);
    assert!(h.controller.is_polling());

    let handle = h.controller.stop_polling();
    assert!(handle.is_some());
    assert!(!h.controller.is_polling());
}

#[tokio::test]
async fn second_connect_does_not_start_another_poller() {
    let h = harness(MockChain::new(CHAIN, owner(), buyer()));
    assert_ok!(h.controller.connect().await);
    assert_ok!(h.controller.connect().await);
    assert!(h.controller.is_polling());
    assert_eq!(h.chain.calls("connect"), 1);
    assert_eq!(h.chain.calls("presaleStarted"), 2);
}
