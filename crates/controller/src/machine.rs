// Path: crates/controller/src/machine.rs
//! The sale-phase decision table.
//!
//! [`derive_phase`] is pure: it sees only the session flags and the last
//! settled phase, never the network.

use mint_types::{
    app::{AccountRole, SalePhase},
    U256,
};

/// The flags a phase is derived from. `None` means the value has never been
/// read successfully in this session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PhaseInputs {
    pub connected: bool,
    pub busy: bool,
    pub role: Option<AccountRole>,
    pub started: Option<bool>,
    pub ended: Option<bool>,
}

/// Evaluates the decision table top to bottom; the first matching rule wins.
///
/// 1. not connected: `NotConnected`
/// 2. a write is in flight: `Loading`
/// 3. owner and not started: `OwnerCanStart`
/// 4. not owner (or role unknown) and not started: `WaitingForStart`
/// 5. started and not ended: `PresaleOpen`
/// 6. started and ended: `PublicOpen`
///
/// `previous` must be the last settled phase. It is held when the started
/// flag is unknown, so a failed read never blanks the UI. When started is
/// known but ended is not, a sale already seen public stays public and
/// otherwise reads as presale.
pub fn derive_phase(inputs: &PhaseInputs, previous: SalePhase) -> SalePhase {
    if !inputs.connected {
        return SalePhase::NotConnected;
    }
    if inputs.busy {
        return SalePhase::Loading;
    }
    match (inputs.started, inputs.ended) {
        (Some(false), _) => match inputs.role {
            Some(AccountRole::Owner) => SalePhase::OwnerCanStart,
            Some(AccountRole::NotOwner) | None => SalePhase::WaitingForStart,
        },
        (Some(true), Some(false)) => SalePhase::PresaleOpen,
        // A presale can only have ended after it started.
        (Some(true), Some(true)) | (None, Some(true)) => SalePhase::PublicOpen,
        (Some(true), None) if previous == SalePhase::PublicOpen => SalePhase::PublicOpen,
        (Some(true), None) => SalePhase::PresaleOpen,
        (None, _) => previous,
    }
}

/// True once `end` (seconds since epoch, as reported on-chain) lies strictly
/// before `now`. Compared at full 256-bit width.
pub fn presale_elapsed(end: U256, now_unix_secs: u64) -> bool {
    end < U256::from(now_unix_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRISTATE: [Option<bool>; 3] = [None, Some(false), Some(true)];
    const ROLES: [Option<AccountRole>; 3] =
        [None, Some(AccountRole::Owner), Some(AccountRole::NotOwner)];

    fn connected(role: Option<AccountRole>, started: Option<bool>, ended: Option<bool>) -> PhaseInputs {
        PhaseInputs {
            connected: true,
            busy: false,
            role,
            started,
            ended,
        }
    }

    fn all_inputs() -> impl Iterator<Item = PhaseInputs> {
        let mut out = Vec::new();
        for connected in [false, true] {
            for busy in [false, true] {
                for role in ROLES {
                    for started in TRISTATE {
                        for ended in TRISTATE {
                            out.push(PhaseInputs {
                                connected,
                                busy,
                                role,
                                started,
                                ended,
                            });
                        }
                    }
                }
            }
        }
        out.into_iter()
    }

    #[test]
    fn table_is_total_and_respects_priority() {
        for inputs in all_inputs() {
            for previous in SalePhase::ALL.into_iter().filter(SalePhase::is_settled) {
                let phase = derive_phase(&inputs, previous);
                assert!(SalePhase::ALL.contains(&phase));
                if !inputs.connected {
                    assert_eq!(phase, SalePhase::NotConnected);
                } else if inputs.busy {
                    assert_eq!(phase, SalePhase::Loading);
                } else {
                    assert!(phase.is_settled(), "{:?} -> {:?}", inputs, phase);
                }
            }
        }
    }

    #[test]
    fn loading_overrides_every_read_result() {
        for role in ROLES {
            for started in TRISTATE {
                for ended in TRISTATE {
                    let inputs = PhaseInputs {
                        busy: true,
                        ..connected(role, started, ended)
                    };
                    assert_eq!(
                        derive_phase(&inputs, SalePhase::PresaleOpen),
                        SalePhase::Loading
                    );
                }
            }
        }
    }

    #[test]
    fn not_started_splits_on_role() {
        let prev = SalePhase::WaitingForStart;
        assert_eq!(
            derive_phase(&connected(Some(AccountRole::Owner), Some(false), None), prev),
            SalePhase::OwnerCanStart
        );
        assert_eq!(
            derive_phase(&connected(Some(AccountRole::NotOwner), Some(false), None), prev),
            SalePhase::WaitingForStart
        );
        assert_eq!(
            derive_phase(&connected(None, Some(false), None), prev),
            SalePhase::WaitingForStart
        );
    }

    #[test]
    fn started_splits_on_ended() {
        let prev = SalePhase::WaitingForStart;
        assert_eq!(
            derive_phase(&connected(None, Some(true), Some(false)), prev),
            SalePhase::PresaleOpen
        );
        assert_eq!(
            derive_phase(&connected(None, Some(true), Some(true)), prev),
            SalePhase::PublicOpen
        );
    }

    #[test]
    fn unknown_flags_hold_the_previous_phase() {
        for previous in [
            SalePhase::OwnerCanStart,
            SalePhase::WaitingForStart,
            SalePhase::PresaleOpen,
            SalePhase::PublicOpen,
        ] {
            assert_eq!(derive_phase(&connected(None, None, None), previous), previous);
        }
    }

    #[test]
    fn started_with_unknown_end_never_regresses_from_public() {
        assert_eq!(
            derive_phase(&connected(None, Some(true), None), SalePhase::PublicOpen),
            SalePhase::PublicOpen
        );
        assert_eq!(
            derive_phase(&connected(None, Some(true), None), SalePhase::WaitingForStart),
            SalePhase::PresaleOpen
        );
    }

    #[test]
    fn elapsed_compares_strictly() {
        assert!(presale_elapsed(U256::from(1000u64), 1500));
        assert!(!presale_elapsed(U256::from(1500u64), 1500));
        assert!(!presale_elapsed(U256::from(2000u64), 1500));
    }

    #[test]
    fn elapsed_does_not_truncate_huge_timestamps() {
        // 2^64 + 1 would wrap to 1 if narrowed to u64.
        let huge = (U256::from(1u64) << 64usize) + U256::from(1u64);
        assert!(!presale_elapsed(huge, u64::MAX));
        assert!(!presale_elapsed(U256::MAX, 1_700_000_000));
    }
}
