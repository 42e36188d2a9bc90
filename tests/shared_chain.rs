//! Host-level tests of the mutex-wrapped chain.

use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, NoopRawMutex};
use sipo_chain::{Error, SharedShiftChain, ShiftChain, TracePin, Wire, WireTrace};

const CAP: usize = 512;

type TraceChain<'a, const N: usize> =
    ShiftChain<TracePin<'a, CAP>, TracePin<'a, CAP>, TracePin<'a, CAP>, N>;

fn new_chain<const N: usize>(trace: &WireTrace<CAP>) -> TraceChain<'_, N> {
    let chain = ShiftChain::new(
        trace.pin(Wire::Data),
        trace.pin(Wire::Clock),
        trace.pin(Wire::Latch),
    )
    .expect("trace pins accept writes");
    trace.clear();
    chain
}

#[test]
fn operations_match_the_bare_chain() {
    let trace = WireTrace::new();
    let shared = SharedShiftChain::<NoopRawMutex, _, _, _, 2>::new(new_chain(&trace));

    shared.set(3, true).expect("trace has room");
    assert!(shared.get(3).expect("pin is in range"));
    assert_eq!(trace.latch_pulses(), 1);

    assert!(!shared.toggle(3).expect("pin is in range"));
    shared.set_all(&[0xC0, 0x03]).expect("trace has room");
    assert_eq!(shared.get_all(), [0xC0, 0x03]);

    shared.set_all_high().expect("trace has room");
    assert_eq!(shared.get_all(), [0xFF, 0xFF]);
    shared.set_all_low().expect("trace has room");
    assert_eq!(shared.get_all(), [0x00, 0x00]);
    assert_eq!(trace.latch_pulses(), 5);
}

#[test]
fn batch_under_one_lock_is_one_burst() {
    let trace = WireTrace::new();
    let shared = SharedShiftChain::<CriticalSectionRawMutex, _, _, _, 2>::new(new_chain(&trace));

    shared.set_no_update(0, true).expect("pin is in range");
    shared
        .lock(|chain| -> sipo_chain::Result<()> {
            chain.set_no_update(8, true)?;
            chain.set_no_update(15, true)?;
            chain.flush()
        })
        .expect("batch pins are in range");

    assert_eq!(trace.latch_pulses(), 1);
    assert_eq!(trace.clocked_bytes().as_slice(), [0b1000_0001, 0b0000_0001]);
}

#[test]
fn errors_pass_through() {
    let trace = WireTrace::new();
    let shared = SharedShiftChain::<NoopRawMutex, _, _, _, 1>::new(new_chain(&trace));

    assert_eq!(
        shared.set(8, true),
        Err(Error::PinOutOfRange {
            pin: 8,
            pin_count: 8
        })
    );

    trace.fail(Some(Wire::Clock));
    assert!(matches!(
        shared.flush(),
        Err(Error::Wire {
            wire: Wire::Clock,
            ..
        })
    ));
}

#[test]
fn into_inner_keeps_state() {
    let trace = WireTrace::new();
    let shared = SharedShiftChain::<NoopRawMutex, _, _, _, 1>::new(new_chain(&trace));
    shared.set(6, true).expect("trace has room");

    let chain = shared.into_inner();

    assert_eq!(chain.get_all(), &[0b0100_0000]);
}
