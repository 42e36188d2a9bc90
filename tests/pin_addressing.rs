//! Host-level tests of pin addressing and buffer semantics.

use sipo_chain::{ShiftChain, TracePin, Wire, WireTrace};

const CAP: usize = 1024;

type TraceChain<'a, const N: usize> =
    ShiftChain<TracePin<'a, CAP>, TracePin<'a, CAP>, TracePin<'a, CAP>, N>;

fn new_chain<const N: usize>(trace: &WireTrace<CAP>) -> TraceChain<'_, N> {
    ShiftChain::new(
        trace.pin(Wire::Data),
        trace.pin(Wire::Clock),
        trace.pin(Wire::Latch),
    )
    .expect("trace pins accept writes")
}

/// Small deterministic pattern so the "other pins" are not all equal.
fn pattern<const N: usize>(seed: u8) -> [u8; N] {
    core::array::from_fn(|index| {
        let index = u8::try_from(index).expect("test chains have fewer than 256 chips");
        seed.wrapping_mul(31).wrapping_add(index.wrapping_mul(97))
    })
}

fn set_touches_only_its_pin<const N: usize>() {
    let trace = WireTrace::new();
    let mut chain = new_chain::<N>(&trace);

    let pin_count = chain.pin_count();
    for pin in 0..pin_count {
        for value in [true, false] {
            let seed = u8::try_from(pin).expect("test chains have fewer than 256 pins");
            let start = pattern::<N>(seed);
            chain.set_all(&start).expect("trace has room");
            trace.clear();

            chain.set(pin, value).expect("trace has room");

            assert_eq!(chain.get(pin).expect("pin is in range"), value, "pin {pin}");
            for other in (0..pin_count).filter(|&other| other != pin) {
                let before = start
                    .get(other.div_euclid(8))
                    .is_some_and(|chip| (chip >> other.rem_euclid(8)) & 1 == 1);
                let after = chain.get(other).expect("pin is in range");
                assert_eq!(after, before, "pin {pin}, other {other}");
            }
            // What was sent is exactly what is held.
            let mut sent = trace.clocked_bytes();
            sent.reverse();
            assert_eq!(sent.as_slice(), chain.get_all());
        }
    }
}

#[test]
fn set_touches_only_its_pin_for_several_chain_lengths() {
    set_touches_only_its_pin::<1>();
    set_touches_only_its_pin::<2>();
    set_touches_only_its_pin::<3>();
    set_touches_only_its_pin::<5>();
}

#[test]
fn last_write_wins() {
    let trace = WireTrace::new();
    let mut chain = new_chain::<2>(&trace);

    let writes = [
        (4, true),
        (12, true),
        (4, false),
        (4, true),
        (12, false),
        (4, true),
        (0, true),
        (0, false),
    ];
    for (pin, value) in writes {
        chain.set(pin, value).expect("trace has room");
        trace.clear();
        assert_eq!(chain.get(pin).expect("pin is in range"), value);
    }

    assert!(chain.get(4).expect("pin is in range"));
    assert!(!chain.get(12).expect("pin is in range"));
    assert!(!chain.get(0).expect("pin is in range"));
    assert_eq!(chain.get_all(), &[0b0001_0000, 0b0000_0000]);
}

#[test]
fn all_high_then_all_low() {
    let trace = WireTrace::new();
    let mut chain = new_chain::<3>(&trace);

    chain.set_all_high().expect("trace has room");
    assert_eq!(chain.get_all(), &[0xFF; 3]);
    assert!((0..24).all(|pin| chain.get(pin).expect("pin is in range")));

    chain.set_all_low().expect("trace has room");
    assert_eq!(chain.get_all(), &[0x00; 3]);
    assert!((0..24).all(|pin| !chain.get(pin).expect("pin is in range")));
}

#[test]
fn set_all_round_trips_through_get_all() {
    let trace = WireTrace::new();
    let mut chain = new_chain::<4>(&trace);

    for seed in [0, 1, 7, 200] {
        let chips = pattern::<4>(seed);
        chain.set_all(&chips).expect("trace has room");
        trace.clear();
        assert_eq!(chain.get_all(), &chips);
    }
}

#[test]
fn get_reads_pending_state() {
    let trace = WireTrace::new();
    let mut chain = new_chain::<1>(&trace);
    trace.clear();

    chain.set_no_update(5, true).expect("pin is in range");

    assert!(chain.get(5).expect("pin is in range"));
    assert!(trace.is_empty());
}

#[test]
fn set_all_no_update_then_flush() {
    let trace = WireTrace::new();
    let mut chain = new_chain::<2>(&trace);
    trace.clear();

    chain.set_all_no_update(&[0x12, 0x34]);
    assert!(trace.is_empty());
    assert_eq!(chain.chip(0).expect("chip is in range"), 0x12);

    chain.flush().expect("trace has room");
    assert_eq!(trace.clocked_bytes().as_slice(), [0x34, 0x12]);
}
