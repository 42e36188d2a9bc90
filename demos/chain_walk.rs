//! Walks one lit output along two daisy-chained 74HC595s on a Raspberry Pi Pico.
//!
//! Wiring: GP2 -> SER (data), GP3 -> SRCLK (clock), GP4 -> RCLK (latch). Tie OE low and
//! SRCLR high on both chips; chip 0's QH' feeds chip 1's SER.
//!
//! Run via: `cargo xtask demo chain_walk`
#![no_std]
#![no_main]

use defmt::info;
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Level, Output};
use embassy_time::Timer;
use panic_probe as _;
use sipo_chain::{Result, ShiftChain};

const STEP_MS: u64 = 150;
const HOLD_MS: u64 = STEP_MS * 4;
const CHIP_COUNT: usize = 2;

/// Both halves lit alternately, sent in one burst from a table in flash.
static CHECKERBOARD: [u8; CHIP_COUNT] = [0b1010_1010, 0b0101_0101];

#[embassy_executor::main]
pub async fn main(_spawner: Spawner) -> ! {
    let Err(err) = inner_main().await;
    core::panic!("{err}");
}

async fn inner_main() -> Result<core::convert::Infallible> {
    let p = embassy_rp::init(Default::default());

    let data = Output::new(p.PIN_2, Level::Low);
    let clock = Output::new(p.PIN_3, Level::Low);
    let latch = Output::new(p.PIN_4, Level::Low);
    let mut chain: ShiftChain<_, _, _, CHIP_COUNT> = ShiftChain::new(data, clock, latch)?;

    loop {
        info!("Walking {} outputs", chain.pin_count());
        for pin in 0..chain.pin_count() {
            chain.set(pin, true)?;
            Timer::after_millis(STEP_MS).await;
            chain.set(pin, false)?;
        }

        chain.set_all(&CHECKERBOARD)?;
        Timer::after_millis(HOLD_MS).await;
        for _ in 0..4 {
            let inverted = chain.get_all().map(|bits| !bits);
            chain.set_all(&inverted)?;
            Timer::after_millis(HOLD_MS).await;
        }
        chain.set_all_low()?;
    }
}
