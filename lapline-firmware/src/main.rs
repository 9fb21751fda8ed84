//! Lapline - telemetry transmitter firmware
//!
//! Runs the transmitter node on an RP2040:
//!
//! - UART0 (GPIO0 TX, GPIO1 RX): telemetry link to the dashboard
//! - UART1 (GPIO4 TX, GPIO5 RX): operator console (`idle`, `msg <text>`)
//! - ADC0 (GPIO26): throttle potentiometer
//! - GPIO15: lap button to ground, internal pull-up
//!
//! Everything runs in one cooperative loop ticking every millisecond.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{Adc, Channel, Config as AdcConfig, InterruptHandler as AdcInterruptHandler};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Pull};
use embassy_rp::peripherals::{UART0, UART1};
use embassy_rp::uart::{self, BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_time::{Duration, Instant, Ticker};
use embedded_io::Write;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use lapline_core::config::{SensorConfig, TransmitConfig};
use lapline_core::transmit::{SensorInputs, SimRng, TransmitterNode, TxError};
use lapline_hal::{DataBits, IoSink, IoSource, Parity, StopBits, UartConfig as LinkSettings};

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    UART1_IRQ => BufferedInterruptHandler<UART1>;
    ADC_IRQ_FIFO => AdcInterruptHandler;
});

// Static cells for UART buffers (must live forever)
static LINK_TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static LINK_RX_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static CONSOLE_TX_BUF: StaticCell<[u8; 128]> = StaticCell::new();
static CONSOLE_RX_BUF: StaticCell<[u8; 128]> = StaticCell::new();

/// Seed for the simulated power readings
const SIM_SEED: u64 = 0x1A9_11E5;

/// Translate link line settings into the RP2040 UART config
fn uart_config(settings: &LinkSettings) -> UartConfig {
    let mut config = UartConfig::default();
    config.baudrate = settings.baudrate;
    config.data_bits = match settings.data_bits {
        DataBits::Seven => uart::DataBits::DataBits7,
        DataBits::Eight => uart::DataBits::DataBits8,
    };
    config.parity = match settings.parity {
        Parity::None => uart::Parity::ParityNone,
        Parity::Even => uart::Parity::ParityEven,
        Parity::Odd => uart::Parity::ParityOdd,
    };
    config.stop_bits = match settings.stop_bits {
        StopBits::One => uart::StopBits::STOP1,
        StopBits::Two => uart::StopBits::STOP2,
    };
    config
}

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Lapline transmitter starting...");

    let p = embassy_rp::init(Default::default());

    // Telemetry link
    let settings = LinkSettings::LINK;
    let link_config = uart_config(&settings);

    let tx_buf = LINK_TX_BUF.init([0u8; 256]);
    let rx_buf = LINK_RX_BUF.init([0u8; 64]);
    let link = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, link_config);
    let link = link.into_buffered(Irqs, tx_buf, rx_buf);
    let (link_tx, link_rx) = link.split();
    let mut link_tx = IoSink::new(link_tx);
    let mut link_rx = IoSource::new(link_rx);
    info!("Link UART initialized at {} baud", settings.baudrate);

    // Operator console
    let tx_buf = CONSOLE_TX_BUF.init([0u8; 128]);
    let rx_buf = CONSOLE_RX_BUF.init([0u8; 128]);
    let console = Uart::new_blocking(p.UART1, p.PIN_4, p.PIN_5, uart_config(&LinkSettings::LINK));
    let console = console.into_buffered(Irqs, tx_buf, rx_buf);
    let (mut console_tx, console_rx) = console.split();
    let mut console_rx = IoSource::new(console_rx);
    if console_tx.write_all(b"UART Telemetry TX started\r\n").is_err() {
        warn!("Console banner not sent");
    }

    // Sensors
    let mut adc = Adc::new(p.ADC, Irqs, AdcConfig::default());
    let mut throttle = Channel::new_pin(p.PIN_26, Pull::None);
    let mut lap_pin = Input::new(p.PIN_15, Pull::Up);

    let mut node = TransmitterNode::new(
        TransmitConfig::DEFAULT,
        SensorConfig::DEFAULT,
        SimRng::new(SIM_SEED),
    );
    info!("Transmitter node ready");

    let mut ticker = Ticker::every(Duration::from_millis(1));
    let mut velocity_raw = 0u16;
    let mut last_laps = node.laps();

    loop {
        match adc.read(&mut throttle).await {
            Ok(raw) => velocity_raw = raw,
            Err(_) => trace!("ADC read failed, keeping last value"),
        }

        let inputs = match SensorInputs::read(velocity_raw, &mut lap_pin) {
            Ok(inputs) => inputs,
            Err(e) => match e {},
        };

        let now_ms = Instant::now().as_millis() as u32;
        match node.step(now_ms, inputs, &mut link_rx, &mut link_tx, &mut console_rx) {
            Ok(report) => {
                if report.reset_received {
                    info!("Lap reset requested by dashboard");
                }
                if report.console_command {
                    info!("Console: status {}", node.status());
                }
            }
            Err(TxError::Link(e)) => warn!("Link write failed: {}", e),
            Err(TxError::Frame(e)) => error!("Frame encode failed: {}", e),
        }

        if node.laps() != last_laps {
            last_laps = node.laps();
            debug!("Laps: {}", last_laps);
        }

        ticker.next().await;
    }
}
