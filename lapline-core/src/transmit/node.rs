//! Transmitter main loop body

use embedded_hal::digital::InputPin;
use lapline_hal::{ByteSink, ByteSource};
use lapline_protocol::frame::{MAX_FRAME_SIZE, RESET_REQUEST};
use lapline_protocol::{FrameError, Message, MessageText, StatusKind};
use rand_core::RngCore;

use super::button::LapButton;
use super::console::{ConsoleCommand, ConsoleParser};
use super::sampler::TelemetrySampler;
use super::scheduler::TransmitScheduler;
use crate::config::{SensorConfig, TransmitConfig};
use crate::telemetry::TelemetryData;
use crate::timing::FixedRateTimer;

/// Raw sensor readings for one loop iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorInputs {
    /// 12-bit throttle potentiometer reading
    pub velocity_raw: u16,
    /// Raw lap button level, true while held
    pub lap_pressed: bool,
}

impl SensorInputs {
    /// Read the lap button from an active-low pin
    pub fn read<P: InputPin>(velocity_raw: u16, lap_pin: &mut P) -> Result<Self, P::Error> {
        Ok(Self {
            velocity_raw,
            lap_pressed: lap_pin.is_low()?,
        })
    }
}

/// Transmit failure
///
/// A failed write ends the step. Classes due in that step that were not
/// yet written are skipped until their next period. A pending custom
/// message stays pending and is sent in full on a later step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TxError<E> {
    /// Link write failed
    Link(E),
    /// Message did not fit a frame
    Frame(FrameError),
}

/// What one step did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TxReport {
    /// Frames written to the link
    pub frames_sent: u8,
    /// The lap button registered a press
    pub lap_pressed: bool,
    /// The dashboard asked for a lap reset
    pub reset_received: bool,
    /// A console command was applied
    pub console_command: bool,
}

/// Transmitter state, driven by [`TransmitterNode::step`]
pub struct TransmitterNode<R> {
    config: TransmitConfig,
    sampler: TelemetrySampler<R>,
    sample_timer: FixedRateTimer,
    scheduler: TransmitScheduler,
    button: LapButton,
    console: ConsoleParser,
    laps: u8,
    status: StatusKind,
    telemetry: TelemetryData,
    pending_message: Option<MessageText>,
}

impl<R: RngCore> TransmitterNode<R> {
    pub fn new(config: TransmitConfig, sensors: SensorConfig, rng: R) -> Self {
        Self {
            config,
            sampler: TelemetrySampler::new(sensors, rng),
            sample_timer: FixedRateTimer::new(config.sample_period_ms),
            scheduler: TransmitScheduler::new(&config),
            button: LapButton::new(sensors.debounce_ms),
            console: ConsoleParser::new(),
            laps: 0,
            status: StatusKind::Idle,
            telemetry: TelemetryData::default(),
            pending_message: None,
        }
    }

    /// Run one loop iteration
    ///
    /// Order: lap button, console, sampling, reset requests from the
    /// dashboard, scheduled frames, then a pending custom message. Read
    /// errors on the link or console count as "no data".
    pub fn step<L, W, C>(
        &mut self,
        now_ms: u32,
        inputs: SensorInputs,
        link_rx: &mut L,
        link_tx: &mut W,
        console: &mut C,
    ) -> Result<TxReport, TxError<W::Error>>
    where
        L: ByteSource,
        W: ByteSink,
        C: ByteSource,
    {
        let mut report = TxReport::default();

        if self.button.update(inputs.lap_pressed, now_ms) {
            self.laps = self.laps.wrapping_add(1);
            report.lap_pressed = true;
        }

        while let Ok(Some(byte)) = console.read_byte() {
            if let Some(command) = self.console.feed(byte) {
                self.apply_command(command);
                report.console_command = true;
            }
        }

        if self.sample_timer.poll(now_ms) {
            let status = self.status.to_byte();
            self.telemetry = self.sampler.sample(inputs.velocity_raw, self.laps, status);
        }

        while let Ok(Some(byte)) = link_rx.read_byte() {
            if byte == RESET_REQUEST {
                self.laps = 0;
                self.status = StatusKind::Reset;
                report.reset_received = true;
            }
        }

        // Lap and status changes go out with the next frame, not the next sample
        self.telemetry.laps = self.laps;
        self.telemetry.status = self.status.to_byte();

        for class in self.scheduler.poll(now_ms) {
            if let Some(message) = self.telemetry.message(class) {
                send(link_tx, &message)?;
                report.frames_sent += 1;
            }
        }

        if let Some(text) = &self.pending_message {
            let message = Message::Text(text.clone());
            for _ in 0..self.config.message_repeats {
                send(link_tx, &message)?;
                report.frames_sent += 1;
            }
            self.pending_message = None;
        }

        Ok(report)
    }

    /// Arm a one-shot custom message and switch to the custom status
    ///
    /// Empty text changes the status but sends nothing, as an empty
    /// MESSAGE frame would be rejected by the dashboard.
    pub fn queue_message(&mut self, text: MessageText) {
        self.status = StatusKind::Custom;
        self.pending_message = if text.is_empty() { None } else { Some(text) };
    }

    pub fn set_status(&mut self, status: StatusKind) {
        self.status = status;
    }

    fn apply_command(&mut self, command: ConsoleCommand) {
        match command {
            ConsoleCommand::Idle => self.set_status(StatusKind::Idle),
            ConsoleCommand::Message(text) => self.queue_message(text),
        }
    }

    pub fn laps(&self) -> u8 {
        self.laps
    }

    pub fn status(&self) -> StatusKind {
        self.status
    }

    /// Record the next frames will carry
    pub fn telemetry(&self) -> &TelemetryData {
        &self.telemetry
    }

    pub fn has_pending_message(&self) -> bool {
        self.pending_message.is_some()
    }
}

fn send<W: ByteSink>(sink: &mut W, message: &Message) -> Result<(), TxError<W::Error>> {
    let mut buffer = [0u8; MAX_FRAME_SIZE];
    let len = message.encode(&mut buffer).map_err(TxError::Frame)?;
    sink.write_bytes(&buffer[..len]).map_err(TxError::Link)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transmit::SimRng;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;
    use lapline_hal::ByteQueue;
    use lapline_protocol::{FrameParser, MessageClass};

    type Wire = ByteQueue<2048>;

    struct Rig {
        node: TransmitterNode<SimRng>,
        link_rx: Wire,
        link_tx: Wire,
        console: Wire,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                node: TransmitterNode::new(
                    TransmitConfig::DEFAULT,
                    SensorConfig::DEFAULT,
                    SimRng::new(1),
                ),
                link_rx: Wire::new(),
                link_tx: Wire::new(),
                console: Wire::new(),
            }
        }

        fn step(&mut self, now: u32, inputs: SensorInputs) -> TxReport {
            self.node
                .step(now, inputs, &mut self.link_rx, &mut self.link_tx, &mut self.console)
                .unwrap()
        }

        fn sent(&mut self) -> std::vec::Vec<Message> {
            let mut parser = FrameParser::new();
            let mut out = std::vec::Vec::new();
            while let Some(byte) = self.link_tx.pop() {
                if let Ok(Some(frame)) = parser.feed(byte) {
                    out.push(Message::from_frame(&frame).unwrap());
                }
            }
            out
        }
    }

    fn idle_inputs() -> SensorInputs {
        SensorInputs {
            velocity_raw: 4095,
            lap_pressed: false,
        }
    }

    #[test]
    fn test_first_fast_frame_at_10ms() {
        let mut rig = Rig::new();
        assert_eq!(rig.step(5, idle_inputs()).frames_sent, 0);
        assert_eq!(rig.step(10, idle_inputs()).frames_sent, 1);

        let sent = rig.sent();
        assert_eq!(sent.len(), 1);
        let Message::Fast(fast) = sent[0] else {
            panic!("expected FAST");
        };
        assert_eq!(fast.velocity, 99.9);
        assert_eq!(fast.rpm, 529);
    }

    #[test]
    fn test_one_second_of_traffic() {
        let mut rig = Rig::new();
        for now in 0..=1000 {
            rig.step(now, idle_inputs());
        }
        let sent = rig.sent();
        let count = |class| sent.iter().filter(|m| m.class() == class).count();
        assert_eq!(count(MessageClass::Fast), 100);
        assert_eq!(count(MessageClass::Awareness), 10);
        assert_eq!(count(MessageClass::Graph), 1);
        assert_eq!(count(MessageClass::Heartbeat), 2);
        assert_eq!(count(MessageClass::Message), 0);
    }

    #[test]
    fn test_lap_button_counts_presses() {
        let mut rig = Rig::new();
        let pressed = SensorInputs {
            velocity_raw: 0,
            lap_pressed: true,
        };
        for now in 0..100 {
            rig.step(now, pressed);
        }
        for now in 100..200 {
            rig.step(now, idle_inputs());
        }
        for now in 200..300 {
            rig.step(now, pressed);
        }
        assert_eq!(rig.node.laps(), 2);
        assert_eq!(rig.node.telemetry().laps, 2);
    }

    #[test]
    fn test_reset_request_clears_laps() {
        let mut rig = Rig::new();
        let pressed = SensorInputs {
            velocity_raw: 0,
            lap_pressed: true,
        };
        for now in 0..100 {
            rig.step(now, pressed);
        }
        assert_eq!(rig.node.laps(), 1);

        rig.link_rx.write_bytes(&[RESET_REQUEST]).unwrap();
        let report = rig.step(100, idle_inputs());
        assert!(report.reset_received);
        assert_eq!(rig.node.laps(), 0);
        assert_eq!(rig.node.status(), StatusKind::Reset);

        // Next heartbeat announces the reset
        rig.sent();
        for now in 101..=200 {
            rig.step(now, idle_inputs());
        }
        assert!(rig.sent().contains(&Message::heartbeat(StatusKind::Reset)));
    }

    #[test]
    fn test_console_message_sent_twice_once() {
        let mut rig = Rig::new();
        rig.console.write_bytes(b"msg box this lap\n").unwrap();
        let report = rig.step(1, idle_inputs());
        assert!(report.console_command);
        assert_eq!(report.frames_sent, 2);
        assert_eq!(rig.node.status(), StatusKind::Custom);
        assert!(!rig.node.has_pending_message());

        let expected = Message::Text(MessageText::truncated("box this lap"));
        assert_eq!(rig.sent(), [expected.clone(), expected]);

        // One-shot: nothing more until the next command
        rig.step(2, idle_inputs());
        assert!(rig.sent().is_empty());

        rig.console.write_bytes(b"idle\r").unwrap();
        rig.step(3, idle_inputs());
        assert_eq!(rig.node.status(), StatusKind::Idle);
    }

    #[test]
    fn test_failed_message_write_stays_pending() {
        struct Refusing;

        impl ByteSink for Refusing {
            type Error = ();

            fn write_bytes(&mut self, _: &[u8]) -> Result<(), ()> {
                Err(())
            }
        }

        let mut rig = Rig::new();
        rig.console.write_bytes(b"msg pit\n").unwrap();
        let result = rig
            .node
            .step(1, idle_inputs(), &mut rig.link_rx, &mut Refusing, &mut rig.console);
        assert_eq!(result, Err(TxError::Link(())));
        assert!(rig.node.has_pending_message());

        assert_eq!(rig.step(2, idle_inputs()).frames_sent, 2);
        let expected = Message::Text(MessageText::truncated("pit"));
        assert_eq!(rig.sent(), [expected.clone(), expected]);
        assert!(!rig.node.has_pending_message());
    }

    #[test]
    fn test_empty_message_sends_nothing() {
        let mut rig = Rig::new();
        rig.console.write_bytes(b"msg \n").unwrap();
        let report = rig.step(1, idle_inputs());
        assert_eq!(report.frames_sent, 0);
        assert_eq!(rig.node.status(), StatusKind::Custom);
    }

    struct Pin {
        low: bool,
    }

    impl ErrorType for Pin {
        type Error = Infallible;
    }

    impl InputPin for Pin {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.low)
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Ok(self.low)
        }
    }

    #[test]
    fn test_inputs_read_active_low_pin() {
        let inputs = SensorInputs::read(123, &mut Pin { low: true }).unwrap();
        assert_eq!(
            inputs,
            SensorInputs {
                velocity_raw: 123,
                lap_pressed: true
            }
        );
        assert!(!SensorInputs::read(0, &mut Pin { low: false }).unwrap().lap_pressed);
    }
}
