//! Receiver main loop body

use lapline_display::{DashboardBackend, DisplayError};
use lapline_hal::{ByteSink, ByteSource};
use lapline_protocol::frame::RESET_REQUEST;

use super::link::{LinkReceiver, LinkStats};
use crate::config::DashboardConfig;
use crate::dashboard::{Fired, UpdateScheduler};
use crate::store::TelemetryStore;

/// Receiver step failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NodeError<E> {
    /// Writing the reset request failed; it stays pending
    Link(E),
    Display(DisplayError),
}

impl<E> From<DisplayError> for NodeError<E> {
    fn from(e: DisplayError) -> Self {
        NodeError::Display(e)
    }
}

/// Display node: link receiver, telemetry store and update engine
pub struct ReceiverNode {
    link: LinkReceiver,
    store: TelemetryStore,
    engine: UpdateScheduler,
    reset_pending: bool,
}

impl ReceiverNode {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            link: LinkReceiver::new(),
            store: TelemetryStore::new(),
            engine: UpdateScheduler::new(config),
            reset_pending: false,
        }
    }

    /// Ask the transmitter to zero its lap counter
    ///
    /// The request goes out on the next step.
    pub fn request_reset(&mut self) {
        self.reset_pending = true;
    }

    pub fn reset_pending(&self) -> bool {
        self.reset_pending
    }

    /// Run one loop iteration: drain the link, send a pending reset
    /// request, then update the dashboard
    ///
    /// The dashboard is updated even when the reset request cannot be
    /// written; the link error is reported after it.
    pub fn step<S, W, B>(
        &mut self,
        now_ms: u32,
        source: &mut S,
        sink: &mut W,
        backend: &mut B,
    ) -> Result<Fired, NodeError<W::Error>>
    where
        S: ByteSource,
        W: ByteSink,
        B: DashboardBackend,
    {
        self.link.poll(source, &mut self.store);

        let mut sent = Ok(());
        if self.reset_pending {
            sent = sink.write_bytes(&[RESET_REQUEST]);
            if sent.is_ok() {
                self.reset_pending = false;
            } else {
                #[cfg(feature = "defmt")]
                defmt::warn!("link: reset request not sent");
            }
        }

        let fired = self.engine.step(now_ms, &mut self.store, backend)?;
        sent.map_err(NodeError::Link)?;
        Ok(fired)
    }

    pub fn store(&self) -> &TelemetryStore {
        &self.store
    }

    pub fn link_stats(&self) -> LinkStats {
        self.link.stats()
    }

    pub fn engine(&self) -> &UpdateScheduler {
        &self.engine
    }
}

impl Default for ReceiverNode {
    fn default() -> Self {
        Self::new(&DashboardConfig::DEFAULT)
    }
}
