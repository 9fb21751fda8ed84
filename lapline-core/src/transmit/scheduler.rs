//! Multi-rate transmit scheduler
//!
//! One fixed-rate timer per scheduled message class. Custom messages are
//! not scheduled; the node sends them on demand.

use heapless::Vec;
use lapline_protocol::MessageClass;

use crate::config::TransmitConfig;
use crate::timing::FixedRateTimer;

/// Classes due in one poll, in send order
pub type DueClasses = Vec<MessageClass, 4>;

/// Decides which telemetry frames go out on each tick
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransmitScheduler {
    fast: FixedRateTimer,
    awareness: FixedRateTimer,
    graph: FixedRateTimer,
    heartbeat: FixedRateTimer,
}

impl TransmitScheduler {
    pub fn new(config: &TransmitConfig) -> Self {
        Self {
            fast: FixedRateTimer::new(config.fast_period_ms),
            awareness: FixedRateTimer::new(config.awareness_period_ms),
            graph: FixedRateTimer::new(config.graph_period_ms),
            heartbeat: FixedRateTimer::with_threshold(
                config.heartbeat_threshold_ms,
                config.heartbeat_step_ms,
            ),
        }
    }

    /// Poll every timer once
    ///
    /// Each class appears at most once per call. A class that fell behind
    /// catches up one send per call.
    pub fn poll(&mut self, now_ms: u32) -> DueClasses {
        let mut due = DueClasses::new();
        let timers = [
            (&mut self.fast, MessageClass::Fast),
            (&mut self.awareness, MessageClass::Awareness),
            (&mut self.graph, MessageClass::Graph),
            (&mut self.heartbeat, MessageClass::Heartbeat),
        ];
        for (timer, class) in timers {
            if timer.poll(now_ms) {
                // Capacity equals the number of timers
                let _ = due.push(class);
            }
        }
        due
    }
}

impl Default for TransmitScheduler {
    fn default() -> Self {
        Self::new(&TransmitConfig::DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn count(scheduler: &mut TransmitScheduler, times: impl Iterator<Item = u32>) -> [u32; 4] {
        let mut counts = [0u32; 4];
        for now in times {
            for class in scheduler.poll(now) {
                let slot = match class {
                    MessageClass::Fast => 0,
                    MessageClass::Awareness => 1,
                    MessageClass::Graph => 2,
                    MessageClass::Heartbeat => 3,
                    MessageClass::Message => unreachable!(),
                };
                counts[slot] += 1;
            }
        }
        counts
    }

    #[test]
    fn test_nothing_due_at_start() {
        let mut scheduler = TransmitScheduler::default();
        assert!(scheduler.poll(0).is_empty());
        assert!(scheduler.poll(9).is_empty());
    }

    #[test]
    fn test_send_order() {
        let mut scheduler = TransmitScheduler::default();
        // Jump straight to 1000 ms: everything is due on the first poll
        let due = scheduler.poll(1000);
        assert_eq!(
            due.as_slice(),
            &[
                MessageClass::Fast,
                MessageClass::Awareness,
                MessageClass::Graph,
                MessageClass::Heartbeat
            ]
        );
    }

    #[test]
    fn test_one_second_every_millisecond() {
        let mut scheduler = TransmitScheduler::default();
        let counts = count(&mut scheduler, 0..=1000);
        // Heartbeats at 200 and 700
        assert_eq!(counts, [100, 10, 1, 2]);
    }

    #[test]
    fn test_heartbeat_cadence() {
        let mut scheduler = TransmitScheduler::default();
        let mut heartbeats = Vec::<u32, 8>::new();
        for now in 0..=2500 {
            if scheduler.poll(now).contains(&MessageClass::Heartbeat) {
                heartbeats.push(now).unwrap();
            }
        }
        assert_eq!(heartbeats.as_slice(), &[200, 700, 1200, 1700, 2200]);
    }

    proptest! {
        #[test]
        fn prop_periodic_classes_do_not_drift(
            steps in proptest::collection::vec(1u32..10, 1..3000),
        ) {
            let mut scheduler = TransmitScheduler::default();
            let mut now = 0u32;
            let mut counts = [0u32; 3];
            for step in steps {
                now += step;
                let due = scheduler.poll(now);
                for (slot, class) in [MessageClass::Fast, MessageClass::Awareness, MessageClass::Graph]
                    .iter()
                    .enumerate()
                {
                    if due.contains(class) {
                        counts[slot] += 1;
                    }
                }
                prop_assert!(counts[0] <= now / 10);
                prop_assert!(counts[1] <= now / 100);
                prop_assert!(counts[2] <= now / 1000);
            }
            prop_assert_eq!(counts, [now / 10, now / 100, now / 1000]);
        }
    }
}
