use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::event::{AuditAction, AuditEvent};
use admission_core::OrgId;

/// Capacity of the bounded audit channel.
pub const CAPACITY: usize = 1000;

/// Bounded, drop-on-full async audit log.
///
/// A single long-lived consumer task drains the channel and logs each event
/// as a structured record. The calling path never blocks: [`record`] is a
/// non-blocking enqueue that discards the event (with a warning) if the
/// buffer is full.
///
/// [`record`]: AuditSink::record
#[derive(Clone)]
pub struct AuditSink {
    tx: mpsc::Sender<AuditEvent>,
}

impl AuditSink {
    /// Construct a sink and spawn its consumer task. Intended to be called
    /// once at startup and shared (behind `Arc` or by cloning the sender
    /// handle) across every request-handling task.
    #[must_use]
    pub fn spawn() -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel(CAPACITY);

        let handle = tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                tracing::info!(
                    event_type = "AUDIT",
                    org_id = %event.org_id,
                    action = event.action.as_str(),
                    reason = %event.reason,
                    "audit_log"
                );
            }
        });

        (Self { tx }, handle)
    }

    /// Non-blocking enqueue. Drops the event and emits a warning if the
    /// buffer is saturated.
    pub fn record(&self, org_id: OrgId, action: AuditAction, reason: impl Into<String>) {
        let event = AuditEvent {
            org_id,
            action,
            reason: reason.into(),
        };
        if self.tx.try_send(event).is_err() {
            tracing::warn!("audit channel full, dropping event");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn records_are_observable_by_the_consumer() {
        let (sink, _handle) = AuditSink::spawn();
        sink.record(OrgId::new("pro"), AuditAction::Allowed, "");
        sink.record(OrgId::new("free-tier"), AuditAction::Denied, "organization quota exceeded");
        // Give the consumer task a chance to drain; nothing to assert on
        // directly since the sink has no read-back API (it only logs), but
        // this exercises the non-blocking enqueue path end to end.
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    #[tokio::test]
    async fn record_never_blocks_even_when_saturated() {
        // Build a sink manually with no consumer draining it, to exercise
        // the drop-on-full path deterministically.
        let (tx, _rx) = mpsc::channel(2);
        let sink = AuditSink { tx };

        sink.record(OrgId::new("a"), AuditAction::Allowed, "");
        sink.record(OrgId::new("b"), AuditAction::Allowed, "");
        // Channel now full; this third call must return immediately rather
        // than block, and the event is simply dropped.
        sink.record(OrgId::new("c"), AuditAction::Allowed, "");
    }
}
