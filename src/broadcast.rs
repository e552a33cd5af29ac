//! Best-effort fan-out of accepted updates and derived alerts.
//!
//! Publishing never waits on subscribers. A subscriber that falls more than `capacity` messages behind loses the
//! oldest ones, one that is not connected misses them. Nothing is replayed.

use crate::{alerts::Alert, sensors::ds::SensorReading, MAX_MSGS};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::trace;

pub const TOPIC_SENSOR_UPDATE: &str = "sensor-update";
pub const TOPIC_ALERT: &str = "alert";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "topic", content = "payload")]
pub enum BroadcastMessage {
    #[serde(rename = "sensor-update")]
    SensorUpdate(SensorReading),
    #[serde(rename = "alert")]
    Alert(Alert),
}

impl BroadcastMessage {
    pub fn topic(&self) -> &'static str {
        match self {
            BroadcastMessage::SensorUpdate(_) => TOPIC_SENSOR_UPDATE,
            BroadcastMessage::Alert(_) => TOPIC_ALERT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Broadcaster {
    sender: broadcast::Sender<BroadcastMessage>,
}

impl Broadcaster {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Returns how many subscribers the message reached, 0 when nobody listens.
    pub fn publish(&self, msg: BroadcastMessage) -> usize {
        let topic = msg.topic();
        let reached = self.sender.send(msg).unwrap_or(0);
        trace!(topic, reached, "Published.");
        reached
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BroadcastMessage> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for Broadcaster {
    fn default() -> Self {
        Self::new(MAX_MSGS)
    }
}
