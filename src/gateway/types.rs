//! Domain records returned by the queue gateway.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Identifies a queue by name and endpoint URL
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueueRef {
    pub name: String,
    pub url: String,
}

impl QueueRef {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// Build a reference from a queue URL; the name is the last path segment.
    pub fn from_url(url: impl Into<String>) -> Self {
        let url = url.into();
        let name = url.trim_end_matches('/').rsplit('/').next().unwrap_or_default().to_string();
        Self { name, url }
    }

    pub fn is_fifo(&self) -> bool {
        self.name.ends_with(".fifo")
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueueKind {
    #[default]
    Standard,
    Fifo,
}

impl QueueKind {
    pub fn label(self) -> &'static str {
        match self {
            QueueKind::Standard => "Standard",
            QueueKind::Fifo => "FIFO",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            QueueKind::Standard => QueueKind::Fifo,
            QueueKind::Fifo => QueueKind::Standard,
        }
    }
}

/// Dead-letter configuration parsed from the `RedrivePolicy` attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedrivePolicy {
    pub dead_letter_target_arn: String,
    pub max_receive_count: u32,
}

impl RedrivePolicy {
    /// Parse the JSON document SQS stores in `RedrivePolicy`.
    ///
    /// `maxReceiveCount` shows up both as a number and as a string depending on
    /// how the queue was configured, so both are accepted.
    pub fn parse(raw: &str) -> Option<Self> {
        let value: serde_json::Value = serde_json::from_str(raw).ok()?;
        let arn = value.get("deadLetterTargetArn")?.as_str()?.to_string();
        if arn.is_empty() {
            return None;
        }
        let max_receive_count = match value.get("maxReceiveCount") {
            Some(serde_json::Value::Number(n)) => n.as_u64().unwrap_or(0) as u32,
            Some(serde_json::Value::String(s)) => s.parse().unwrap_or(0),
            _ => 0,
        };
        Some(Self {
            dead_letter_target_arn: arn,
            max_receive_count,
        })
    }

    /// Name of the dead-letter queue (last `:` segment of the ARN)
    pub fn dead_letter_queue_name(&self) -> Option<&str> {
        let parts: Vec<&str> = self.dead_letter_target_arn.split(':').collect();
        if parts.len() < 6 {
            return None;
        }
        parts.last().copied().filter(|name| !name.is_empty())
    }
}

/// A queue with its attributes, as last fetched from the gateway
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Queue {
    pub name: String,
    pub url: String,
    pub arn: Option<String>,
    pub kind: QueueKind,
    pub visibility_timeout: Option<u32>,
    pub retention_period: Option<u32>,
    pub delay_seconds: Option<u32>,
    pub max_message_size: Option<u32>,
    pub receive_wait_time: Option<u32>,
    pub approximate_visible: u64,
    pub approximate_in_flight: u64,
    pub approximate_delayed: u64,
    pub content_based_deduplication: bool,
    pub redrive_policy: Option<RedrivePolicy>,
    pub tags: BTreeMap<String, String>,
    pub created: Option<DateTime<Utc>>,
    pub last_modified: Option<DateTime<Utc>>,
}

impl Queue {
    /// A queue known only by reference (attributes not fetched yet)
    pub fn from_ref(queue: &QueueRef) -> Self {
        Self {
            name: queue.name.clone(),
            url: queue.url.clone(),
            kind: if queue.is_fifo() { QueueKind::Fifo } else { QueueKind::Standard },
            ..Default::default()
        }
    }

    /// Build a queue record from the raw `GetQueueAttributes` map.
    pub fn from_attributes(queue: &QueueRef, attributes: &HashMap<String, String>) -> Self {
        let number = |key: &str| attributes.get(key).and_then(|v| v.parse::<u32>().ok());
        let count = |key: &str| attributes.get(key).and_then(|v| v.parse::<u64>().ok()).unwrap_or(0);
        let timestamp = |key: &str| {
            attributes
                .get(key)
                .and_then(|v| v.parse::<i64>().ok())
                .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
        };

        let fifo = attributes.get("FifoQueue").map(|v| v == "true").unwrap_or(false) || queue.is_fifo();

        Self {
            name: queue.name.clone(),
            url: queue.url.clone(),
            arn: attributes.get("QueueArn").cloned(),
            kind: if fifo { QueueKind::Fifo } else { QueueKind::Standard },
            visibility_timeout: number("VisibilityTimeout"),
            retention_period: number("MessageRetentionPeriod"),
            delay_seconds: number("DelaySeconds"),
            max_message_size: number("MaximumMessageSize"),
            receive_wait_time: number("ReceiveMessageWaitTimeSeconds"),
            approximate_visible: count("ApproximateNumberOfMessages"),
            approximate_in_flight: count("ApproximateNumberOfMessagesNotVisible"),
            approximate_delayed: count("ApproximateNumberOfMessagesDelayed"),
            content_based_deduplication: attributes
                .get("ContentBasedDeduplication")
                .map(|v| v == "true")
                .unwrap_or(false),
            redrive_policy: attributes.get("RedrivePolicy").and_then(|raw| RedrivePolicy::parse(raw)),
            tags: BTreeMap::new(),
            created: timestamp("CreatedTimestamp"),
            last_modified: timestamp("LastModifiedTimestamp"),
        }
    }

    pub fn queue_ref(&self) -> QueueRef {
        QueueRef::new(self.name.clone(), self.url.clone())
    }

    pub fn is_fifo(&self) -> bool {
        self.kind == QueueKind::Fifo
    }

    /// Attribute rows for the details table, tags last and sorted
    pub fn attribute_rows(&self) -> Vec<(String, String)> {
        let mut rows = vec![
            ("Name".to_string(), self.name.clone()),
            ("Type".to_string(), self.kind.label().to_string()),
        ];
        if let Some(arn) = &self.arn {
            rows.push(("ARN".to_string(), arn.clone()));
        }
        let seconds = [
            ("Visibility timeout", self.visibility_timeout),
            ("Retention period", self.retention_period),
            ("Delivery delay", self.delay_seconds),
            ("Receive wait time", self.receive_wait_time),
        ];
        for (label, value) in seconds {
            if let Some(value) = value {
                rows.push((label.to_string(), format!("{value}s")));
            }
        }
        if let Some(size) = self.max_message_size {
            rows.push(("Max message size".to_string(), format!("{size} bytes")));
        }
        rows.push(("Messages available".to_string(), self.approximate_visible.to_string()));
        rows.push(("Messages in flight".to_string(), self.approximate_in_flight.to_string()));
        rows.push(("Messages delayed".to_string(), self.approximate_delayed.to_string()));
        if self.is_fifo() {
            rows.push((
                "Content deduplication".to_string(),
                self.content_based_deduplication.to_string(),
            ));
        }
        if let Some(policy) = &self.redrive_policy {
            rows.push(("Dead-letter target".to_string(), policy.dead_letter_target_arn.clone()));
            rows.push(("Max receive count".to_string(), policy.max_receive_count.to_string()));
        }
        if let Some(created) = self.created {
            rows.push(("Created".to_string(), created.format("%Y-%m-%d %H:%M:%S").to_string()));
        }
        if let Some(modified) = self.last_modified {
            rows.push(("Last modified".to_string(), modified.format("%Y-%m-%d %H:%M:%S").to_string()));
        }
        for (key, value) in &self.tags {
            rows.push((format!("tag:{key}"), value.clone()));
        }
        rows
    }
}

/// The handle needed to delete or requeue one received message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRef {
    pub id: String,
    pub receipt_handle: String,
}

/// A received message
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub body: String,
    pub md5_of_body: String,
    pub receipt_handle: String,
    pub receive_count: u32,
    pub sent_at: Option<DateTime<Utc>>,
    pub first_received_at: Option<DateTime<Utc>>,
    pub group_id: Option<String>,
    pub deduplication_id: Option<String>,
    pub sequence_number: Option<String>,
    pub system_attributes: BTreeMap<String, String>,
    pub custom_attributes: BTreeMap<String, String>,
}

impl Message {
    /// Fill the typed fields from the SQS system attribute map.
    pub fn apply_system_attributes(&mut self, attributes: HashMap<String, String>) {
        let millis = |key: &str| {
            attributes
                .get(key)
                .and_then(|v| v.parse::<i64>().ok())
                .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
        };
        self.sent_at = millis("SentTimestamp");
        self.first_received_at = millis("ApproximateFirstReceiveTimestamp");
        self.receive_count = attributes
            .get("ApproximateReceiveCount")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);
        self.group_id = attributes.get("MessageGroupId").cloned();
        self.deduplication_id = attributes.get("MessageDeduplicationId").cloned();
        self.sequence_number = attributes.get("SequenceNumber").cloned();
        self.system_attributes = attributes.into_iter().collect();
    }

    pub fn message_ref(&self) -> MessageRef {
        MessageRef {
            id: self.id.clone(),
            receipt_handle: self.receipt_handle.clone(),
        }
    }

    pub fn body_size(&self) -> usize {
        self.body.len()
    }

    /// First line of the body, truncated for list display
    pub fn preview(&self, max_chars: usize) -> String {
        let first_line = self.body.lines().next().unwrap_or_default();
        if first_line.chars().count() > max_chars {
            let truncated: String = first_line.chars().take(max_chars.saturating_sub(3)).collect();
            format!("{truncated}...")
        } else {
            first_line.to_string()
        }
    }

    /// System attributes not already shown as typed fields
    pub fn extra_system_attributes(&self) -> impl Iterator<Item = (&String, &String)> {
        const SHOWN: [&str; 6] = [
            "SentTimestamp",
            "ApproximateFirstReceiveTimestamp",
            "ApproximateReceiveCount",
            "MessageGroupId",
            "MessageDeduplicationId",
            "SequenceNumber",
        ];
        self.system_attributes
            .iter()
            .filter(|(name, _)| !SHOWN.contains(&name.as_str()))
    }
}

/// Arguments for sending one message
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SendMessageInput {
    pub body: String,
    pub delay_seconds: u32,
    pub group_id: Option<String>,
    pub deduplication_id: Option<String>,
    pub attributes: BTreeMap<String, String>,
}

impl SendMessageInput {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            ..Default::default()
        }
    }

    /// Re-send input for moving a received message elsewhere
    pub fn from_message(message: &Message) -> Self {
        Self {
            body: message.body.clone(),
            delay_seconds: 0,
            group_id: message.group_id.clone(),
            deduplication_id: message.deduplication_id.clone(),
            attributes: message.custom_attributes.clone(),
        }
    }
}

/// User-controllable settings for a new queue
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueConfig {
    pub name: String,
    pub kind: QueueKind,
    pub visibility_timeout: Option<u32>,
    pub retention_period: Option<u32>,
    pub delay_seconds: Option<u32>,
    pub max_message_size: Option<u32>,
    pub receive_wait_time: Option<u32>,
    pub content_based_deduplication: bool,
    pub deduplication_scope: Option<String>,
    pub fifo_throughput_limit: Option<String>,
}

impl QueueConfig {
    /// The name SQS expects; FIFO queues must end in `.fifo`.
    pub fn queue_name(&self) -> String {
        match self.kind {
            QueueKind::Fifo if !self.name.ends_with(".fifo") => format!("{}.fifo", self.name),
            _ => self.name.clone(),
        }
    }

    /// Only explicitly set attributes are sent; SQS applies its defaults otherwise.
    pub fn attributes(&self) -> BTreeMap<String, String> {
        let mut attributes = BTreeMap::new();
        let numeric = [
            ("VisibilityTimeout", self.visibility_timeout),
            ("MessageRetentionPeriod", self.retention_period),
            ("DelaySeconds", self.delay_seconds),
            ("MaximumMessageSize", self.max_message_size),
            ("ReceiveMessageWaitTimeSeconds", self.receive_wait_time),
        ];
        for (key, value) in numeric {
            if let Some(value) = value {
                attributes.insert(key.to_string(), value.to_string());
            }
        }
        if self.kind == QueueKind::Fifo {
            attributes.insert("FifoQueue".to_string(), "true".to_string());
            if self.content_based_deduplication {
                attributes.insert("ContentBasedDeduplication".to_string(), "true".to_string());
            }
            if let Some(scope) = &self.deduplication_scope {
                attributes.insert("DeduplicationScope".to_string(), scope.clone());
            }
            if let Some(limit) = &self.fifo_throughput_limit {
                attributes.insert("FifoThroughputLimit".to_string(), limit.clone());
            }
        }
        attributes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_ref_from_url() {
        let queue = QueueRef::from_url("https://sqs.eu-west-1.amazonaws.com/123456789012/orders.fifo");
        assert_eq!(queue.name, "orders.fifo");
        assert!(queue.is_fifo());
    }

    #[test]
    fn test_redrive_policy_accepts_string_and_number_counts() {
        let numeric = RedrivePolicy::parse(r#"{"deadLetterTargetArn":"arn:aws:sqs:us-east-1:1:dlq","maxReceiveCount":5}"#)
            .unwrap();
        assert_eq!(numeric.max_receive_count, 5);
        assert_eq!(numeric.dead_letter_queue_name(), Some("dlq"));

        let textual =
            RedrivePolicy::parse(r#"{"deadLetterTargetArn":"arn:aws:sqs:us-east-1:1:dlq","maxReceiveCount":"3"}"#)
                .unwrap();
        assert_eq!(textual.max_receive_count, 3);

        assert!(RedrivePolicy::parse("{}").is_none());
    }

    #[test]
    fn test_queue_from_attributes() {
        let queue_ref = QueueRef::new("orders", "http://localhost:4566/000000000000/orders");
        let mut attributes = HashMap::new();
        attributes.insert("VisibilityTimeout".to_string(), "30".to_string());
        attributes.insert("ApproximateNumberOfMessages".to_string(), "7".to_string());
        attributes.insert("CreatedTimestamp".to_string(), "1700000000".to_string());

        let queue = Queue::from_attributes(&queue_ref, &attributes);
        assert_eq!(queue.visibility_timeout, Some(30));
        assert_eq!(queue.approximate_visible, 7);
        assert_eq!(queue.kind, QueueKind::Standard);
        assert!(queue.created.is_some());
        assert!(queue.redrive_policy.is_none());
    }

    #[test]
    fn test_queue_config_attributes_only_contain_set_values() {
        let config = QueueConfig {
            name: "orders".to_string(),
            visibility_timeout: Some(30),
            ..Default::default()
        };
        let attributes = config.attributes();
        assert_eq!(attributes.len(), 1);
        assert_eq!(attributes.get("VisibilityTimeout").map(String::as_str), Some("30"));
        assert_eq!(config.queue_name(), "orders");
    }

    #[test]
    fn test_fifo_queue_config_appends_suffix() {
        let config = QueueConfig {
            name: "events".to_string(),
            kind: QueueKind::Fifo,
            content_based_deduplication: true,
            ..Default::default()
        };
        assert_eq!(config.queue_name(), "events.fifo");
        assert_eq!(config.attributes().get("FifoQueue").map(String::as_str), Some("true"));
        assert_eq!(
            config.attributes().get("ContentBasedDeduplication").map(String::as_str),
            Some("true")
        );
    }

    #[test]
    fn test_message_system_attributes() {
        let mut message = Message::default();
        let mut attributes = HashMap::new();
        attributes.insert("SentTimestamp".to_string(), "1700000000000".to_string());
        attributes.insert("ApproximateReceiveCount".to_string(), "4".to_string());
        attributes.insert("MessageGroupId".to_string(), "g1".to_string());
        attributes.insert("SenderId".to_string(), "AIDA".to_string());
        message.apply_system_attributes(attributes);

        assert_eq!(message.receive_count, 4);
        assert_eq!(message.group_id.as_deref(), Some("g1"));
        assert!(message.sent_at.is_some());
        let extra: Vec<_> = message.extra_system_attributes().map(|(k, _)| k.as_str()).collect();
        assert_eq!(extra, vec!["SenderId"]);
    }
}
