//! Constants used throughout the application
//!
//! User-visible strings, SQS service limits and the validation ranges applied
//! to form input before anything is sent.

use std::ops::RangeInclusive;

// Success Messages
pub const SUCCESS_QUEUE_CREATED: &str = "✅ Queue created";
pub const SUCCESS_QUEUES_DELETED: &str = "✅ Deleted queues";
pub const SUCCESS_MESSAGES_SENT: &str = "✅ Sent messages";
pub const SUCCESS_MESSAGES_DELETED: &str = "✅ Deleted messages";
pub const SUCCESS_MESSAGES_MOVED: &str = "✅ Moved messages to dead-letter queue";
pub const SUCCESS_MESSAGE_REQUEUED: &str = "✅ Message returned to queue";

// Error Messages
pub const ERROR_LIST_QUEUES_FAILED: &str = "❌ Failed to list queues";
pub const ERROR_FETCH_ATTRIBUTES_FAILED: &str = "❌ Failed to fetch queue attributes";
pub const ERROR_FETCH_MESSAGES_FAILED: &str = "❌ Failed to fetch messages";
pub const ERROR_QUEUE_CREATE_FAILED: &str = "❌ Failed to create queue";
pub const ERROR_REQUEUE_FAILED: &str = "❌ Failed to requeue message";
pub const ERROR_AUDIT_WRITE_FAILED: &str = "⚠ Deleted, but audit log write failed";
pub const ERROR_NOTHING_SELECTED: &str = "Nothing selected";

// Status Messages (shown while a blocking operation is pending)
pub const STATUS_CREATING_QUEUE: &str = "Creating queue...";
pub const STATUS_DELETING_QUEUES: &str = "Deleting queues...";
pub const STATUS_SENDING_MESSAGES: &str = "Sending messages...";
pub const STATUS_DELETING_MESSAGES: &str = "Deleting messages...";
pub const STATUS_MOVING_MESSAGES: &str = "Moving messages...";
pub const STATUS_REQUEUEING_MESSAGE: &str = "Requeueing message...";

// Validation Error Messages
pub const ERROR_NAME_REQUIRED: &str = "Queue name is required";
pub const ERROR_NAME_INVALID: &str = "Queue name may only contain letters, digits, '-' and '_' (max 80)";
pub const ERROR_NAME_FIFO_SUFFIX: &str = "Only FIFO queues may end in '.fifo'";
pub const ERROR_BODY_REQUIRED: &str = "Message body is required";
pub const ERROR_BODY_TOO_LARGE: &str = "Message body exceeds 256 KiB";

// UI Messages
pub const CONFIG_GENERATED: &str = "✅ Generated default configuration file";
pub const ERROR_GATEWAY_UNREACHABLE: &str = "❌ Could not reach the queue service";

/// Default file name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "sqsdeck.toml";
/// Directory name under the platform config/data directories
pub const APP_DIR_NAME: &str = "sqsdeck";
/// Shared credentials profile used when neither `AWS_PROFILE` nor the config names one
pub const DEFAULT_PROFILE: &str = "default";

// SQS limits
pub const MAX_QUEUE_NAME_LEN: usize = 80;
pub const MAX_MESSAGE_BYTES: usize = 262_144;
/// ReceiveMessage returns at most this many messages per call
pub const MAX_RECEIVE_COUNT: u32 = 10;
pub const FIFO_DEFAULT_GROUP_ID: &str = "default";
/// Values for a FIFO queue's DeduplicationScope attribute
pub const DEDUPLICATION_SCOPES: [&str; 2] = ["messageGroup", "queue"];
/// Values for a FIFO queue's FifoThroughputLimit attribute
pub const FIFO_THROUGHPUT_LIMITS: [&str; 2] = ["perMessageGroupId", "perQueue"];
/// Separator line between bodies in a batch send
pub const BATCH_SEPARATOR: &str = "---";

// Attribute ranges accepted by the create form (seconds unless noted)
pub const VISIBILITY_TIMEOUT_RANGE: RangeInclusive<u32> = 0..=43_200;
pub const RETENTION_PERIOD_RANGE: RangeInclusive<u32> = 60..=1_209_600;
pub const DELAY_SECONDS_RANGE: RangeInclusive<u32> = 0..=900;
/// Bytes
pub const MAX_MESSAGE_SIZE_RANGE: RangeInclusive<u32> = 1_024..=262_144;
pub const RECEIVE_WAIT_TIME_RANGE: RangeInclusive<u32> = 0..=20;

// Config bounds
pub const REFRESH_INTERVAL_RANGE: RangeInclusive<u64> = 1..=3_600;
pub const REQUEST_TIMEOUT_RANGE: RangeInclusive<u64> = 1..=300;
pub const REFRESH_INTERVAL_ENV: &str = "SQSDECK_REFRESH_INTERVAL";

// UI Layout Constants
/// Characters of message body shown per row in the message table
pub const MESSAGE_PREVIEW_CHARS: usize = 60;
