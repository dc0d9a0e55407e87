//! Form state for queue creation and message sending, with validation.
//!
//! Validation runs before any task is dispatched; a failure leaves the form
//! as typed and returns the message shown inline.

use crate::constants::{
    BATCH_SEPARATOR, DEDUPLICATION_SCOPES, DELAY_SECONDS_RANGE, ERROR_BODY_REQUIRED, ERROR_BODY_TOO_LARGE,
    ERROR_NAME_FIFO_SUFFIX, ERROR_NAME_INVALID, ERROR_NAME_REQUIRED, FIFO_DEFAULT_GROUP_ID, FIFO_THROUGHPUT_LIMITS, MAX_MESSAGE_BYTES, MAX_MESSAGE_SIZE_RANGE, MAX_QUEUE_NAME_LEN,
    RECEIVE_WAIT_TIME_RANGE, RETENTION_PERIOD_RANGE, VISIBILITY_TIMEOUT_RANGE,
};
use crate::gateway::{QueueConfig, QueueKind, QueuePreset, SendMessageInput};
use std::ops::RangeInclusive;

pub type ValidationError = String;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CreateField {
    #[default]
    Name,
    Kind,
    Preset,
    VisibilityTimeout,
    RetentionPeriod,
    DelaySeconds,
    MaxMessageSize,
    ReceiveWaitTime,
    ContentDeduplication,
    DeduplicationScope,
    FifoThroughputLimit,
}

impl CreateField {
    pub const ALL: [CreateField; 11] = [
        CreateField::Name,
        CreateField::Kind,
        CreateField::Preset,
        CreateField::VisibilityTimeout,
        CreateField::RetentionPeriod,
        CreateField::DelaySeconds,
        CreateField::MaxMessageSize,
        CreateField::ReceiveWaitTime,
        CreateField::ContentDeduplication,
        CreateField::DeduplicationScope,
        CreateField::FifoThroughputLimit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CreateField::Name => "Name",
            CreateField::Kind => "Type",
            CreateField::Preset => "Preset",
            CreateField::VisibilityTimeout => "Visibility timeout (s)",
            CreateField::RetentionPeriod => "Retention period (s)",
            CreateField::DelaySeconds => "Delivery delay (s)",
            CreateField::MaxMessageSize => "Max message size (bytes)",
            CreateField::ReceiveWaitTime => "Receive wait time (s)",
            CreateField::ContentDeduplication => "Content deduplication",
            CreateField::DeduplicationScope => "Deduplication scope",
            CreateField::FifoThroughputLimit => "Throughput limit",
        }
    }

    /// Fields changed with Left/Right rather than typed into
    pub fn is_choice(self) -> bool {
        matches!(
            self,
            CreateField::Kind
                | CreateField::Preset
                | CreateField::ContentDeduplication
                | CreateField::DeduplicationScope
                | CreateField::FifoThroughputLimit
        )
    }

    pub fn is_fifo_only(self) -> bool {
        matches!(
            self,
            CreateField::ContentDeduplication | CreateField::DeduplicationScope | CreateField::FifoThroughputLimit
        )
    }
}

/// Queue creation form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateQueueForm {
    pub name: String,
    pub kind: QueueKind,
    pub preset: QueuePreset,
    pub visibility_timeout: String,
    pub retention_period: String,
    pub delay_seconds: String,
    pub max_message_size: String,
    pub receive_wait_time: String,
    pub content_based_deduplication: bool,
    /// `None` leaves the SQS default in place
    pub deduplication_scope: Option<String>,
    pub fifo_throughput_limit: Option<String>,
    pub focus: CreateField,
    pub error: Option<ValidationError>,
}

impl CreateQueueForm {
    /// Fields the user can currently reach; FIFO-only fields are skipped for standard queues
    pub fn fields(&self) -> Vec<CreateField> {
        CreateField::ALL
            .into_iter()
            .filter(|field| !field.is_fifo_only() || self.kind == QueueKind::Fifo)
            .collect()
    }

    pub fn next_field(&mut self) {
        let fields = self.fields();
        let index = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = fields[(index + 1) % fields.len()];
    }

    pub fn prev_field(&mut self) {
        let fields = self.fields();
        let index = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = fields[(index + fields.len() - 1) % fields.len()];
    }

    fn text_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            CreateField::Name => Some(&mut self.name),
            CreateField::VisibilityTimeout => Some(&mut self.visibility_timeout),
            CreateField::RetentionPeriod => Some(&mut self.retention_period),
            CreateField::DelaySeconds => Some(&mut self.delay_seconds),
            CreateField::MaxMessageSize => Some(&mut self.max_message_size),
            CreateField::ReceiveWaitTime => Some(&mut self.receive_wait_time),
            CreateField::Kind
            | CreateField::Preset
            | CreateField::ContentDeduplication
            | CreateField::DeduplicationScope
            | CreateField::FifoThroughputLimit => None,
        }
    }

    /// Type a character into the focused text field; numeric fields take digits only.
    pub fn insert_char(&mut self, c: char) {
        let numeric = self.focus != CreateField::Name;
        if let Some(text) = self.text_mut() {
            if !numeric || c.is_ascii_digit() {
                text.push(c);
            }
        }
        self.error = None;
    }

    pub fn backspace(&mut self) {
        if let Some(text) = self.text_mut() {
            text.pop();
        }
        self.error = None;
    }

    /// Left/Right on a choice field. `forward` picks the cycling direction.
    pub fn cycle(&mut self, forward: bool) {
        match self.focus {
            CreateField::Kind => {
                self.kind = self.kind.toggle();
                if self.kind == QueueKind::Standard {
                    self.content_based_deduplication = false;
                    self.deduplication_scope = None;
                    self.fifo_throughput_limit = None;
                }
            }
            CreateField::Preset => {
                let preset = if forward { self.preset.next() } else { self.preset.previous() };
                self.apply_preset(preset);
            }
            CreateField::ContentDeduplication => {
                self.content_based_deduplication = !self.content_based_deduplication;
            }
            CreateField::DeduplicationScope => {
                self.deduplication_scope = cycle_option(&self.deduplication_scope, &DEDUPLICATION_SCOPES, forward);
            }
            CreateField::FifoThroughputLimit => {
                self.fifo_throughput_limit =
                    cycle_option(&self.fifo_throughput_limit, &FIFO_THROUGHPUT_LIMITS, forward);
            }
            _ => {}
        }
        self.error = None;
    }

    /// Reset the attribute fields to what `preset` prescribes; the name is kept.
    pub fn apply_preset(&mut self, preset: QueuePreset) {
        let mut config = QueueConfig::default();
        preset.apply(&mut config);

        let show = |value: Option<u32>| value.map(|v| v.to_string()).unwrap_or_default();
        self.preset = preset;
        self.kind = config.kind;
        self.visibility_timeout = show(config.visibility_timeout);
        self.retention_period = show(config.retention_period);
        self.delay_seconds = show(config.delay_seconds);
        self.max_message_size = show(config.max_message_size);
        self.receive_wait_time = show(config.receive_wait_time);
        self.content_based_deduplication = config.content_based_deduplication;
        self.deduplication_scope = config.deduplication_scope;
        self.fifo_throughput_limit = config.fifo_throughput_limit;
    }

    /// Validate and build the queue configuration to create.
    pub fn to_config(&self) -> Result<QueueConfig, ValidationError> {
        let name = self.name.trim();
        validate_queue_name(name, self.kind)?;

        Ok(QueueConfig {
            name: name.to_string(),
            kind: self.kind,
            visibility_timeout: parse_in_range(
                CreateField::VisibilityTimeout.label(),
                &self.visibility_timeout,
                VISIBILITY_TIMEOUT_RANGE,
            )?,
            retention_period: parse_in_range(
                CreateField::RetentionPeriod.label(),
                &self.retention_period,
                RETENTION_PERIOD_RANGE,
            )?,
            delay_seconds: parse_in_range(CreateField::DelaySeconds.label(), &self.delay_seconds, DELAY_SECONDS_RANGE)?,
            max_message_size: parse_in_range(
                CreateField::MaxMessageSize.label(),
                &self.max_message_size,
                MAX_MESSAGE_SIZE_RANGE,
            )?,
            receive_wait_time: parse_in_range(
                CreateField::ReceiveWaitTime.label(),
                &self.receive_wait_time,
                RECEIVE_WAIT_TIME_RANGE,
            )?,
            content_based_deduplication: self.kind == QueueKind::Fifo && self.content_based_deduplication,
            deduplication_scope: self.deduplication_scope.clone().filter(|_| self.kind == QueueKind::Fifo),
            fifo_throughput_limit: self.fifo_throughput_limit.clone().filter(|_| self.kind == QueueKind::Fifo),
        })
    }
}

/// Step through `None` followed by each of `options`, wrapping at both ends.
fn cycle_option(current: &Option<String>, options: &[&str], forward: bool) -> Option<String> {
    let slots = options.len() + 1;
    let index = current
        .as_deref()
        .and_then(|value| options.iter().position(|option| *option == value))
        .map_or(0, |position| position + 1);
    let next = if forward { (index + 1) % slots } else { (index + slots - 1) % slots };
    next.checked_sub(1).map(|position| options[position].to_string())
}

/// Letters, digits, `-` and `_`; at most 80 characters including the `.fifo`
/// suffix FIFO queues get. Only FIFO queues may carry that suffix.
pub fn validate_queue_name(name: &str, kind: QueueKind) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ERROR_NAME_REQUIRED.to_string());
    }
    let base = match name.strip_suffix(".fifo") {
        Some(_) if kind == QueueKind::Standard => return Err(ERROR_NAME_FIFO_SUFFIX.to_string()),
        Some(base) => base,
        None => name,
    };
    let full_len = match kind {
        QueueKind::Fifo => base.len() + ".fifo".len(),
        QueueKind::Standard => base.len(),
    };
    let valid = !base.is_empty()
        && full_len <= MAX_QUEUE_NAME_LEN
        && base.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(ERROR_NAME_INVALID.to_string())
    }
}

/// Empty input means "use the service default".
fn parse_in_range(label: &str, raw: &str, range: RangeInclusive<u32>) -> Result<Option<u32>, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let value: u32 = raw
        .parse()
        .map_err(|_| format!("{label} must be a whole number"))?;
    if !range.contains(&value) {
        return Err(format!(
            "{label} must be between {} and {}",
            range.start(),
            range.end()
        ));
    }
    Ok(Some(value))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MessageField {
    #[default]
    Body,
    DelaySeconds,
    GroupId,
    DeduplicationId,
}

impl MessageField {
    pub fn label(self) -> &'static str {
        match self {
            MessageField::Body => "Body",
            MessageField::DelaySeconds => "Delay (s)",
            MessageField::GroupId => "Group id",
            MessageField::DeduplicationId => "Deduplication id",
        }
    }
}

/// Message send form; bodies separated by `---` are sent as a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageCreateForm {
    pub body: String,
    pub delay_seconds: String,
    pub group_id: String,
    pub deduplication_id: String,
    pub focus: MessageField,
    pub error: Option<ValidationError>,
}

impl MessageCreateForm {
    /// FIFO-only fields are hidden for standard queues
    pub fn fields(fifo: bool) -> Vec<MessageField> {
        let mut fields = vec![MessageField::Body, MessageField::DelaySeconds];
        if fifo {
            fields.push(MessageField::GroupId);
            fields.push(MessageField::DeduplicationId);
        }
        fields
    }

    pub fn next_field(&mut self, fifo: bool) {
        let fields = Self::fields(fifo);
        let index = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = fields[(index + 1) % fields.len()];
    }

    pub fn prev_field(&mut self, fifo: bool) {
        let fields = Self::fields(fifo);
        let index = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = fields[(index + fields.len() - 1) % fields.len()];
    }

    pub fn insert_char(&mut self, c: char) {
        match self.focus {
            MessageField::Body => self.body.push(c),
            MessageField::DelaySeconds if c.is_ascii_digit() => self.delay_seconds.push(c),
            MessageField::DelaySeconds => {}
            MessageField::GroupId => self.group_id.push(c),
            MessageField::DeduplicationId => self.deduplication_id.push(c),
        }
        self.error = None;
    }

    pub fn backspace(&mut self) {
        match self.focus {
            MessageField::Body => self.body.pop(),
            MessageField::DelaySeconds => self.delay_seconds.pop(),
            MessageField::GroupId => self.group_id.pop(),
            MessageField::DeduplicationId => self.deduplication_id.pop(),
        };
        self.error = None;
    }

    /// Bytes left before the body reaches the SQS limit (negative when over)
    pub fn bytes_remaining(&self) -> i64 {
        MAX_MESSAGE_BYTES as i64 - self.body.len() as i64
    }

    /// Validate and build one send input per body.
    ///
    /// FIFO queues get the `default` group when none is given, and a fresh
    /// deduplication id per body unless content-based deduplication is on.
    pub fn to_inputs(&self, fifo: bool, content_dedup: bool) -> Result<Vec<SendMessageInput>, ValidationError> {
        let bodies = split_bodies(&self.body);
        if bodies.is_empty() {
            return Err(ERROR_BODY_REQUIRED.to_string());
        }
        if bodies.iter().any(|body| body.len() > MAX_MESSAGE_BYTES) {
            return Err(ERROR_BODY_TOO_LARGE.to_string());
        }
        let delay_seconds =
            parse_in_range(MessageField::DelaySeconds.label(), &self.delay_seconds, DELAY_SECONDS_RANGE)?.unwrap_or(0);
        if fifo && delay_seconds > 0 {
            return Err("FIFO queues do not support per-message delay".to_string());
        }

        let group_id = fifo.then(|| {
            let group = self.group_id.trim();
            if group.is_empty() {
                FIFO_DEFAULT_GROUP_ID.to_string()
            } else {
                group.to_string()
            }
        });
        let explicit_dedup = self.deduplication_id.trim();
        let batch = bodies.len() > 1;

        Ok(bodies
            .into_iter()
            .enumerate()
            .map(|(index, body)| {
                let deduplication_id = match (fifo, explicit_dedup.is_empty()) {
                    (false, _) => None,
                    (true, false) if batch => Some(format!("{explicit_dedup}-{}", index + 1)),
                    (true, false) => Some(explicit_dedup.to_string()),
                    (true, true) if content_dedup => None,
                    (true, true) => Some(uuid::Uuid::new_v4().to_string()),
                };
                SendMessageInput {
                    body,
                    delay_seconds,
                    group_id: group_id.clone(),
                    deduplication_id,
                    attributes: Default::default(),
                }
            })
            .collect())
    }
}

/// Split raw input on `---`; parts are trimmed and empty parts dropped.
pub fn split_bodies(raw: &str) -> Vec<String> {
    raw.replace("\r\n", "\n")
        .split(BATCH_SEPARATOR)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}
