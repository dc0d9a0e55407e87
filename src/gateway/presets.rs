//! Predefined queue configurations offered by the create form.

use super::types::{QueueConfig, QueueKind};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QueuePreset {
    #[default]
    None,
    /// Minimum retention, for fire-and-forget work queues
    ShortLived,
    /// Content deduplication scoped per message group
    HighThroughputFifo,
}

impl QueuePreset {
    pub const ALL: [QueuePreset; 3] = [QueuePreset::None, QueuePreset::ShortLived, QueuePreset::HighThroughputFifo];

    pub fn label(self) -> &'static str {
        match self {
            QueuePreset::None => "None",
            QueuePreset::ShortLived => "Short-lived",
            QueuePreset::HighThroughputFifo => "High throughput FIFO",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|preset| preset.label() == label)
    }

    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        let index = Self::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Self::ALL[(index + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Overlay the preset on `config`, keeping the name.
    pub fn apply(self, config: &mut QueueConfig) {
        match self {
            QueuePreset::None => {}
            QueuePreset::ShortLived => {
                config.retention_period = Some(60);
            }
            QueuePreset::HighThroughputFifo => {
                config.kind = QueueKind::Fifo;
                config.content_based_deduplication = true;
                config.deduplication_scope = Some("messageGroup".to_string());
                config.fifo_throughput_limit = Some("perMessageGroupId".to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_lookup() {
        assert_eq!(QueuePreset::from_label("Short-lived"), Some(QueuePreset::ShortLived));
        assert_eq!(QueuePreset::from_label("non-existent"), None);
    }

    #[test]
    fn test_preset_cycle_wraps() {
        assert_eq!(QueuePreset::HighThroughputFifo.next(), QueuePreset::None);
        assert_eq!(QueuePreset::None.previous(), QueuePreset::HighThroughputFifo);
    }

    #[test]
    fn test_short_lived_sets_retention() {
        let mut config = QueueConfig::default();
        QueuePreset::ShortLived.apply(&mut config);
        assert_eq!(config.attributes().get("MessageRetentionPeriod").map(String::as_str), Some("60"));
    }

    #[test]
    fn test_high_throughput_fifo() {
        let mut config = QueueConfig {
            name: "events".to_string(),
            ..Default::default()
        };
        QueuePreset::HighThroughputFifo.apply(&mut config);
        let attributes = config.attributes();
        assert_eq!(attributes.get("FifoQueue").map(String::as_str), Some("true"));
        assert_eq!(attributes.get("DeduplicationScope").map(String::as_str), Some("messageGroup"));
        assert_eq!(attributes.get("FifoThroughputLimit").map(String::as_str), Some("perMessageGroupId"));
    }
}
