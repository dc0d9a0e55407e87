//! Request and response bodies of the SQS JSON protocol.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct MessageAttributeValue {
    pub data_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binary_value: Option<String>,
}

impl MessageAttributeValue {
    pub fn string(value: impl Into<String>) -> Self {
        Self {
            data_type: "String".to_string(),
            string_value: Some(value.into()),
            binary_value: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(rename = "__type", default)]
    pub error_type: String,
    #[serde(alias = "Message", default)]
    pub message: String,
}

// --- ListQueues ---

#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct ListQueuesRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct ListQueuesResponse {
    #[serde(default)]
    pub queue_urls: Option<Vec<String>>,
    #[serde(default)]
    pub next_token: Option<String>,
}

// --- GetQueueUrl ---

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetQueueUrlRequest<'a> {
    pub queue_name: &'a str,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct QueueUrlResponse {
    pub queue_url: String,
}

// --- GetQueueAttributes / ListQueueTags ---

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetQueueAttributesRequest<'a> {
    pub queue_url: &'a str,
    pub attribute_names: Vec<&'a str>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct GetQueueAttributesResponse {
    #[serde(default)]
    pub attributes: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueueUrlRequest<'a> {
    pub queue_url: &'a str,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ListQueueTagsResponse {
    #[serde(rename = "Tags", default)]
    pub tags: Option<BTreeMap<String, String>>,
}

// --- CreateQueue ---

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateQueueRequest<'a> {
    pub queue_name: &'a str,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: &'a BTreeMap<String, String>,
}

// --- ReceiveMessage ---

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReceiveMessageRequest<'a> {
    pub queue_url: &'a str,
    pub max_number_of_messages: u32,
    pub visibility_timeout: u32,
    pub wait_time_seconds: u32,
    pub attribute_names: Vec<&'a str>,
    pub message_attribute_names: Vec<&'a str>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct ReceiveMessageResponse {
    #[serde(default)]
    pub messages: Option<Vec<ReceivedMessage>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReceivedMessage {
    pub message_id: String,
    pub receipt_handle: String,
    #[serde(default)]
    pub body: String,
    #[serde(rename = "MD5OfBody", default)]
    pub md5_of_body: String,
    #[serde(default)]
    pub attributes: Option<HashMap<String, String>>,
    #[serde(default)]
    pub message_attributes: Option<HashMap<String, MessageAttributeValue>>,
}

// --- SendMessage ---

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SendMessageRequest<'a> {
    pub queue_url: &'a str,
    pub message_body: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay_seconds: Option<u32>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub message_attributes: HashMap<String, MessageAttributeValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_group_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_deduplication_id: Option<&'a str>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct SendMessageResponse {
    pub message_id: String,
    #[serde(rename = "MD5OfMessageBody", default)]
    pub md5_of_message_body: String,
}

// --- DeleteMessage / ChangeMessageVisibility ---

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteMessageRequest<'a> {
    pub queue_url: &'a str,
    pub receipt_handle: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChangeMessageVisibilityRequest<'a> {
    pub queue_url: &'a str,
    pub receipt_handle: &'a str,
    pub visibility_timeout: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_receive_response() {
        let raw = r#"{
            "Messages": [{
                "MessageId": "m-1",
                "ReceiptHandle": "rh-1",
                "Body": "{\"id\":1}",
                "MD5OfBody": "abc",
                "Attributes": {"ApproximateReceiveCount": "2"},
                "MessageAttributes": {"tenant": {"DataType": "String", "StringValue": "acme"}}
            }]
        }"#;
        let response: ReceiveMessageResponse = serde_json::from_str(raw).unwrap();
        let messages = response.messages.unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].receipt_handle, "rh-1");
        let attrs = messages[0].message_attributes.as_ref().unwrap();
        assert_eq!(attrs["tenant"].string_value.as_deref(), Some("acme"));
    }

    #[test]
    fn test_empty_receive_response() {
        let response: ReceiveMessageResponse = serde_json::from_str("{}").unwrap();
        assert!(response.messages.is_none());
    }

    #[test]
    fn test_send_request_omits_unset_fields() {
        let request = SendMessageRequest {
            queue_url: "http://q",
            message_body: "hello",
            delay_seconds: None,
            message_attributes: HashMap::new(),
            message_group_id: None,
            message_deduplication_id: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, serde_json::json!({"QueueUrl": "http://q", "MessageBody": "hello"}));
    }

    #[test]
    fn test_error_body_accepts_both_message_casings() {
        let lower: ErrorBody = serde_json::from_str(r#"{"__type":"X","message":"m"}"#).unwrap();
        let upper: ErrorBody = serde_json::from_str(r#"{"__type":"X","Message":"m"}"#).unwrap();
        assert_eq!(lower.message, "m");
        assert_eq!(upper.message, "m");
    }
}
