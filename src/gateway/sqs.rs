//! SQS client speaking the AWS JSON 1.0 protocol over `reqwest`.

use super::error::GatewayError;
use super::signing::{Credentials, Signer};
use super::types::{Message, Queue, QueueRef, SendMessageInput};
use super::wire::{
    ChangeMessageVisibilityRequest, CreateQueueRequest, DeleteMessageRequest, ErrorBody, GetQueueAttributesRequest,
    GetQueueAttributesResponse, GetQueueUrlRequest, ListQueueTagsResponse, ListQueuesRequest, ListQueuesResponse,
    MessageAttributeValue, QueueUrlRequest, QueueUrlResponse, ReceiveMessageRequest, ReceiveMessageResponse,
    SendMessageRequest, SendMessageResponse,
};
use super::{GatewayResult, QueueGateway};
use async_trait::async_trait;
use md5::{Digest, Md5};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

const CONTENT_TYPE: &str = "application/x-amz-json-1.0";
const TARGET_PREFIX: &str = "AmazonSQS";
/// Messages are received with this visibility so they reappear almost at once
const PEEK_VISIBILITY_TIMEOUT: u32 = 1;

#[derive(Debug, Clone)]
pub struct SqsGateway {
    http: reqwest::Client,
    endpoint: String,
    host: String,
    signer: Option<Signer>,
}

impl SqsGateway {
    /// Create a client for `region`, optionally against a custom endpoint
    /// (local emulators). Requests are signed only when credentials exist.
    pub fn new(
        region: &str,
        endpoint_url: Option<&str>,
        credentials: Option<Credentials>,
        timeout: Duration,
    ) -> GatewayResult<Self> {
        let endpoint = endpoint_url
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| format!("https://sqs.{region}.amazonaws.com"));
        let host = endpoint
            .split("://")
            .nth(1)
            .and_then(|rest| rest.split('/').next())
            .filter(|host| !host.is_empty())
            .ok_or_else(|| GatewayError::InvalidArgument(format!("invalid endpoint URL: {endpoint}")))?
            .to_string();

        let http = reqwest::Client::builder().timeout(timeout).build()?;
        let signer = credentials.map(|credentials| Signer::new(credentials, region, "sqs"));
        if signer.is_none() {
            log::warn!("No AWS credentials found in environment; requests to {endpoint} will be unsigned");
        }

        Ok(Self {
            http,
            endpoint,
            host,
            signer,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn call<Req, Resp>(&self, action: &str, request: &Req) -> GatewayResult<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned + Default,
    {
        let payload = serde_json::to_vec(request)?;
        let mut headers = BTreeMap::new();
        headers.insert("content-type".to_string(), CONTENT_TYPE.to_string());
        headers.insert("host".to_string(), self.host.clone());
        headers.insert("x-amz-target".to_string(), format!("{TARGET_PREFIX}.{action}"));

        let mut builder = self.http.post(format!("{}/", self.endpoint));
        for (name, value) in &headers {
            if name != "host" {
                builder = builder.header(name.as_str(), value.as_str());
            }
        }
        if let Some(signer) = &self.signer {
            for (name, value) in signer.sign(chrono::Utc::now(), &headers, &payload)? {
                builder = builder.header(name, value);
            }
        }

        log::debug!("SQS {action} -> {}", self.endpoint);
        let response = builder.body(payload).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let error: ErrorBody = serde_json::from_slice(&body).unwrap_or(ErrorBody {
                error_type: format!("Http{}", status.as_u16()),
                message: String::from_utf8_lossy(&body).into_owned(),
            });
            log::warn!("SQS {action} failed: {} {}", error.error_type, error.message);
            return Err(GatewayError::service(&error.error_type, error.message));
        }

        if body.is_empty() {
            return Ok(Resp::default());
        }
        Ok(serde_json::from_slice(&body)?)
    }

    async fn call_unit<Req>(&self, action: &str, request: &Req) -> GatewayResult<()>
    where
        Req: Serialize + ?Sized,
    {
        let _: serde_json::Value = self.call(action, request).await?;
        Ok(())
    }

    async fn list_tags(&self, queue: &QueueRef) -> GatewayResult<BTreeMap<String, String>> {
        let response: ListQueueTagsResponse = self
            .call("ListQueueTags", &QueueUrlRequest { queue_url: &queue.url })
            .await?;
        Ok(response.tags.unwrap_or_default())
    }
}

#[async_trait]
impl QueueGateway for SqsGateway {
    async fn list_queues(&self) -> GatewayResult<Vec<QueueRef>> {
        let mut queues = Vec::new();
        let mut next_token = None;
        loop {
            let request = ListQueuesRequest {
                max_results: Some(1000),
                next_token: next_token.take(),
            };
            let response: ListQueuesResponse = self.call("ListQueues", &request).await?;
            queues.extend(response.queue_urls.unwrap_or_default().into_iter().map(QueueRef::from_url));
            match response.next_token {
                Some(token) if !token.is_empty() => next_token = Some(token),
                _ => break,
            }
        }
        queues.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(queues)
    }

    async fn get_queue_url(&self, name: &str) -> GatewayResult<QueueRef> {
        let response: QueueUrlResponse = self.call("GetQueueUrl", &GetQueueUrlRequest { queue_name: name }).await?;
        if response.queue_url.is_empty() {
            return Err(GatewayError::Decode(format!("GetQueueUrl returned no URL for {name}")));
        }
        Ok(QueueRef::new(name, response.queue_url))
    }

    async fn fetch_queue_attributes(&self, queue: &QueueRef) -> GatewayResult<Queue> {
        let response: GetQueueAttributesResponse = self
            .call(
                "GetQueueAttributes",
                &GetQueueAttributesRequest {
                    queue_url: &queue.url,
                    attribute_names: vec!["All"],
                },
            )
            .await?;
        let mut record = Queue::from_attributes(queue, &response.attributes);

        match self.list_tags(queue).await {
            Ok(tags) => record.tags = tags,
            Err(e) => log::debug!("Could not list tags for {}: {}", queue.name, e),
        }
        Ok(record)
    }

    async fn create_queue(&self, name: &str, attributes: &BTreeMap<String, String>) -> GatewayResult<QueueRef> {
        let response: QueueUrlResponse = self
            .call(
                "CreateQueue",
                &CreateQueueRequest {
                    queue_name: name,
                    attributes,
                },
            )
            .await?;
        log::info!("Created queue {name} at {}", response.queue_url);
        Ok(QueueRef::new(name, response.queue_url))
    }

    async fn delete_queue(&self, name: &str) -> GatewayResult<()> {
        let queue = self.get_queue_url(name).await?;
        self.call_unit("DeleteQueue", &QueueUrlRequest { queue_url: &queue.url })
            .await?;
        log::info!("Deleted queue {name}");
        Ok(())
    }

    async fn fetch_messages(&self, queue: &QueueRef, max_count: u32) -> GatewayResult<Vec<Message>> {
        let request = ReceiveMessageRequest {
            queue_url: &queue.url,
            max_number_of_messages: max_count.clamp(1, 10),
            visibility_timeout: PEEK_VISIBILITY_TIMEOUT,
            wait_time_seconds: 0,
            attribute_names: vec!["All"],
            message_attribute_names: vec!["All"],
        };
        let response: ReceiveMessageResponse = self.call("ReceiveMessage", &request).await?;

        let messages = response
            .messages
            .unwrap_or_default()
            .into_iter()
            .map(|received| {
                let mut message = Message {
                    id: received.message_id,
                    body: received.body,
                    md5_of_body: received.md5_of_body,
                    receipt_handle: received.receipt_handle,
                    ..Default::default()
                };
                message.apply_system_attributes(received.attributes.unwrap_or_default());
                message.custom_attributes = received
                    .message_attributes
                    .unwrap_or_default()
                    .into_iter()
                    .filter_map(|(name, value)| value.string_value.map(|v| (name, v)))
                    .collect();
                message
            })
            .collect();
        Ok(messages)
    }

    async fn send_message(&self, queue: &QueueRef, input: &SendMessageInput) -> GatewayResult<String> {
        let request = SendMessageRequest {
            queue_url: &queue.url,
            message_body: &input.body,
            delay_seconds: (input.delay_seconds > 0).then_some(input.delay_seconds),
            message_attributes: input
                .attributes
                .iter()
                .map(|(name, value)| (name.clone(), MessageAttributeValue::string(value.clone())))
                .collect(),
            message_group_id: input.group_id.as_deref(),
            message_deduplication_id: input.deduplication_id.as_deref(),
        };
        let response: SendMessageResponse = self.call("SendMessage", &request).await?;

        let expected = hex::encode(Md5::digest(input.body.as_bytes()));
        if !response.md5_of_message_body.is_empty() && response.md5_of_message_body != expected {
            return Err(GatewayError::Decode(format!(
                "body checksum mismatch for message {}: expected {}, got {}",
                response.message_id, expected, response.md5_of_message_body
            )));
        }
        Ok(response.message_id)
    }

    async fn delete_message(&self, queue: &QueueRef, receipt_handle: &str) -> GatewayResult<()> {
        self.call_unit(
            "DeleteMessage",
            &DeleteMessageRequest {
                queue_url: &queue.url,
                receipt_handle,
            },
        )
        .await
    }

    async fn change_message_visibility(
        &self,
        queue: &QueueRef,
        receipt_handle: &str,
        seconds: u32,
    ) -> GatewayResult<()> {
        self.call_unit(
            "ChangeMessageVisibility",
            &ChangeMessageVisibilityRequest {
                queue_url: &queue.url,
                receipt_handle,
                visibility_timeout: seconds,
            },
        )
        .await
    }
}
