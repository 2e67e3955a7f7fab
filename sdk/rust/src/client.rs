use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status. `body` is the raw response text.
    #[error("Service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl SdkError {
    /// HTTP status when the service answered with an error.
    pub fn status(&self) -> Option<u16> {
        match self {
            SdkError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Headers every reservation call must carry.
#[derive(Debug, Clone)]
pub struct CallerHeaders {
    pub ait_id: String,
    pub business_taxonomy_id: String,
    pub correlation_id: String,
    pub accept_version: String,
}

impl CallerHeaders {
    /// Headers for API version `1_0` with a fresh correlation id.
    pub fn new(ait_id: &str, business_taxonomy_id: &str) -> Self {
        Self {
            ait_id: ait_id.to_string(),
            business_taxonomy_id: business_taxonomy_id.to_string(),
            correlation_id: Uuid::new_v4().to_string(),
            accept_version: "1_0".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReserveFundsRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_uuid: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debit_card_number: Option<String>,
    pub transaction_amount: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_meta_data_json: Option<String>,
    pub protect_against_overdraft: bool,
}

impl ReserveFundsRequest {
    /// Reservation against an account number with a fresh request uuid.
    pub fn for_account(account_number: &str, amount: i64, meta_data_json: &str) -> Self {
        Self {
            request_uuid: Some(Uuid::new_v4()),
            account_number: Some(account_number.to_string()),
            transaction_amount: amount,
            transaction_meta_data_json: Some(meta_data_json.to_string()),
            ..Default::default()
        }
    }

    /// Reservation against a debit card with a fresh request uuid.
    pub fn for_debit_card(debit_card_number: &str, amount: i64, meta_data_json: &str) -> Self {
        Self {
            request_uuid: Some(Uuid::new_v4()),
            debit_card_number: Some(debit_card_number.to_string()),
            transaction_amount: amount,
            transaction_meta_data_json: Some(meta_data_json.to_string()),
            ..Default::default()
        }
    }

    pub fn with_overdraft_protection(mut self) -> Self {
        self.protect_against_overdraft = true;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub transaction_uuid: Uuid,
    pub request_uuid: Uuid,
    pub reservation_uuid: Option<Uuid>,
    pub account_number: String,
    pub debit_card_number: Option<String>,
    pub transaction_amount: i64,
    pub running_balance_amount: i64,
    pub transaction_meta_data_json: String,
    pub transaction_type_code: String,
    pub insert_timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReserveFundsOutcome {
    /// `SUCCESS`, `SUCCESS_OVERDRAFT` or `INSUFFICIENT_FUNDS`.
    pub status: String,
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimedResponse<T> {
    pub service_time_elapsed: u64,
    pub payload: T,
}

pub struct ReserveFundsClient {
    client: Client,
    base_url: String,
}

impl ReserveFundsClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Reserve funds, cascading to overdraft accounts if the request asks for it.
    pub async fn reserve_funds(
        &self,
        headers: &CallerHeaders,
        request: &ReserveFundsRequest,
    ) -> Result<TimedResponse<ReserveFundsOutcome>, SdkError> {
        let resp = self
            .client
            .post(format!("{}/ReserveFunds", self.base_url))
            .header("ait-id", &headers.ait_id)
            .header("business-taxonomy-id", &headers.business_taxonomy_id)
            .header("correlation-id", &headers.correlation_id)
            .header("accept-version", &headers.accept_version)
            .json(request)
            .send()
            .await?;

        decode(resp).await
    }

    /// Service liveness and version.
    pub async fn health(&self) -> Result<serde_json::Value, SdkError> {
        let resp = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;

        decode(resp).await
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, SdkError> {
    let status = resp.status();
    let text = resp.text().await?;

    if !status.is_success() {
        return Err(SdkError::Status {
            status: status.as_u16(),
            body: text,
        });
    }

    Ok(serde_json::from_str(&text)?)
}
