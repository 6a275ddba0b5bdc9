use serde::{Deserialize, Serialize};

use crate::payload::tlv::TlvField;

#[derive(Deserialize, Serialize)]
pub struct NewCharge {
    pub amount_in_cents: i64,
    pub description: Option<String>,
    pub txid: Option<String>,
}

#[derive(Deserialize, Serialize)]
pub struct ChargeResponse {
    pub txid: String,
    pub copy_paste: String,
}

#[derive(Deserialize, Serialize)]
pub struct ValidatePayload {
    pub payload: String,
}

#[derive(Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<TlvField>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
