use super::RequestHandler;
use super::Service;
use super::ServiceError;

use crate::models::pix::{PixKeyType, PixPaymentData};
use crate::payload::{self, tlv::TlvField};
use crate::utils;

use async_trait::async_trait;
use tokio::sync::oneshot;

pub enum PixServiceRequest {
    NewCharge {
        amount_in_cents: i64,
        description: Option<String>,
        txid: Option<String>,
        response: oneshot::Sender<Result<Charge, ServiceError>>,
    },
    ValidatePayload {
        payload: String,
        response: oneshot::Sender<Result<Vec<TlvField>, ServiceError>>,
    },
}

#[derive(Clone, Debug)]
pub struct Charge {
    pub txid: String,
    pub copy_paste: String,
}

/// Holds the merchant identity from the config file and stamps it into
/// every charge. The key is validated once here, never per request.
#[derive(Clone)]
pub struct PixRequestHandler {
    merchant_name: String,
    merchant_city: String,
    pix_key: String,
    pix_key_type: PixKeyType,
    txid_prefix: String,
}

impl PixRequestHandler {
    pub fn new(
        merchant_name: String,
        merchant_city: String,
        pix_key: String,
        pix_key_type: PixKeyType,
        txid_prefix: String,
    ) -> Result<Self, ServiceError> {
        if !utils::validate_pix_key(&pix_key, pix_key_type) {
            return Err(ServiceError::InvalidKey(format!(
                "'{}' is not a valid {:?} key",
                pix_key, pix_key_type
            )));
        }

        Ok(PixRequestHandler {
            merchant_name,
            merchant_city,
            pix_key,
            pix_key_type,
            txid_prefix,
        })
    }

    fn new_charge(
        &self,
        amount_in_cents: i64,
        description: Option<String>,
        txid: Option<String>,
    ) -> Result<Charge, ServiceError> {
        if amount_in_cents < 0 {
            return Err(ServiceError::Internal(
                "Charge amount cannot be negative.".to_string(),
            ));
        }

        let txid = txid
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| utils::generate_txid(&self.txid_prefix));

        let data = PixPaymentData {
            pix_key: self.pix_key.clone(),
            pix_key_type: self.pix_key_type,
            merchant_name: self.merchant_name.clone(),
            merchant_city: self.merchant_city.clone(),
            amount: amount_in_cents as f64 / 100.0,
            txid: Some(txid.clone()),
            description,
        };

        let copy_paste = payload::generate(&data);
        log::info!(
            "Generated charge {} for {}",
            txid,
            utils::format_currency(data.amount)
        );

        Ok(Charge { txid, copy_paste })
    }

    fn validate_payload(&self, payload_text: &str) -> Result<Vec<TlvField>, ServiceError> {
        payload::verify(payload_text).map_err(|e| ServiceError::Payload(e.to_string()))?;

        payload::decode(payload_text).map_err(|e| ServiceError::Payload(e.to_string()))
    }
}

#[async_trait]
impl RequestHandler<PixServiceRequest> for PixRequestHandler {
    async fn handle_request(&self, request: PixServiceRequest) {
        match request {
            PixServiceRequest::NewCharge {
                amount_in_cents,
                description,
                txid,
                response,
            } => {
                let charge = self.new_charge(amount_in_cents, description, txid);
                let _ = response.send(charge);
            }
            PixServiceRequest::ValidatePayload { payload, response } => {
                let fields = self.validate_payload(&payload);
                let _ = response.send(fields);
            }
        }
    }
}

pub struct PixService;

impl PixService {
    pub fn new() -> Self {
        PixService
    }
}

#[async_trait]
impl Service<PixServiceRequest, PixRequestHandler> for PixService {}

#[cfg(test)]
mod tests {
    use super::*;

    fn handler() -> PixRequestHandler {
        PixRequestHandler::new(
            "Na Regua".to_string(),
            "Sao Paulo".to_string(),
            "+5511999999999".to_string(),
            PixKeyType::Phone,
            "NR".to_string(),
        )
        .unwrap()
    }

    #[test]
    fn rejects_a_malformed_merchant_key() {
        let result = PixRequestHandler::new(
            "Na Regua".to_string(),
            "Sao Paulo".to_string(),
            "999".to_string(),
            PixKeyType::Phone,
            "NR".to_string(),
        );

        assert!(result.is_err());
    }

    #[test]
    fn charge_round_trips_through_the_validator() {
        let handler = handler();

        let charge = handler.new_charge(5500, Some("Corte".to_string()), None).unwrap();
        let fields = handler.validate_payload(&charge.copy_paste).unwrap();

        assert!(charge.txid.starts_with("NR"));
        assert_eq!(fields.first().unwrap().id, "00");
        assert_eq!(fields.last().unwrap().id, "63");
    }

    #[test]
    fn caller_supplied_txid_wins() {
        let handler = handler();

        let charge = handler
            .new_charge(1000, None, Some("PEDIDO42".to_string()))
            .unwrap();

        assert_eq!(charge.txid, "PEDIDO42");
        assert!(charge.copy_paste.contains("0508PEDIDO42"));
    }

    #[test]
    fn negative_amount_is_refused() {
        assert!(handler().new_charge(-100, None, None).is_err());
    }
}
