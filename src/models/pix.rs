use serde::{Deserialize, Serialize};

/// Registered key kinds accepted by the Pix directory. The kind decides
/// which structural validation applies, nothing else.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PixKeyType {
    Cpf,
    Cnpj,
    Email,
    Phone,
    Random,
}

/// Everything a static BR Code needs. Built per charge, encoded, discarded.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PixPaymentData {
    pub pix_key: String,
    pub pix_key_type: PixKeyType,
    pub merchant_name: String,
    pub merchant_city: String,
    /// Amount in BRL. Zero means the payer types the amount in their bank app.
    pub amount: f64,
    pub txid: Option<String>,
    pub description: Option<String>,
}
