use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::models::pix::PixPaymentData;

pub mod crc;
pub mod tlv;

use tlv::TlvField;

pub const PAYLOAD_FORMAT_INDICATOR: &str = "01";
pub const GUI_BCB_PIX: &str = "BR.GOV.BCB.PIX";

const ID_PAYLOAD_FORMAT: &str = "00";
const ID_MERCHANT_ACCOUNT: &str = "26";
const ID_MERCHANT_CATEGORY: &str = "52";
const ID_CURRENCY: &str = "53";
const ID_AMOUNT: &str = "54";
const ID_COUNTRY: &str = "58";
const ID_MERCHANT_NAME: &str = "59";
const ID_MERCHANT_CITY: &str = "60";
const ID_ADDITIONAL_DATA: &str = "62";
const ID_CRC: &str = "63";

const MAX_MERCHANT_NAME_LEN: usize = 25;
const MAX_MERCHANT_CITY_LEN: usize = 15;
const MAX_DESCRIPTION_LEN: usize = 72;
const MAX_TXID_LEN: usize = 25;

#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("Truncated field header at offset {offset}")]
    TruncatedHeader { offset: usize },
    #[error("Non-numeric field length at offset {offset}")]
    BadLength { offset: usize },
    #[error("Field {id} declares {expected} characters but the payload ends early")]
    TruncatedValue { id: String, expected: usize },
    #[error("Payload does not end with a CRC field")]
    MissingCrc,
    #[error("Checksum mismatch: expected {expected}, found {found}")]
    ChecksumMismatch { expected: String, found: String },
}

/// Builds the complete copy-paste payload for a static Pix charge.
///
/// Field order follows the BACEN EMV layout. Optional fields (amount,
/// description, txid) are emitted only when present; oversized merchant
/// fields are silently truncated, matching what banking apps accept.
pub fn generate(data: &PixPaymentData) -> String {
    let mut account = String::new();
    account.push_str(&tlv::field("00", GUI_BCB_PIX));
    account.push_str(&tlv::field("01", &data.pix_key));
    if let Some(description) = data.description.as_deref() {
        if !description.is_empty() {
            account.push_str(&tlv::field("02", &truncate(description, MAX_DESCRIPTION_LEN)));
        }
    }

    let mut payload = String::new();
    payload.push_str(&tlv::field(ID_PAYLOAD_FORMAT, PAYLOAD_FORMAT_INDICATOR));
    payload.push_str(&tlv::field(ID_MERCHANT_ACCOUNT, &account));
    payload.push_str(&tlv::field(ID_MERCHANT_CATEGORY, "0000"));
    payload.push_str(&tlv::field(ID_CURRENCY, "986"));
    if data.amount > 0.0 {
        payload.push_str(&tlv::field(ID_AMOUNT, &format_amount(data.amount)));
    }
    payload.push_str(&tlv::field(ID_COUNTRY, "BR"));
    payload.push_str(&tlv::field(
        ID_MERCHANT_NAME,
        &normalize(&data.merchant_name, MAX_MERCHANT_NAME_LEN),
    ));
    payload.push_str(&tlv::field(
        ID_MERCHANT_CITY,
        &normalize(&data.merchant_city, MAX_MERCHANT_CITY_LEN),
    ));
    if let Some(txid) = data.txid.as_deref() {
        if !txid.is_empty() {
            let additional = tlv::field("05", &truncate(txid, MAX_TXID_LEN));
            payload.push_str(&tlv::field(ID_ADDITIONAL_DATA, &additional));
        }
    }

    // CRC is computed over everything up to and including its own "6304"
    // header, then the four hex digits are appended.
    payload.push_str(ID_CRC);
    payload.push_str("04");
    let checksum = crc::checksum_hex(payload.as_bytes());
    payload.push_str(&checksum);

    payload
}

/// Splits a payload into its ordered field list.
pub fn decode(payload: &str) -> Result<Vec<TlvField>, PayloadError> {
    tlv::parse(payload)
}

/// Checks structure and checksum of a payload produced by any static Pix
/// generator. The stored CRC must match a recomputation over the payload
/// with its trailing four hex digits removed.
pub fn verify(payload: &str) -> Result<(), PayloadError> {
    let fields = tlv::parse(payload)?;

    let crc_field = match fields.last() {
        Some(field) if field.id == ID_CRC && field.value.len() == 4 => field,
        _ => return Err(PayloadError::MissingCrc),
    };

    let body = &payload[..payload.len() - 4];
    let expected = crc::checksum_hex(body.as_bytes());
    let found = crc_field.value.to_ascii_uppercase();
    if expected != found {
        return Err(PayloadError::ChecksumMismatch { expected, found });
    }

    Ok(())
}

fn format_amount(amount: f64) -> String {
    format!("{:.2}", amount)
}

fn normalize(input: &str, max_len: usize) -> String {
    truncate(&strip_diacritics(input), max_len)
}

fn truncate(input: &str, max_len: usize) -> String {
    input.chars().take(max_len).collect()
}

/// Decomposes to NFD and drops the combining marks, so `é` and `e` +
/// U+0301 both come out as a bare `e`. Works for any accented letter, not
/// just the Portuguese set, and leaves non-mark characters untouched.
fn strip_diacritics(input: &str) -> String {
    input.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::pix::PixKeyType;

    fn payment(amount: f64) -> PixPaymentData {
        PixPaymentData {
            pix_key: "11999999999".to_string(),
            pix_key_type: PixKeyType::Phone,
            merchant_name: "Na Regua".to_string(),
            merchant_city: "Sao Paulo".to_string(),
            amount,
            txid: None,
            description: None,
        }
    }

    #[test]
    fn starts_with_format_indicator_and_fixed_fields() {
        let payload = generate(&payment(0.0));

        assert!(payload.starts_with("000201"));
        assert!(payload.contains("52040000"));
        assert!(payload.contains("5303986"));
        assert!(payload.contains("5802BR"));
    }

    #[test]
    fn zero_amount_omits_amount_field() {
        let payload = generate(&payment(0.0));
        let fields = decode(&payload).unwrap();

        assert!(fields.iter().all(|f| f.id != "54"));
    }

    #[test]
    fn positive_amount_is_rendered_with_two_decimals() {
        let payload = generate(&payment(10.0));

        assert!(payload.contains("540510.00"));
    }

    #[test]
    fn merchant_name_is_cut_to_25_characters() {
        let mut data = payment(0.0);
        data.merchant_name = "A".repeat(40);

        let payload = generate(&data);
        let fields = decode(&payload).unwrap();
        let name = fields.iter().find(|f| f.id == "59").unwrap();

        assert_eq!(name.value, "A".repeat(25));
    }

    #[test]
    fn diacritics_are_stripped_before_truncation() {
        let mut data = payment(0.0);
        data.merchant_name = "José da Silva Barbearia Premium".to_string();

        let payload = generate(&data);
        let fields = decode(&payload).unwrap();
        let name = fields.iter().find(|f| f.id == "59").unwrap();

        assert_eq!(name.value, "Jose da Silva Barbearia P");
    }

    #[test]
    fn decomposed_input_loses_its_combining_marks() {
        // "José" arriving already in NFD form: the U+0301 must not survive
        // into field 59 or count against the truncation limit.
        let mut data = payment(0.0);
        data.merchant_name = "Jose\u{0301}".to_string();

        let payload = generate(&data);
        let fields = decode(&payload).unwrap();
        let name = fields.iter().find(|f| f.id == "59").unwrap();

        assert_eq!(name.value, "Jose");
    }

    #[test]
    fn accents_outside_the_portuguese_set_are_folded_too() {
        let mut data = payment(0.0);
        data.merchant_name = "Šarlatán ý".to_string();

        let payload = generate(&data);
        let fields = decode(&payload).unwrap();
        let name = fields.iter().find(|f| f.id == "59").unwrap();

        assert_eq!(name.value, "Sarlatan y");
    }

    #[test]
    fn city_is_cut_to_15_characters() {
        let mut data = payment(0.0);
        data.merchant_city = "São José dos Campos".to_string();

        let payload = generate(&data);
        let fields = decode(&payload).unwrap();
        let city = fields.iter().find(|f| f.id == "60").unwrap();

        assert_eq!(city.value, "Sao Jose dos Ca");
    }

    #[test]
    fn txid_is_wrapped_in_additional_data_template() {
        let mut data = payment(0.0);
        data.txid = Some("NRABC123".to_string());

        let payload = generate(&data);
        let fields = decode(&payload).unwrap();
        let additional = fields.iter().find(|f| f.id == "62").unwrap();

        assert_eq!(additional.value, "0508NRABC123");
    }

    #[test]
    fn empty_txid_leaves_no_trace() {
        let mut data = payment(0.0);
        data.txid = Some(String::new());

        let payload = generate(&data);
        let fields = decode(&payload).unwrap();

        assert!(fields.iter().all(|f| f.id != "62"));
    }

    #[test]
    fn description_is_nested_in_merchant_account() {
        let mut data = payment(0.0);
        data.description = Some("Corte".to_string());

        let payload = generate(&data);
        let fields = decode(&payload).unwrap();
        let account = fields.iter().find(|f| f.id == "26").unwrap();

        assert!(account.value.starts_with("0014BR.GOV.BCB.PIX"));
        assert!(account.value.contains("011111999999999"));
        assert!(account.value.ends_with("0205Corte"));
    }

    #[test]
    fn generated_payload_verifies() {
        let mut data = payment(55.0);
        data.txid = Some("NRABC123".to_string());

        let payload = generate(&data);

        assert!(verify(&payload).is_ok());
    }

    #[test]
    fn tampered_payload_fails_verification() {
        let payload = generate(&payment(55.0));
        let tampered = payload.replacen("Na Regua", "Na Regub", 1);

        assert!(matches!(
            verify(&tampered),
            Err(PayloadError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn missing_crc_field_is_rejected() {
        // Structurally valid TLV stream that simply ends before field 63.
        assert!(matches!(
            verify("000201"),
            Err(PayloadError::MissingCrc)
        ));
    }
}
