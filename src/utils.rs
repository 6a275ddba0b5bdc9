use chrono::Utc;
use uuid::Uuid;

use crate::models::pix::PixKeyType;

/// Structural check of a key against its declared kind. No directory
/// lookup happens here; a `true` only means the key is shaped right.
pub fn validate_pix_key(key: &str, key_type: PixKeyType) -> bool {
    match key_type {
        PixKeyType::Cpf => digits(key).len() == 11,
        PixKeyType::Cnpj => digits(key).len() == 14,
        PixKeyType::Email => is_valid_email(key),
        PixKeyType::Phone => {
            let len = digits(key).len();
            (10..=14).contains(&len)
        }
        PixKeyType::Random => {
            (32..=36).contains(&key.len())
                && key.bytes().all(|b| b.is_ascii_hexdigit() || b == b'-')
        }
    }
}

/// Normalizes a Brazilian phone number into the directory key form:
/// digits only, `+55` country prefix added unless already present.
pub fn format_phone_to_pix_key(phone: &str) -> String {
    let digits = digits(phone);
    if digits.starts_with("55") {
        format!("+{digits}")
    } else {
        format!("+55{digits}")
    }
}

/// Display formatting only: `R$ 1.234,56`. The payload itself always uses
/// the dot-decimal form from the assembler.
pub fn format_currency(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let cents = (value.abs() * 100.0).round() as u64;
    let units = cents / 100;
    let frac = cents % 100;

    format!("{}R$ {},{:02}", sign, group_thousands(units), frac)
}

/// Best-effort reconciliation reference: prefix + base36 millis + base36
/// random, uppercased and cut to the 25 characters field 62 allows. Not a
/// security token.
pub fn generate_txid(prefix: &str) -> String {
    let millis = Utc::now().timestamp_millis().max(0) as u64;
    let entropy = Uuid::new_v4().as_u128() as u64;

    let mut txid = format!("{}{}{}", prefix, to_base36(millis), to_base36(entropy));
    txid.make_ascii_uppercase();
    txid.truncate(25);
    txid
}

fn digits(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

// Permissive local@domain.tld shape, nothing RFC-grade.
fn is_valid_email(key: &str) -> bool {
    let Some((local, domain)) = key.split_once('@') else {
        return false;
    };
    if local.is_empty() || key.chars().any(char::is_whitespace) || domain.contains('@') {
        return false;
    }
    let Some((name, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !name.is_empty() && tld.len() >= 2
}

fn group_thousands(value: u64) -> String {
    let raw = value.to_string();
    let mut out = String::with_capacity(raw.len() + raw.len() / 3);

    for (i, c) in raw.chars().enumerate() {
        if i > 0 && (raw.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }

    out
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::new();
    while value > 0 {
        digits.push(char::from_digit((value % 36) as u32, 36).unwrap_or('0'));
        value /= 36;
    }

    digits.iter().rev().collect()
}
