use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use lazy_static::lazy_static;
use rand::Rng;
use regex::Regex;

// Validate a crypto address against the common per-network shapes. This stays
// deliberately permissive: unknown formats are accepted so exotic networks are
// not blocked at input time.
pub fn validate_crypto_address(address: &str) -> bool {
    lazy_static! {
        static ref EVM_RE: Regex = Regex::new(r"^0x[0-9a-fA-F]{40}$").unwrap();
    }

    let address = address.trim();
    // Every supported alphabet (hex, base58, bech32) is ASCII alphanumeric
    if address.is_empty() || !address.chars().all(|c| c.is_ascii_alphanumeric()) {
        return false;
    }

    // Ethereum / BSC / Polygon
    if address.starts_with("0x") {
        return EVM_RE.is_match(address);
    }

    // Bitcoin legacy and bech32
    if address.starts_with('1') || address.starts_with('3') || address.starts_with("bc1") {
        return (26..=62).contains(&address.len());
    }

    // Tron
    if address.starts_with('T') {
        return address.len() == 34;
    }

    // Solana / TON and other base58-ish long addresses
    (32..=48).contains(&address.len())
}

// Generate a realistic-looking 64-hex transaction hash with a 0x prefix
pub fn generate_tx_hash() -> String {
    const HEX: &[u8] = b"0123456789abcdef";
    let mut rng = rand::rng();
    let digest: String = (0..64)
        .map(|_| HEX[rng.random_range(0..HEX.len())] as char)
        .collect();
    format!("0x{}", digest)
}

// Format a USD balance for display with precision that scales with magnitude
pub fn format_balance(balance: f64) -> String {
    if balance == 0.0 {
        "0".to_string()
    } else if balance < 0.001 {
        format!("{:.6}", balance)
    } else if balance < 1.0 {
        format!("{:.4}", balance)
    } else if balance < 1000.0 {
        format!("{:.2}", balance)
    } else {
        format!("{:.0}", balance)
    }
}

// Parse an operator-supplied date in any of the accepted formats
pub fn parse_date_input(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();

    for fmt in ["%Y-%m-%d %H:%M", "%d.%m.%Y %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(Utc.from_utc_datetime(&dt));
        }
    }

    for fmt in ["%Y-%m-%d", "%d.%m.%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(text, fmt) {
            let dt = d.and_hms_opt(0, 0, 0)?;
            return Some(Utc.from_utc_datetime(&dt));
        }
    }

    None
}

// Shorten an address for inline display. Counts chars, not bytes, so
// arbitrary stored text never lands on a broken slice boundary.
pub fn shorten_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 12 {
        return address.to_string();
    }

    let start: String = chars[..6].iter().collect();
    let end: String = chars[chars.len() - 4..].iter().collect();

    format!("{}...{}", start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evm_addresses_validate() {
        assert!(validate_crypto_address(
            "0x52908400098527886E0F7030069857D2E4169EE7"
        ));
        assert!(!validate_crypto_address("0x1234"));
    }

    #[test]
    fn tron_and_bitcoin_addresses_validate() {
        assert!(validate_crypto_address(
            "TJRabPrwbZy45sbavfcjinPJC18kjpRTv8"
        ));
        assert!(validate_crypto_address(
            "bc1qar0srrr7xfkvy5l643lydnw9re59gtzzwf5mdq"
        ));
        assert!(!validate_crypto_address(""));
    }

    #[test]
    fn non_ascii_addresses_are_rejected() {
        // 33 bytes but only 17 chars: length checks alone would accept it
        let addr = format!("z{}", "п".repeat(16));
        assert!(!validate_crypto_address(&addr));
        assert!(!validate_crypto_address("TПривет45678901234567890123456789012"));
    }

    #[test]
    fn shorten_address_survives_multibyte_input() {
        let addr = format!("z{}", "п".repeat(16));
        let short = shorten_address(&addr);
        assert!(short.starts_with("zппппп"));
        assert!(short.ends_with("пппп"));

        let evm = "0x52908400098527886E0F7030069857D2E4169EE7";
        assert_eq!(shorten_address(evm), "0x5290...9EE7");
    }

    #[test]
    fn tx_hash_has_expected_shape() {
        let hash = generate_tx_hash();
        assert!(hash.starts_with("0x"));
        assert_eq!(hash.len(), 66);
        assert!(hash[2..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn date_formats_parse() {
        assert!(parse_date_input("2025-03-01 14:30").is_some());
        assert!(parse_date_input("01.03.2025").is_some());
        assert!(parse_date_input("yesterday").is_none());
    }
}
