use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
    static ref PHONE_RE: Regex = Regex::new(r"^09\d{8}$").unwrap();
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Local mobile numbers: ten digits starting with 09.
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

/// Convert a local `09XXXXXXXX` number to the international `+593XXXXXXXXX`
/// form the WhatsApp provider expects. Numbers already carrying a prefix are
/// passed through untouched.
pub fn to_international_whatsapp(number: &str) -> String {
    match number.strip_prefix('0') {
        Some(rest) => format!("+593{rest}"),
        None => number.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_format() {
        assert!(is_valid_email("ana@example.com"));
        assert!(is_valid_email("ana.maria@mail.ec"));
        assert!(!is_valid_email("ana@example"));
        assert!(!is_valid_email("ana example@mail.ec"));
        assert!(!is_valid_email("@mail.ec"));
    }

    #[test]
    fn phone_format() {
        assert!(is_valid_phone("0991234567"));
        assert!(!is_valid_phone("991234567"));
        assert!(!is_valid_phone("0891234567"));
        assert!(!is_valid_phone("09912345678"));
        assert!(!is_valid_phone("09912345a7"));
    }

    #[test]
    fn whatsapp_number_conversion() {
        assert_eq!(to_international_whatsapp("0991234567"), "+593991234567");
        assert_eq!(to_international_whatsapp("+593991234567"), "+593991234567");
    }
}
