use rand::Rng;
use uuid::Uuid;

/// Human-readable reference printed on tickets, e.g. `BK-48291047`.
///
/// No uniqueness check happens here; the unique column constraint catches
/// the (rare) collision at insert time.
pub fn booking_reference() -> String {
    let n: u32 = rand::thread_rng().gen_range(10_000_000..100_000_000);
    format!("BK-{}", n)
}

/// `TKT-` followed by 14 uppercase alphanumerics from a random identifier.
pub fn ticket_code() -> String {
    let id = Uuid::new_v4().simple().to_string().to_uppercase();
    format!("TKT-{}", &id[..14])
}

/// Payload rendered into the ticket QR image and matched by the driver's
/// check-in scanner.
pub fn qr_payload(reference: &str, ticket_code: &str) -> String {
    format!("booking:{}|ticket:{}", reference, ticket_code)
}

/// Six-digit one-time login code.
pub fn otp_code() -> String {
    let n: u32 = rand::thread_rng().gen_range(100_000..1_000_000);
    n.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booking_reference_is_bk_and_eight_digits() {
        for _ in 0..100 {
            let reference = booking_reference();
            let digits = reference.strip_prefix("BK-").expect("missing BK- prefix");
            assert_eq!(digits.len(), 8);
            assert!(digits.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn ticket_code_is_tkt_and_fourteen_alphanumerics() {
        for _ in 0..100 {
            let code = ticket_code();
            let body = code.strip_prefix("TKT-").expect("missing TKT- prefix");
            assert_eq!(body.len(), 14);
            assert!(body.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
        }
    }

    #[test]
    fn qr_payload_embeds_reference_and_ticket() {
        assert_eq!(
            qr_payload("BK-12345678", "TKT-ABCDEF12345678"),
            "booking:BK-12345678|ticket:TKT-ABCDEF12345678"
        );
    }

    #[test]
    fn otp_is_six_digits() {
        for _ in 0..100 {
            let otp = otp_code();
            assert_eq!(otp.len(), 6);
            assert!(otp.chars().all(|c| c.is_ascii_digit()));
        }
    }
}
