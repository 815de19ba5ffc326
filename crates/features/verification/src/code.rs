use crate::error::VerificationError;
use getrandom::fill;
use phub_domain::constants::OTP_LEN;

/// Largest byte value that maps onto the ten digits without bias.
const UNBIASED_LIMIT: u8 = 250;

/// Draws an `OTP_LEN`-digit numeric code from the operating system RNG.
///
/// Bytes at or above [`UNBIASED_LIMIT`] are discarded so every digit is
/// equally likely.
///
/// # Errors
/// Returns [`VerificationError::Internal`] if the system RNG is unavailable.
pub fn generate_code() -> Result<String, VerificationError> {
    let mut code = String::with_capacity(OTP_LEN);
    let mut buf = [0u8; OTP_LEN * 2];

    while code.len() < OTP_LEN {
        fill(&mut buf).map_err(|e| VerificationError::Internal {
            message: e.to_string().into(),
            context: Some("Failed to draw a verification code".into()),
        })?;
        code.extend(
            buf.iter()
                .filter(|&&b| b < UNBIASED_LIMIT)
                .map(|&b| char::from(b'0' + b % 10))
                .take(OTP_LEN - code.len()),
        );
    }
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_six_digits() {
        for _ in 0..64 {
            let code = generate_code().unwrap();
            assert_eq!(code.len(), OTP_LEN);
            assert!(code.bytes().all(|b| b.is_ascii_digit()), "{code}");
        }
    }
}
