use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CedulaError {
    #[error("La cédula debe tener 10 dígitos")]
    Length,
    #[error("Cédula inválida: código de provincia incorrecto")]
    Province,
    #[error("Cédula inválida: dígito verificador incorrecto")]
    Checksum,
}

/// Validate an Ecuadorian cédula.
///
/// Ten digits; the first two encode the issuing province (01–24); the tenth
/// is a mod-10 check digit over the first nine using alternating
/// coefficients 2,1,… with two-digit products folded by subtracting 9.
pub fn validate_cedula(cedula: &str) -> Result<(), CedulaError> {
    if cedula.len() != 10 || !cedula.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CedulaError::Length);
    }

    let digits: Vec<u32> = cedula.bytes().map(|b| u32::from(b - b'0')).collect();

    let province = digits[0] * 10 + digits[1];
    if !(1..=24).contains(&province) {
        return Err(CedulaError::Province);
    }

    const COEFFICIENTS: [u32; 9] = [2, 1, 2, 1, 2, 1, 2, 1, 2];
    let mut sum = 0;
    for (digit, coefficient) in digits.iter().zip(COEFFICIENTS) {
        let mut value = digit * coefficient;
        if value >= 10 {
            value -= 9;
        }
        sum += value;
    }

    let verifier = match sum % 10 {
        0 => 0,
        rem => 10 - rem,
    };
    if verifier != digits[9] {
        return Err(CedulaError::Checksum);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_known_valid_cedulas() {
        assert_eq!(validate_cedula("1714616123"), Ok(()));
        assert_eq!(validate_cedula("0926687856"), Ok(()));
    }

    #[test]
    fn rejects_flipped_check_digit() {
        assert_eq!(validate_cedula("1714616124"), Err(CedulaError::Checksum));
    }

    #[test]
    fn rejects_bad_province_regardless_of_checksum() {
        // Same tail as a valid cédula, province outside 1–24.
        assert_eq!(validate_cedula("9914616123"), Err(CedulaError::Province));
        assert_eq!(validate_cedula("0014616123"), Err(CedulaError::Province));
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(validate_cedula("123456789"), Err(CedulaError::Length));
        assert_eq!(validate_cedula("17146161234"), Err(CedulaError::Length));
        assert_eq!(validate_cedula("17146161a3"), Err(CedulaError::Length));
    }
}
