/// Brazilian CPF validation using the two standard check digits.
/// Accepts punctuated ("529.982.247-25") or bare ("52998224725") input.
pub fn validate_cpf(cpf: &str) -> bool {
    let digits: Vec<u32> = cpf.chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.len() != 11 {
        return false;
    }

    // CPFs repetidos (111.111.111-11 etc.) passam no cálculo mas são inválidos
    if digits.iter().all(|&d| d == digits[0]) {
        return false;
    }

    fn check_digit(digits: &[u32], weights: &[u32]) -> u32 {
        let sum: u32 = digits.iter().zip(weights).map(|(d, w)| d * w).sum();
        let rest = sum % 11;
        if rest < 2 {
            0
        } else {
            11 - rest
        }
    }

    let weights1 = [10, 9, 8, 7, 6, 5, 4, 3, 2];
    let weights2 = [11, 10, 9, 8, 7, 6, 5, 4, 3, 2];

    let digit1 = check_digit(&digits[..9], &weights1);
    let digit2 = check_digit(&digits[..10], &weights2);

    digits[9] == digit1 && digits[10] == digit2
}

/// Structural e-mail check: `local@domain.tld`, ASCII local/domain charset,
/// alphabetic TLD of at least two letters.
pub fn validate_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty()
        || !local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "._%+-".contains(c))
    {
        return false;
    }

    if domain.is_empty()
        || !domain
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || ".-".contains(c))
    {
        return false;
    }

    match domain.rsplit_once('.') {
        Some((name, tld)) => {
            !name.is_empty() && tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic())
        }
        None => false,
    }
}

pub const MIN_PASSWORD_LEN: usize = 8;

pub fn validate_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_cpf_with_punctuation() {
        assert!(validate_cpf("529.982.247-25"));
        assert!(validate_cpf("111.444.777-35"));
    }

    #[test]
    fn test_valid_cpf_bare_digits() {
        assert!(validate_cpf("52998224725"));
    }

    #[test]
    fn test_cpf_wrong_check_digit() {
        assert!(!validate_cpf("529.982.247-24"));
        assert!(!validate_cpf("111.444.777-36"));
    }

    #[test]
    fn test_cpf_repeated_digits_rejected() {
        assert!(!validate_cpf("111.111.111-11"));
        assert!(!validate_cpf("00000000000"));
    }

    #[test]
    fn test_cpf_wrong_length() {
        assert!(!validate_cpf("1234567890"));
        assert!(!validate_cpf(""));
        assert!(!validate_cpf("529.982.247-255"));
    }

    #[test]
    fn test_valid_emails() {
        assert!(validate_email("usuario@example.com"));
        assert!(validate_email("first.last+tag@sub.domain.com.br"));
    }

    #[test]
    fn test_invalid_emails() {
        assert!(!validate_email("sem-arroba.com"));
        assert!(!validate_email("@example.com"));
        assert!(!validate_email("user@"));
        assert!(!validate_email("user@domain"));
        assert!(!validate_email("user@.com"));
        assert!(!validate_email("user@domain.c"));
        assert!(!validate_email("a@b@c.com"));
    }

    #[test]
    fn test_password_length() {
        assert!(validate_password("senhaF0rte"));
        assert!(!validate_password("curta"));
    }
}
