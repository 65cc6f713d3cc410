use std::fmt;

/// Money is represented as integer pence to avoid floating-point precision
/// issues. 1 pound = 100 pence, so £90.00 = 9000 pence.
pub type Pence = i64;

/// Format pence as a human-readable decimal string.
/// Example: 9000 -> "90.00", -650 -> "-6.50"
pub fn format_pence(pence: Pence) -> String {
    let sign = if pence < 0 { "-" } else { "" };
    let abs_pence = pence.abs();
    let pounds = abs_pence / 100;
    let remainder = abs_pence % 100;
    format!("{}{}.{:02}", sign, pounds, remainder)
}

/// Parse a decimal string into pence.
/// Example: "90.00" -> 9000, "1.5" -> 150, "6" -> 600
pub fn parse_pence(input: &str) -> Result<Pence, ParsePenceError> {
    let input = input.trim();
    let negative = input.starts_with('-');
    let input = input.trim_start_matches('-');

    let parts: Vec<&str> = input.split('.').collect();
    match parts.len() {
        1 => {
            // No decimal point, treat as whole pounds
            let pounds: i64 = parts[0]
                .parse()
                .map_err(|_| ParsePenceError::InvalidFormat)?;
            let pence = pounds * 100;
            Ok(if negative { -pence } else { pence })
        }
        2 => {
            let pounds: i64 = if parts[0].is_empty() {
                0
            } else {
                parts[0]
                    .parse()
                    .map_err(|_| ParsePenceError::InvalidFormat)?
            };

            // Handle decimal part - pad or truncate to 2 digits
            let decimal_str = parts[1];
            let decimal_pence: i64 = match decimal_str.len() {
                0 => 0,
                1 => {
                    // Single digit like "5" means 50 pence
                    decimal_str
                        .parse::<i64>()
                        .map_err(|_| ParsePenceError::InvalidFormat)?
                        * 10
                }
                2 => decimal_str
                    .parse()
                    .map_err(|_| ParsePenceError::InvalidFormat)?,
                _ => {
                    // More than 2 decimal places - truncate
                    decimal_str[..2]
                        .parse()
                        .map_err(|_| ParsePenceError::InvalidFormat)?
                }
            };

            let pence = pounds * 100 + decimal_pence;
            Ok(if negative { -pence } else { pence })
        }
        _ => Err(ParsePenceError::InvalidFormat),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsePenceError {
    InvalidFormat,
}

impl fmt::Display for ParsePenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParsePenceError::InvalidFormat => write!(f, "invalid money format"),
        }
    }
}

impl std::error::Error for ParsePenceError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_pence() {
        assert_eq!(format_pence(9000), "90.00");
        assert_eq!(format_pence(650), "6.50");
        assert_eq!(format_pence(100), "1.00");
        assert_eq!(format_pence(1), "0.01");
        assert_eq!(format_pence(0), "0.00");
        assert_eq!(format_pence(-500), "-5.00");
        assert_eq!(format_pence(-1), "-0.01");
    }

    #[test]
    fn test_parse_pence() {
        assert_eq!(parse_pence("90.00"), Ok(9000));
        assert_eq!(parse_pence("90"), Ok(9000));
        assert_eq!(parse_pence("6.50"), Ok(650));
        assert_eq!(parse_pence("1.5"), Ok(150));
        assert_eq!(parse_pence("0.01"), Ok(1));
        assert_eq!(parse_pence(".50"), Ok(50));
        assert_eq!(parse_pence("-5.00"), Ok(-500));
        assert_eq!(parse_pence("1.999"), Ok(199)); // Truncates
    }

    #[test]
    fn test_parse_pence_invalid() {
        assert!(parse_pence("abc").is_err());
        assert!(parse_pence("1.00.00").is_err());
    }
}
