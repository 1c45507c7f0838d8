use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

const ZIP_CODE_LEN: usize = 8;

/// Normalized Brazilian postal code (CEP): exactly 8 ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ZipCode(String);

impl ZipCode {
    /// Parse a CEP, accepting common punctuation such as `01310-100`.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let digits = strip_non_digits(input);
        if digits.len() != ZIP_CODE_LEN {
            return Err(ValidationError::InvalidZipCode {
                value: input.to_owned(),
            });
        }

        Ok(Self(digits))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Removes every character that is not an ASCII digit.
pub fn strip_non_digits(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

impl Display for ZipCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for ZipCode {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl TryFrom<String> for ZipCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for ZipCode {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ZipCode> for String {
    fn from(value: ZipCode) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_punctuation_before_validating() {
        let parsed = ZipCode::parse(" 01310-100 ").expect("zip code should parse");
        assert_eq!(parsed.as_str(), "01310100");
    }

    #[test]
    fn rejects_short_zip_code() {
        let err = ZipCode::parse("1234567").expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidZipCode { .. }));
    }

    #[test]
    fn rejects_zip_code_with_too_many_digits() {
        let err = ZipCode::parse("01310-1000").expect_err("must fail");
        assert_eq!(
            err,
            ValidationError::InvalidZipCode {
                value: String::from("01310-1000")
            }
        );
    }

    #[test]
    fn letters_do_not_count_as_digits() {
        assert!(ZipCode::parse("0131010a").is_err());
        assert_eq!(strip_non_digits("a0b1c"), "01");
    }
}
