//! Validation functions for Iranian national codes
//!
//! A national code is ten ASCII digits. The last one is a control digit
//! derived from the weighted sum of the first nine.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use rayon::prelude::*;
use thiserror::Error;

/// Number of digits in a national code, control digit included
pub const CODE_LENGTH: usize = 10;

// digit i carries weight 10 - i
const WEIGHTS: [u32; CODE_LENGTH - 1] = [10, 9, 8, 7, 6, 5, 4, 3, 2];

/// Input accepted by the validator.
///
/// Integers are rendered in decimal before validation, so a code that
/// starts with `0` cannot be expressed as a number: `499370899` is not the
/// same candidate as `"0499370899"`. Pass text whenever the code may have
/// a leading zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Candidate<'a> {
    Text(&'a str),
    Number(i128),
}

impl<'a> Candidate<'a> {
    fn normalize(self) -> Cow<'a, str> {
        match self {
            Candidate::Text(text) => Cow::Borrowed(text),
            Candidate::Number(n) => Cow::Owned(n.to_string()),
        }
    }
}

impl<'a> From<&'a str> for Candidate<'a> {
    fn from(text: &'a str) -> Self {
        Candidate::Text(text)
    }
}

impl<'a> From<&'a String> for Candidate<'a> {
    fn from(text: &'a String) -> Self {
        Candidate::Text(text.as_str())
    }
}

macro_rules! candidate_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Candidate<'_> {
                fn from(n: $t) -> Self {
                    Candidate::Number(n as i128)
                }
            }
        )*
    };
}

candidate_from_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, usize);

/// Reason a candidate was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidCode {
    #[error("national code is empty")]
    Empty,
    #[error("national code must have 10 digits, got {0} characters")]
    Length(usize),
    #[error("non-digit character {found:?} at position {position}")]
    NonDigit { position: usize, found: char },
    #[error("all digits are {0}")]
    RepeatedDigit(u8),
    #[error("control digit is {found}, expected {expected}")]
    Checksum { expected: u8, found: u8 },
}

/// A national code that passed every check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NationalCode([u8; CODE_LENGTH]);

impl NationalCode {
    /// Digit values, most significant first
    pub fn digits(&self) -> &[u8; CODE_LENGTH] {
        &self.0
    }

    pub fn control_digit(&self) -> u8 {
        self.0[CODE_LENGTH - 1]
    }
}

impl fmt::Display for NationalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for digit in self.0 {
            write!(f, "{}", digit)?;
        }
        Ok(())
    }
}

impl FromStr for NationalCode {
    type Err = InvalidCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        check(s)
    }
}

/// Parse and validate a candidate, reporting why it was rejected.
pub fn check<'a>(code: impl Into<Candidate<'a>>) -> Result<NationalCode, InvalidCode> {
    let text = code.into().normalize();
    let digits = parse_digits(&text)?;

    let first = digits[0];
    if digits.iter().all(|&d| d == first) {
        return Err(InvalidCode::RepeatedDigit(first));
    }

    let expected = control_for(&digits[..CODE_LENGTH - 1]);
    let found = digits[CODE_LENGTH - 1];
    if found != expected {
        return Err(InvalidCode::Checksum { expected, found });
    }

    Ok(NationalCode(digits))
}

/// Validate an Iranian national code given as text or integer.
///
/// Never panics; every malformed input is simply `false`.
pub fn validate<'a>(code: impl Into<Candidate<'a>>) -> bool {
    match check(code) {
        Ok(_) => true,
        Err(reason) => {
            log::trace!("rejected national code: {}", reason);
            false
        }
    }
}

/// Control digit for a 9-digit prefix, or `None` if the prefix is not
/// exactly nine ASCII digits.
pub fn expected_control_digit(prefix: &str) -> Option<u8> {
    let bytes = prefix.as_bytes();
    if bytes.len() != CODE_LENGTH - 1 || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    let mut digits = [0u8; CODE_LENGTH - 1];
    for (digit, b) in digits.iter_mut().zip(bytes) {
        *digit = b - b'0';
    }
    Some(control_for(&digits))
}

/// Validate many textual codes in parallel, preserving order
pub fn validate_batch<S: AsRef<str> + Sync>(codes: &[S]) -> Vec<bool> {
    log::debug!("validating batch of {} national codes", codes.len());
    codes.par_iter().map(|code| validate(code.as_ref())).collect()
}

fn parse_digits(text: &str) -> Result<[u8; CODE_LENGTH], InvalidCode> {
    if text.is_empty() {
        return Err(InvalidCode::Empty);
    }

    let length = text.chars().count();
    if length != CODE_LENGTH {
        return Err(InvalidCode::Length(length));
    }

    let mut digits = [0u8; CODE_LENGTH];
    for (position, c) in text.chars().enumerate() {
        if !c.is_ascii_digit() {
            return Err(InvalidCode::NonDigit { position, found: c });
        }
        digits[position] = c as u8 - b'0';
    }
    Ok(digits)
}

fn control_for(prefix: &[u8]) -> u8 {
    let sum: u32 = prefix
        .iter()
        .zip(WEIGHTS)
        .map(|(&d, w)| u32::from(d) * w)
        .sum();

    let remainder = (sum % 11) as u8;
    if remainder < 2 {
        remainder
    } else {
        11 - remainder
    }
}
