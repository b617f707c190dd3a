//! Iranian national code validation
//!
//! Checks the 10-digit national identity code (control digit included)
//! and finds such codes in free text. Build with the `python` feature to
//! get the native Python extension module.
//!
//! ```
//! use iran_national_code::validate;
//!
//! assert!(validate("0499370899"));
//! assert!(!validate("0499370898"));
//! // integers cannot carry a leading zero
//! assert!(!validate(499370899u32));
//! ```

pub mod matcher;
pub mod validators;

#[cfg(feature = "python")]
mod python;

pub use matcher::{find_all, find_valid, scan_batch, RawMatch};
pub use validators::{
    check, expected_control_digit, validate, validate_batch, Candidate, InvalidCode,
    NationalCode, CODE_LENGTH,
};
