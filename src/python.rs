//! Python bindings
//!
//! Scanning releases the GIL, so Python threads can validate in parallel.

use pyo3::prelude::*;
use pyo3::types::{PyLong, PyString};

use crate::matcher::{self, RawMatch};
use crate::validators::{self, InvalidCode, NationalCode};

/// Native extension module
#[pymodule]
fn iran_national_code(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyMatcher>()?;
    m.add_class::<PyRawMatch>()?;
    m.add_function(wrap_pyfunction!(validate_national_code, m)?)?;
    m.add_function(wrap_pyfunction!(explain_national_code, m)?)?;
    m.add_function(wrap_pyfunction!(validate_batch, m)?)?;
    m.add_function(wrap_pyfunction!(is_native_available, m)?)?;
    Ok(())
}

/// Validate a national code given as `str` or `int`. Never raises.
#[pyfunction]
fn validate_national_code(code: &Bound<'_, PyAny>) -> bool {
    check_object(code).is_ok()
}

/// Why a national code is invalid, or `None` if it is valid
#[pyfunction]
fn explain_national_code(code: &Bound<'_, PyAny>) -> Option<String> {
    check_object(code).err()
}

/// Validate a list of textual codes without holding the GIL
#[pyfunction]
fn validate_batch(py: Python<'_>, codes: Vec<String>) -> Vec<bool> {
    py.allow_threads(|| validators::validate_batch(&codes))
}

/// Check if native extension is working
#[pyfunction]
fn is_native_available() -> bool {
    true
}

fn check_object(code: &Bound<'_, PyAny>) -> Result<NationalCode, String> {
    if let Ok(text) = code.downcast::<PyString>() {
        let text = text
            .to_cow()
            .map_err(|_| "national code is not valid text".to_string())?;
        return validators::check(text.as_ref()).map_err(|e| e.to_string());
    }

    if code.is_instance_of::<PyLong>() {
        return match code.extract::<i128>() {
            Ok(n) => validators::check(n).map_err(|e| e.to_string()),
            // too large for i128, so certainly longer than ten digits
            Err(_) => Err(overflow_reason(code)),
        };
    }

    Err("national code must be str or int".to_string())
}

fn overflow_reason(code: &Bound<'_, PyAny>) -> String {
    let length = code
        .str()
        .ok()
        .and_then(|s| s.to_cow().ok().map(|s| s.chars().count()))
        .unwrap_or(0);
    InvalidCode::Length(length).to_string()
}

/// A national-code shaped span; offsets are in characters
#[pyclass(name = "RawMatch", get_all, frozen)]
#[derive(Clone)]
struct PyRawMatch {
    start: usize,
    end: usize,
    text: String,
    valid: bool,
}

#[pymethods]
impl PyRawMatch {
    fn __repr__(&self) -> String {
        format!(
            "RawMatch(start={}, end={}, text={:?}, valid={})",
            self.start,
            self.end,
            self.text,
            if self.valid { "True" } else { "False" }
        )
    }
}

impl PyRawMatch {
    fn from_raw(source: &str, m: RawMatch) -> Self {
        let (start, end) = m.char_span(source);
        PyRawMatch {
            start,
            end,
            text: m.text,
            valid: m.valid,
        }
    }
}

/// Finds national codes in text
#[pyclass(name = "NationalCodeMatcher")]
struct PyMatcher;

#[pymethods]
impl PyMatcher {
    #[new]
    fn new() -> Self {
        PyMatcher
    }

    fn find_all(&self, py: Python<'_>, text: &str) -> Vec<PyRawMatch> {
        let matches = py.allow_threads(|| matcher::find_all(text));
        convert(text, matches)
    }

    fn find_valid(&self, py: Python<'_>, text: &str) -> Vec<PyRawMatch> {
        let matches = py.allow_threads(|| matcher::find_valid(text));
        convert(text, matches)
    }
}

fn convert(source: &str, matches: Vec<RawMatch>) -> Vec<PyRawMatch> {
    matches
        .into_iter()
        .map(|m| PyRawMatch::from_raw(source, m))
        .collect()
}
