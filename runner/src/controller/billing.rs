//! Fee extraction for the payment call

use std::sync::OnceLock;

use regex::Regex;

use crate::errors::WorkerError;

/// Fixed pattern the deploy tooling prints its total price with
const FEE_PATTERN: &str = r"Total price: ([0-9]+\.[0-9]+) AR";

/// Extract the decimal fee amount from the captured fee line.
///
/// A missing line means nothing was charged ("0"); a line that does not
/// match the fixed pattern is a hard billing failure, not something to
/// default away.
pub fn extract_fee(fee_line: Option<&str>) -> Result<String, WorkerError> {
    static FEE_RE: OnceLock<Regex> = OnceLock::new();
    let re = FEE_RE.get_or_init(|| Regex::new(FEE_PATTERN).unwrap());

    let Some(line) = fee_line else {
        return Ok("0".to_string());
    };

    match re.captures(line) {
        Some(captures) => Ok(captures[1].to_string()),
        None => Err(WorkerError::FeeParseError(format!(
            "fee line did not match the expected pattern: {line}"
        ))),
    }
}
