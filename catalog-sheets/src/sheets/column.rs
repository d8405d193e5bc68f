//! Column labels in spreadsheet notation (A, B, ..., Z, AA, AB, ...)
//!
//! Labels are bijective base-26: there is no zero digit, so `Z` is followed by
//! `AA` rather than `BA`.

use anyhow::{Context, Result, bail};

/// Encode a zero-based column index as its alphabetic label
pub fn column_label(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();

    while n > 0 {
        let m = (n - 1) % 26;
        letters.push((b'A' + m as u8) as char);
        n = (n - m - 1) / 26;
    }

    letters.iter().rev().collect()
}

/// Decode an alphabetic label back to its zero-based column index
///
/// Lowercase letters are accepted. Anything outside A-Z is rejected.
pub fn column_index(label: &str) -> Result<usize> {
    if label.is_empty() {
        bail!("Column label is empty");
    }

    let mut n: usize = 0;
    for c in label.chars() {
        let c = c.to_ascii_uppercase();
        if !c.is_ascii_uppercase() {
            bail!("Invalid character '{}' in column label '{}'", c, label);
        }

        let digit = (c as u8 - b'A') as usize + 1;
        n = n
            .checked_mul(26)
            .and_then(|n| n.checked_add(digit))
            .with_context(|| format!("Column label '{}' is out of range", label))?;
    }

    Ok(n - 1)
}
