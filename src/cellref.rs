//! Cell reference helpers.
//!
//! Spreadsheet columns use bijective base-26 numbering: `A..Z`, then `AA..ZZ`,
//! then `AAA..`. Column indices in this crate are zero-based, so `0` is `A`
//! and `26` is `AA`.

/// Convert a zero-based column index into column letters.
///
/// ```
/// use inkwell_xlsx::cellref::number_to_column_letters;
///
/// assert_eq!(number_to_column_letters(0), "A");
/// assert_eq!(number_to_column_letters(26), "AA");
/// assert_eq!(number_to_column_letters(702), "AAA");
/// ```
pub fn number_to_column_letters(index: usize) -> String {
    let mut letters = Vec::with_capacity(3);
    // Signed so the loop can run past zero the way the numbering requires.
    let mut n = index as i128;

    while n >= 0 {
        letters.push(b'A' + (n % 26) as u8);
        n = n / 26 - 1;
    }

    letters.reverse();
    letters.into_iter().map(char::from).collect()
}

/// Index of the last column a worksheet can hold (`XFD`).
pub const MAX_COLUMN: usize = 16_383;

/// Convert column letters back into a zero-based column index.
///
/// Letters are matched case-insensitively. Anything that is not an ASCII
/// letter is ignored, so callers should pass only the alphabetic prefix of a
/// reference (see [`split_cell_reference`]). An empty string maps to `0`.
/// Returns `None` when the index does not fit in a `usize`.
pub fn column_letters_to_number(letters: &str) -> Option<usize> {
    let num = letters
        .bytes()
        .filter(u8::is_ascii_alphabetic)
        .try_fold(0usize, |num, b| {
            num.checked_mul(26)?
                .checked_add((b.to_ascii_uppercase() - b'A') as usize + 1)
        })?;

    Some(num.saturating_sub(1))
}

/// Split a cell reference such as `"AB12"` into its column letters and row.
///
/// The letters are upper-cased. The row is `None` when the reference has no
/// numeric part or the number does not parse.
pub fn split_cell_reference(reference: &str) -> (String, Option<u32>) {
    let reference = reference.trim().trim_start_matches('$');
    let split = reference
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(reference.len());

    let (letters, rest) = reference.split_at(split);
    let row = rest.trim_start_matches('$').parse::<u32>().ok();

    (letters.to_ascii_uppercase(), row)
}

/// Build an `A1`-style reference from a zero-based column and zero-based row.
pub fn cell_reference(column: usize, row: usize) -> String {
    format!("{}{}", number_to_column_letters(column), row + 1)
}
