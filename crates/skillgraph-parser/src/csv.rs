//! Quote-aware CSV tokenization.
//!
//! This module splits a CSV document into logical records and parses one
//! record into its fields. Splitting is quote-aware: a `"..."` field may
//! contain commas and newlines, and a doubled quote `""` inside a quoted
//! field is an escaped literal quote.
//!
//! The record grammar is deliberately small; anything it rejects is treated
//! by the caller as a malformed row, not a fatal parse failure.

use winnow::{
    Parser as _,
    combinator::{alt, delimited, eof, opt, repeat},
    error::{ContextError, ErrMode},
    token::{literal, none_of, take_while},
};

type IResult<O> = std::result::Result<O, ErrMode<ContextError>>;

/// Splits CSV text into logical records.
///
/// A record ends at a newline that is not inside a quoted field. Trailing
/// `\r` from CRLF line endings is stripped from each record. Quote state is
/// tracked by toggling on every `"`; an escaped `""` toggles twice and so
/// leaves the state unchanged, which is all record splitting needs.
pub(crate) fn split_records(text: &str) -> Vec<&str> {
    let mut records = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;

    for (idx, ch) in text.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            '\n' if !in_quotes => {
                let line = &text[start..idx];
                records.push(line.strip_suffix('\r').unwrap_or(line));
                start = idx + 1;
            }
            _ => {}
        }
    }

    if start < text.len() {
        let line = &text[start..];
        records.push(line.strip_suffix('\r').unwrap_or(line));
    }

    records
}

/// Parse a quoted field: `"..."` with `""` as an escaped quote.
fn quoted_field(input: &mut &str) -> IResult<String> {
    delimited(
        '"',
        repeat(0.., alt((literal("\"\"").value('"'), none_of('"')))).fold(
            String::new,
            |mut acc, ch| {
                acc.push(ch);
                acc
            },
        ),
        '"',
    )
    .parse_next(input)
}

/// Parse an unquoted field: everything up to the next comma.
fn bare_field(input: &mut &str) -> IResult<String> {
    take_while(0.., |c: char| c != ',')
        .map(|s: &str| s.to_string())
        .parse_next(input)
}

/// Parse a single field, preferring the quoted form.
fn field(input: &mut &str) -> IResult<String> {
    alt((quoted_field, bare_field)).parse_next(input)
}

/// Parse one record (a logical line) into its raw field strings.
///
/// The full line must be consumed; trailing content after a closing quote
/// makes the record malformed.
fn record(input: &mut &str) -> IResult<Vec<String>> {
    let mut fields = vec![field.parse_next(input)?];

    while opt(',').parse_next(input)?.is_some() {
        fields.push(field.parse_next(input)?);
    }

    eof.parse_next(input)?;

    Ok(fields)
}

/// Parses a logical record line into raw field strings.
///
/// Returns a human-readable reason when the record does not match the
/// grammar; callers drop such rows.
pub(crate) fn parse_fields(line: &str) -> Result<Vec<String>, String> {
    let mut input = line;
    match record(&mut input) {
        Ok(fields) => Ok(fields),
        Err(err) => Err(err.to_string()),
    }
}
