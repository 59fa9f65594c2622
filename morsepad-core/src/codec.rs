//! Text <-> Morse lookup
//!
//! Encoded Morse is a sequence of space-separated tokens. Each token is the
//! dot/dash code of one character, `/` for a word break, or a run of
//! concatenated codes for a bracketed prosign such as `[AR]`.

use core::fmt::Write;

/// Token standing for the gap between words
pub const WORD_SEPARATOR: &str = "/";

/// Character emitted for a token with no mapping
pub const UNKNOWN_CHAR: char = '?';

const MORSE_TABLE: &[(char, &str)] = &[
    ('A', ".-"),
    ('B', "-..."),
    ('C', "-.-."),
    ('D', "-.."),
    ('E', "."),
    ('F', "..-."),
    ('G', "--."),
    ('H', "...."),
    ('I', ".."),
    ('J', ".---"),
    ('K', "-.-"),
    ('L', ".-.."),
    ('M', "--"),
    ('N', "-."),
    ('O', "---"),
    ('P', ".--."),
    ('Q', "--.-"),
    ('R', ".-."),
    ('S', "..."),
    ('T', "-"),
    ('U', "..-"),
    ('V', "...-"),
    ('W', ".--"),
    ('X', "-..-"),
    ('Y', "-.--"),
    ('Z', "--.."),
    ('0', "-----"),
    ('1', ".----"),
    ('2', "..---"),
    ('3', "...--"),
    ('4', "....-"),
    ('5', "....."),
    ('6', "-...."),
    ('7', "--..."),
    ('8', "---.."),
    ('9', "----."),
    ('.', ".-.-.-"),
    (',', "--..--"),
    ('?', "..--.."),
    ('\'', ".----."),
    ('!', "-.-.--"),
    ('/', "-..-."),
    ('(', "-.--."),
    (')', "-.--.-"),
    ('&', ".-..."),
    (':', "---..."),
    (';', "-.-.-."),
    ('=', "-...-"),
    ('+', ".-.-."),
    ('-', "-....-"),
    ('_', "..--.-"),
    ('"', ".-..-."),
    ('$', "...-..-"),
    ('@', ".--.-."),
];

/// Morse code for a character, case-insensitive
pub fn encode_char(c: char) -> Option<&'static str> {
    let upper = c.to_ascii_uppercase();
    MORSE_TABLE
        .iter()
        .find(|(ch, _)| *ch == upper)
        .map(|(_, code)| *code)
}

/// Character for a Morse code token
pub fn decode_token(token: &str) -> Option<char> {
    if token == WORD_SEPARATOR {
        return Some(' ');
    }
    MORSE_TABLE
        .iter()
        .find(|(_, code)| *code == token)
        .map(|(ch, _)| *ch)
}

/// Character for a committed code group, `?` when unmapped
pub fn decode_or_unknown(token: &str) -> char {
    decode_token(token).unwrap_or(UNKNOWN_CHAR)
}

fn write_unit<W: Write>(out: &mut W, c: char) -> core::fmt::Result {
    if c == ' ' {
        return out.write_str(WORD_SEPARATOR);
    }
    match encode_char(c) {
        Some(code) => out.write_str(code),
        None => out.write_char(c.to_ascii_uppercase()),
    }
}

/// Encode `text` into `out`.
///
/// Ordinary characters become single-space separated codes and a space
/// becomes the `/` word token. A bracketed run like `[AR]` is written as one
/// token with no spacing inside. Unmapped characters pass through literally.
pub fn encode_into<W: Write>(text: &str, out: &mut W) -> core::fmt::Result {
    let mut first = true;
    let mut rest = text;

    while let Some(c) = rest.chars().next() {
        if c == '[' {
            if let Some(close) = rest.find(']') {
                let run = &rest[1..close];
                rest = &rest[close + 1..];
                // `[]` produces no token
                if run.is_empty() {
                    continue;
                }
                if !first {
                    out.write_char(' ')?;
                }
                first = false;
                for inner in run.chars() {
                    match encode_char(inner) {
                        Some(code) => out.write_str(code)?,
                        None => out.write_char(inner.to_ascii_uppercase())?,
                    }
                }
                continue;
            }
        }

        if !first {
            out.write_char(' ')?;
        }
        first = false;
        write_unit(out, c)?;
        rest = &rest[c.len_utf8()..];
    }
    Ok(())
}

/// Decode Morse tokens into `out`.
///
/// `/` decodes to a space, an unmapped token to `?`. Empty tokens are skipped.
pub fn decode_into<'a, I, W>(tokens: I, out: &mut W) -> core::fmt::Result
where
    I: IntoIterator<Item = &'a str>,
    W: Write,
{
    for token in tokens.into_iter().filter(|token| !token.is_empty()) {
        out.write_char(decode_or_unknown(token))?;
    }
    Ok(())
}

/// Encode text to Morse
#[cfg(feature = "std")]
pub fn text_to_morse(text: &str) -> String {
    let mut out = String::with_capacity(text.len() * 5);
    // Writing into a String cannot fail
    let _ = encode_into(text, &mut out);
    out
}

/// Decode Morse tokens to text
#[cfg(feature = "std")]
pub fn morse_to_text<'a, I>(tokens: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out = String::new();
    let _ = decode_into(tokens, &mut out);
    out
}
