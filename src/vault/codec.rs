//! Record codec: one account's lines <-> one token per line.
//!
//! Lines are encrypted independently, so damage to one line on disk
//! does not stop the others from decrypting.

use crate::crypto::Session;
use crate::errors::Result;

/// Encrypt every line, preserving order.
pub fn encode<S: AsRef<str>>(session: &Session, lines: &[S]) -> Result<Vec<String>> {
    lines
        .iter()
        .map(|line| session.encrypt(line.as_ref()))
        .collect()
}

/// Decrypt every token in order, stopping at the first failure.
pub fn decode<S: AsRef<str>>(session: &Session, tokens: &[S]) -> Result<Vec<String>> {
    tokens
        .iter()
        .map(|token| session.decrypt(token.as_ref()))
        .collect()
}

/// Render tokens as file contents: one token per line, trailing newline.
pub fn to_file_contents<S: AsRef<str>>(tokens: &[S]) -> String {
    let mut out = String::new();
    for token in tokens {
        out.push_str(token.as_ref());
        out.push('\n');
    }
    out
}

/// Split file contents back into tokens, skipping empty lines.
pub fn from_file_contents(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_contents_ignore_trailing_newline() {
        let text = to_file_contents(&["aaa", "bbb"]);
        assert_eq!(text, "aaa\nbbb\n");
        assert_eq!(from_file_contents(&text), vec!["aaa", "bbb"]);
    }

    #[test]
    fn file_contents_tolerate_crlf_and_blank_lines() {
        assert_eq!(from_file_contents("aaa\r\n\r\nbbb"), vec!["aaa", "bbb"]);
    }
}
