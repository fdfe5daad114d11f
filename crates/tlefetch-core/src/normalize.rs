//! Line-ending normalization for fetched payloads.
//!
//! Rewrites every CR LF pair to a bare LF in one left-to-right pass. Nothing
//! else in the payload is touched: lone `\r` and lone `\n` survive as-is.

use std::borrow::Cow;

const CR: u8 = b'\r';
const LF: u8 = b'\n';

/// Number of `\r\n` pairs a call to [`normalize_line_endings`] would replace.
pub fn count_crlf(data: &[u8]) -> usize {
    data.windows(2).filter(|w| w[0] == CR && w[1] == LF).count()
}

/// Replace every `\r\n` in `data` with `\n`.
///
/// Borrows when there is nothing to replace, so payloads that already use
/// Unix line endings are written back byte-identical without a copy.
pub fn normalize_line_endings(data: &[u8]) -> Cow<'_, [u8]> {
    let first = match data.windows(2).position(|w| w[0] == CR && w[1] == LF) {
        Some(i) => i,
        None => return Cow::Borrowed(data),
    };

    let mut out = Vec::with_capacity(data.len());
    out.extend_from_slice(&data[..first]);
    let mut i = first;
    while i < data.len() {
        if data[i] == CR && data.get(i + 1) == Some(&LF) {
            out.push(LF);
            i += 2;
        } else {
            out.push(data[i]);
            i += 1;
        }
    }
    Cow::Owned(out)
}
