use crate::{Atom, KeySym};

//only the events selected by the window crate are decoded,
//everything else is reported by type so callers can trace it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    KeyPress {
        keysym: KeySym,
        text: Option<String>,
    },
    KeyRelease {
        keysym: KeySym,
    },
    ButtonPress {
        button: u32,
    },
    ButtonRelease {
        button: u32,
    },
    MotionNotify {
        x: i32,
        y: i32,
    },
    ConfigureNotify {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },
    ClientMessage {
        message_type: Atom,
        format: i32,
        data: [i64; 5],
    },
    //swallowed by the input method
    Filtered,
    Other(i32),
}

//decodes the bytes written by XLookupString, which are latin-1
pub(crate) fn decode_latin1(bytes: &[u8]) -> Option<String> {
    if bytes.is_empty() {
        return None;
    }

    Some(bytes.iter().map(|&b| b as char).collect())
}

pub(crate) fn decode_utf8(bytes: &[u8]) -> Option<String> {
    if bytes.is_empty() {
        return None;
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => Some(text.to_owned()),
        Err(e) => {
            log::warn!("input method produced invalid utf-8: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latin1_maps_high_bytes_to_chars() {
        assert_eq!(decode_latin1(b"a"), Some("a".to_string()));
        assert_eq!(decode_latin1(&[0xe9]), Some("é".to_string()));
        assert_eq!(decode_latin1(&[]), None);
    }

    #[test]
    fn utf8_rejects_broken_sequences() {
        assert_eq!(decode_utf8("ß".as_bytes()), Some("ß".to_string()));
        assert_eq!(decode_utf8(&[0xc3]), None);
        assert_eq!(decode_utf8(&[]), None);
    }
}
