use bytes::{Buf, BufMut, BytesMut};
use memchr::memchr2;

const CR: u8 = b'\r';
const LF: u8 = b'\n';

/// Splits an incoming byte stream into text lines.
///
/// A line ends with CRLF, a single LF, or a single CR. Bytes are put in as they
/// arrive from the network so a terminator may be split over two chunks; a CR
/// that ends a chunk swallows the LF that starts the next one.
///
/// The buffer is unbounded: a server that never ends its line grows it until
/// the stream closes or times out.
#[derive(Default)]
pub struct LineDecoder {
    buf: BytesMut,
    skip_lf: bool,
}

impl LineDecoder {
    pub fn put(&mut self, bs: impl Buf) {
        self.buf.put(bs)
    }

    /// Takes the next complete line out of the buffer, without its terminator.
    pub fn next_line(&mut self) -> Option<String> {
        if self.skip_lf {
            match self.buf.first() {
                None => return None,
                Some(&LF) => self.buf.advance(1),
                Some(_) => (),
            }
            self.skip_lf = false;
        }

        let i = memchr2(CR, LF, &self.buf)?;
        let line = self.buf.split_to(i);
        let terminator = self.buf[0];
        self.buf.advance(1);

        if terminator == CR {
            match self.buf.first() {
                Some(&LF) => self.buf.advance(1),
                Some(_) => (),
                None => self.skip_lf = true,
            }
        }

        Some(String::from_utf8_lossy(&line).into_owned())
    }

    /// Drains whatever is left once the input has ended. A body that does not
    /// end with a newline still yields its last line.
    pub fn finish(&mut self) -> Option<String> {
        self.skip_lf = false;

        if self.buf.is_empty() {
            return None;
        }

        let rest = self.buf.split();
        Some(String::from_utf8_lossy(&rest).into_owned())
    }

    #[cfg(test)]
    /// Helper fn for tests.
    fn bytes(&self) -> &[u8] {
        &self.buf
    }
}

#[cfg(test)]
impl From<&[u8]> for LineDecoder {
    fn from(b: &[u8]) -> Self {
        Self {
            buf: BytesMut::from(b),
            skip_lf: false,
        }
    }
}

#[cfg(test)]
impl From<&str> for LineDecoder {
    fn from(s: &str) -> Self {
        Self::from(s.as_bytes())
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    fn drain(d: &mut LineDecoder) -> Vec<String> {
        let mut lines = Vec::new();
        while let Some(line) = d.next_line() {
            lines.push(line);
        }
        lines
    }

    #[test]
    fn buf_cleared_line_ending_with_crlf() {
        let mut d = LineDecoder::from("\r\n");
        assert_eq!(d.next_line().as_deref(), Some(""));
        assert_eq!(d.bytes(), &[]);
        assert!(d.next_line().is_none());
    }

    #[test]
    fn single_lf_should_be_empty_line() {
        let mut d = LineDecoder::from("\n");
        assert_eq!(d.next_line().expect("parsing line"), "");
    }

    #[test]
    fn buf_cleared_line_ending_with_cr() {
        let mut d = LineDecoder::from("\r");
        assert_eq!(d.next_line().as_deref(), Some(""));
        assert_eq!(d.bytes(), &[]);
    }

    #[test]
    fn mixed_terminators() {
        let mut d = LineDecoder::from("data: a\r\ndata: b\ndata: c\rtail");
        assert_eq!(drain(&mut d), vec!["data: a", "data: b", "data: c"]);
        assert_eq!(d.finish().as_deref(), Some("tail"));
        assert!(d.finish().is_none());
    }

    #[test]
    fn crlf_split_across_chunks_is_one_terminator() {
        let mut d = LineDecoder::default();
        d.put(&b"data: first\r"[..]);
        assert_eq!(d.next_line().as_deref(), Some("data: first"));
        assert!(d.next_line().is_none());

        d.put(&b"\ndata: second\n"[..]);
        assert_eq!(drain(&mut d), vec!["data: second"]);
    }

    #[test]
    fn lone_cr_at_chunk_end_followed_by_text() {
        let mut d = LineDecoder::default();
        d.put(&b"one\r"[..]);
        assert_eq!(d.next_line().as_deref(), Some("one"));

        d.put(&b"two\n"[..]);
        assert_eq!(d.next_line().as_deref(), Some("two"));
    }

    #[test]
    fn partial_line_waits_for_more_input() {
        let mut d = LineDecoder::default();
        d.put(&b"data: hel"[..]);
        assert!(d.next_line().is_none());

        d.put(&b"lo\n\n"[..]);
        assert_eq!(drain(&mut d), vec!["data: hello", ""]);
    }

    #[test]
    fn lines_are_opaque() {
        // Comments and field lines come through untouched.
        let mut d = LineDecoder::from(": keep-alive\nevent: ping\nid:\n");
        assert_eq!(drain(&mut d), vec![": keep-alive", "event: ping", "id:"]);
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let mut d = LineDecoder::from(&b"ok \xff\n"[..]);
        assert_eq!(d.next_line().as_deref(), Some("ok \u{fffd}"));
    }
}
