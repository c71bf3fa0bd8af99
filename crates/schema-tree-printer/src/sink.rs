//! Output destinations for rendered diagrams.

use std::io;

/// Receives the rendered text in chunks.
pub trait Sink {
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()>;

    fn write_str(&mut self, s: &str) -> io::Result<()> {
        self.write_bytes(s.as_bytes())
    }
}

impl Sink for String {
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        let s = std::str::from_utf8(bytes)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.push_str(s);
        Ok(())
    }

    fn write_str(&mut self, s: &str) -> io::Result<()> {
        self.push_str(s);
        Ok(())
    }
}

impl Sink for Vec<u8> {
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.extend_from_slice(bytes);
        Ok(())
    }
}

/// Adapts any [`io::Write`] (a file, stdout, a socket) into a [`Sink`].
#[derive(Debug)]
pub struct IoSink<W>(W);

impl<W: io::Write> IoSink<W> {
    pub fn new(writer: W) -> Self {
        Self(writer)
    }

    pub fn into_inner(self) -> W {
        self.0
    }
}

impl<W: io::Write> Sink for IoSink<W> {
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.0.write_all(bytes)
    }
}

/// Hands every chunk to a closure.
pub struct CallbackSink<F>(F);

impl<F> CallbackSink<F>
where
    F: FnMut(&[u8]) -> io::Result<()>,
{
    pub fn new(callback: F) -> Self {
        Self(callback)
    }
}

impl<F> Sink for CallbackSink<F>
where
    F: FnMut(&[u8]) -> io::Result<()>,
{
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        (self.0)(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_rejects_invalid_utf8() {
        let mut s = String::new();
        s.write_str("ok").unwrap();
        assert!(s.write_bytes(&[0xff]).is_err());
        assert_eq!(s, "ok");
    }

    #[test]
    fn io_sink_forwards() {
        let mut sink = IoSink::new(Vec::new());
        sink.write_str("a\n").unwrap();
        sink.write_bytes(b"b").unwrap();
        assert_eq!(sink.into_inner(), b"a\nb");
    }

    #[test]
    fn callback_errors_propagate() {
        let mut seen = 0;
        let mut sink = CallbackSink::new(|b: &[u8]| {
            seen += b.len();
            if seen > 3 {
                Err(io::Error::new(io::ErrorKind::WriteZero, "full"))
            } else {
                Ok(())
            }
        });
        assert!(sink.write_str("abc").is_ok());
        assert!(sink.write_str("d").is_err());
    }
}
