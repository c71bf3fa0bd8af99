use std::io;

use crate::sink::Sink;

/// Forwards text to a sink while tracking the current column.
pub(crate) struct LineWriter<'a> {
    sink: &'a mut dyn Sink,
    column: usize,
}

impl<'a> LineWriter<'a> {
    pub(crate) fn new(sink: &'a mut dyn Sink) -> Self {
        Self { sink, column: 0 }
    }

    pub(crate) fn text(&mut self, s: &str) -> io::Result<()> {
        self.sink.write_str(s)?;
        match s.rfind('\n') {
            Some(i) => self.column = s[i + 1..].chars().count(),
            None => self.column += s.chars().count(),
        }
        Ok(())
    }

    pub(crate) fn spaces(&mut self, n: usize) -> io::Result<()> {
        if n == 0 {
            return Ok(());
        }
        self.text(&" ".repeat(n))
    }

    pub(crate) fn newline(&mut self) -> io::Result<()> {
        self.text("\n")
    }

    pub(crate) fn column(&self) -> usize {
        self.column
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_columns_across_lines() {
        let mut buf = String::new();
        let mut out = LineWriter::new(&mut buf);
        out.text("abc").unwrap();
        assert_eq!(out.column(), 3);
        out.spaces(2).unwrap();
        assert_eq!(out.column(), 5);
        out.text("x\nyz").unwrap();
        assert_eq!(out.column(), 2);
        out.newline().unwrap();
        assert_eq!(out.column(), 0);
        assert_eq!(buf, "abc  x\nyz\n");
    }
}
