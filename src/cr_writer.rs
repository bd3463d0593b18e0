use std::io::{self, Write};

/// Writer that puts a `\r` in front of every `\n`.
///
/// A raw-mode terminal does no output post-processing, so a bare line feed
/// moves down without returning to column 0.
///
/// `write` reports the length of the caller's input, not the number of bytes
/// written downstream (which is larger by one per line feed). Callers see
/// their whole buffer accepted and never retry a "partial" write.
pub struct CrWriter<W> {
    buf: Vec<u8>,
    out: W,
}

impl<W: Write> CrWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            buf: Vec::new(),
            out,
        }
    }

    /// Release the scratch buffer.
    pub fn reset(&mut self) {
        self.buf = Vec::new();
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Write for CrWriter<W> {
    fn write(&mut self, orig: &[u8]) -> io::Result<usize> {
        match orig {
            [] => return Ok(0),
            [b'\n'] => {
                self.out.write_all(b"\r\n")?;
                return Ok(1);
            }
            [_] => return self.out.write(orig),
            _ => {}
        }

        let Some(first) = orig.iter().position(|&b| b == b'\n') else {
            return self.out.write(orig);
        };

        self.buf.clear();
        let mut emitted = 0;
        for (i, _) in orig
            .iter()
            .enumerate()
            .skip(first)
            .filter(|&(_, &b)| b == b'\n')
        {
            // The `\n` itself goes out with the next segment.
            self.buf.extend_from_slice(&orig[emitted..i]);
            self.buf.push(b'\r');
            emitted = i;
        }
        self.buf.extend_from_slice(&orig[emitted..]);
        self.out.write_all(&self.buf)?;
        Ok(orig.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}
