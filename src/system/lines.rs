// src/system/lines.rs

/// Reassembles complete text lines from raw byte chunks read off the child's
/// output pipe.
///
/// Chunks arrive at arbitrary boundaries, so the tail of one read is usually
/// the head of the next line. The assembler buffers bytes until a `\n` is
/// seen, which means a multi-byte UTF-8 sequence split across two reads is
/// never decoded in halves. A trailing `\r` is stripped to normalize CRLF
/// output from Windows builds of ffmpeg.
#[derive(Debug, Default)]
pub struct LineAssembler {
    buf: Vec<u8>,
}

impl LineAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one chunk and returns every line completed by it, in order.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let mut line: Vec<u8> = self.buf.drain(..=pos).collect();
            line.pop(); // the '\n' itself
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            lines.push(String::from_utf8_lossy(&line).into_owned());
        }
        lines
    }

    /// Surrenders the pending partial line, if any. Called once after the
    /// child has exited, so output that ended without a trailing newline is
    /// not lost.
    pub fn take_remainder(&mut self) -> Option<String> {
        if self.buf.is_empty() {
            return None;
        }
        let line = String::from_utf8_lossy(&self.buf).into_owned();
        self.buf.clear();
        Some(line)
    }
}
