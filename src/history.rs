//! Flat-file command history: one entry per line, `\n` terminated.
//!
//! Failures here are logged and swallowed. A missing or unreadable history
//! file never stops an interactive session.

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;

use tracing::{error, info, warn};

const HISTORY_FILE_MODE: u32 = 0o600;

fn open(path: &Path, truncate: bool) -> io::Result<File> {
    OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(truncate)
        .mode(HISTORY_FILE_MODE)
        .open(path)
}

/// Read entries in file order, creating the file if it does not exist.
pub fn load(path: &Path) -> Vec<String> {
    if path.as_os_str().is_empty() {
        info!("No history file specified");
        return Vec::new();
    }
    let file = match open(path, false) {
        Ok(file) => file,
        Err(err) => {
            error!("Error opening history file {}: {}", path.display(), err);
            return Vec::new();
        }
    };
    let mut reader = BufReader::new(file);
    let mut lines = Vec::new();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => lines.push(decode_line(&buf)),
            Err(err) => {
                error!("Error reading history file {}: {}", path.display(), err);
                break;
            }
        }
    }
    lines
}

/// One raw line without its terminator. Bytes that are not UTF-8 become
/// U+FFFD instead of dropping the line.
fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}

/// Replace the file content with `lines`, each terminated by `\n`.
///
/// Stops at the first write error; lines after it are lost.
pub fn save(path: &Path, lines: &[String]) {
    if path.as_os_str().is_empty() {
        info!("No history file specified");
        return;
    }
    let file = match open(path, true) {
        Ok(file) => file,
        Err(err) => {
            error!("Error opening history file {}: {}", path.display(), err);
            return;
        }
    };
    let mut out = BufWriter::new(file);
    for line in lines {
        if line.contains('\n') {
            // The format cannot represent this; it will read back as several entries.
            warn!("History entry contains a line feed and will not round-trip: {:?}", line);
        }
        if let Err(err) = writeln!(out, "{}", line) {
            error!("Error writing history file {}: {}", path.display(), err);
            return;
        }
    }
    if let Err(err) = out.flush() {
        error!("Error writing history file {}: {}", path.display(), err);
    }
}
