use std::io::{self, Write};

/// Writes `message` as a line to stdout and, when given, to `writer` as well.
///
/// Only a failure of `writer` is returned; stdout failures are logged.
pub fn println(message: &str, writer: &mut Option<&mut dyn Write>) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    if let Err(error) = writeln!(stdout, "{message}").and_then(|()| stdout.flush()) {
        tracing::warn!(%error, "failed to write to stdout");
    }

    match writer {
        Some(w) => writeln!(w, "{message}"),
        None => Ok(()),
    }
}
