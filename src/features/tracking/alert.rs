//! Audible cue played when a countdown runs out.

use std::io::{self, Write};

/// Something that can make a noise.
pub trait Alert {
    /// Play the cue once.
    ///
    /// # Errors
    ///
    /// Returns an error if the cue could not be played.
    fn ring(&mut self) -> io::Result<()>;
}

/// Rings the terminal bell (BEL) on the wrapped writer.
pub struct TerminalBell<W: Write> {
    out: W,
}

impl<W: Write> TerminalBell<W> {
    /// Ring on `out`.
    pub const fn new(out: W) -> Self {
        Self { out }
    }
}

impl TerminalBell<io::Stdout> {
    /// Ring on stdout.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Alert for TerminalBell<W> {
    fn ring(&mut self) -> io::Result<()> {
        self.out.write_all(b"\x07")?;
        self.out.flush()
    }
}

/// An alert that stays quiet.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl Alert for Silent {
    fn ring(&mut self) -> io::Result<()> {
        Ok(())
    }
}
