/// Terminal output for decoded trace lines
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use std::io::{self, Write};

/// Writes formatted calls, highlighting command names when color is enabled
pub struct TracePrinter<W: Write> {
    writer: W,
    color: bool,
}

impl<W: Write> TracePrinter<W> {
    pub fn new(writer: W, color: bool) -> Self {
        Self { writer, color }
    }

    /// Print a formatted call whose text starts with `name`
    pub fn print_call(&mut self, name: &str, line: &str) -> io::Result<()> {
        let arguments = line.strip_prefix(name).unwrap_or(line);
        let name = if arguments.len() == line.len() { "" } else { name };

        self.colored(Color::Yellow, name)?;
        self.writer.queue(Print(arguments))?;
        self.writer.queue(Print('\n'))?;
        Ok(())
    }

    /// Report a line that could not be decoded
    pub fn print_error(&mut self, line_number: usize, message: &str) -> io::Result<()> {
        self.colored(Color::Red, &format!("line {}: {}", line_number, message))?;
        self.writer.queue(Print('\n'))?;
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn colored(&mut self, color: Color, text: &str) -> io::Result<()> {
        if self.color {
            self.writer.queue(SetForegroundColor(color))?;
            self.writer.queue(Print(text))?;
            self.writer.queue(ResetColor)?;
        } else {
            self.writer.queue(Print(text))?;
        }
        Ok(())
    }
}
