use owo_colors::OwoColorize;

/// Human-facing status lines, separate from the log stream.
pub struct Output {
    quiet: bool,
}

impl Output {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    pub fn success(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }
        println!("{} {}", "✓".green(), msg.as_ref());
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }
        println!("{} {}", "ℹ".blue(), msg.as_ref());
    }

    pub fn error(&self, msg: impl AsRef<str>) {
        // Errors should always be shown, even in quiet mode
        eprintln!("{} {}", "✗".red(), msg.as_ref());
    }
}
