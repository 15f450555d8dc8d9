//! Terminal side of the authorization-code grant.

use std::io::{self, BufRead, Write};

use aweber_core::AuthorizationPrompt;
use tracing::debug;
use url::Url;

/// Shows the authorization URL and reads the pasted redirect URL from a reader.
pub struct TerminalPrompt<R, W> {
    input: R,
    output: W,
    open_browser: bool,
}

impl TerminalPrompt<io::StdinLock<'static>, io::Stdout> {
    /// Prompt on stdin/stdout that also tries to open the system browser.
    pub fn stdio() -> Self {
        Self {
            input: io::stdin().lock(),
            output: io::stdout(),
            open_browser: true,
        }
    }
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    /// Prompt over arbitrary streams, without touching the browser.
    #[cfg(test)]
    const fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            open_browser: false,
        }
    }
}

impl<R: BufRead, W: Write> AuthorizationPrompt for TerminalPrompt<R, W> {
    fn redirect_url(&mut self, url: &Url) -> io::Result<String> {
        if self.open_browser
            && let Err(e) = opener::open(url.as_str())
        {
            debug!("Could not open browser: {e}");
        }

        writeln!(self.output, "\nAuthorization required.")?;
        writeln!(self.output, "1. Log in here:\n   {url}")?;
        writeln!(self.output, "2. Paste the full redirect URL here:")?;
        write!(self.output, "   > ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "no redirect URL entered",
            ));
        }
        Ok(line.trim().to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_trimmed_line() {
        let url = Url::parse("https://auth.aweber.com/oauth2/authorize?state=x").unwrap();
        let mut out = Vec::new();
        let mut prompt =
            TerminalPrompt::new("  http://localhost/?code=c&state=x \n".as_bytes(), &mut out);

        let answer = prompt.redirect_url(&url).unwrap();
        assert_eq!(answer, "http://localhost/?code=c&state=x");

        let shown = String::from_utf8(out).unwrap();
        assert!(shown.contains("https://auth.aweber.com/oauth2/authorize?state=x"));
        assert!(shown.ends_with("   > "));
    }

    #[test]
    fn test_eof_is_an_error() {
        let url = Url::parse("https://auth.aweber.com/oauth2/authorize").unwrap();
        let mut prompt = TerminalPrompt::new(io::empty(), io::sink());
        let err = prompt.redirect_url(&url).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
