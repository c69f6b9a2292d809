//! Hosts file line model and parser.
//!
//! Every physical line becomes one [`HostLine`]. Only address lines are ever
//! rewritten; blank, comment and unrecognised lines keep their raw text.

use std::fmt;

/// Minimum width of the address column when an address line is rendered.
pub const ADDRESS_COLUMN_WIDTH: usize = 16;

/// Classification of a hosts file line, fixed at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Empty or whitespace-only.
    Blank,
    /// Starts with `#` after trimming.
    Comment,
    /// An address followed by one or more hostnames.
    Address,
    /// Anything else, e.g. a lone token. Passed through untouched.
    Unknown,
}

/// One line of a hosts file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostLine {
    /// Zero-based position in the file as read. Informational only.
    pub original_index: usize,
    /// Line classification.
    pub kind: LineKind,
    /// The line exactly as read. Empty for lines added by mutation.
    pub raw: String,
    /// Lowercased address. Empty unless `kind` is [`LineKind::Address`].
    pub address: String,
    /// Lowercased hostnames in file order.
    pub hostnames: Vec<String>,
    /// Text after the first inline `#`, without the marker. Only set on
    /// address lines.
    pub trailing_comment: Option<String>,
}

impl HostLine {
    /// Builds a fresh address line with a single hostname.
    #[must_use]
    pub fn new_address(address: impl Into<String>, hostname: impl Into<String>) -> Self {
        Self {
            original_index: 0,
            kind: LineKind::Address,
            raw: String::new(),
            address: address.into(),
            hostnames: vec![hostname.into()],
            trailing_comment: None,
        }
    }

    /// Classifies a single raw line.
    #[must_use]
    pub fn parse(original_index: usize, raw: &str) -> Self {
        let mut line = Self {
            original_index,
            kind: LineKind::Unknown,
            raw: raw.to_string(),
            address: String::new(),
            hostnames: Vec::new(),
            trailing_comment: None,
        };

        let trimmed = raw.trim();
        if trimmed.starts_with('#') {
            line.kind = LineKind::Comment;
            return line;
        }
        if trimmed.is_empty() {
            line.kind = LineKind::Blank;
            return line;
        }

        let (data, comment) = match trimmed.split_once('#') {
            Some((data, comment)) => (data, Some(comment)),
            None => (trimmed, None),
        };

        let mut fields = data.split_whitespace().map(str::to_lowercase);
        if let Some(address) = fields.next() {
            let hostnames: Vec<String> = fields.collect();
            if !hostnames.is_empty() {
                line.kind = LineKind::Address;
                line.address = address;
                line.hostnames = hostnames;
                line.trailing_comment = comment.map(str::to_string);
            }
        }
        line
    }

    /// Returns `true` if this is an address line.
    #[must_use]
    pub fn is_address(&self) -> bool {
        self.kind == LineKind::Address
    }

    /// Returns `true` if this address line lists `hostname`.
    #[must_use]
    pub fn contains(&self, hostname: &str) -> bool {
        self.is_address() && self.hostnames.iter().any(|h| h == hostname)
    }
}

impl fmt::Display for HostLine {
    /// Address lines are re-formatted with a padded address column; every
    /// other kind is written back verbatim.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_address() {
            return f.write_str(&self.raw);
        }
        write!(
            f,
            "{:<width$} {}",
            self.address,
            self.hostnames.join(" "),
            width = ADDRESS_COLUMN_WIDTH
        )?;
        if let Some(comment) = self.trailing_comment.as_deref().filter(|c| !c.is_empty()) {
            write!(f, " #{comment}")?;
        }
        Ok(())
    }
}

/// Splits hosts file content into classified lines.
///
/// `\r\n` and `\n` are both accepted. A final line break does not produce an
/// extra blank line.
#[must_use]
pub fn parse_lines(content: &str) -> Vec<HostLine> {
    content
        .lines()
        .enumerate()
        .map(|(i, raw)| HostLine::parse(i, raw))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_comment_and_blank() {
        let lines = parse_lines("# header\n\n   \n  # indented\n");
        let kinds: Vec<_> = lines.iter().map(|l| l.kind).collect();
        assert_eq!(
            kinds,
            vec![
                LineKind::Comment,
                LineKind::Blank,
                LineKind::Blank,
                LineKind::Comment
            ]
        );
        assert_eq!(lines[3].raw, "  # indented");
    }

    #[test]
    fn parses_address_line_lowercased() {
        let line = HostLine::parse(0, "127.0.0.1\tFoo.Local  BAR.local");
        assert_eq!(line.kind, LineKind::Address);
        assert_eq!(line.address, "127.0.0.1");
        assert_eq!(line.hostnames, vec!["foo.local", "bar.local"]);
        assert!(line.trailing_comment.is_none());
    }

    #[test]
    fn keeps_trailing_comment_text() {
        let line = HostLine::parse(0, "::1 localhost # loopback v6");
        assert_eq!(line.address, "::1");
        assert_eq!(line.hostnames, vec!["localhost"]);
        assert_eq!(line.trailing_comment.as_deref(), Some(" loopback v6"));
    }

    #[test]
    fn single_token_is_unknown() {
        let line = HostLine::parse(4, "  lonely  ");
        assert_eq!(line.kind, LineKind::Unknown);
        assert_eq!(line.raw, "  lonely  ");
        assert_eq!(line.original_index, 4);
        assert!(line.hostnames.is_empty());
    }

    #[test]
    fn address_with_only_comment_is_unknown() {
        let line = HostLine::parse(0, "10.0.0.1 # nothing here");
        assert_eq!(line.kind, LineKind::Unknown);
        assert!(line.trailing_comment.is_none());
        assert_eq!(line.to_string(), "10.0.0.1 # nothing here");
    }

    #[test]
    fn duplicate_hostnames_kept() {
        let line = HostLine::parse(0, "10.0.0.1 a.local a.local");
        assert_eq!(line.hostnames, vec!["a.local", "a.local"]);
    }

    #[test]
    fn crlf_and_trailing_newline() {
        let lines = parse_lines("# a\r\n10.0.0.1 x.local\r\n");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].raw, "# a");
        assert_eq!(lines[1].hostnames, vec!["x.local"]);
        assert_eq!(lines[1].original_index, 1);
    }

    #[test]
    fn renders_padded_address() {
        let line = HostLine::parse(0, "127.0.0.1 foo.local bar.local");
        assert_eq!(line.to_string(), "127.0.0.1        foo.local bar.local");
    }

    #[test]
    fn renders_trailing_comment() {
        let line = HostLine::parse(0, "10.0.0.1   db.local   # primary");
        assert_eq!(line.to_string(), "10.0.0.1         db.local # primary");
    }

    #[test]
    fn renders_non_address_verbatim() {
        for raw in ["# comment", "", "   ", "weird"] {
            assert_eq!(HostLine::parse(0, raw).to_string(), raw);
        }
    }
}
