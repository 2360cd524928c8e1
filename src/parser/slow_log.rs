use crate::core::SetsumeiError;

/// One `mysqldumpslow` entry: a `Count: ...` header and the statement lines below it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry<'a> {
    pub header: &'a str,
    pub lines: Vec<&'a str>,
}

impl<'a> LogEntry<'a> {
    /// Validate a block of lines. Whitespace-only lines are dropped first;
    /// returns `Ok(None)` when nothing is left.
    pub fn parse(block: &[&'a str]) -> Result<Option<Self>, SetsumeiError> {
        let mut lines = block.iter().copied().filter(|l| !l.trim().is_empty());

        let Some(header) = lines.next() else {
            return Ok(None);
        };

        if !header.starts_with("Count") {
            return Err(SetsumeiError::InvalidHeader(block.join("\n")));
        }

        Ok(Some(Self {
            header,
            lines: lines.collect(),
        }))
    }

    /// Statement lines joined by single spaces
    pub fn statement(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.trim())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Split raw log text into blocks separated by one or more empty lines
pub fn split_entries(raw: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in raw.lines() {
        if line.is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }

    if !current.is_empty() {
        blocks.push(current);
    }

    blocks
}

/// Parse every non-blank entry in order
pub fn parse_entries(raw: &str) -> Result<Vec<LogEntry<'_>>, SetsumeiError> {
    let mut entries = Vec::new();
    for block in split_entries(raw) {
        if let Some(entry) = LogEntry::parse(&block)? {
            entries.push(entry);
        }
    }
    Ok(entries)
}
