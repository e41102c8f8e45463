pub mod list;
pub mod report;
pub mod run;

use std::io::Read;

use rand::Rng;

/// Where the sequence under test comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// A file (or "-" for stdin), either bit text or raw bytes.
    File { path: String, bytes: bool },
    /// N fresh bits from the OS CSPRNG.
    Generate(usize),
}

impl Source {
    /// Short label for tables and reports.
    pub fn label(&self) -> String {
        match self {
            Self::File { path, .. } if path == "-" => "stdin".to_string(),
            Self::File { path, .. } => path.clone(),
            Self::Generate(n) => format!("os-rng ({n} bits)"),
        }
    }

    /// Load the sequence as 0/1 values.
    pub fn load(&self) -> Result<Vec<u8>, String> {
        match self {
            Self::File { path, bytes } => {
                let raw = read_input(path)?;
                if *bytes {
                    Ok(randcheck_tests::to_bits(&raw))
                } else {
                    let text = String::from_utf8(raw)
                        .map_err(|_| format!("{path}: bit text must be UTF-8"))?;
                    parse_bit_text(&text)
                }
            }
            Self::Generate(n) => Ok(generate_bits(*n)),
        }
    }
}

fn read_input(path: &str) -> Result<Vec<u8>, String> {
    if path == "-" {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .map_err(|e| format!("failed to read stdin: {e}"))?;
        Ok(buf)
    } else {
        std::fs::read(path).map_err(|e| format!("failed to read {path}: {e}"))
    }
}

/// Parse ASCII bit text. Whitespace is skipped; anything else but '0'/'1'
/// is rejected with its character offset.
pub fn parse_bit_text(text: &str) -> Result<Vec<u8>, String> {
    let mut bits = Vec::with_capacity(text.len());
    for (pos, c) in text.chars().enumerate() {
        match c {
            '0' => bits.push(0),
            '1' => bits.push(1),
            c if c.is_whitespace() => {}
            other => return Err(format!("unexpected character {other:?} at offset {pos}")),
        }
    }
    if bits.is_empty() {
        return Err("input contains no bits".to_string());
    }
    Ok(bits)
}

/// `n` bits drawn from the thread-local CSPRNG.
pub fn generate_bits(n: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; n.div_ceil(8)];
    rand::rng().fill(&mut bytes[..]);
    let mut bits = randcheck_tests::to_bits(&bytes);
    bits.truncate(n);
    bits
}

/// Resolve a `--tests` value into identifiers. "nist" and "all" expand to
/// registry lists; unknown names are kept so the engine reports them.
pub fn parse_test_list(selection: &str) -> Vec<String> {
    match selection.trim() {
        "all" => randcheck_tests::available_tests()
            .into_iter()
            .map(String::from)
            .collect(),
        "nist" | "" => randcheck_tests::nist_tests()
            .into_iter()
            .map(String::from)
            .collect(),
        list => list
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
    }
}

/// Compact p-value rendering for tables: the minimum of a collection with
/// its size.
pub fn format_p_value(p: Option<&randcheck_tests::PValue>) -> String {
    use randcheck_tests::PValue;
    match p {
        Some(PValue::Single(p)) => format!("{p:.6}"),
        Some(all @ PValue::Multiple(ps)) => match all.min() {
            Some(min) => format!("{min:.6} (min of {})", ps.len()),
            None => "-".to_string(),
        },
        None => "-".to_string(),
    }
}
