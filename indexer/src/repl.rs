use anyhow::Result;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::io::{BufRead, Write};
use termindex_core::query::{is_exit, QueryEngine, QueryResults};

const PROMPT: &str = "Enter a term or sentence to search (or type 'exit' to quit): ";

/// Prompt for queries until `exit` or end of input. Returns how many queries were answered.
pub fn run<R: BufRead, W: Write>(mut input: R, output: &mut W, engine: &QueryEngine<'_>) -> Result<usize> {
    let mut answered = 0;
    let mut buf = Vec::new();
    loop {
        write!(output, "{PROMPT}")?;
        output.flush()?;

        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            writeln!(output)?;
            break;
        }
        // Undecodable input is still a query; it just matches nothing useful.
        let line = String::from_utf8_lossy(&buf);
        if is_exit(&line) {
            break;
        }
        write_results(output, &engine.search(line.trim_end_matches(&['\r', '\n'][..])))?;
        answered += 1;
    }
    tracing::debug!(answered, "query session ended");
    Ok(answered)
}

pub fn write_results<W: Write>(output: &mut W, results: &QueryResults) -> Result<()> {
    let mut ser = serde_json::Serializer::with_formatter(&mut *output, PrettyFormatter::with_indent(b"    "));
    results.serialize(&mut ser)?;
    writeln!(output)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use termindex_core::{build, MemorySource, Normalizer, Stopwords};

    fn session(input: &str) -> (usize, String) {
        let normalizer = Normalizer::new(Stopwords::empty());
        let source = MemorySource::new().with("d1", "The cat sat").with("d2", "cats and cats");
        let indexes = build(&source, &normalizer).unwrap();
        let engine = QueryEngine::new(&indexes.inverted, &normalizer);
        let mut out = Vec::new();
        let n = run(input.as_bytes(), &mut out, &engine).unwrap();
        (n, String::from_utf8(out).unwrap())
    }

    #[test]
    fn answers_until_exit() {
        let (n, out) = session("Cats!\nExit\nsat\n");
        assert_eq!(n, 1);
        assert!(out.contains("    \"cat\": {\n        \"d1\": 1,\n        \"d2\": 2\n    }"));
        assert!(!out.contains("\"sat\""));
    }

    #[test]
    fn stops_at_end_of_input() {
        let (n, out) = session("xyz\nsat");
        assert_eq!(n, 2);
        assert!(out.contains("\"xyz\": \"No entries found.\""));
        assert!(out.contains("\"sat\": {"));
    }

    #[test]
    fn padded_exit_is_a_query() {
        let (n, out) = session("  exit  \nexit\n");
        assert_eq!(n, 1);
        assert!(out.contains("\"exit\": \"No entries found.\""));
    }

    #[test]
    fn punctuation_only_query_is_empty_object() {
        let (n, out) = session("?!\n");
        assert_eq!(n, 1);
        assert!(out.contains("{}"));
    }
}
