use crate::error::{IndexError, Result};
use crate::index::{Postings, Table};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;

/// Output locations for one indexing run.
pub struct IndexPaths {
    pub root: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    pub fn forward(&self) -> PathBuf { self.root.join("forward_index.txt") }
    pub fn inverted(&self) -> PathBuf { self.root.join("inverted_index.txt") }
}

/// Write one line per outer key: `KEY: SUB1: F1; SUB2: F2`.
///
/// Inner keys are always ascending. Outer keys are ascending when `sort_by_key` is
/// set and follow the table's own iteration order otherwise.
pub fn write_table<W: Write>(writer: &mut W, table: &Table, sort_by_key: bool) -> Result<()> {
    let mut keys: Vec<&String> = table.keys().collect();
    if sort_by_key {
        keys.sort();
    }
    for key in keys {
        let entries = table[key]
            .iter()
            .map(|(sub, freq)| format!("{sub}: {freq}"))
            .collect::<Vec<_>>()
            .join("; ");
        writeln!(writer, "{key}: {entries}")?;
    }
    Ok(())
}

/// Write a table to `path`, replacing any previous file only once the new one is complete.
pub fn save_table(path: &Path, table: &Table, sort_by_key: bool) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;

    let mut temp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        write_table(&mut writer, table, sort_by_key)?;
        writer.flush()?;
    }
    temp.persist(path).map_err(|e| e.error)?;
    tracing::debug!(path = %path.display(), rows = table.len(), "saved index");
    Ok(())
}

/// Read back the format produced by [`write_table`].
pub fn parse_table<R: BufRead>(reader: R) -> Result<Table> {
    let mut table = Table::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let lineno = idx + 1;
        if line.is_empty() {
            continue;
        }
        let malformed = |reason: &str| IndexError::Malformed { line: lineno, reason: reason.to_string() };

        let (key, rest) = line.split_once(": ").ok_or_else(|| malformed("missing `: ` after key"))?;
        let mut postings = Postings::new();
        if !rest.is_empty() {
            for entry in rest.split("; ") {
                let (sub, freq) = entry
                    .rsplit_once(": ")
                    .ok_or_else(|| malformed(&format!("entry `{entry}` has no frequency")))?;
                let freq = freq
                    .parse()
                    .map_err(|_| malformed(&format!("bad frequency `{freq}`")))?;
                if postings.insert(sub.to_string(), freq).is_some() {
                    return Err(malformed(&format!("repeated entry `{sub}`")));
                }
            }
        }
        if table.insert(key.to_string(), postings).is_some() {
            return Err(malformed(&format!("repeated key `{key}`")));
        }
    }
    Ok(table)
}

pub fn load_table(path: &Path) -> Result<Table> {
    let f = File::open(path).map_err(|e| IndexError::missing(path, e))?;
    parse_table(BufReader::new(f))
}

/// Size of a written artifact in mebibytes, for operator-facing reporting.
pub fn file_size_mib(path: &Path) -> Result<f64> {
    let meta = fs::metadata(path).map_err(|e| IndexError::missing(path, e))?;
    Ok(meta.len() as f64 / BYTES_PER_MIB)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[(&str, &[(&str, u32)])]) -> Table {
        rows.iter()
            .map(|(k, entries)| {
                (k.to_string(), entries.iter().map(|(s, f)| (s.to_string(), *f)).collect())
            })
            .collect()
    }

    fn render(t: &Table, sort: bool) -> String {
        let mut buf = Vec::new();
        write_table(&mut buf, t, sort).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn writes_exact_line_shape() {
        let t = table(&[("cat", &[("d2", 2), ("d1", 1)]), ("and", &[("d2", 1)])]);
        assert_eq!(render(&t, true), "and: d2: 1\ncat: d1: 1; d2: 2\n");
    }

    #[test]
    fn empty_row_has_no_trailing_separator() {
        let t = table(&[("empty.txt", &[])]);
        let out = render(&t, true);
        assert_eq!(out, "empty.txt: \n");
        assert_eq!(parse_table(out.as_bytes()).unwrap(), t);
    }

    #[test]
    fn unsorted_output_still_sorts_inner_keys() {
        let t = table(&[("b", &[("z", 1), ("a", 2)]), ("a", &[("y", 3), ("x", 4)])]);
        let out = render(&t, false);
        let mut lines: Vec<&str> = out.lines().collect();
        lines.sort();
        assert_eq!(lines, vec!["a: x: 4; y: 3", "b: a: 2; z: 1"]);
    }

    #[test]
    fn parse_rejects_garbage() {
        let err = parse_table("cat d1 1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, IndexError::Malformed { line: 1, .. }));
        let err = parse_table("cat: d1: one\n".as_bytes()).unwrap_err();
        assert!(matches!(err, IndexError::Malformed { line: 1, .. }));
        let err = parse_table("cat: d1: 1\ncat: d2: 1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, IndexError::Malformed { line: 2, .. }));
    }

    #[test]
    fn doc_ids_with_colons_survive_in_inner_keys() {
        let t = table(&[("cat", &[("notes: v2", 3)])]);
        assert_eq!(parse_table(render(&t, true).as_bytes()).unwrap(), t);
    }
}
