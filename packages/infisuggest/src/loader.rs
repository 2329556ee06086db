use std::io::{BufRead, ErrorKind};

use log::{info, warn};

use infisuggest_common::i_debug;
use infisuggest_common::index::MemoryIndex;
use infisuggest_common::tokenize::PerFieldAnalyzer;

use crate::config::FieldConfig;

/// The part of a corpus line that is indexed: everything before the first tab, trimmed.
fn document_text(line: &str) -> &str {
    line.split('\t').next().unwrap_or("").trim()
}

/// Indexes a line oriented corpus, one document per line, into every configured field.
///
/// Lines that are not valid UTF-8 are skipped with a warning, other read errors abort loading.
pub fn load_corpus<R: BufRead>(
    reader: R,
    fields: &[FieldConfig],
    analyzers: &PerFieldAnalyzer,
) -> std::io::Result<MemoryIndex> {
    let mut index = MemoryIndex::new();
    for field in fields {
        index.add_field(&field.name);
    }

    let mut num_docs = 0;
    for (line_number, line) in reader.lines().enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                warn!("Skipping line {} of the corpus: {}", line_number + 1, e);
                continue;
            }
            Err(e) => return Err(e),
        };

        let text = document_text(&line);
        if text.is_empty() {
            continue;
        }

        for field in fields {
            index.add_field_text(&field.name, analyzers.get(&field.name), text);
        }
        num_docs += 1;

        i_debug!("Indexed line {}: {}", line_number + 1, text);
    }

    info!("Indexed {} documents into {} fields", num_docs, fields.len());

    Ok(index)
}
