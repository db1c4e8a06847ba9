use std::path::Path;

use super::{Chunk, ChunkKind, IngestOptions, Locator, normalize, segment_or_whole};
use crate::decoder::{DocumentDecoder, LoadError};

/// Loads one file of the given kind into chunks, in document order.
pub fn load_file(
    path: &Path,
    kind: ChunkKind,
    options: &IngestOptions,
    decoder: &dyn DocumentDecoder,
) -> Result<Vec<Chunk>, LoadError> {
    match kind {
        ChunkKind::Text => load_text(path, options, decoder),
        ChunkKind::Pdf => load_pdf(path, options, decoder),
        ChunkKind::Tabular => load_table(path, options, decoder),
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

fn source_path(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

/// Paragraphs of a text file; `id = name#c{i}`.
pub fn load_text(
    path: &Path,
    options: &IngestOptions,
    decoder: &dyn DocumentDecoder,
) -> Result<Vec<Chunk>, LoadError> {
    let raw = decoder.read_text(path)?;
    let text = normalize(&raw);
    let name = file_name(path);
    let source = source_path(path);

    Ok(segment_or_whole(&text, options.min_paragraph_chars)
        .into_iter()
        .enumerate()
        .map(|(i, para)| Chunk {
            id: format!("{name}#c{i}"),
            source_path: source.clone(),
            text: para,
            locator: Locator::Text { chunk_index: i },
        })
        .collect())
}

/// Paragraphs of each PDF page; `id = name#p{page}c{i}`.
pub fn load_pdf(
    path: &Path,
    options: &IngestOptions,
    decoder: &dyn DocumentDecoder,
) -> Result<Vec<Chunk>, LoadError> {
    let pages = decoder.read_pdf_pages(path)?;
    let name = file_name(path);
    let source = source_path(path);

    let mut chunks = Vec::new();
    for (page, page_text) in pages.iter().enumerate() {
        for (i, para) in segment_or_whole(page_text, options.min_paragraph_chars)
            .into_iter()
            .enumerate()
        {
            chunks.push(Chunk {
                id: format!("{name}#p{page}c{i}"),
                source_path: source.clone(),
                text: para,
                locator: Locator::Pdf {
                    page,
                    chunk_index: i,
                },
            });
        }
    }
    Ok(chunks)
}

/// One chunk per CSV row, `"col: value"` pairs joined by `" | "`;
/// `id = name#r{row}`.
pub fn load_table(
    path: &Path,
    options: &IngestOptions,
    decoder: &dyn DocumentDecoder,
) -> Result<Vec<Chunk>, LoadError> {
    let table = decoder.read_table(path, options.max_table_rows)?;
    if table.columns.is_empty() {
        return Err(LoadError::EmptyTable(path.to_path_buf()));
    }
    let name = file_name(path);
    let source = source_path(path);

    Ok(table
        .rows
        .iter()
        .enumerate()
        .map(|(row_index, row)| {
            let text = table
                .columns
                .iter()
                .zip(row.iter())
                .map(|(col, value)| format!("{col}: {value}"))
                .collect::<Vec<_>>()
                .join(" | ");
            Chunk {
                id: format!("{name}#r{row_index}"),
                source_path: source.clone(),
                text,
                locator: Locator::Tabular {
                    row_index,
                    columns: table.columns.clone(),
                },
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::mock::MockDecoder;

    const LONG_A: &str = "The first paragraph explains how the borrow checker works.";
    const LONG_B: &str = "The second paragraph covers lifetimes and reference rules.";

    fn opts() -> IngestOptions {
        IngestOptions::default()
    }

    #[test]
    fn test_text_paragraphs() {
        let decoder =
            MockDecoder::new().with_text("docs/a.txt", &format!("{LONG_A}\r\n\r\n{LONG_B}\r\n"));
        let chunks = load_text(Path::new("docs/a.txt"), &opts(), &decoder).unwrap();

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].id, "a.txt#c0");
        assert_eq!(chunks[1].id, "a.txt#c1");
        assert_eq!(chunks[0].source_path, "docs/a.txt");
        assert_eq!(chunks[1].text, LONG_B);
        assert_eq!(chunks[1].locator, Locator::Text { chunk_index: 1 });
        assert_eq!(chunks[0].kind(), ChunkKind::Text);
    }

    #[test]
    fn test_text_fallback_single_chunk() {
        let decoder = MockDecoder::new().with_text("short.txt", "\u{feff}ten chars!\n\n");
        let chunks = load_text(Path::new("short.txt"), &opts(), &decoder).unwrap();

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "ten chars!");
        assert_eq!(chunks[0].id, "short.txt#c0");
    }

    #[test]
    fn test_text_empty_file() {
        let decoder = MockDecoder::new().with_text("empty.txt", "  \n \n");
        let chunks = load_text(Path::new("empty.txt"), &opts(), &decoder).unwrap();
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_pdf_pages() {
        let page0 = format!("{LONG_A}\n\n{LONG_B}");
        let decoder = MockDecoder::new().with_pages("guide.pdf", &[page0.as_str(), "", "Index"]);
        let chunks = load_pdf(Path::new("guide.pdf"), &opts(), &decoder).unwrap();

        let ids: Vec<&str> = chunks.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["guide.pdf#p0c0", "guide.pdf#p0c1", "guide.pdf#p2c0"]);
        assert_eq!(chunks[2].text, "Index");
        assert_eq!(
            chunks[2].locator,
            Locator::Pdf {
                page: 2,
                chunk_index: 0
            }
        );
        assert_eq!(chunks[2].kind(), ChunkKind::Pdf);
    }

    #[test]
    fn test_table_rows() {
        let decoder = MockDecoder::new().with_table(
            "crops.csv",
            &["crop", "season"],
            &[&["tomato", "summer"], &["garlic", "autumn"]],
        );
        let chunks = load_table(Path::new("crops.csv"), &opts(), &decoder).unwrap();

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].id, "crops.csv#r0");
        assert_eq!(chunks[1].text, "crop: garlic | season: autumn");
        assert_eq!(
            chunks[1].locator,
            Locator::Tabular {
                row_index: 1,
                columns: vec!["crop".to_string(), "season".to_string()],
            }
        );
    }

    #[test]
    fn test_table_row_cap() {
        let rows: Vec<Vec<String>> = (0..5).map(|i| vec![i.to_string()]).collect();
        let row_refs: Vec<Vec<&str>> = rows
            .iter()
            .map(|r| r.iter().map(String::as_str).collect())
            .collect();
        let row_slices: Vec<&[&str]> = row_refs.iter().map(Vec::as_slice).collect();
        let decoder = MockDecoder::new().with_table("n.csv", &["n"], &row_slices);

        let options = IngestOptions {
            max_table_rows: 3,
            ..opts()
        };
        let chunks = load_table(Path::new("n.csv"), &options, &decoder).unwrap();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[2].text, "n: 2");
    }
}
