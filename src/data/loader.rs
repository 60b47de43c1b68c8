//! Tabular dataset loading (CSV or Parquet)

use crate::data::extract::Record;
use crate::error::{AnalysisError, Result};
use polars::prelude::*;
use std::path::Path;

/// Load author/text records from a CSV or Parquet file.
///
/// The format is chosen from the file extension; anything other than
/// `.parquet` is read as CSV with a header row. Additional columns are
/// ignored.
pub fn load_records(path: &str, author_column: &str, text_column: &str) -> Result<Vec<Record>> {
    log::info!("Reading dataset: {}", path);

    if !Path::new(path).exists() {
        return Err(AnalysisError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("File not found: {}", path),
        )));
    }

    let is_parquet = Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("parquet"));

    let df = if is_parquet {
        LazyFrame::scan_parquet(path, Default::default())?.collect()?
    } else {
        LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .finish()?
            .collect()?
    };

    log::info!("File schema: {:?}", df.schema());
    log::info!("Loaded {} rows", df.height());

    records_from_frame(&df, path, author_column, text_column)
}

/// Convert the two relevant columns of a frame into records
pub fn records_from_frame(
    df: &DataFrame,
    path: &str,
    author_column: &str,
    text_column: &str,
) -> Result<Vec<Record>> {
    let authors = string_column(df, path, author_column)?;
    let texts = string_column(df, path, text_column)?;
    let authors = authors.str()?;
    let texts = texts.str()?;

    let mut records = Vec::with_capacity(df.height());
    let mut skipped = 0usize;

    for (author, text) in authors.into_iter().zip(texts.into_iter()) {
        match author {
            Some(author) => records.push(Record {
                author: author.to_string(),
                text: text.filter(|t| !t.is_empty()).map(str::to_string),
            }),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        log::debug!("Skipped {} rows with no author", skipped);
    }

    Ok(records)
}

fn string_column(df: &DataFrame, path: &str, name: &str) -> Result<Column> {
    let column = df.column(name).map_err(|_| AnalysisError::MalformedInput {
        column: name.to_string(),
        path: path.to_string(),
    })?;

    Ok(column.cast(&DataType::String)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .expect("create temp csv");
        file.write_all(contents.as_bytes()).expect("write csv");
        file
    }

    #[test]
    fn loads_author_and_text_columns() {
        let file = write_csv("username,tweets,lang\nalice,hi @bob,en\ncarol,,en\n");
        let path = file.path().to_str().expect("utf8 path");

        let records = load_records(path, "username", "tweets").expect("load");

        assert_eq!(records.len(), 2);
        assert_eq!(records[0], Record::new("alice", "hi @bob"));
        assert_eq!(records[1].author, "carol");
        assert_eq!(records[1].text, None);
    }

    #[test]
    fn missing_column_is_malformed_input() {
        let file = write_csv("user,body\nalice,hi @bob\n");
        let path = file.path().to_str().expect("utf8 path");

        let err = load_records(path, "username", "tweets").unwrap_err();

        assert!(matches!(
            err,
            AnalysisError::MalformedInput { ref column, .. } if column == "username"
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_records("/nonexistent/tweets.csv", "username", "tweets").unwrap_err();
        assert!(matches!(err, AnalysisError::Io(_)));
    }

    #[test]
    fn numeric_author_ids_are_read_as_strings() {
        let file = write_csv("username,tweets\n42,@7 hello\n");
        let path = file.path().to_str().expect("utf8 path");

        let records = load_records(path, "username", "tweets").expect("load");

        assert_eq!(records, vec![Record::new("42", "@7 hello")]);
    }
}
