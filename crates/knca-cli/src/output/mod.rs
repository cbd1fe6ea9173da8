use serde::Serialize;

use crate::cli::OutputFormat;
use crate::ui;

pub mod table;
pub mod views;

/// Records that know their own table layout.
pub trait Tabular {
    const COLUMNS: &'static [&'static str];

    fn cells(&self) -> Vec<String>;
}

/// Render a list of records in the requested format.
pub fn render_list<T: Serialize + Tabular>(
    items: &[T],
    format: OutputFormat,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(items)?),
        OutputFormat::Raw => Ok(serde_json::to_string(items)?),
        OutputFormat::Table if items.is_empty() => Ok(String::from("(no documents)")),
        OutputFormat::Table => {
            let rows = items.iter().map(Tabular::cells).collect::<Vec<_>>();
            Ok(table::render_table(T::COLUMNS, &rows, table_options()))
        }
    }
}

/// Render one record; tables show it as key/value pairs.
pub fn render_one<T: Serialize + Tabular>(item: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(item)?),
        OutputFormat::Raw => Ok(serde_json::to_string(item)?),
        OutputFormat::Table => {
            let rows = T::COLUMNS
                .iter()
                .zip(item.cells())
                .map(|(key, value)| vec![(*key).to_string(), value])
                .collect::<Vec<_>>();
            Ok(table::render_table(&["field", "value"], &rows, table_options()))
        }
    }
}

pub fn print_list<T: Serialize + Tabular>(items: &[T], format: OutputFormat) -> anyhow::Result<()> {
    println!("{}", render_list(items, format)?);
    Ok(())
}

pub fn print_one<T: Serialize + Tabular>(item: &T, format: OutputFormat) -> anyhow::Result<()> {
    println!("{}", render_one(item, format)?);
    Ok(())
}

fn table_options() -> table::TableOptions {
    let prefs = ui::prefs();
    table::TableOptions {
        max_width: prefs.term_width,
        color: prefs.table_color,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde::Serialize;

    use super::{Tabular, render_list, render_one};
    use crate::cli::OutputFormat;

    #[derive(Serialize)]
    struct Row {
        id: &'static str,
        lines: usize,
    }

    impl Tabular for Row {
        const COLUMNS: &'static [&'static str] = &["id", "lines"];

        fn cells(&self) -> Vec<String> {
            vec![self.id.to_string(), self.lines.to_string()]
        }
    }

    #[test]
    fn json_list_is_an_array() {
        let out = render_list(&[Row { id: "doc-1", lines: 3 }], OutputFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed[0]["id"], "doc-1");
        assert_eq!(parsed[0]["lines"], 3);
    }

    #[test]
    fn raw_is_single_line() {
        let out = render_one(&Row { id: "doc-1", lines: 3 }, OutputFormat::Raw).unwrap();
        assert_eq!(out, r#"{"id":"doc-1","lines":3}"#);
    }

    #[test]
    fn table_list_uses_declared_columns() {
        let out = render_list(
            &[Row { id: "doc-1", lines: 3 }, Row { id: "doc-2", lines: 12 }],
            OutputFormat::Table,
        )
        .unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "id     lines");
        assert_eq!(lines[3], "doc-2  12");
    }

    #[test]
    fn empty_table_has_marker() {
        let out = render_list::<Row>(&[], OutputFormat::Table).unwrap();
        assert_eq!(out, "(no documents)");
    }

    #[test]
    fn single_record_table_is_key_value() {
        let out = render_one(&Row { id: "doc-1", lines: 3 }, OutputFormat::Table).unwrap();
        assert!(out.lines().next().is_some_and(|l| l.starts_with("field")));
        assert!(out.contains("id     doc-1"));
    }
}
