//! Generic HTML table rendering for JSON rows.

use serde_json::{Number, Value};

use super::html::escape;

const TABLE_CLASS: &str = "min-w-full divide-y divide-gray-200";
const HEADER_CELL_CLASS: &str =
    "px-6 py-3 bg-gray-50 text-left text-xs font-medium text-gray-500 uppercase tracking-wider";
const BODY_CLASS: &str = "bg-white divide-y divide-gray-200";
const BODY_CELL_CLASS: &str = "px-6 py-4 whitespace-nowrap text-sm text-gray-900";

type CellRenderer<'a> = Box<dyn Fn(&Value) -> String + 'a>;

type ValueFormatter<'a> = Box<dyn Fn(&Value) -> String + 'a>;

enum Cell<'a> {
    Key(String),
    Formatted(String, ValueFormatter<'a>),
    Render(CellRenderer<'a>),
}

/// One table column: a header and either a row key or a custom renderer.
pub struct Column<'a> {
    header: String,
    cell: Cell<'a>,
}

impl<'a> Column<'a> {
    /// Show `row[key]` as escaped text
    pub fn key(header: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            cell: Cell::Key(key.into()),
        }
    }

    /// Show `format(row[key])` as escaped text. A missing key formats `null`.
    pub fn formatted(
        header: impl Into<String>,
        key: impl Into<String>,
        format: impl Fn(&Value) -> String + 'a,
    ) -> Self {
        Self {
            header: header.into(),
            cell: Cell::Formatted(key.into(), Box::new(format)),
        }
    }

    /// Show whatever markup `render` returns for the row, unescaped
    pub fn render(header: impl Into<String>, render: impl Fn(&Value) -> String + 'a) -> Self {
        Self {
            header: header.into(),
            cell: Cell::Render(Box::new(render)),
        }
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    fn cell_html(&self, row: &Value) -> String {
        match &self.cell {
            Cell::Key(key) => escape(&display_value(row.get(key.as_str()))),
            Cell::Formatted(key, format) => {
                escape(&format(row.get(key.as_str()).unwrap_or(&Value::Null)))
            }
            Cell::Render(render) => render(row),
        }
    }
}

/// Text for a cell value. Missing and falsy values (null, false, 0, "") are blank.
pub fn display_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => String::new(),
        Some(Value::Bool(true)) => "true".to_string(),
        Some(Value::Number(n)) => {
            if n.as_f64() == Some(0.0) {
                String::new()
            } else {
                number_text(n)
            }
        }
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                Value::Number(n) => number_text(n),
                Value::Bool(b) => b.to_string(),
                other => display_value(Some(other)),
            })
            .collect::<Vec<_>>()
            .join(","),
        Some(Value::Object(_)) => "[object Object]".to_string(),
    }
}

/// Number text as a script would print it: `1.0` is "1"
fn number_text(n: &Number) -> String {
    match (n.as_i64(), n.as_u64(), n.as_f64()) {
        (Some(i), _, _) => i.to_string(),
        (_, Some(u), _) => u.to_string(),
        (_, _, Some(f)) => f.to_string(),
        _ => n.to_string(),
    }
}

/// Render `rows` as a table with one header row and one body row per item.
pub fn render_table(rows: &[Value], columns: &[Column<'_>]) -> String {
    let mut html = format!(r#"<table class="{}"><thead><tr>"#, TABLE_CLASS);
    for column in columns {
        html.push_str(&format!(
            r#"<th class="{}">{}</th>"#,
            HEADER_CELL_CLASS,
            escape(&column.header)
        ));
    }
    html.push_str(&format!(r#"</tr></thead><tbody class="{}">"#, BODY_CLASS));

    for row in rows {
        html.push_str("<tr>");
        for column in columns {
            html.push_str(&format!(
                r#"<td class="{}">{}</td>"#,
                BODY_CELL_CLASS,
                column.cell_html(row)
            ));
        }
        html.push_str("</tr>");
    }

    html.push_str("</tbody></table>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_value_falsy() {
        assert_eq!(display_value(None), "");
        assert_eq!(display_value(Some(&json!(null))), "");
        assert_eq!(display_value(Some(&json!(0))), "");
        assert_eq!(display_value(Some(&json!(false))), "");
        assert_eq!(display_value(Some(&json!(""))), "");
        assert_eq!(display_value(Some(&json!(12))), "12");
        assert_eq!(display_value(Some(&json!(true))), "true");
        assert_eq!(display_value(Some(&json!(1.0))), "1");
        assert_eq!(display_value(Some(&json!(2.5))), "2.5");
        assert_eq!(display_value(Some(&json!(0.0))), "");
        assert_eq!(display_value(Some(&json!([3.0, 0.25]))), "3,0.25");
        assert_eq!(display_value(Some(&json!([1, "a", null]))), "1,a,");
        assert_eq!(display_value(Some(&json!({"a": 1}))), "[object Object]");
    }

    #[test]
    fn test_render_table() {
        let rows = vec![
            json!({"username": "diana", "points": 1200, "active": true}),
            json!({"username": "<script>", "points": 0}),
        ];
        let columns = vec![
            Column::key("Usuario", "username"),
            Column::key("Puntos", "points"),
            Column::render("Estado", |row| {
                if row["active"] == json!(true) {
                    "<span class=\"badge\">Activo</span>".to_string()
                } else {
                    String::new()
                }
            }),
        ];

        let html = render_table(&rows, &columns);
        assert!(html.starts_with(r#"<table class="min-w-full divide-y divide-gray-200"><thead><tr>"#));
        assert_eq!(html.matches("<th ").count(), 3);
        assert_eq!(html.matches("<tr>").count(), 3);
        assert!(html.contains(">diana</td>"));
        assert!(html.contains(">1200</td>"));
        assert!(html.contains(r#"<span class="badge">Activo</span>"#));
        assert!(html.contains(">&lt;script&gt;</td>"));
        assert!(html.ends_with("</tbody></table>"));
    }

    #[test]
    fn test_formatted_column_escapes() {
        let rows = vec![json!({"joined": "<img src=x>"}), json!({})];
        let columns = vec![Column::formatted("Alta", "joined", |v| {
            v.as_str().map(str::to_uppercase).unwrap_or_else(|| "-".to_string())
        })];

        let html = render_table(&rows, &columns);
        assert!(html.contains(">&lt;IMG SRC=X&gt;</td>"));
        assert!(html.contains(">-</td>"));
        assert!(!html.contains("<IMG"));
    }

    #[test]
    fn test_render_empty_rows() {
        let html = render_table(&[], &[Column::key("Id", "id")]);
        assert!(html.contains(">Id</th>"));
        assert!(html.contains(r#"<tbody class="bg-white divide-y divide-gray-200"></tbody>"#));
    }
}
