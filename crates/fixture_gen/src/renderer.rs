//! SQL rendering for generated fixtures.
//!
//! Output is PostgreSQL: the whole fixture runs in one transaction, and
//! every table is emptied and its identity sequence restarted before the
//! rows are inserted, so the inserted rows get IDs 1.. in generation order.

use crate::generator::{GeneratedData, SqlValue, TableData};
use crate::schema::Table;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

/// How string literals are quoted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quoting {
    /// Embedded single quotes are doubled. Strings with line breaks, tabs
    /// or backslashes become `E'...'` literals so every statement stays on
    /// one line.
    #[default]
    Escaped,
    /// Strings are wrapped in quotes verbatim, matching older fixture files.
    /// Values containing `'` produce invalid SQL, and multi-line values
    /// span several lines.
    Legacy,
}

/// Rendering configuration
#[derive(Debug, Clone, Default)]
pub struct RenderConfig {
    pub quoting: Quoting,
    /// Wrap the output in `BEGIN;` / `COMMIT;`
    pub transaction: bool,
}

impl RenderConfig {
    pub fn postgres() -> Self {
        Self {
            quoting: Quoting::Escaped,
            transaction: true,
        }
    }

    pub fn with_quoting(mut self, quoting: Quoting) -> Self {
        self.quoting = quoting;
        self
    }
}

impl SqlValue {
    /// Format as an SQL literal
    pub fn to_sql(&self, quoting: Quoting) -> String {
        match self {
            SqlValue::Int(n) => n.to_string(),
            SqlValue::Str(s) => match quoting {
                Quoting::Escaped if needs_escape_literal(s) => {
                    format!("E'{}'", escape_backslashes(s))
                }
                Quoting::Escaped => format!("'{}'", escape_string(s)),
                Quoting::Legacy => format!("'{}'", s),
            },
            SqlValue::Bool(true) => "TRUE".to_string(),
            SqlValue::Bool(false) => "FALSE".to_string(),
            SqlValue::Null => "NULL".to_string(),
            SqlValue::Default => "DEFAULT".to_string(),
            SqlValue::Timestamp => "current_timestamp".to_string(),
        }
    }
}

fn escape_string(s: &str) -> String {
    s.replace('\'', "''")
}

fn needs_escape_literal(s: &str) -> bool {
    s.contains(['\n', '\r', '\t', '\\'])
}

/// Body of a PostgreSQL `E'...'` literal
fn escape_backslashes(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 16);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\'' => out.push_str("''"),
            c => out.push(c),
        }
    }
    out
}

/// Render a single `INSERT` statement (without trailing newline)
pub fn render_insert(table: &str, record: &[(&str, SqlValue)], quoting: Quoting) -> String {
    let columns = record
        .iter()
        .map(|(column, _)| *column)
        .collect::<Vec<_>>()
        .join(",");
    let values = record
        .iter()
        .map(|(_, value)| value.to_sql(quoting))
        .collect::<Vec<_>>()
        .join(",");
    format!("INSERT INTO {} ({}) VALUES ({});", table, columns, values)
}

/// Statements that empty a table before it is filled
pub fn reset_statements(table: Table) -> Vec<String> {
    vec![
        format!("DELETE FROM {};", table.name()),
        format!("ALTER SEQUENCE {} RESTART WITH 1;", table.sequence_name()),
    ]
}

/// Renderer writing generated data as SQL statements, one per line
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn write_header<W: Write>(&self, out: &mut W) -> io::Result<()> {
        if self.config.transaction {
            writeln!(out, "BEGIN;")?;
        }
        Ok(())
    }

    pub fn write_footer<W: Write>(&self, out: &mut W) -> io::Result<()> {
        if self.config.transaction {
            writeln!(out, "COMMIT;")?;
        }
        Ok(())
    }

    /// Write the reset statements and every row of one table
    pub fn write_table<W: Write>(&self, out: &mut W, data: &TableData) -> io::Result<()> {
        for stmt in reset_statements(data.table) {
            writeln!(out, "{}", stmt)?;
        }
        for row in &data.rows {
            writeln!(
                out,
                "{}",
                render_insert(data.table.name(), row, self.config.quoting)
            )?;
        }
        Ok(())
    }

    /// Write the complete fixture
    pub fn write<W: Write>(&self, data: &GeneratedData, mut out: W) -> io::Result<()> {
        self.write_header(&mut out)?;
        for table in &data.tables {
            self.write_table(&mut out, table)?;
        }
        self.write_footer(&mut out)?;
        out.flush()
    }

    pub fn render_to_string(&self, data: &GeneratedData) -> io::Result<String> {
        let mut buf = Vec::new();
        self.write(data, &mut buf)?;
        String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Counts, FixtureConfig};
    use crate::generator::Generator;

    #[test]
    fn test_render_insert_markers() {
        let record = vec![
            ("id", SqlValue::Default),
            ("role", SqlValue::Int(2)),
            ("note", SqlValue::Null),
            ("name", SqlValue::str("Info2")),
        ];
        assert_eq!(
            render_insert("courses", &record, Quoting::Escaped),
            "INSERT INTO courses (id,role,note,name) VALUES (DEFAULT,2,NULL,'Info2');"
        );
    }

    #[test]
    fn test_render_booleans_and_timestamp() {
        let record = vec![
            ("created_at", SqlValue::Timestamp),
            ("root", SqlValue::Bool(true)),
            ("confirmed_team", SqlValue::Bool(false)),
        ];
        assert_eq!(
            render_insert("users", &record, Quoting::Escaped),
            "INSERT INTO users (created_at,root,confirmed_team) VALUES (current_timestamp,TRUE,FALSE);"
        );
    }

    #[test]
    fn test_marker_words_in_strings_stay_quoted() {
        let record = vec![("feedback", SqlValue::str("NULL")), ("n", SqlValue::str("1"))];
        assert_eq!(
            render_insert("grades", &record, Quoting::Escaped),
            "INSERT INTO grades (feedback,n) VALUES ('NULL','1');"
        );
    }

    #[test]
    fn test_quote_escaping() {
        let record = vec![("name", SqlValue::str("O'Brien"))];
        assert_eq!(
            render_insert("users", &record, Quoting::Escaped),
            "INSERT INTO users (name) VALUES ('O''Brien');"
        );
        assert_eq!(
            render_insert("users", &record, Quoting::Legacy),
            "INSERT INTO users (name) VALUES ('O'Brien');"
        );
    }

    #[test]
    fn test_multiline_strings_use_escape_literal() {
        let value = SqlValue::str("[ FAILED ] Test:\n\t- Msg: it's C:\\tmp");
        assert_eq!(
            value.to_sql(Quoting::Escaped),
            "E'[ FAILED ] Test:\\n\\t- Msg: it''s C:\\\\tmp'"
        );
        assert_eq!(
            value.to_sql(Quoting::Legacy),
            "'[ FAILED ] Test:\n\t- Msg: it's C:\\tmp'"
        );
    }

    #[test]
    fn test_grade_inserts_fit_on_one_line() {
        let config = FixtureConfig {
            counts: Counts {
                admins: 1,
                tutors: 1,
                students: 1,
                sheets: 1,
                tasks_per_sheet: 1,
                groups: None,
                materials: 1,
            },
            password_cost: 4,
            ..FixtureConfig::default()
        };
        let data = Generator::new(config).generate().unwrap();
        let sql = Renderer::new(RenderConfig::postgres())
            .render_to_string(&data)
            .unwrap();

        assert!(sql.lines().all(|l| l.ends_with(';')));
        let grades: Vec<&str> = sql
            .lines()
            .filter(|l| l.starts_with("INSERT INTO grades "))
            .collect();
        assert_eq!(grades.len(), 1);
        assert!(grades[0].contains(",E'[   OK   ] BinaryToStringValueTest:\\n"));

        let legacy = Renderer::new(RenderConfig::postgres().with_quoting(Quoting::Legacy))
            .render_to_string(&data)
            .unwrap();
        assert!(legacy.lines().any(|l| !l.ends_with(';')));
    }

    #[test]
    fn test_reset_statements() {
        assert_eq!(
            reset_statements(Table::GroupBids),
            vec![
                "DELETE FROM group_bids;".to_string(),
                "ALTER SEQUENCE group_bids_id_seq RESTART WITH 1;".to_string(),
            ]
        );
    }

    #[test]
    fn test_render_full_fixture() {
        let counts = Counts {
            admins: 1,
            tutors: 1,
            students: 1,
            sheets: 1,
            tasks_per_sheet: 1,
            groups: None,
            materials: 1,
        };
        let config = FixtureConfig {
            counts,
            password_cost: 4,
            ..FixtureConfig::default()
        };
        let data = Generator::new(config).generate().unwrap();
        let sql = Renderer::new(RenderConfig::postgres())
            .render_to_string(&data)
            .unwrap();

        let lines: Vec<&str> = sql.lines().collect();
        assert_eq!(lines.first(), Some(&"BEGIN;"));
        assert_eq!(lines.last(), Some(&"COMMIT;"));
        assert_eq!(lines[1], "DELETE FROM users;");
        assert_eq!(lines[2], "ALTER SEQUENCE users_id_seq RESTART WITH 1;");

        let deletes: Vec<&str> = lines
            .iter()
            .filter_map(|l| l.strip_prefix("DELETE FROM "))
            .collect();
        assert_eq!(deletes.len(), Table::ALL.len());
        assert_eq!(deletes[2], "user_course;");
        assert_eq!(deletes[14], "material_course;");
    }

    #[test]
    fn test_no_transaction() {
        let data = GeneratedData { tables: Vec::new() };
        let sql = Renderer::new(RenderConfig::default())
            .render_to_string(&data)
            .unwrap();
        assert!(sql.is_empty());
    }
}
