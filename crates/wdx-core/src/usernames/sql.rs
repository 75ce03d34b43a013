//! Rendering username lists as batched `INSERT ... ON CONFLICT DO NOTHING` SQL.

use crate::config::UsernamesConfig;

/// Which header to put above the statements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlHeader {
    /// Single input file
    Single,
    /// Merged inputs, listing the source patterns
    Merged { sources: Vec<String> },
}

/// Double single quotes so the name is safe inside a SQL string literal.
pub fn escape_literal(value: &str) -> String {
    value.replace('\'', "''")
}

/// Render the full SQL script for `usernames` in the given order.
pub fn render_sql(usernames: &[String], header: &SqlHeader, target: &UsernamesConfig) -> String {
    let mut out = String::new();
    let table = &target.table;
    let column = &target.column;

    out.push_str(&format!(
        "-- Generated SQL to insert usernames into {table} table\n"
    ));
    match header {
        SqlHeader::Single => {
            out.push_str(&format!("-- Total usernames: {}\n\n", usernames.len()));
        }
        SqlHeader::Merged { sources } => {
            out.push_str(&format!("-- Total unique usernames: {}\n", usernames.len()));
            out.push_str(&format!("-- Source files: {}\n\n", sources.join(", ")));
            out.push_str("-- This query uses ON CONFLICT DO NOTHING to skip any usernames\n");
            out.push_str("-- that already exist in the database\n\n");
        }
    }

    for batch in usernames.chunks(target.batch_size.max(1)) {
        out.push_str(&format!("INSERT INTO {table} ({column}) VALUES\n"));
        let rows: Vec<String> = batch
            .iter()
            .map(|name| format!("  ('{}')", escape_literal(name)))
            .collect();
        out.push_str(&rows.join(",\n"));
        out.push_str(&format!("\nON CONFLICT ({column}) DO NOTHING;\n\n"));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_single_file_script() {
        let sql = render_sql(
            &names(&["alice", "bob"]),
            &SqlHeader::Single,
            &UsernamesConfig::default(),
        );
        assert_eq!(
            sql,
            "-- Generated SQL to insert usernames into username_pool table\n\
             -- Total usernames: 2\n\
             \n\
             INSERT INTO username_pool (username) VALUES\n  \
             ('alice'),\n  \
             ('bob')\n\
             ON CONFLICT (username) DO NOTHING;\n\
             \n"
        );
    }

    #[test]
    fn test_merged_header_lists_sources() {
        let sql = render_sql(
            &names(&["alice"]),
            &SqlHeader::Merged {
                sources: names(&["claude_names.txt", "grok_*.txt"]),
            },
            &UsernamesConfig::default(),
        );
        assert!(sql.contains("-- Total unique usernames: 1\n"));
        assert!(sql.contains("-- Source files: claude_names.txt, grok_*.txt\n"));
        assert!(sql.contains("ON CONFLICT DO NOTHING to skip"));
    }

    #[test]
    fn test_quotes_are_doubled() {
        assert_eq!(escape_literal("o'brien"), "o''brien");
        let sql = render_sql(
            &names(&["o'brien"]),
            &SqlHeader::Single,
            &UsernamesConfig::default(),
        );
        assert!(sql.contains("  ('o''brien')\n"));
    }

    #[test]
    fn test_batches_split_at_batch_size() {
        let list: Vec<String> = (0..1001).map(|i| format!("user{i:04}")).collect();
        let sql = render_sql(&list, &SqlHeader::Single, &UsernamesConfig::default());

        assert_eq!(sql.matches("INSERT INTO username_pool").count(), 3);
        assert_eq!(sql.matches("ON CONFLICT (username) DO NOTHING;").count(), 3);
        // Each batch ends without a trailing comma
        assert!(sql.contains("  ('user0499')\nON CONFLICT"));
        assert!(sql.contains("  ('user0999')\nON CONFLICT"));
        assert!(sql.contains("  ('user1000')\nON CONFLICT"));
        // Every name appears exactly once
        assert_eq!(sql.matches("('user0500')").count(), 1);
        assert_eq!(sql.matches("('user").count(), 1001);
    }

    #[test]
    fn test_empty_list_renders_header_only() {
        let sql = render_sql(&[], &SqlHeader::Single, &UsernamesConfig::default());
        assert!(sql.contains("-- Total usernames: 0"));
        assert!(!sql.contains("INSERT"));
    }

    #[test]
    fn test_custom_target() {
        let target = UsernamesConfig {
            table: "public.handles".to_string(),
            column: "handle".to_string(),
            batch_size: 1,
        };
        let sql = render_sql(&names(&["a", "b"]), &SqlHeader::Single, &target);
        assert_eq!(sql.matches("INSERT INTO public.handles (handle) VALUES").count(), 2);
        assert!(sql.contains("ON CONFLICT (handle) DO NOTHING;"));
    }
}
