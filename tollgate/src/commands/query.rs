// tollgate/src/commands/query.rs
//
// USE CASE: Execute a raw SQL query (ad-hoc).

use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{ContentArrangement, Table};
use std::path::PathBuf;

use tollgate_core::application::execute_query;
use tollgate_core::domain::TabularResult;

use super::Project;

pub async fn execute(project_dir: PathBuf, sql: String, limit: usize) -> anyhow::Result<()> {
    let project = Project::open(&project_dir).await?;

    match execute_query(&project.connector, &sql).await {
        Ok(result) => {
            println!("{}", render(&result, limit));
            if result.row_count() > limit {
                println!("({} of {} rows shown)", limit, result.row_count());
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("Query failed: {}", e);
            std::process::exit(1);
        }
    }
}

fn render(result: &TabularResult, limit: usize) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(result.column_names());

    for i in 0..result.row_count().min(limit) {
        table.add_row(result.row(i).iter().map(|v| v.to_string()));
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use tollgate_core::domain::ScalarValue;

    #[test]
    fn test_render_truncates_to_limit() {
        let result = TabularResult::from_rows(
            vec!["id".into(), "status".into()],
            vec![
                vec![ScalarValue::Integer(1), "placed".into()],
                vec![ScalarValue::Integer(2), ScalarValue::Null],
                vec![ScalarValue::Integer(3), "shipped".into()],
            ],
        );
        let out = render(&result, 2).to_string();
        assert!(out.contains("status"));
        assert!(out.contains("placed"));
        assert!(out.contains("NULL"));
        assert!(!out.contains("shipped"));
    }
}
