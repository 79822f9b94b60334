use ghas_lab_engine::{RepoBatchSummary, RunSummary};
use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.len());
            }
        }
    }

    let header_row: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| format!("{:width$}", h, width = widths[i]))
        .collect();
    println!("{}", header_row.join("  "));

    let sep: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    println!("{}", sep.join("  "));

    for row in &rows {
        let cells: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let w = widths.get(i).copied().unwrap_or(0);
                format!("{:width$}", cell, width = w)
            })
            .collect();
        println!("{}", cells.join("  "));
    }
}

pub fn print_run_summary(summary: &RunSummary, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(summary);
    }
    print_table(
        &["EXPECTED", "PROCESSED", "SUCCEEDED", "FAILED", "REPOS", "WORKERS"],
        vec![vec![
            summary.expected.to_string(),
            summary.processed.to_string(),
            summary.succeeded.to_string(),
            summary.failed.to_string(),
            summary.repos_created.to_string(),
            summary.workers.to_string(),
        ]],
    );
    Ok(())
}

pub fn print_repo_summary(summary: &RepoBatchSummary, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(summary);
    }
    print_table(
        &["ORG", "ATTEMPTED", "SUCCEEDED"],
        vec![vec![
            summary.org.clone(),
            summary.attempted.to_string(),
            summary.succeeded.to_string(),
        ]],
    );
    Ok(())
}
