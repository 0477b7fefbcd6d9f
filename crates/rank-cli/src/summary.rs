use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use rank_cli::commands::RankSummary;
use rank_validate::{ValidationIssue, ValidationResult, ValidationSeverity};

pub fn print_validation(result: &ValidationResult) {
    println!("Context: {}", result.context);
    if result.is_empty() {
        println!("No issues found.");
        return;
    }

    let mut issues: Vec<&ValidationIssue> = result.issues.iter().collect();
    // Most severe first; ties keep rule order.
    issues.sort_by(|a, b| b.severity.cmp(&a.severity));

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Severity"),
        header_cell("Rule"),
        header_cell("Rank"),
        header_cell("Item"),
        header_cell("Message"),
        header_cell("Suggested fix"),
    ]);
    apply_issue_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Center);
    for issue in issues {
        table.add_row(vec![
            severity_cell(issue.severity),
            Cell::new(&issue.rule_id),
            optional_cell(issue.rank_name.as_deref()),
            optional_cell(issue.item_name.as_deref().or(issue.property_name.as_deref())),
            Cell::new(&issue.message),
            optional_cell(issue.suggested_fix.as_deref()),
        ]);
    }
    println!("{table}");
    println!(
        "{} error(s), {} warning(s), {} advisory note(s)",
        result.error_count(),
        result.warning_count(),
        result.advisory_count()
    );
}

pub fn print_rank_summary(ranks: &[RankSummary]) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Rank"), header_cell("Progression")]);
    apply_summary_table_style(&mut table);
    for rank in ranks {
        table.add_row(vec![
            Cell::new(&rank.name).add_attribute(Attribute::Bold),
            Cell::new(&rank.summary),
        ]);
        for band in &rank.pay_bands {
            table.add_row(vec![
                Cell::new(format!("  {}", band.name)).fg(Color::DarkGrey),
                Cell::new(&band.summary).fg(Color::DarkGrey),
            ]);
        }
    }
    println!("{table}");
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn optional_cell(value: Option<&str>) -> Cell {
    match value {
        Some(value) if !value.is_empty() => Cell::new(value),
        _ => Cell::new("-").fg(Color::DarkGrey),
    }
}

fn severity_cell(severity: ValidationSeverity) -> Cell {
    let color = match severity {
        ValidationSeverity::Error => Color::Red,
        ValidationSeverity::Warning => Color::Yellow,
        ValidationSeverity::Advisory => Color::Blue,
        ValidationSeverity::Success | ValidationSeverity::None => Color::Green,
    };
    Cell::new(severity.label())
        .fg(color)
        .add_attribute(Attribute::Bold)
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn apply_issue_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(160);
    table.set_constraints(vec![
        ColumnConstraint::UpperBoundary(Width::Fixed(10)),
        ColumnConstraint::UpperBoundary(Width::Fixed(22)),
        ColumnConstraint::UpperBoundary(Width::Fixed(20)),
        ColumnConstraint::UpperBoundary(Width::Fixed(20)),
        ColumnConstraint::UpperBoundary(Width::Percentage(45)),
        ColumnConstraint::UpperBoundary(Width::Percentage(25)),
    ]);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
