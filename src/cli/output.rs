//! Plain-text report formatting for CLI commands

const RULE_WIDTH: usize = 60;

/// Print a report header framed by rules
pub fn print_section(title: &str) {
    let rule = "=".repeat(RULE_WIDTH);
    println!("\n{rule}\n{title}\n{rule}");
}

/// Print a block heading with a short underline
pub fn print_subsection(title: &str) {
    println!("\n{title}\n{}", "-".repeat(title.len().max(10)));
}

/// Group digits in threes, e.g. `107520` -> `107,520`
pub fn format_number(n: usize) -> String {
    let digits = n.to_string();
    let lead = digits.len() % 3;
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (i + 3 - lead).is_multiple_of(3) {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Print one aligned `label: value` line
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<20}{value}", format!("{key}:"));
}

/// Print several aligned `label: value` lines
pub fn print_stats_table(rows: &[(&str, String)]) {
    rows.iter().for_each(|(key, value)| print_kv(key, value));
}
