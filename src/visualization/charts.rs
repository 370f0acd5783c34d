use colored::Colorize;

use crate::models::AggregateResult;

/// Format a text-based bar chart of product rate per zone as a string.
pub fn format_requirement_chart(result: &AggregateResult) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", "Product Rate by Zone".bold().green()));
    output.push_str(&format!("{}\n", "=".repeat(60)));

    if result.per_zone.is_empty() {
        output.push_str("  No data available.\n");
        return output;
    }

    let max_rate = result
        .per_zone
        .iter()
        .map(|z| z.product_kg_ha)
        .fold(0.0f64, f64::max);

    let bar_width = 40;
    let label_width = result
        .per_zone
        .iter()
        .map(|z| z.zone_name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    output.push_str(&format!(
        "  {:<label_width$}  {:>10}  Rate\n",
        "Zone", "kg/ha"
    ));
    output.push_str(&format!("  {}\n", "-".repeat(label_width + bar_width + 14)));

    for zone in &result.per_zone {
        let bar_len = if max_rate > 0.0 {
            ((zone.product_kg_ha / max_rate) * bar_width as f64).round() as usize
        } else {
            0
        };

        let bar = "\u{2588}".repeat(bar_len);
        let bar = if zone.was_capped { bar.yellow() } else { bar.green() };

        output.push_str(&format!(
            "  {:<label_width$}  {:>10.1}  {}\n",
            zone.zone_name, zone.product_kg_ha, bar
        ));
    }

    output.push_str(&format!(
        "  {:<label_width$}  {:>10.1}  {}\n",
        "Average",
        result.weighted_average_kg_ha,
        "(area weighted)".dimmed()
    ));
    output.push('\n');
    output
}

/// Print a text-based bar chart of product rate per zone.
pub fn print_requirement_chart(result: &AggregateResult) {
    print!("{}", format_requirement_chart(result));
}
