use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, ContentArrangement, Table};

use crate::calculation::LimeProducts;
use crate::config::LimeConfig;
use crate::models::{AggregateResult, CropType, TextureClass};

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn title(output: &mut String, text: &str, width: usize) {
    output.push_str(&format!("\n{}\n", text.bold().green()));
    output.push_str(&format!("{}\n", "=".repeat(width)));
}

/// Format the overall calculation summary as a string.
pub fn format_summary_table(result: &AggregateResult) -> String {
    let mut output = String::new();
    title(&mut output, "Lime Requirement Summary", 50);
    output.push_str(&format!(
        "{}\n",
        format!(
            "Method: {} | Mode: {} | Product: {}",
            result.method, result.liming_mode, result.lime_type
        )
        .dimmed()
    ));

    let mut table = new_table(vec!["Metric", "Value", "Unit"]);
    table.add_row(vec![
        Cell::new("Zones"),
        Cell::new(format!("{}", result.num_zones())),
        Cell::new(""),
    ]);
    table.add_row(vec![
        Cell::new("Total Area"),
        Cell::new(format!("{:.2}", result.total_area)),
        Cell::new("ha"),
    ]);
    table.add_row(vec![
        Cell::new("Weighted Average"),
        Cell::new(format!("{:.1}", result.weighted_average_kg_ha)),
        Cell::new("kg/ha"),
    ]);
    table.add_row(vec![
        Cell::new("Total Product"),
        Cell::new(format!("{:.0}", result.total_product_kg)),
        Cell::new("kg"),
    ]);
    table.add_row(vec![
        Cell::new("Total Product"),
        Cell::new(format!("{:.2}", result.total_product_tonnes())),
        Cell::new("t"),
    ]);
    if result.num_capped() > 0 {
        table.add_row(vec![
            Cell::new("Capped Zones"),
            Cell::new(format!("{}", result.num_capped())),
            Cell::new(""),
        ]);
    }

    output.push_str(&format!("{table}"));
    output
}

/// Print the calculation summary.
pub fn print_summary_table(result: &AggregateResult) {
    print!("{}", format_summary_table(result));
}

/// Format the per-zone breakdown as a string.
pub fn format_zone_table(result: &AggregateResult) -> String {
    let mut output = String::new();
    title(&mut output, "Zone Requirements", 70);

    let mut table = new_table(vec![
        "Field",
        "Zone",
        "Area (ha)",
        "Texture",
        "pH",
        "Target pH",
        "Mode",
        "CaCO3 (kg/ha)",
        "Product (kg/ha)",
        "Total (kg)",
    ]);

    for zone in &result.per_zone {
        let product = if zone.was_capped {
            format!("{:.1}*", zone.product_kg_ha)
        } else {
            format!("{:.1}", zone.product_kg_ha)
        };
        table.add_row(vec![
            Cell::new(&zone.field_name),
            Cell::new(&zone.zone_name),
            Cell::new(format!("{:.2}", zone.area)),
            Cell::new(zone.texture.label()),
            Cell::new(format!("{:.2}", zone.current_ph)),
            Cell::new(format!("{:.2}", zone.target_ph)),
            Cell::new(zone.applied_mode.to_string()),
            Cell::new(format!("{:.1}", zone.caco3_equivalent_kg_ha)),
            Cell::new(product),
            Cell::new(format!("{:.0}", zone.product_total_kg)),
        ]);
    }

    output.push_str(&format!("{table}"));
    if result.num_capped() > 0 {
        output.push_str(&format!(
            "\n{}\n",
            "* capped at the maximum application rate".dimmed()
        ));
    }
    output
}

/// Print the per-zone breakdown.
pub fn print_zone_table(result: &AggregateResult) {
    print!("{}", format_zone_table(result));
}

/// Format per-field totals as a string.
pub fn format_field_table(result: &AggregateResult) -> String {
    let mut output = String::new();
    title(&mut output, "Field Totals", 50);

    let mut table = new_table(vec![
        "Field",
        "Zones",
        "Area (ha)",
        "Avg (kg/ha)",
        "Total (kg)",
    ]);
    for field in &result.fields {
        let average = field
            .weighted_average_kg_ha
            .map(|a| format!("{a:.1}"))
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            Cell::new(&field.field_name),
            Cell::new(format!("{}", field.zone_count)),
            Cell::new(format!("{:.2}", field.total_area)),
            Cell::new(average),
            Cell::new(format!("{:.0}", field.total_product_kg)),
        ]);
    }

    output.push_str(&format!("{table}"));
    output
}

/// Print per-field totals.
pub fn print_field_table(result: &AggregateResult) {
    print!("{}", format_field_table(result));
}

/// Format the available lime products as a string.
pub fn format_products_table(products: &LimeProducts) -> String {
    let mut output = String::new();
    title(&mut output, "Lime Products", 40);

    let mut table = new_table(vec!["Product", "Factor (x CaO)"]);
    for (name, factor) in products.iter() {
        table.add_row(vec![Cell::new(name), Cell::new(format!("{factor:.3}"))]);
    }

    output.push_str(&format!("{table}"));
    output
}

/// Print the available lime products.
pub fn print_products_table(products: &LimeProducts) {
    print!("{}", format_products_table(products));
}

/// Format the texture classes with their table values for both methods.
pub fn format_texture_table(config: &LimeConfig) -> String {
    let mut output = String::new();
    title(&mut output, "Soil Texture Classes", 70);

    let mut table = new_table(vec![
        "Texture",
        "VDLUFA Class",
        "VDLUFA Clay %",
        "VDLUFA Target pH",
        "CEC (meq/100g)",
        "CEC Clay %",
    ]);

    for texture in TextureClass::ALL {
        let (class, clay, target) = match texture.vdlufa_class() {
            Ok(class) => match config.vdlufa.get(&class) {
                Some(entry) => (
                    class.label().to_string(),
                    format!("{:.0}", entry.clay_percent),
                    format!("{:.1}", entry.curve(CropType::StandardCrops).optimal_ph),
                ),
                None => (class.label().to_string(), "-".to_string(), "-".to_string()),
            },
            Err(_) => ("-".to_string(), "-".to_string(), "-".to_string()),
        };
        let (cec, cec_clay) = config
            .cec
            .textures
            .get(&texture)
            .map(|e| (format!("{:.0}", e.cec), format!("{:.0}", e.clay_percent)))
            .unwrap_or_else(|| ("-".to_string(), "-".to_string()));
        table.add_row(vec![
            Cell::new(texture.label()),
            Cell::new(class),
            Cell::new(clay),
            Cell::new(target),
            Cell::new(cec),
            Cell::new(cec_clay),
        ]);
    }

    output.push_str(&format!("{table}"));
    output
}

/// Print the texture class overview.
pub fn print_texture_table(config: &LimeConfig) {
    print!("{}", format_texture_table(config));
}
