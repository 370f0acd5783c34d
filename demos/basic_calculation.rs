//! Basic calculation example: load zones, run both methods, and display results.
//!
//! Run from the project root:
//!   cargo run --example basic_calculation

use std::path::Path;

use lime_requirement_calculator::io::{CsvFormat, ZoneReader};
use lime_requirement_calculator::visualization::{
    print_field_table, print_requirement_chart, print_summary_table, print_zone_table,
};
use lime_requirement_calculator::{CropType, LimeCalculator, LimingMode, Method, MethodParameters};

fn main() {
    let path = Path::new("data/samples/sample_zones.csv");
    let zones = CsvFormat.read(path).expect("Failed to read CSV file");
    println!("Loaded {} zones", zones.len());

    let calculator = LimeCalculator::with_defaults();
    let params = MethodParameters::new(CropType::StandardCrops, "CaCO3", LimingMode::Improvement)
        .with_nv(95.0);

    for method in [Method::Vdlufa, Method::Cec] {
        match calculator.aggregate(&zones, &params, method) {
            Ok(result) => {
                print_summary_table(&result);
                print_field_table(&result);
                print_zone_table(&result);
                print_requirement_chart(&result);
            }
            Err(e) => eprintln!("{method} calculation failed: {e}"),
        }
    }
}
