//! Maintenance example: compare annual leaching losses across rainfall levels.
//!
//! Run from the project root:
//!   cargo run --example maintenance_plan

use lime_requirement_calculator::calculation::LeachingModel;
use lime_requirement_calculator::visualization::print_zone_table;
use lime_requirement_calculator::{
    aggregate, CropType, LimingMode, Method, MethodParameters, SoilRecord,
};

fn main() {
    let model = LeachingModel::default();
    println!("CaCO3 loss for a loam (18% clay) at pH 6.0:");
    for rainfall in [400.0, 600.0, 800.0, 1000.0] {
        match model.caco3_loss(rainfall, 6.0, 18.0) {
            Ok(loss) => println!("  {rainfall:>6.0} mm  ->  {:>7.1} kg/ha/year", loss.caco3_kg_ha),
            Err(e) => eprintln!("  {rainfall:>6.0} mm  ->  {e}"),
        }
    }

    let zones = vec![
        SoilRecord::new("Hillside", "Top", 6.0, "sandy loam", 5.0),
        SoilRecord::new("Hillside", "Bottom", 6.2, "clay loam", 3.0),
    ];
    let params = MethodParameters::new(CropType::StandardCrops, "Agrocarb", LimingMode::Maintenance)
        .with_rainfall(750.0);

    match aggregate(&zones, &params, Method::Cec) {
        Ok(result) => print_zone_table(&result),
        Err(e) => eprintln!("Maintenance calculation failed: {e}"),
    }
}
