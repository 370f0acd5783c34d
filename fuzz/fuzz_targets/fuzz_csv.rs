#![no_main]

use libfuzzer_sys::fuzz_target;
use lime_requirement_calculator::{
    aggregate, io::read_zones_csv_from_bytes, CropType, LimingMode, Method, MethodParameters,
};

fuzz_target!(|data: &[u8]| {
    if let Ok(zones) = read_zones_csv_from_bytes(data) {
        let params = MethodParameters::new(CropType::StandardCrops, "CaO", LimingMode::Improvement);
        for method in [Method::Vdlufa, Method::Cec] {
            if let Ok(result) = aggregate(&zones, &params, method) {
                assert!(result.total_product_kg >= 0.0);
            }
        }
    }
});
