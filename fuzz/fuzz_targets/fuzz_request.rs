#![no_main]

use libfuzzer_sys::fuzz_target;
use lime_requirement_calculator::{io::read_request_json_from_bytes, LimeCalculator, Method};

fuzz_target!(|data: &[u8]| {
    if let Ok(request) = read_request_json_from_bytes(data) {
        let calculator = LimeCalculator::with_defaults();
        for method in [Method::Vdlufa, Method::Cec] {
            if let Ok(result) = calculator.process_request(&request, method) {
                for zone in &result.per_zone {
                    assert!(zone.product_kg_ha >= 0.0);
                }
            }
        }
    }
});
