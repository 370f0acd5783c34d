use assert_approx_eq::assert_approx_eq;
use proptest::prelude::*;

use lime_requirement_calculator::{
    aggregate,
    calculation::{caco3_to_cao, cao_to_caco3},
    classify,
    error::LimeError,
    io,
    models::{AppliedMode, CalculationRequest, TextureClass},
    CropType, LimeCalculator, LimeConfig, LimingMode, Method, MethodParameters, SoilRecord,
};

const MINERAL_TEXTURES: [&str; 12] = [
    "sand",
    "loamy sand",
    "sandy loam",
    "sandy silt loam",
    "loam",
    "silt loam",
    "silt",
    "sandy clay loam",
    "clay loam",
    "sandy clay",
    "silty clay",
    "clay",
];

fn zone(name: &str, ph: f64, texture: &str, area: f64) -> SoilRecord {
    SoilRecord::new("Test Field", name, ph, texture, area)
}

fn zone_with_loss(name: &str, ph: f64, area: f64, loss: f64) -> SoilRecord {
    let mut record = zone(name, ph, "sand", area);
    record.caco3_loss_kg_ha = Some(loss);
    record
}

fn improvement(lime: &str) -> MethodParameters {
    MethodParameters::new(CropType::StandardCrops, lime, LimingMode::Improvement)
}

fn maintenance(lime: &str) -> MethodParameters {
    MethodParameters::new(CropType::StandardCrops, lime, LimingMode::Maintenance)
}

// --- Regression & pipeline ---

#[test]
fn test_regression_measured_loss_cao_nv_53() {
    let zones = vec![zone_with_loss("Z1", 5.0, 1.0, 143.5)];
    let params = maintenance("CaO").with_nv(53.0);
    for method in [Method::Vdlufa, Method::Cec] {
        let result = aggregate(&zones, &params, method).unwrap();
        let z = &result.per_zone[0];
        assert_eq!(z.applied_mode, AppliedMode::Maintenance);
        assert_approx_eq!(z.caco3_equivalent_kg_ha, 143.5, 1e-9);
        assert_approx_eq!(z.cao_equivalent_kg_ha, 80.392, 1e-3);
        assert_approx_eq!(z.product_kg_ha, 151.7, 0.05);
    }
}

#[test]
fn test_regression_measured_loss_sandy_loam_spelling() {
    assert_eq!(classify("Sandy Loam").unwrap(), TextureClass::SandyLoam);
    let mut record = zone("Z1", 5.0, "Sandy Loam", 1.0);
    record.caco3_loss_kg_ha = Some(143.5);
    let result = aggregate(&[record], &maintenance("CaO").with_nv(53.0), Method::Vdlufa).unwrap();
    let z = &result.per_zone[0];
    assert_eq!(z.applied_mode, AppliedMode::Maintenance);
    assert!(z.rainfall_mm.is_none());
    assert_approx_eq!(z.product_kg_ha, 151.7, 0.05);
}

#[test]
fn test_maintenance_pipeline_order_both_methods() {
    let mut params = maintenance("Omya_Calciprill").with_nv(85.0);
    params.rainfall_mm = Some(750.0);
    let zones: Vec<SoilRecord> = MINERAL_TEXTURES
        .iter()
        .map(|t| zone(t, 5.0, t, 1.0))
        .collect();

    for method in [Method::Vdlufa, Method::Cec] {
        let result = aggregate(&zones, &params, method).unwrap();
        for z in &result.per_zone {
            assert_eq!(z.applied_mode, AppliedMode::Maintenance);
            assert!(z.caco3_equivalent_kg_ha > 0.0);
            assert_approx_eq!(z.cao_equivalent_kg_ha, z.caco3_equivalent_kg_ha / 1.785, 1e-9);
            assert_approx_eq!(z.nv_adjusted_cao_kg_ha, z.cao_equivalent_kg_ha * 100.0 / 85.0, 1e-9);
            assert_approx_eq!(z.product_kg_ha, z.nv_adjusted_cao_kg_ha * 1.887, 1e-9);
            assert_eq!(z.rainfall_mm, Some(750.0));
            assert_eq!(z.caco3_loss_kg_ha_year, Some(z.caco3_equivalent_kg_ha));
        }
    }
}

#[test]
fn test_default_nv_is_100() {
    let zones = vec![zone("Z1", 5.4, "silt loam", 3.0)];
    let calc = LimeCalculator::with_defaults();
    for method in [Method::Vdlufa, Method::Cec] {
        let implicit = calc.aggregate(&zones, &improvement("CaO"), method).unwrap();
        let explicit = calc
            .aggregate(&zones, &improvement("CaO").with_nv(100.0), method)
            .unwrap();
        assert_eq!(implicit.total_product_kg, explicit.total_product_kg);
    }
}

// --- Aggregation ---

#[test]
fn test_area_weighted_average() {
    // CaCO3 at NV 100 passes the measured loss through unchanged
    let zones = vec![
        zone_with_loss("Z1", 5.0, 10.0, 100.0),
        zone_with_loss("Z2", 5.0, 20.0, 200.0),
    ];
    let result = aggregate(&zones, &maintenance("CaCO3"), Method::Vdlufa).unwrap();
    assert_approx_eq!(result.per_zone[0].product_kg_ha, 100.0, 1e-9);
    assert_approx_eq!(result.per_zone[1].product_kg_ha, 200.0, 1e-9);
    assert_approx_eq!(result.total_area, 30.0, 1e-12);
    assert_approx_eq!(result.weighted_average_kg_ha, 166.67, 0.01);
    assert_approx_eq!(result.total_product_kg, 5000.0, 1e-6);
}

#[test]
fn test_single_zero_area_zone() {
    let zones = vec![zone("Z1", 5.5, "loam", 0.0)];
    let err = aggregate(&zones, &improvement("CaO"), Method::Cec).unwrap_err();
    assert!(matches!(err, LimeError::ZeroArea { zones: 1 }));
}

#[test]
fn test_empty_input() {
    let err = aggregate(&[], &improvement("CaO"), Method::Cec).unwrap_err();
    assert!(matches!(err, LimeError::EmptyInput));
}

#[test]
fn test_negative_area_rejected() {
    let zones = vec![zone("Z1", 5.5, "loam", -1.0)];
    let err = aggregate(&zones, &improvement("CaO"), Method::Cec).unwrap_err();
    assert!(matches!(err, LimeError::InvalidInput { ref field, .. } if field == "soil_data[0].area"));
}

// --- Input domain ---

#[test]
fn test_ph_boundaries_accepted() {
    for ph in [0.0, 14.0] {
        let zones = vec![zone("Z1", ph, "clay loam", 1.0)];
        for method in [Method::Vdlufa, Method::Cec] {
            assert!(aggregate(&zones, &improvement("CaO"), method).is_ok(), "pH {ph}");
        }
    }
}

#[test]
fn test_ph_out_of_range_rejected() {
    for ph in [-0.1, 14.1] {
        let zones = vec![zone("Z1", ph, "clay loam", 1.0)];
        let err = aggregate(&zones, &improvement("CaO"), Method::Vdlufa).unwrap_err();
        assert!(matches!(err, LimeError::InvalidInput { .. }), "pH {ph}");
    }
}

#[test]
fn test_unknown_texture() {
    let zones = vec![zone("Z1", 5.5, "Martian Regolith", 1.0)];
    let err = aggregate(&zones, &improvement("CaO"), Method::Cec).unwrap_err();
    assert!(matches!(err, LimeError::Classification(ref s) if s == "Martian Regolith"));
    assert!(err.to_string().contains("Martian Regolith"));
}

#[test]
fn test_unknown_product() {
    let zones = vec![zone("Z1", 5.5, "loam", 1.0)];
    let err = aggregate(&zones, &improvement("Unobtainium"), Method::Vdlufa).unwrap_err();
    assert!(matches!(err, LimeError::UnknownProduct(ref s) if s == "Unobtainium"));
}

#[test]
fn test_maintenance_needs_rainfall() {
    let zones = vec![zone("Z1", 5.5, "loam", 1.0)];
    let err = aggregate(&zones, &maintenance("CaO"), Method::Cec).unwrap_err();
    assert!(matches!(err, LimeError::InvalidParameter { ref field, .. } if field == "rainfall_mm"));
}

// --- Methods ---

#[test]
fn test_improvement_decreases_with_ph() {
    for method in [Method::Vdlufa, Method::Cec] {
        let low = aggregate(&[zone("Z", 4.8, "loam", 1.0)], &improvement("CaO"), method).unwrap();
        let high = aggregate(&[zone("Z", 5.8, "loam", 1.0)], &improvement("CaO"), method).unwrap();
        assert!(low.total_product_kg > high.total_product_kg, "{method}");
    }
}

#[test]
fn test_improvement_zero_at_high_ph() {
    for method in [Method::Vdlufa, Method::Cec] {
        let result =
            aggregate(&[zone("Z", 7.5, "clay", 2.0)], &improvement("CaCO3"), method).unwrap();
        assert_eq!(result.total_product_kg, 0.0);
        assert!(result.per_zone[0].is_zero());
    }
}

#[test]
fn test_cross_method_maintenance_within_ten_percent() {
    let mut params = maintenance("CaO");
    params.rainfall_mm = Some(800.0);
    let matched = &MINERAL_TEXTURES[..9];
    for texture in matched {
        let zones = vec![zone("Z", 5.0, texture, 1.0)];
        let vdlufa = aggregate(&zones, &params, Method::Vdlufa).unwrap().total_product_kg;
        let cec = aggregate(&zones, &params, Method::Cec).unwrap().total_product_kg;
        let diff = (vdlufa - cec).abs() / vdlufa.max(cec);
        assert!(diff <= 0.10, "{texture}: VDLUFA {vdlufa:.1} vs CEC {cec:.1}");
    }
}

#[test]
fn test_heavy_clays_diverge_between_methods() {
    let mut params = maintenance("CaO");
    params.rainfall_mm = Some(800.0);
    for texture in ["sandy clay", "silty clay", "clay"] {
        let zones = vec![zone("Z", 5.0, texture, 1.0)];
        let vdlufa = aggregate(&zones, &params, Method::Vdlufa).unwrap().total_product_kg;
        let cec = aggregate(&zones, &params, Method::Cec).unwrap().total_product_kg;
        let diff = (vdlufa - cec).abs() / vdlufa.max(cec);
        assert!(diff > 0.10, "{texture} no longer diverges");
        // the fine class carries more clay, so CEC leaches less
        assert!(cec < vdlufa);
    }
}

#[test]
fn test_texture_granularity_differs_between_methods() {
    let vdlufa_loam = aggregate(&[zone("Z", 5.5, "loam", 1.0)], &improvement("CaO"), Method::Vdlufa)
        .unwrap();
    let vdlufa_loamy_sand = aggregate(
        &[zone("Z", 5.5, "loamy sand", 1.0)],
        &improvement("CaO"),
        Method::Vdlufa,
    )
    .unwrap();
    assert_eq!(vdlufa_loam.total_product_kg, vdlufa_loamy_sand.total_product_kg);

    let cec_loam =
        aggregate(&[zone("Z", 5.5, "loam", 1.0)], &improvement("CaO"), Method::Cec).unwrap();
    let cec_clay =
        aggregate(&[zone("Z", 5.5, "clay", 1.0)], &improvement("CaO"), Method::Cec).unwrap();
    assert!(cec_clay.total_product_kg > cec_loam.total_product_kg);
}

#[test]
fn test_vdlufa_bucket_follows_report_spelling() {
    let rate = |texture: &str, method: Method| {
        aggregate(&[zone("Z", 5.5, texture, 1.0)], &improvement("CaO"), method)
            .unwrap()
            .total_product_kg
    };
    assert_approx_eq!(rate("sandy loam", Method::Vdlufa), 5886.9, 0.1);
    assert_approx_eq!(rate("SANDY_LOAM", Method::Vdlufa), 5886.9, 0.1);
    assert_approx_eq!(rate("slightly loamy sand", Method::Vdlufa), 1856.5, 0.1);

    assert_eq!(rate("Schwach Lehm Sand", Method::Cec), rate("sandy loam", Method::Cec));
    assert_eq!(rate("slightly loamy sand", Method::Cec), rate("loamy sand", Method::Cec));
}

#[test]
fn test_steep_curve_extends_past_maximum() {
    let result = aggregate(&[zone("Z", 4.2, "clay", 1.0)], &improvement("CaO"), Method::Vdlufa)
        .unwrap();
    assert_approx_eq!(result.total_product_kg, 18242.4, 0.1);
}

#[test]
fn test_other_crops_use_optimal_ph() {
    let other = |mode| MethodParameters::new(CropType::OtherCrops, "CaO", mode);

    let mut record = zone("Z", 5.15, "sand", 1.0);
    record.rainfall_mm = Some(800.0);
    let result = aggregate(&[record], &other(LimingMode::Maintenance), Method::Vdlufa).unwrap();
    assert_eq!(result.total_product_kg, 0.0);
    assert_eq!(result.per_zone[0].applied_mode, AppliedMode::None);

    let result = aggregate(
        &[zone("Z", 4.8, "sand", 1.0)],
        &other(LimingMode::Improvement),
        Method::Vdlufa,
    )
    .unwrap();
    assert_approx_eq!(result.per_zone[0].target_ph, 5.1, 1e-12);
    assert!(result.total_product_kg > 0.0);
}

#[test]
fn test_other_crops_need_less_lime() {
    let zones = vec![zone("Z", 5.3, "sandy loam", 1.0)];
    for method in [Method::Vdlufa, Method::Cec] {
        let arable = aggregate(&zones, &improvement("CaO"), method).unwrap();
        let grass = aggregate(
            &zones,
            &MethodParameters::new(CropType::OtherCrops, "CaO", LimingMode::Improvement),
            method,
        )
        .unwrap();
        assert!(grass.total_product_kg < arable.total_product_kg, "{method}");
    }
}

#[test]
fn test_capping_across_zones() {
    let zones = vec![zone("Acid", 4.5, "clay", 2.0), zone("Mild", 6.2, "clay", 2.0)];
    let params = improvement("CaCO3").with_max_application_rate(3000.0);
    let result = aggregate(&zones, &params, Method::Cec).unwrap();
    assert_eq!(result.num_capped(), 1);
    assert!(result.per_zone[0].was_capped);
    assert_approx_eq!(result.per_zone[0].product_kg_ha, 3000.0, 1e-6);
    assert!(result.per_zone[0].target_ph < 6.5);
    assert!(!result.per_zone[1].was_capped);
}

// --- Configuration ---

#[test]
fn test_incomplete_config_fails_at_startup() {
    let config = LimeConfig::from_toml_str(
        r#"
        [vdlufa.sand]
        clay_percent = 5.0
        standard_crops = { optimal_ph = 5.9, zero_ph = 5.9, floor_ph = 4.0, max_cao_dt_ha = 45.0, breakpoint_ph = 5.3, steep = { slope = -28.945, intercept = 160.52 }, shallow = { slope = -11.852, intercept = 69.93 } }
        other_crops = { optimal_ph = 5.1, zero_ph = 5.2, floor_ph = 3.4, max_cao_dt_ha = 50.0, breakpoint_ph = 4.6, steep = { slope = -37.692, intercept = 178.46 }, shallow = { slope = -8.0, intercept = 41.6 } }
        "#,
    )
    .unwrap();
    let err = LimeCalculator::new(config).unwrap_err();
    assert!(matches!(err, LimeError::Configuration(_)));
}

#[test]
fn test_config_override_changes_results() {
    let config = LimeConfig::from_toml_str("[defaults]\nnv = 50.0\n").unwrap();
    let custom = LimeCalculator::new(config).unwrap();
    let builtin = LimeCalculator::with_defaults();
    let zones = vec![zone("Z", 5.5, "sandy loam", 1.0)];
    let a = custom.aggregate(&zones, &improvement("CaO"), Method::Cec).unwrap();
    let b = builtin.aggregate(&zones, &improvement("CaO"), Method::Cec).unwrap();
    assert_approx_eq!(a.total_product_kg, 2.0 * b.total_product_kg, 1e-6);
}

#[test]
fn test_calculator_is_shareable_across_threads() {
    let calc = std::sync::Arc::new(LimeCalculator::with_defaults());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let calc = std::sync::Arc::clone(&calc);
            std::thread::spawn(move || {
                let zones = vec![zone("Z", 5.0 + i as f64 * 0.2, "loam", 1.0)];
                calc.aggregate(&zones, &improvement("CaO"), Method::Vdlufa)
                    .map(|r| r.total_product_kg)
            })
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap().is_ok());
    }
}

// --- Request & I/O ---

#[test]
fn test_request_json_workflow() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("request.json");
    std::fs::write(
        &path,
        r#"{
            "soil_data": [
                {"field_name": "North", "zone_name": "Z1", "ph_value": 5.5, "soil_texture": "SANDY_LOAM", "area": 10.0},
                {"field_name": "North", "zone_name": "Z2", "ph_value": 6.0, "soil_texture": "Schwach Lehm Sand", "area": 5.0},
                {"field_name": "South", "zone_name": "Z1", "ph_value": 5.2, "soil_texture": "HALF_BOG_SOIL", "area": 2.0}
            ],
            "crop_type": "Standard crops",
            "lime_type": "CaCO3",
            "liming_mode": "pH Improvement",
            "nv": 95.0
        }"#,
    )
    .unwrap();

    let request: CalculationRequest = io::read_request_json(&path).unwrap();
    let calc = LimeCalculator::with_defaults();
    let result = calc.process_request(&request, Method::Cec).unwrap();
    assert_eq!(result.num_zones(), 3);
    assert_eq!(result.fields.len(), 2);
    assert_eq!(result.per_zone[2].texture, TextureClass::Organic);

    // organic soils have no VDLUFA class
    assert!(matches!(
        calc.process_request(&request, Method::Vdlufa).unwrap_err(),
        LimeError::Classification(_)
    ));

    let out = dir.path().join("result.csv");
    io::write_results_csv(&result, &out).unwrap();
    assert_eq!(std::fs::read_to_string(&out).unwrap().lines().count(), 4);
}

#[test]
fn test_classifier_accepts_report_spellings() {
    assert_eq!(classify("Toniger Lehm b.Ton").unwrap(), TextureClass::ClayLoam);
    assert_eq!(classify("sandy_clay_loam").unwrap(), TextureClass::SandyClayLoam);
    assert!(classify("gravelly").is_err());
}

// --- Properties ---

fn texture_strategy() -> impl Strategy<Value = &'static str> {
    proptest::sample::select(MINERAL_TEXTURES.to_vec())
}

fn product_strategy() -> impl Strategy<Value = &'static str> {
    proptest::sample::select(vec![
        "CaO",
        "CaCO3",
        "Ca(OH)2",
        "Quicklime",
        "Slaked_lime",
        "Agrocarb",
        "Omya_Calciprill",
    ])
}

proptest! {
    #[test]
    fn prop_caco3_cao_round_trip(kg in 0.0f64..1.0e6) {
        let back = cao_to_caco3(caco3_to_cao(kg));
        prop_assert!((back - kg).abs() <= 1e-9 * kg.max(1.0));
    }

    #[test]
    fn prop_pipeline_chain_holds(
        ph in 3.0f64..8.0,
        texture in texture_strategy(),
        lime in product_strategy(),
        nv in 10.0f64..100.0,
        cec in proptest::bool::ANY,
    ) {
        let method = if cec { Method::Cec } else { Method::Vdlufa };
        let zones = vec![zone("Z", ph, texture, 1.0)];
        let result = aggregate(&zones, &improvement(lime).with_nv(nv), method).unwrap();
        let z = &result.per_zone[0];
        prop_assert!(z.product_kg_ha >= 0.0);
        prop_assert!((z.cao_equivalent_kg_ha - z.caco3_equivalent_kg_ha / 1.785).abs() < 1e-6);
        prop_assert!((z.nv_adjusted_cao_kg_ha - z.cao_equivalent_kg_ha * 100.0 / nv).abs() < 1e-6);
    }

    #[test]
    fn prop_aggregate_order_independent(
        zones in proptest::collection::vec((3.5f64..7.5, texture_strategy(), 0.1f64..50.0), 1..8),
    ) {
        let records: Vec<SoilRecord> = zones
            .iter()
            .enumerate()
            .map(|(i, (ph, texture, area))| zone(&format!("Z{i}"), *ph, texture, *area))
            .collect();
        let mut reversed = records.clone();
        reversed.reverse();

        let params = improvement("CaCO3");
        let forward = aggregate(&records, &params, Method::Cec).unwrap();
        let backward = aggregate(&reversed, &params, Method::Cec).unwrap();

        let tolerance = 1e-9 * forward.total_product_kg.max(1.0);
        prop_assert!((forward.total_product_kg - backward.total_product_kg).abs() <= tolerance);
        prop_assert!((forward.total_area - backward.total_area).abs() <= 1e-9);
        prop_assert!(
            (forward.weighted_average_kg_ha - backward.weighted_average_kg_ha).abs()
                <= 1e-9 * forward.weighted_average_kg_ha.max(1.0)
        );
        prop_assert_eq!(&forward.per_zone[0].zone_name, &backward.per_zone[records.len() - 1].zone_name);
    }
}
