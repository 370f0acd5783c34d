use tracing::info;

use super::calculator::LimeCalculator;
use crate::error::LimeError;
use crate::models::{
    AggregateResult, FieldSummary, LimeRequirementResult, Method, MethodParameters, SoilRecord,
};

/// Aggregate zone requirements with the built-in tables.
///
/// # Examples
///
/// ```
/// use lime_requirement_calculator::{aggregate, CropType, LimingMode, Method, MethodParameters, SoilRecord};
///
/// let zones = vec![
///     SoilRecord::new("North", "Z1", 5.5, "sandy loam", 10.0),
///     SoilRecord::new("North", "Z2", 6.0, "loam", 20.0),
/// ];
/// let params = MethodParameters::new(CropType::StandardCrops, "CaCO3", LimingMode::Improvement);
/// let result = aggregate(&zones, &params, Method::Cec).unwrap();
/// assert_eq!(result.per_zone.len(), 2);
/// assert!((result.total_area - 30.0).abs() < 1e-9);
/// ```
pub fn aggregate(
    records: &[SoilRecord],
    params: &MethodParameters,
    method: Method,
) -> Result<AggregateResult, LimeError> {
    LimeCalculator::with_defaults().aggregate(records, params, method)
}

pub(crate) fn aggregate_zones(
    calculator: &LimeCalculator,
    records: &[SoilRecord],
    params: &MethodParameters,
    method: Method,
) -> Result<AggregateResult, LimeError> {
    if records.is_empty() {
        return Err(LimeError::EmptyInput);
    }
    let resolved = calculator.resolve(params, method)?;

    let per_zone = records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            calculator.zone_result(record, &resolved, method, &format!("soil_data[{i}]."))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let total_area: f64 = per_zone.iter().map(|z| z.area).sum();
    if !total_area.is_finite() {
        return Err(LimeError::invalid_input(
            "total_area",
            total_area,
            "sum of zone areas is not a finite number of hectares",
        ));
    }
    if total_area <= 0.0 {
        return Err(LimeError::ZeroArea {
            zones: per_zone.len(),
        });
    }
    let total_product_kg: f64 = per_zone.iter().map(|z| z.product_total_kg).sum();
    if !total_product_kg.is_finite() {
        return Err(LimeError::invalid_input(
            "total_product_kg",
            total_product_kg,
            "total product is not a finite number of kilograms",
        ));
    }
    let weighted_average_kg_ha = total_product_kg / total_area;
    let fields = summarize_fields(&per_zone);

    info!(
        %method,
        zones = per_zone.len(),
        fields = fields.len(),
        total_area,
        weighted_average_kg_ha,
        total_product_kg,
        "aggregated lime requirement"
    );

    Ok(AggregateResult {
        method,
        lime_type: params.lime_type.clone(),
        liming_mode: params.liming_mode,
        total_area,
        weighted_average_kg_ha,
        total_product_kg,
        fields,
        per_zone,
    })
}

/// Group zone results by field name, in order of first appearance.
pub fn summarize_fields(results: &[LimeRequirementResult]) -> Vec<FieldSummary> {
    let mut fields: Vec<FieldSummary> = Vec::new();
    for zone in results {
        let index = match fields.iter().position(|f| f.field_name == zone.field_name) {
            Some(index) => index,
            None => {
                fields.push(FieldSummary {
                    field_name: zone.field_name.clone(),
                    zone_count: 0,
                    total_area: 0.0,
                    weighted_average_kg_ha: None,
                    total_product_kg: 0.0,
                });
                fields.len() - 1
            }
        };
        let field = &mut fields[index];
        field.zone_count += 1;
        field.total_area += zone.area;
        field.total_product_kg += zone.product_total_kg;
    }
    for field in &mut fields {
        if field.total_area > 0.0 {
            field.weighted_average_kg_ha = Some(field.total_product_kg / field.total_area);
        }
    }
    fields
}
