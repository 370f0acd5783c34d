use std::io::Read;
use std::path::Path;

use crate::error::LimeError;
use crate::models::{AggregateResult, SoilRecord};

/// CSV row structure for zone input. Name columns are optional.
#[derive(Debug, serde::Deserialize)]
struct ZoneRow {
    #[serde(default)]
    field_name: Option<String>,
    #[serde(default)]
    zone_name: Option<String>,
    ph_value: f64,
    soil_texture: String,
    area: f64,
    #[serde(default)]
    rainfall_mm: Option<f64>,
    #[serde(default)]
    caco3_loss_kg_ha: Option<f64>,
}

impl ZoneRow {
    fn into_record(self) -> SoilRecord {
        let mut record = SoilRecord::new(
            non_empty(self.field_name).unwrap_or_else(|| "Unknown Field".to_string()),
            non_empty(self.zone_name).unwrap_or_else(|| "Main Zone".to_string()),
            self.ph_value,
            self.soil_texture,
            self.area,
        );
        record.rainfall_mm = self.rainfall_mm;
        record.caco3_loss_kg_ha = self.caco3_loss_kg_ha;
        record
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// CSV row structure for zone results.
#[derive(Debug, serde::Serialize)]
struct ResultRow<'a> {
    field_name: &'a str,
    zone_name: &'a str,
    area_ha: f64,
    method: String,
    applied_mode: String,
    soil_texture: &'a str,
    texture_class: &'a str,
    current_ph: f64,
    target_ph: f64,
    caco3_kg_ha: f64,
    cao_kg_ha: f64,
    nv_adjusted_cao_kg_ha: f64,
    product_kg_ha: f64,
    product_total_kg: f64,
    was_capped: bool,
    rainfall_mm: Option<f64>,
    caco3_loss_kg_ha_year: Option<f64>,
}

fn parse_zone_records<R: Read>(rdr: &mut csv::Reader<R>) -> Result<Vec<SoilRecord>, LimeError> {
    let mut records = Vec::new();
    for result in rdr.deserialize() {
        let row: ZoneRow = result?;
        records.push(row.into_record());
    }
    Ok(records)
}

fn reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.has_headers(true).flexible(true).trim(csv::Trim::All);
    builder
}

/// Read soil zones from a CSV file.
///
/// Required columns: `ph_value`, `soil_texture`, `area`. Optional columns:
/// `field_name`, `zone_name`, `rainfall_mm`, `caco3_loss_kg_ha`.
pub fn read_zones_csv(path: impl AsRef<Path>) -> Result<Vec<SoilRecord>, LimeError> {
    let mut rdr = reader_builder().from_path(path.as_ref())?;
    parse_zone_records(&mut rdr)
}

/// Read soil zones from CSV bytes.
pub fn read_zones_csv_from_bytes(data: &[u8]) -> Result<Vec<SoilRecord>, LimeError> {
    let mut rdr = reader_builder().from_reader(data);
    parse_zone_records(&mut rdr)
}

/// Write one row per zone to a CSV file.
pub fn write_results_csv(result: &AggregateResult, path: impl AsRef<Path>) -> Result<(), LimeError> {
    let mut wtr = csv::Writer::from_path(path.as_ref())?;

    for zone in &result.per_zone {
        let row = ResultRow {
            field_name: &zone.field_name,
            zone_name: &zone.zone_name,
            area_ha: zone.area,
            method: zone.method.to_string(),
            applied_mode: zone.applied_mode.to_string(),
            soil_texture: &zone.original_texture,
            texture_class: zone.texture.label(),
            current_ph: zone.current_ph,
            target_ph: zone.target_ph,
            caco3_kg_ha: zone.caco3_equivalent_kg_ha,
            cao_kg_ha: zone.cao_equivalent_kg_ha,
            nv_adjusted_cao_kg_ha: zone.nv_adjusted_cao_kg_ha,
            product_kg_ha: zone.product_kg_ha,
            product_total_kg: zone.product_total_kg,
            was_capped: zone.was_capped,
            rainfall_mm: zone.rainfall_mm,
            caco3_loss_kg_ha_year: zone.caco3_loss_kg_ha_year,
        };
        wtr.serialize(&row)?;
    }

    wtr.flush()?;
    Ok(())
}
