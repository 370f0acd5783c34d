mod aggregator;
mod calculator;
pub mod cec;
mod conversion;
mod leaching;
mod tables;
mod texture;
pub mod vdlufa;

pub use aggregator::{aggregate, summarize_fields};
pub use calculator::{LimeCalculator, RawRequirement};
pub use conversion::{
    apply_nv, caco3_to_cao, cao_to_caco3, run_pipeline, Conversion, LimeProducts,
    CACO3_TO_CAO_RATIO,
};
pub use leaching::{LeachingLoss, LeachingModel};
pub use tables::{
    default_vdlufa_table, CecEntry, CecTable, CecTargets, LinearSegment, PhCurve, VdlufaEntry,
};
pub use texture::{classify, classify_vdlufa};
