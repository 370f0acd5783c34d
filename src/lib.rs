pub mod calculation;
pub mod config;
pub mod error;
pub mod io;
pub mod models;
pub mod visualization;

pub use calculation::{aggregate, classify, classify_vdlufa, LimeCalculator};
pub use config::LimeConfig;
pub use error::LimeError;
pub use io::{ResultWriter, ZoneReader};
pub use models::{
    AggregateResult, CalculationRequest, CropType, LimeRequirementResult, LimingMode, Method,
    MethodParameters, SoilRecord, TextureClass, VdlufaClass,
};
