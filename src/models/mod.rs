mod params;
mod request;
mod result;
mod soil;
mod texture;

pub use params::{CropType, LimingMode, Method, MethodParameters};
pub use request::CalculationRequest;
pub use result::{AggregateResult, AppliedMode, FieldSummary, LimeRequirementResult};
pub use soil::SoilRecord;
pub use texture::{TextureClass, VdlufaClass};
