pub mod generation;
pub mod notice;
pub mod registry;
pub mod selection;
pub mod settings;
pub mod visual_index;

pub use generation::GenerationState;
pub use notice::Notice;
pub use registry::{Mass, MassRegistry};
pub use selection::SelectionState;
pub use settings::StudioSettings;
pub use visual_index::VisualIndex;
