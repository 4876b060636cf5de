pub mod collector;
pub mod sections;
pub mod state;

pub use collector::{collect, validate_required};
pub use sections::SectionKind;
pub use state::FormState;
