pub mod form;
pub mod geometry;
pub mod reps;
pub mod session;
pub mod side;

pub use form::{classify_form, NEUTRAL_LABEL};
pub use geometry::angle_at;
pub use reps::{RepCounter, RepSignal};
pub use session::{ExerciseSession, FrameUpdate};
pub use side::{measure_pose, Measurement};
