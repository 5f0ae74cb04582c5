pub mod block;
pub mod continuous;
pub mod events;
pub mod options;
pub(crate) mod queue;
pub mod store;
pub(crate) mod throttle;

pub use block::{BlockState, ThreadBlock};
pub use continuous::ContinuousHandle;
pub use events::{BlockEvent, DispatchId, ItemCompletion};
pub use options::ExecuteOptions;
pub use store::{TransformationFailure, TransformationResult};
