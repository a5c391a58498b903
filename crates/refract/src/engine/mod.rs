//! Index build orchestration: status tracking, persistence and the build
//! pipeline itself.

mod cancel;
mod orchestrator;
mod status;
mod store;

pub use cancel::CancelToken;
pub use orchestrator::{Refract, RefractConfig};
pub use status::{IndexStatus, StatusRecord, StatusRegistry};
pub use store::{dataset_id_for, IndexStore, JsonIndexStore, MemoryIndexStore};
