pub mod processor;
pub mod protocol;

pub use processor::{EventProcessor, WorkerHandle};
pub use protocol::{RequestSeq, WorkerRequest, WorkerResponse};
