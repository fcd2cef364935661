use crate::core::{prepare_trips, ReplayError, ReplayResult};
use crate::playback::pointer::resolve_pointers;
use crate::worker::protocol::{WorkerRequest, WorkerResponse};
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Playback side of the event processor channel pair
pub struct WorkerHandle {
    requests: mpsc::UnboundedSender<WorkerRequest>,
    responses: mpsc::UnboundedReceiver<WorkerResponse>,
}

impl WorkerHandle {
    pub fn into_parts(
        self,
    ) -> (
        mpsc::UnboundedSender<WorkerRequest>,
        mpsc::UnboundedReceiver<WorkerResponse>,
    ) {
        (self.requests, self.responses)
    }
}

/// Background task that owns timeline preparation and pointer resolution.
///
/// The task keeps no state between requests; every request carries the
/// timelines it operates on.
pub struct EventProcessor;

impl EventProcessor {
    /// Start the processor on the current tokio runtime
    pub fn spawn() -> ReplayResult<WorkerHandle> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| ReplayError::BoundaryUnavailable(e.to_string()))?;

        let (request_tx, request_rx) = mpsc::unbounded_channel::<WorkerRequest>();
        let (response_tx, response_rx) = mpsc::unbounded_channel::<WorkerResponse>();

        runtime.spawn(Self::run(request_rx, response_tx));
        debug!("Event processor started");

        Ok(WorkerHandle {
            requests: request_tx,
            responses: response_rx,
        })
    }

    async fn run(
        mut requests: mpsc::UnboundedReceiver<WorkerRequest>,
        responses: mpsc::UnboundedSender<WorkerResponse>,
    ) {
        while let Some(request) = requests.recv().await {
            let response = Self::handle(request);
            if responses.send(response).is_err() {
                break;
            }
        }
        debug!("Event processor stopped");
    }

    /// Process one request
    pub fn handle(request: WorkerRequest) -> WorkerResponse {
        match request {
            WorkerRequest::Prepare { seq, trips } => {
                let trips = prepare_trips(trips);
                let events: usize = trips.iter().map(|t| t.len()).sum();
                info!("Prepared {} trips ({} events)", trips.len(), events);
                WorkerResponse::Prepared { seq, trips }
            }
            WorkerRequest::FindPointers {
                seq,
                sim_time_ms,
                trips,
            } => WorkerResponse::Pointers {
                seq,
                pointers: resolve_pointers(&trips, sim_time_ms),
                sim_time_ms,
            },
        }
    }
}
