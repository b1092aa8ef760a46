//! Drive — command-line ingestion driver.
//!
//! Stand-in for the out-of-scope upload layer: every argument is taken
//! as a local bundle path, ingested, then polled until it reaches a
//! terminal status. The final record is printed as one JSON line per
//! bundle.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use crate::bundle::Intake;
use crate::pipeline::IngestPool;
use crate::state::SharedState;

pub async fn run(
    state: SharedState,
    pool: Arc<IngestPool>,
) -> Result<(), Box<dyn std::error::Error>> {
    let paths: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
    if paths.is_empty() {
        error!("no input files; usage: ingest <bundle>...");
        return Ok(());
    }

    let intake = Intake::new(Arc::clone(&state), pool);
    let mut ids = Vec::new();
    for path in &paths {
        match intake.ingest_local(path).await {
            Ok(id) => {
                info!("submitted {} as bundle {}", path.display(), id);
                ids.push(id);
            }
            Err(e) => error!("could not ingest {}: {}", path.display(), e),
        }
    }

    for id in &ids {
        loop {
            match state.store.get_bundle(id).await? {
                Some(bundle) if bundle.status.is_terminal() => {
                    println!("{}", serde_json::to_string(&bundle)?);
                    break;
                }
                Some(_) => tokio::time::sleep(Duration::from_millis(200)).await,
                None => {
                    error!("bundle {} disappeared from the store", id);
                    break;
                }
            }
        }
    }
    Ok(())
}
