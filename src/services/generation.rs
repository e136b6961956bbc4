//! One generation round: a request per style, joined all-or-nothing.

use futures::future::try_join_all;
use tracing::info;

use crate::models::RoomDesign;
use crate::services::backend::{DesignBackend, GenerationRequest};
use crate::services::error::{BackendError, Result};

/// Issues every request concurrently and waits for all of them.
///
/// Each design is tagged with the style of the request that produced it.
/// If any request fails the whole round fails and no design is returned.
pub async fn generate_options(
    backend: &dyn DesignBackend,
    requests: &[GenerationRequest],
) -> Result<Vec<RoomDesign>> {
    info!("Generating {} design option(s)", requests.len());

    let designs = try_join_all(requests.iter().map(|request| async move {
        let mut design = backend.generate_design(request).await?;
        design.style.clone_from(&request.style);
        Ok::<_, BackendError>(design)
    }))
    .await?;

    Ok(designs)
}
