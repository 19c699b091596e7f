//! Region source stage.

use tokio::sync::mpsc;

use crate::models::Region;

use super::HANDOFF;

/// Emit every requested region once, in order, then close.
///
/// Duplicates are passed through as-is.
pub fn stream_regions(regions: Vec<Region>) -> mpsc::Receiver<Region> {
    let (tx, rx) = mpsc::channel(HANDOFF);

    tokio::spawn(async move {
        for region in regions {
            if tx.send(region).await.is_err() {
                break;
            }
        }
    });

    rx
}
