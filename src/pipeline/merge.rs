//! Fan-in of several channels into one.

use tokio::sync::mpsc;

use super::HANDOFF;

/// Forward every item of every input into a single output.
///
/// The output closes only after all inputs have closed. Relative order is
/// kept per input, not across inputs.
pub fn merge<T: Send + 'static>(inputs: Vec<mpsc::Receiver<T>>) -> mpsc::Receiver<T> {
    let (tx, rx) = mpsc::channel(HANDOFF);

    for mut input in inputs {
        let tx = tx.clone();
        tokio::spawn(async move {
            while let Some(item) = input.recv().await {
                if tx.send(item).await.is_err() {
                    break;
                }
            }
        });
    }

    rx
}
