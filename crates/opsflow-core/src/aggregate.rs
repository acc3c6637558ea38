//! Fan-out/fan-in over a fetched collection
//!
//! One task per item. Successful tasks report on a result channel, failing
//! tasks on an error channel. The first error wins; every task still in
//! flight at that point is aborted and awaited before returning.

use std::future::Future;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Run `fetch` for every item concurrently and collect the results in input order
pub async fn fan_out<T, R, E, F, Fut>(items: Vec<T>, fetch: F) -> Result<Vec<R>, E>
where
    F: Fn(T) -> Fut,
    Fut: Future<Output = Result<R, E>> + Send + 'static,
    R: Send + 'static,
    E: Send + 'static,
{
    let total = items.len();
    if total == 0 {
        return Ok(Vec::new());
    }

    let (result_tx, mut result_rx) = mpsc::channel::<(usize, R)>(total);
    let (error_tx, mut error_rx) = mpsc::channel::<E>(total);

    let mut handles = Vec::with_capacity(total);
    for (index, item) in items.into_iter().enumerate() {
        let task = fetch(item);
        let result_tx = result_tx.clone();
        let error_tx = error_tx.clone();
        handles.push(tokio::spawn(async move {
            match task.await {
                Ok(value) => {
                    let _ = result_tx.send((index, value)).await;
                }
                Err(err) => {
                    let _ = error_tx.send(err).await;
                }
            }
        }));
    }
    drop(result_tx);
    drop(error_tx);

    let mut slots: Vec<Option<R>> = (0..total).map(|_| None).collect();
    let mut completed = 0;

    while completed < total {
        tokio::select! {
            biased;

            Some(err) = error_rx.recv() => {
                tracing::debug!("Fan-out task failed, aborting {} remaining", total - completed - 1);
                abort_all(handles).await;
                return Err(err);
            }
            Some((index, value)) = result_rx.recv() => {
                slots[index] = Some(value);
                completed += 1;
            }
            else => break,
        }
    }

    if completed < total {
        // Both channels closed early: a task panicked before reporting
        for handle in handles {
            if let Err(err) = handle.await {
                if err.is_panic() {
                    std::panic::resume_unwind(err.into_panic());
                }
            }
        }
    }

    Ok(slots.into_iter().flatten().collect())
}

async fn abort_all(handles: Vec<JoinHandle<()>>) {
    for handle in &handles {
        handle.abort();
    }
    for handle in handles {
        let _ = handle.await;
    }
}
