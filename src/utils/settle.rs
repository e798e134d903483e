use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use futures_util::future::{join_all, FutureExt};
use crate::error::{Error, Result};

/// Drive every task concurrently until all of them finish, reporting each
/// outcome in input order.
///
/// An error or a panic in one task is captured as that task's `Err` and never
/// cancels or delays the others.
pub async fn settle_all<I, F, T>(tasks: I) -> Vec<Result<T>>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = Result<T>>,
{
    let guarded = tasks
        .into_iter()
        .map(|task| AssertUnwindSafe(task).catch_unwind().map(flatten_outcome::<T>));

    join_all(guarded).await
}

// Must stay a named fn: an inline closure over the panic payload makes the
// settled future fail the `Send` check inside axum handlers.
fn flatten_outcome<T>(outcome: std::thread::Result<Result<T>>) -> Result<T> {
    match outcome {
        Ok(result) => result,
        Err(payload) => Err(Error::TaskPanicked(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
