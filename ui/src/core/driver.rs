//! The cooperative event loop that connects a [`Session`] to its [`CasePipeline`].
//!
//! Presentation events and in-flight loads are multiplexed on one task, so a slow load never
//! holds up later clicks. After every step the current session is handed to `publish`.

use std::rc::Rc;

use futures::stream::FuturesUnordered;
use futures::{select, StreamExt};
use futures_channel::mpsc::UnboundedReceiver;
use futures_util::future::{FutureExt, LocalBoxFuture};

use super::pipeline::CasePipeline;
use super::session::{LoadOutcome, LoadRequest, Session, SessionEvent};

/// Run until the event channel closes and every started load has finished.
pub async fn drive_session<F>(
    pipeline: Rc<CasePipeline>,
    mut events: UnboundedReceiver<SessionEvent>,
    mut session: Session,
    mut publish: F,
) -> Session
where
    F: FnMut(&Session),
{
    let mut in_flight: FuturesUnordered<LocalBoxFuture<'static, LoadOutcome>> =
        FuturesUnordered::new();
    let mut events_open = true;

    loop {
        if !events_open && in_flight.is_empty() {
            break;
        }

        let requests = select! {
            event = events.next() => match event {
                Some(event) => {
                    tracing::debug!(?event, "session event");
                    session.handle(event)
                }
                None => {
                    events_open = false;
                    continue;
                }
            },
            outcome = in_flight.select_next_some() => session.complete(outcome),
            complete => break,
        };

        for request in requests {
            in_flight.push(spawn_load(pipeline.clone(), request));
        }
        publish(&session);
    }

    session
}

fn spawn_load(
    pipeline: Rc<CasePipeline>,
    request: LoadRequest,
) -> LocalBoxFuture<'static, LoadOutcome> {
    async move { pipeline.execute(request).await }.boxed_local()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ResourcePatterns;
    use crate::core::resolver::MemoryResolver;
    use crate::core::session::SessionState;
    use futures::executor::block_on;
    use futures_channel::mpsc::unbounded;
    use serde_json::json;

    #[test]
    fn drives_start_to_retrieval_ready() {
        let resolver = MemoryResolver::new()
            .with(
                "manifest.json",
                json!([{ "id": "PT-9", "retrievalFile": "retrieval/PT-9.json" }]).to_string(),
            )
            .with(
                "retrieval/PT-9.json",
                json!([
                    { "id": "PT-9", "isQueryCase": true },
                    { "id": "R1", "similarity": 0.91, "medicalGroup": "sinus_tachycardia" }
                ])
                .to_string(),
            );
        let pipeline = Rc::new(CasePipeline::new(Rc::new(resolver), ResourcePatterns::default()));

        let (tx, rx) = unbounded();
        tx.unbounded_send(SessionEvent::Start).unwrap();
        tx.unbounded_send(SessionEvent::SelectGroup("sinus_tachycardia".into())).unwrap();
        drop(tx);

        let mut states = Vec::new();
        let session = block_on(drive_session(pipeline, rx, Session::default(), |s| {
            states.push(s.state())
        }));

        assert_eq!(session.state(), SessionState::RetrievalReady);
        assert_eq!(session.groups().len(), 1);
        assert_eq!(session.monitor_subject().unwrap().id, "PT-9");
        assert_eq!(states.first(), Some(&SessionState::ManifestLoading));
        assert_eq!(states.last(), Some(&SessionState::RetrievalReady));
    }
}
