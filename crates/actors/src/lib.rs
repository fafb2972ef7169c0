use std::panic::AssertUnwindSafe;

use actor::{Actor, SupervisionStrategy};
use actor_ref::ActorRef;
use futures::FutureExt;
use message::Envelope;
use tokio::sync::mpsc;

pub mod actor;
pub mod actor_ref;
pub mod message;

const MAILBOX_CAPACITY: usize = 32;

/// Creates and runs an actor. Messages are processed one at a time, so the
/// actor is the only mutator of its state. If a handler panics, the actor is
/// restarted, resumed or stopped according to `Actor::on_panic()`.
pub fn run<A, F>(actor_factory: F) -> ActorRef<A>
where
    A: Actor,
    F: 'static + Send + Fn() -> A,
{
    let (tx, mut rx) = mpsc::channel::<Box<dyn Envelope<A>>>(MAILBOX_CAPACITY);
    let mut actor = actor_factory();
    let actor_ref = ActorRef::new(tx);

    tokio::spawn(async move {
        while let Some(mut envelope) = rx.recv().await {
            let result = AssertUnwindSafe(envelope.deliver(&mut actor))
                .catch_unwind()
                .await;
            if let Err(why) = result {
                log::error!("actor panicked: {:?}", why);
                match actor.on_panic(why) {
                    SupervisionStrategy::Restart => {
                        actor = actor_factory();
                    }
                    SupervisionStrategy::Resume => {}
                    SupervisionStrategy::Stop => {
                        break;
                    }
                }
            }
        }
    });

    actor_ref
}

/// Run an actor without supervision. A panicking handler kills the actor.
pub fn run_unsupervised<A: Actor>(mut actor: A) -> ActorRef<A> {
    let (tx, mut rx) = mpsc::channel::<Box<dyn Envelope<A>>>(MAILBOX_CAPACITY);
    let actor_ref = ActorRef::new(tx);

    tokio::spawn(async move {
        while let Some(mut envelope) = rx.recv().await {
            envelope.deliver(&mut actor).await;
        }
    });

    actor_ref
}
