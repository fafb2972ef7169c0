use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::actor::Actor;

pub trait Message: Clone + Send + Sync + 'static {
    type Response: Send + Sync + 'static;
}

#[async_trait]
pub trait Handler<M>: Actor
where
    M: Message,
{
    async fn handle(&mut self, message: M) -> M::Response;
}

/// Type-erased mailbox entry. Delivery runs the matching `Handler` impl and
/// answers through the reply channel when one was attached.
#[async_trait]
pub trait Envelope<A: Actor>: Send + Sync {
    async fn deliver(&mut self, actor: &mut A);
}

pub(crate) struct MessageEnvelope<M: Message> {
    message: M,
    respond_to: Option<oneshot::Sender<M::Response>>,
}

impl<M: Message> MessageEnvelope<M> {
    pub(crate) fn new(
        message: M,
        respond_to: Option<oneshot::Sender<M::Response>>,
    ) -> Self {
        Self {
            message,
            respond_to,
        }
    }
}

#[async_trait]
impl<M, A> Envelope<A> for MessageEnvelope<M>
where
    M: Message,
    A: Handler<M>,
{
    async fn deliver(&mut self, actor: &mut A) {
        let response = actor.handle(self.message.clone()).await;
        if let Some(respond_to) = self.respond_to.take() {
            if respond_to.send(response).is_err() {
                log::debug!("response receiver dropped before the answer");
            }
        }
    }
}
