use tokio::sync::{mpsc, oneshot};

use crate::{
    actor::{Actor, ActorError},
    message::{Envelope, Handler, Message, MessageEnvelope},
};

pub struct ActorRef<A: Actor> {
    sender: mpsc::Sender<Box<dyn Envelope<A>>>,
}

impl<A: Actor> Clone for ActorRef<A> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<A: Actor> ActorRef<A> {
    pub(crate) fn new(sender: mpsc::Sender<Box<dyn Envelope<A>>>) -> Self {
        Self { sender }
    }

    /// Fire-and-forget delivery.
    pub async fn tell<M>(&self, message: M) -> Result<(), ActorError>
    where
        M: Message,
        A: Handler<M>,
    {
        self.sender
            .send(Box::new(MessageEnvelope::new(message, None)))
            .await
            .map_err(|_| ActorError::MailboxClosed)
    }

    /// Delivery with an answer.
    pub async fn ask<M>(&self, message: M) -> Result<M::Response, ActorError>
    where
        M: Message,
        A: Handler<M>,
    {
        let (response_tx, response_rx) = oneshot::channel();
        self.sender
            .send(Box::new(MessageEnvelope::new(message, Some(response_tx))))
            .await
            .map_err(|_| ActorError::MailboxClosed)?;
        response_rx.await.map_err(|_| ActorError::ResponseDropped)
    }
}
