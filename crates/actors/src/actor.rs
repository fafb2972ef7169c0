use core::fmt;
use std::any::Any;

#[derive(Debug, Clone)]
pub enum SupervisionStrategy {
    Restart,
    Resume,
    Stop,
}

pub trait Actor: Send + Sync + 'static {
    /// Called when a handler on the actor panics. The return value is the
    /// supervision strategy used to handle the panic.
    #[allow(unused_variables)]
    fn on_panic(&mut self, error: Box<dyn Any + Send>) -> SupervisionStrategy {
        SupervisionStrategy::Restart
    }
}

#[derive(Debug)]
pub enum ActorError {
    /// The actor's mailbox is closed, the actor stopped.
    MailboxClosed,
    /// The actor dropped the reply channel without answering.
    ResponseDropped,
}

impl fmt::Display for ActorError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::MailboxClosed => write!(f, "actor mailbox is closed"),
            Self::ResponseDropped => write!(f, "actor dropped the response"),
        }
    }
}

impl std::error::Error for ActorError {}
