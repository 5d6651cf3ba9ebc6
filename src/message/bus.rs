use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use super::{Message, MessageType};

/// Same-thread publish/subscribe channel.
///
/// Messages are queued by [`MessageBus::send`] and fanned out by
/// [`MessageBus::pump`], which the game loop routes to subscribers by name.
#[derive(Debug, Default)]
pub struct MessageBus {
    subscribers: HashMap<MessageType, Vec<String>>,
    queue: VecDeque<Rc<Message>>,
}

impl MessageBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_subscriber(&mut self, name: &str, types: &[MessageType]) {
        for message_type in types {
            let names = self.subscribers.entry(*message_type).or_default();
            if names.iter().any(|n| n == name) {
                log::warn!("{} already subscribed to {:?}", name, message_type);
                continue;
            }
            names.push(name.to_string());
        }
    }

    pub fn remove_subscriber(&mut self, name: &str, types: &[MessageType]) {
        for message_type in types {
            if let Some(names) = self.subscribers.get_mut(message_type) {
                names.retain(|n| n != name);
            }
        }
    }

    pub fn is_subscribed(&self, name: &str, message_type: MessageType) -> bool {
        self.subscribers
            .get(&message_type)
            .map(|names| names.iter().any(|n| n == name))
            .unwrap_or(false)
    }

    pub fn send(&mut self, message: Message) {
        self.queue.push_back(Rc::new(message));
    }

    pub fn has_pending(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Take every queued message and pair it with its current subscribers.
    /// Deliveries come out in send order.
    pub fn pump(&mut self) -> Vec<(String, Rc<Message>)> {
        let mut deliveries = Vec::new();
        while let Some(message) = self.queue.pop_front() {
            if let Some(names) = self.subscribers.get(&message.message_type()) {
                for name in names {
                    deliveries.push((name.clone(), message.clone()));
                }
            }
        }
        deliveries
    }
}
