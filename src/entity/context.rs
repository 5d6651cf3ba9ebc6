use std::collections::VecDeque;

use super::event::EventHandle;
use super::property::PropertyStore;
use super::service::EntityService;
use super::state::StateType;
use super::EntityId;
use crate::game::Body;

/// Work requested by a callback. The state machine runs a callback's
/// requests, each to completion, before going back to the requests of the
/// call that triggered it.
#[derive(Debug, Clone)]
pub enum Request {
    ChangeState {
        state: StateType,
        event: Option<EventHandle>,
    },
    Event(EventHandle),
}

/// Handle on the entity passed into every state, ability and part call
pub struct EntityContext<'a> {
    pub id: EntityId,
    pub body: &'a mut Body,
    pub properties: &'a mut PropertyStore,
    pub service: &'a mut EntityService,
    requests: VecDeque<Request>,
}

impl<'a> EntityContext<'a> {
    pub fn new(
        id: EntityId,
        body: &'a mut Body,
        properties: &'a mut PropertyStore,
        service: &'a mut EntityService,
    ) -> Self {
        Self {
            id,
            body,
            properties,
            service,
            requests: VecDeque::new(),
        }
    }

    /// Switch the entity to `state` (exit current, enter target)
    pub fn change_state_to(&mut self, state: StateType, event: Option<EventHandle>) {
        self.requests.push_back(Request::ChangeState { state, event });
    }

    /// Feed another event to the entity's active state
    pub fn handle_event(&mut self, event: impl Into<EventHandle>) {
        self.requests.push_back(Request::Event(event.into()));
    }

    pub(crate) fn next_request(&mut self) -> Option<Request> {
        self.requests.pop_front()
    }

    /// Set aside the pending requests so a nested callback starts with an empty queue
    pub(crate) fn take_requests(&mut self) -> VecDeque<Request> {
        std::mem::take(&mut self.requests)
    }

    /// Put requests set aside by [`EntityContext::take_requests`] back in front
    pub(crate) fn restore_requests(&mut self, mut outer: VecDeque<Request>) {
        outer.append(&mut self.requests);
        self.requests = outer;
    }

    pub fn has_requests(&self) -> bool {
        !self.requests.is_empty()
    }
}

/// Owned entity pieces for building contexts in tests
#[cfg(test)]
pub struct TestEntity {
    pub id: EntityId,
    pub body: Body,
    pub properties: PropertyStore,
    pub service: EntityService,
}

#[cfg(test)]
impl TestEntity {
    pub fn new() -> Self {
        use crate::animation::AnimationFactory;
        use crate::render::SheetManager;

        Self {
            id: 1,
            body: Body::default(),
            properties: PropertyStore::new(),
            service: EntityService::new(AnimationFactory::new(SheetManager::new(), 0.1), 100.0),
        }
    }

    pub fn context(&mut self) -> EntityContext<'_> {
        EntityContext::new(self.id, &mut self.body, &mut self.properties, &mut self.service)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::event::BasicEvent;

    #[test]
    fn test_requests_are_fifo() {
        let mut entity = TestEntity::new();
        let mut ctx = entity.context();
        ctx.change_state_to(StateType::Move, None);
        ctx.handle_event(BasicEvent::StopMove);

        assert!(matches!(ctx.next_request(), Some(Request::ChangeState { state: StateType::Move, .. })));
        assert!(matches!(ctx.next_request(), Some(Request::Event(e)) if *e == BasicEvent::StopMove));
        assert!(!ctx.has_requests());
    }

    #[test]
    fn test_restored_requests_go_first() {
        let mut entity = TestEntity::new();
        let mut ctx = entity.context();
        ctx.handle_event(BasicEvent::Attack);
        let outer = ctx.take_requests();
        assert!(!ctx.has_requests());

        ctx.handle_event(BasicEvent::StopMove);
        ctx.restore_requests(outer);
        assert!(matches!(ctx.next_request(), Some(Request::Event(e)) if *e == BasicEvent::Attack));
        assert!(matches!(ctx.next_request(), Some(Request::Event(e)) if *e == BasicEvent::StopMove));
    }
}
