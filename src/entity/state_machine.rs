use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use super::context::{EntityContext, Request};
use super::event::{BasicEvent, EventHandle};
use super::state::{State, StateType};
use crate::error::{GameError, Result};
use crate::render::RenderTarget;

/// Owns every state of one entity and switches between them.
///
/// Before [`StateMachine::init`] there is no current state: events are
/// queued and delivered, in order, once the start state has been entered.
#[derive(Default)]
pub struct StateMachine {
    states: HashMap<StateType, State>,
    start_state: Option<StateType>,
    current: Option<StateType>,
    init_events: VecDeque<EventHandle>,
    initialized: bool,
}

impl StateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the state for `state_type`. Registering a type twice is an
    /// error and yields `None`.
    pub fn register_state(&mut self, state_type: StateType, start_state: bool) -> Option<&mut State> {
        if self.states.contains_key(&state_type) {
            log::error!("State {:?} is already registered", state_type);
            return None;
        }

        if start_state {
            match self.start_state {
                Some(existing) => {
                    log::error!("Start state is already {:?}, ignoring {:?}", existing, state_type)
                }
                None => self.start_state = Some(state_type),
            }
        }

        Some(self.states.entry(state_type).or_insert_with(|| State::new(state_type)))
    }

    pub fn state(&self, state_type: StateType) -> Option<&State> {
        self.states.get(&state_type)
    }

    pub fn state_mut(&mut self, state_type: StateType) -> Option<&mut State> {
        self.states.get_mut(&state_type)
    }

    pub fn state_types(&self) -> impl Iterator<Item = StateType> + '_ {
        self.states.keys().copied()
    }

    /// Type of the active state, `Uninitialized` before `init`
    pub fn current_state_type(&self) -> StateType {
        self.current.unwrap_or(StateType::Uninitialized)
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    // ========================================================================
    // Initialisation
    // ========================================================================

    /// Queue an event for delivery right after the start state is entered
    pub fn queue_init_events(&mut self, event: impl Into<EventHandle>) {
        if self.initialized {
            log::error!("Init events can only be queued before initialisation");
            return;
        }
        self.init_events.push_back(event.into());
    }

    /// Enter the start state, then deliver the queued init events
    pub fn init(&mut self, ctx: &mut EntityContext<'_>) -> Result<()> {
        if self.initialized {
            log::warn!("entity {}: state machine already initialised", ctx.id);
            return Ok(());
        }
        let Some(start) = self.start_state else {
            log::error!("entity {}: no start state registered", ctx.id);
            return Err(GameError::UnknownState {
                entity: ctx.id,
                state: StateType::Uninitialized,
            });
        };

        // Requests raised by the start state's enter callback run right away
        self.initialized = true;
        let event: EventHandle = Rc::new(BasicEvent::Create);
        if let Err(e) = self.transition(ctx, start, Some(event)) {
            self.initialized = false;
            return Err(e);
        }
        self.handle_queued_init_events(ctx)
    }

    /// Deliver the init queue front to back. Events raised meanwhile go
    /// straight to the active state.
    pub fn handle_queued_init_events(&mut self, ctx: &mut EntityContext<'_>) -> Result<()> {
        if !self.initialized {
            log::error!("entity {}: init events drained before initialisation", ctx.id);
            return Ok(());
        }
        while let Some(event) = self.init_events.pop_front() {
            self.dispatch(ctx, event)?;
        }
        Ok(())
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    pub fn handle_event(&mut self, ctx: &mut EntityContext<'_>, event: EventHandle) -> Result<()> {
        if !self.initialized {
            self.init_events.push_back(event);
            return Ok(());
        }
        self.dispatch(ctx, event)
    }

    /// Exit the current state and enter `next`, all before returning
    pub fn change_state_to(
        &mut self,
        ctx: &mut EntityContext<'_>,
        next: StateType,
        event: Option<EventHandle>,
    ) -> Result<()> {
        self.transition(ctx, next, event)
    }

    pub fn update(&mut self, ctx: &mut EntityContext<'_>, delta: f32) -> Result<()> {
        let Some(current) = self.current else {
            return Ok(());
        };
        let outer = ctx.take_requests();
        if let Some(state) = self.states.get_mut(&current) {
            state.update(ctx, delta);
        }
        let result = self.run_requests(ctx, Some(current));
        ctx.restore_requests(outer);
        result
    }

    pub fn draw_to(&self, target: &mut dyn RenderTarget) {
        if let Some(state) = self.current_state() {
            state.draw_to(target);
        }
    }

    pub fn intersects(&self, other: &StateMachine) -> bool {
        match (self.current_state(), other.current_state()) {
            (Some(mine), Some(theirs)) => mine.intersects(theirs),
            _ => false,
        }
    }

    pub fn current_state(&self) -> Option<&State> {
        self.states.get(&self.current?)
    }

    /// Run the requests queued on `ctx` by code outside the states (message hooks)
    pub(crate) fn process_requests(&mut self, ctx: &mut EntityContext<'_>) -> Result<()> {
        self.run_requests(ctx, self.current)
    }

    /// Run the requests one callback made while `origin` was active, in the
    /// order it made them. Each transition finishes its own requests before
    /// the next one here starts. Once `origin` has been left, whatever it
    /// still had queued is dropped.
    fn run_requests(&mut self, ctx: &mut EntityContext<'_>, origin: Option<StateType>) -> Result<()> {
        while let Some(request) = ctx.next_request() {
            if self.current != origin {
                log::debug!(
                    "entity {}: dropping {:?} raised by {:?}, now in {:?}",
                    ctx.id,
                    request,
                    origin,
                    self.current
                );
                continue;
            }
            match request {
                Request::ChangeState { state, .. } if !self.initialized => {
                    log::error!("entity {}: change to {:?} requested before initialisation", ctx.id, state);
                }
                Request::ChangeState { state, event } => self.transition(ctx, state, event)?,
                Request::Event(event) => self.handle_event(ctx, event)?,
            }
        }
        Ok(())
    }

    fn dispatch(&mut self, ctx: &mut EntityContext<'_>, event: EventHandle) -> Result<()> {
        let Some(current) = self.current else {
            return Ok(());
        };
        let outer = ctx.take_requests();
        if let Some(state) = self.states.get_mut(&current) {
            state.handle_event(ctx, &event);
        }
        let result = self.run_requests(ctx, Some(current));
        ctx.restore_requests(outer);
        result
    }

    /// Exit, enter, then everything the two callbacks asked for
    fn transition(&mut self, ctx: &mut EntityContext<'_>, next: StateType, event: Option<EventHandle>) -> Result<()> {
        if !self.states.contains_key(&next) {
            log::error!("entity {}: cannot change to unregistered state {:?}", ctx.id, next);
            return Err(GameError::UnknownState {
                entity: ctx.id,
                state: next,
            });
        }

        let outer = ctx.take_requests();
        if let Some(previous) = self.current.take() {
            if let Some(state) = self.states.get_mut(&previous) {
                state.exit(ctx);
            }
            log::debug!("entity {}: {:?} -> {:?}", ctx.id, previous, next);
        }

        self.current = Some(next);
        if let Some(state) = self.states.get_mut(&next) {
            state.enter(ctx, event.as_ref());
        }
        let result = self.run_requests(ctx, Some(next));
        ctx.restore_requests(outer);
        result
    }
}
