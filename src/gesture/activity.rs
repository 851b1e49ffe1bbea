use statig::{blocking::IntoStateMachineExt as _, prelude::*};

use super::GestureState;

#[derive(Clone, Copy, Debug)]
enum ActivityEvent {
    Peak(i16),
    Reset,
}

#[derive(Clone, Copy, Debug, Default)]
struct ActivityContext {
    state: GestureState,
}

/// Two-state activity machine over the band-passed frame peak. One
/// threshold governs both entering and leaving the active state, so
/// the outcome depends only on the current frame.
struct ActivityHsm {
    threshold: i16,
}

#[state_machine(initial = "State::inactive()")]
impl ActivityHsm {
    #[state]
    fn inactive(&mut self, context: &mut ActivityContext, event: &ActivityEvent) -> Outcome<State> {
        match event {
            ActivityEvent::Peak(max) if *max >= self.threshold => {
                context.state = GestureState::InProgress;
                Transition(State::in_progress())
            }
            _ => {
                context.state = GestureState::Inactive;
                Handled
            }
        }
    }

    #[state]
    fn in_progress(
        &mut self,
        context: &mut ActivityContext,
        event: &ActivityEvent,
    ) -> Outcome<State> {
        match event {
            ActivityEvent::Peak(max) if *max >= self.threshold => {
                context.state = GestureState::InProgress;
                Handled
            }
            _ => {
                context.state = GestureState::Inactive;
                Transition(State::inactive())
            }
        }
    }
}

pub(crate) struct ActivityTracker {
    machine: statig::blocking::StateMachine<ActivityHsm>,
}

impl ActivityTracker {
    pub(crate) fn new(threshold: i16) -> Self {
        Self {
            machine: ActivityHsm { threshold }.state_machine(),
        }
    }

    /// Feed this frame's peak and return the resulting activity state.
    pub(crate) fn on_peak(&mut self, max: i16) -> GestureState {
        let mut context = ActivityContext::default();
        self.machine
            .handle_with_context(&ActivityEvent::Peak(max), &mut context);
        context.state
    }

    /// Force the machine back to inactive, e.g. while re-baselining.
    pub(crate) fn force_inactive(&mut self) {
        let mut context = ActivityContext::default();
        self.machine
            .handle_with_context(&ActivityEvent::Reset, &mut context);
    }
}
