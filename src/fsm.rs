/// Minimal finite-state-machine container.
///
/// `S` is the state type (usually an enum). The machine tracks the current
/// state, the previous state, and how many fixed ticks the machine has spent
/// in its current state. Transition logic stays out of the machine itself; it
/// lives in the system that drives it.
///
/// # Usage
/// ```
/// use ledge::fsm::StateMachine;
///
/// #[derive(Clone, Copy, Debug, PartialEq)]
/// enum Door { Open, Shut }
///
/// let mut fsm = StateMachine::new(Door::Shut);
/// fsm.tick();
/// fsm.go(Door::Open);
/// assert!(fsm.just_entered());
/// assert_eq!(fsm.previous, Door::Shut);
/// ```
#[derive(Clone, Debug)]
pub struct StateMachine<S: Clone> {
    pub state: S,
    pub previous: S,
    /// Ticks spent in the current state. Reset to 0 on each transition.
    pub elapsed: u32,
    entered_this_tick: bool,
}

impl<S: Clone> StateMachine<S> {
    /// Create a new machine starting in `initial`.
    /// `just_entered()` returns `true` until the first `tick()`.
    pub fn new(initial: S) -> Self {
        Self {
            previous: initial.clone(),
            state: initial,
            elapsed: 0,
            entered_this_tick: true,
        }
    }

    /// Transition to `next` only if it is a different variant from the
    /// current state (compared by discriminant, no `PartialEq` required).
    /// Returns whether a transition happened.
    pub fn go(&mut self, next: S) -> bool {
        if std::mem::discriminant(&self.state) != std::mem::discriminant(&next) {
            self.force_go(next);
            true
        } else {
            false
        }
    }

    /// Like [`go`](Self::go), but always transitions even if the variant is the same.
    pub fn force_go(&mut self, next: S) {
        self.previous = std::mem::replace(&mut self.state, next);
        self.elapsed = 0;
        self.entered_this_tick = true;
    }

    /// Advance the elapsed-in-state counter and clear the `just_entered` flag.
    /// Call once per tick before processing transitions.
    pub fn tick(&mut self) {
        self.elapsed = self.elapsed.saturating_add(1);
        self.entered_this_tick = false;
    }

    /// Returns `true` only during the tick in which this state was entered.
    pub fn just_entered(&self) -> bool {
        self.entered_this_tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    enum Phase {
        Idle,
        Busy { load: u8 },
    }

    #[test]
    fn go_ignores_same_variant() {
        let mut fsm = StateMachine::new(Phase::Busy { load: 1 });
        fsm.tick();
        fsm.tick();
        assert!(!fsm.go(Phase::Busy { load: 2 }));
        assert_eq!(fsm.state, Phase::Busy { load: 1 });
        assert_eq!(fsm.elapsed, 2);
        assert!(!fsm.just_entered());
    }

    #[test]
    fn go_switches_variant_and_resets_elapsed() {
        let mut fsm = StateMachine::new(Phase::Idle);
        fsm.tick();
        assert!(fsm.go(Phase::Busy { load: 3 }));
        assert_eq!(fsm.previous, Phase::Idle);
        assert_eq!(fsm.elapsed, 0);
        assert!(fsm.just_entered());
        fsm.tick();
        assert!(!fsm.just_entered());
    }

    #[test]
    fn force_go_replaces_payload() {
        let mut fsm = StateMachine::new(Phase::Busy { load: 1 });
        fsm.force_go(Phase::Busy { load: 9 });
        assert_eq!(fsm.state, Phase::Busy { load: 9 });
        assert_eq!(fsm.previous, Phase::Busy { load: 1 });
    }
}
