use std::collections::HashSet;

/// Player intents. Raw key codes are mapped onto these by the front end.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Left,
    Right,
    Jump,
    Dash,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Pressed(Action),
    Released(Action),
}

/// Per-session input: the held set plus this tick's edge events.
///
/// Movement is level-triggered (`is_held`), jump and dash are edge-triggered
/// (`just_pressed`). Call [`end_tick`](Self::end_tick) after each world tick.
#[derive(Clone, Debug, Default)]
pub struct InputState {
    held: HashSet<Action>,
    pub events: Vec<InputEvent>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        match event {
            InputEvent::Pressed(action) => {
                self.held.insert(action);
            }
            InputEvent::Released(action) => {
                self.held.remove(&action);
            }
        }
        self.events.push(event);
    }

    pub fn press(&mut self, action: Action) {
        self.push(InputEvent::Pressed(action));
    }

    pub fn release(&mut self, action: Action) {
        self.push(InputEvent::Released(action));
    }

    pub fn is_held(&self, action: Action) -> bool {
        self.held.contains(&action)
    }

    pub fn just_pressed(&self, action: Action) -> bool {
        self.events.contains(&InputEvent::Pressed(action))
    }

    /// Drop edge events; held actions persist.
    pub fn end_tick(&mut self) {
        self.events.clear();
    }
}
