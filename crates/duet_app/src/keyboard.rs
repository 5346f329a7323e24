//! Desktop shortcuts.
//!
//! | Keys | Action |
//! |------|--------|
//! | Arrow keys | Steer the male avatar |
//! | `W` `A` `S` `D` | Steer the female avatar |
//! | `R` / `F` | Reset the male / female avatar |
//! | `1`–`4` | Male clip (Idle, Talk, Fall, Dance) |
//! | `Shift` + `1`–`4` | Female clip |
//! | `Esc` | Close the control panel |

use duet_core::{AvatarKind, Clip, Command, Facing};
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

#[derive(Debug, Clone, PartialEq)]
pub enum KeyAction {
    Stage(Command),
    ClosePanel,
}

/// Maps a physical key to its shortcut.
#[must_use]
pub fn map_key(code: KeyCode, shift: bool) -> Option<KeyAction> {
    use AvatarKind::{Female, Male};

    let command = match code {
        KeyCode::ArrowUp => Command::Move(Male, Facing::Up),
        KeyCode::ArrowDown => Command::Move(Male, Facing::Down),
        KeyCode::ArrowLeft => Command::Move(Male, Facing::Left),
        KeyCode::ArrowRight => Command::Move(Male, Facing::Right),

        KeyCode::KeyW => Command::Move(Female, Facing::Up),
        KeyCode::KeyS => Command::Move(Female, Facing::Down),
        KeyCode::KeyA => Command::Move(Female, Facing::Left),
        KeyCode::KeyD => Command::Move(Female, Facing::Right),

        KeyCode::KeyR => Command::Reset(Male),
        KeyCode::KeyF => Command::Reset(Female),

        KeyCode::Digit1 | KeyCode::Digit2 | KeyCode::Digit3 | KeyCode::Digit4 => {
            let clip = match code {
                KeyCode::Digit1 => Clip::Idle,
                KeyCode::Digit2 => Clip::Talk,
                KeyCode::Digit3 => Clip::Fall,
                _ => Clip::Dance,
            };
            let kind = if shift { Female } else { Male };
            Command::SetClip(kind, clip)
        }

        KeyCode::Escape => return Some(KeyAction::ClosePanel),
        _ => return None,
    };
    Some(KeyAction::Stage(command))
}

/// Tracks modifiers and turns key presses into [`KeyAction`]s.
#[derive(Debug, Clone, Default)]
pub struct KeyboardShortcuts {
    shift: bool,
}

impl KeyboardShortcuts {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&mut self, event: &WindowEvent) -> Option<KeyAction> {
        match event {
            WindowEvent::ModifiersChanged(modifiers) => {
                self.shift = modifiers.state().shift_key();
                None
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed || event.repeat {
                    return None;
                }
                let PhysicalKey::Code(code) = event.physical_key else {
                    return None;
                };
                map_key(code, self.shift)
            }
            WindowEvent::Focused(false) => {
                self.shift = false;
                None
            }
            _ => None,
        }
    }
}
