//! Maps keyboard and mouse input to commands for the application.

use winit::event::{VirtualKeyCode, MouseButton, ModifiersState};
use super::{
    action::Action,
    tile::TileColor,
};

/// Something the user asked the application to do
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Edits the selected tiles
    Apply(Action),
    /// Moves the view by whole columns and whole hex heights
    Pan {
        columns: i32,
        hex_rows: i32,
    },
    ZoomIn,
    ZoomOut,
    ZoomReset,
    /// Turns flood selection on or off
    SetFlood(bool),
    ToggleSticky,
    ToggleArrow,
    /// Turns the sticky arrow by a number of 60 degree steps
    RotateSticky(i32),
    ToggleFullscreen,
    Quit,
}

/// Finds the command for a key, returns None if the key does nothing
///
/// # Parameters
///
/// key: The key which changed state
///
/// pressed: True if the key went down, false if it was released
///
/// modifiers: The modifier keys held at the time
pub fn key_command(key: VirtualKeyCode, pressed: bool, modifiers: ModifiersState) -> Option<Command> {
    // Flood selection lasts while space is held
    if key == VirtualKeyCode::Space {
        return Some(Command::SetFlood(pressed));
    }
    if !pressed {
        return None;
    }

    let shift = modifiers.shift();
    let random = modifiers.ctrl() || modifiers.alt();

    let command = match key {
        VirtualKeyCode::Left => Command::Pan { columns: -1, hex_rows: 0 },
        VirtualKeyCode::Right => Command::Pan { columns: 1, hex_rows: 0 },
        VirtualKeyCode::Up => Command::Pan { columns: 0, hex_rows: -1 },
        VirtualKeyCode::Down => Command::Pan { columns: 0, hex_rows: 1 },

        VirtualKeyCode::Plus | VirtualKeyCode::Equals | VirtualKeyCode::NumpadAdd => Command::ZoomIn,
        VirtualKeyCode::Minus | VirtualKeyCode::NumpadSubtract => Command::ZoomOut,
        VirtualKeyCode::Key0 | VirtualKeyCode::Numpad0 => Command::ZoomReset,

        VirtualKeyCode::W => Command::Apply(Action::SetColor(TileColor::White)),
        VirtualKeyCode::B => Command::Apply(Action::SetColor(TileColor::Black)),
        VirtualKeyCode::G => Command::Apply(Action::SetColor(TileColor::Gray)),
        VirtualKeyCode::R => Command::Apply(match (random, shift) {
            (true, _) => Action::RandomColor,
            (false, true) => Action::ColorDown,
            (false, false) => Action::ColorUp,
        }),
        VirtualKeyCode::O => Command::Apply(match (random, shift) {
            (true, true) => Action::RandomOrientation,
            (true, false) => Action::RandomNonBlankOrientation,
            (false, true) => Action::OrientationDown,
            (false, false) => Action::OrientationUp,
        }),
        VirtualKeyCode::I => Command::Apply(Action::Invert),
        VirtualKeyCode::C if shift => Command::Apply(Action::Disable),

        VirtualKeyCode::S => Command::ToggleSticky,
        VirtualKeyCode::A => Command::ToggleArrow,
        VirtualKeyCode::LBracket => Command::RotateSticky(-1),
        VirtualKeyCode::RBracket => Command::RotateSticky(1),
        VirtualKeyCode::F => Command::ToggleFullscreen,
        VirtualKeyCode::Escape => Command::Quit,

        _ => return None,
    };

    Some(command)
}

/// Finds the command for a pressed mouse button
///
/// # Parameters
///
/// button: The button which was pressed
///
/// modifiers: The modifier keys held at the time
pub fn mouse_command(button: MouseButton, modifiers: ModifiersState) -> Option<Command> {
    match button {
        MouseButton::Left if modifiers.shift() => Some(Command::Apply(Action::ColorDown)),
        MouseButton::Left => Some(Command::Apply(Action::ColorUp)),
        MouseButton::Right => Some(Command::Apply(Action::Disable)),
        MouseButton::Middle => Some(Command::Apply(Action::RemoveOrientation)),
        MouseButton::Other(_) => None,
    }
}

/// Finds the command for a scroll of the mouse wheel, positive is away from the user
///
/// # Parameters
///
/// delta: The vertical scroll in lines
///
/// modifiers: The modifier keys held at the time
pub fn wheel_command(delta: f32, modifiers: ModifiersState) -> Option<Command> {
    if delta == 0.0 {
        return None;
    }

    let up = delta > 0.0;
    let command = match (modifiers.ctrl(), up) {
        (true, true) => Command::ZoomIn,
        (true, false) => Command::ZoomOut,
        (false, true) => Command::Apply(Action::OrientationUp),
        (false, false) => Command::Apply(Action::OrientationDown),
    };

    Some(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn space_holds_flood_selection() {
        let none = ModifiersState::empty();

        assert_eq!(key_command(VirtualKeyCode::Space, true, none), Some(Command::SetFlood(true)));
        assert_eq!(key_command(VirtualKeyCode::Space, false, none), Some(Command::SetFlood(false)));
        assert_eq!(key_command(VirtualKeyCode::R, false, none), None);
    }

    #[test]
    fn modifiers_pick_the_color_edit() {
        assert_eq!(key_command(VirtualKeyCode::R, true, ModifiersState::empty()), Some(Command::Apply(Action::ColorUp)));
        assert_eq!(key_command(VirtualKeyCode::R, true, ModifiersState::SHIFT), Some(Command::Apply(Action::ColorDown)));
        assert_eq!(key_command(VirtualKeyCode::R, true, ModifiersState::CTRL), Some(Command::Apply(Action::RandomColor)));
        assert_eq!(key_command(VirtualKeyCode::O, true, ModifiersState::ALT), Some(Command::Apply(Action::RandomNonBlankOrientation)));
        assert_eq!(
            key_command(VirtualKeyCode::O, true, ModifiersState::ALT | ModifiersState::SHIFT),
            Some(Command::Apply(Action::RandomOrientation)),
        );
    }

    #[test]
    fn arrows_pan_and_unknown_keys_do_nothing() {
        let none = ModifiersState::empty();

        assert_eq!(key_command(VirtualKeyCode::Up, true, none), Some(Command::Pan { columns: 0, hex_rows: -1 }));
        assert_eq!(key_command(VirtualKeyCode::Left, true, none), Some(Command::Pan { columns: -1, hex_rows: 0 }));
        assert_eq!(key_command(VirtualKeyCode::Q, true, none), None);
    }

    #[test]
    fn disabling_needs_shift() {
        assert_eq!(key_command(VirtualKeyCode::C, true, ModifiersState::empty()), None);
        assert_eq!(key_command(VirtualKeyCode::C, true, ModifiersState::SHIFT), Some(Command::Apply(Action::Disable)));
    }

    #[test]
    fn mouse_and_wheel() {
        let none = ModifiersState::empty();

        assert_eq!(mouse_command(MouseButton::Left, ModifiersState::SHIFT), Some(Command::Apply(Action::ColorDown)));
        assert_eq!(mouse_command(MouseButton::Middle, none), Some(Command::Apply(Action::RemoveOrientation)));
        assert_eq!(mouse_command(MouseButton::Other(7), none), None);
        assert_eq!(wheel_command(1.0, ModifiersState::CTRL), Some(Command::ZoomIn));
        assert_eq!(wheel_command(-2.0, none), Some(Command::Apply(Action::OrientationDown)));
        assert_eq!(wheel_command(0.0, none), None);
    }
}
