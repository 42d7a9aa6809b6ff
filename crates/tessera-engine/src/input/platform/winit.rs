use winit::event::{DeviceEvent, ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::input::{InputEvent, Key, KeyState};

/// Translates a winit `WindowEvent` into an engine `InputEvent`.
///
/// Returns `None` for events not represented by the input subsystem.
pub(crate) fn translate_window_event(event: &WindowEvent) -> Option<InputEvent> {
    match event {
        WindowEvent::Focused(f) => Some(InputEvent::Focused(*f)),

        WindowEvent::KeyboardInput { event, .. } => {
            let state = match event.state {
                ElementState::Pressed => KeyState::Pressed,
                ElementState::Released => KeyState::Released,
            };
            Some(InputEvent::Key {
                key: map_key(event.physical_key),
                state,
            })
        }

        _ => None,
    }
}

/// Translates a winit `DeviceEvent`; only raw mouse motion is of interest.
pub(crate) fn translate_device_event(event: &DeviceEvent) -> Option<InputEvent> {
    match event {
        DeviceEvent::MouseMotion { delta: (dx, dy) } => Some(InputEvent::MouseMotion {
            dx: *dx as f32,
            dy: *dy as f32,
        }),
        _ => None,
    }
}

/// Same-named pairs between winit's `KeyCode` and [`Key`].
macro_rules! direct_keys {
    ($code:expr; $($name:ident)*; $($letter:ident)*; $($fkey:ident)*) => {
        match $code {
            $(KeyCode::$name => Some(Key::$name),)*
            $(KeyCode::$letter => Some(letter_key(stringify!($letter))),)*
            $(KeyCode::$fkey => Some(Key::$fkey),)*
            _ => None,
        }
    };
}

fn map_key(pk: PhysicalKey) -> Key {
    let PhysicalKey::Code(code) = pk else {
        // winit 0.30 uses NativeKeyCode; no stable numeric is guaranteed here.
        return Key::Unknown(0);
    };

    match code {
        KeyCode::ShiftLeft | KeyCode::ShiftRight => Key::Shift,
        KeyCode::ControlLeft | KeyCode::ControlRight => Key::Control,
        KeyCode::AltLeft | KeyCode::AltRight => Key::Alt,
        KeyCode::SuperLeft | KeyCode::SuperRight => Key::Meta,
        other => direct_keys!(other;
            Escape Enter Tab Backspace Space ArrowUp ArrowDown ArrowLeft ArrowRight
            Digit0 Digit1 Digit2 Digit3 Digit4 Digit5 Digit6 Digit7 Digit8 Digit9;
            KeyA KeyB KeyC KeyD KeyE KeyF KeyG KeyH KeyI KeyJ KeyK KeyL KeyM
            KeyN KeyO KeyP KeyQ KeyR KeyS KeyT KeyU KeyV KeyW KeyX KeyY KeyZ;
            F1 F2 F3 F4 F5 F6 F7 F8 F9 F10 F11 F12)
        .unwrap_or(Key::Unknown(other as u32)),
    }
}

/// `"KeyW"` -> `Key::W`.
fn letter_key(code_name: &str) -> Key {
    const LETTERS: [Key; 26] = [
        Key::A, Key::B, Key::C, Key::D, Key::E, Key::F, Key::G, Key::H, Key::I,
        Key::J, Key::K, Key::L, Key::M, Key::N, Key::O, Key::P, Key::Q, Key::R,
        Key::S, Key::T, Key::U, Key::V, Key::W, Key::X, Key::Y, Key::Z,
    ];
    match code_name.as_bytes().last() {
        Some(c @ b'A'..=b'Z') => LETTERS[(c - b'A') as usize],
        _ => Key::Unknown(0),
    }
}
