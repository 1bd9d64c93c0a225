//! Translation from winit events to the session's own input vocabulary.

use cube_core::{PanDirection, Wall};
use glam::Vec2;
use settings::MouseButtonSetting;
use winit::{
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    keyboard::{Key, NamedKey},
};

/// Something a key press asks the session to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    RotateWall(Wall),
    FlipDirection,
    HalveAngle,
    DoubleAngle,
    TogglePicking,
    StartMixer,
    CancelMixer,
    Pan(PanDirection),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Middle,
    Right,
}

impl From<MouseButtonSetting> for PointerButton {
    fn from(setting: MouseButtonSetting) -> Self {
        match setting {
            MouseButtonSetting::Left => PointerButton::Left,
            MouseButtonSetting::Middle => PointerButton::Middle,
            MouseButtonSetting::Right => PointerButton::Right,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Intent(Intent),
    PointerPressed { button: PointerButton },
    PointerReleased { button: PointerButton },
    /// Cursor position in physical pixels, origin top-left.
    PointerMoved { position: Vec2 },
    Scrolled { lines: f32 },
    Resized { width: u32, height: u32 },
}

pub fn intent_for_key(key: &Key) -> Option<Intent> {
    match key {
        Key::Named(NamedKey::Space) => Some(Intent::FlipDirection),
        Key::Named(NamedKey::Escape) => Some(Intent::CancelMixer),
        Key::Named(NamedKey::ArrowUp) => Some(Intent::Pan(PanDirection::Up)),
        Key::Named(NamedKey::ArrowDown) => Some(Intent::Pan(PanDirection::Down)),
        Key::Named(NamedKey::ArrowLeft) => Some(Intent::Pan(PanDirection::Left)),
        Key::Named(NamedKey::ArrowRight) => Some(Intent::Pan(PanDirection::Right)),
        Key::Character(c) => match c.as_str() {
            "z" | "Z" => Some(Intent::HalveAngle),
            "a" | "A" => Some(Intent::DoubleAngle),
            "p" | "P" => Some(Intent::TogglePicking),
            "m" | "M" => Some(Intent::StartMixer),
            other => {
                let mut chars = other.chars();
                let letter = chars.next()?.to_ascii_uppercase();
                if chars.next().is_some() {
                    return None;
                }
                Wall::ALL
                    .into_iter()
                    .find(|wall| wall.key() == letter)
                    .map(Intent::RotateWall)
            }
        },
        _ => None,
    }
}

fn pointer_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Left),
        MouseButton::Middle => Some(PointerButton::Middle),
        MouseButton::Right => Some(PointerButton::Right),
        _ => None,
    }
}

/// Presses and auto-repeats both count for keys; releases are ignored.
pub fn translate_window_event(event: &WindowEvent) -> Option<InputEvent> {
    match event {
        WindowEvent::KeyboardInput { event, .. } => {
            if event.state != ElementState::Pressed {
                return None;
            }
            intent_for_key(&event.logical_key).map(InputEvent::Intent)
        }
        WindowEvent::MouseInput { state, button, .. } => {
            let button = pointer_button(*button)?;
            Some(match state {
                ElementState::Pressed => InputEvent::PointerPressed { button },
                ElementState::Released => InputEvent::PointerReleased { button },
            })
        }
        WindowEvent::CursorMoved { position, .. } => Some(InputEvent::PointerMoved {
            position: Vec2::new(position.x as f32, position.y as f32),
        }),
        WindowEvent::MouseWheel { delta, .. } => {
            let lines = match delta {
                MouseScrollDelta::LineDelta(_, y) => *y,
                MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 120.0,
            };
            Some(InputEvent::Scrolled { lines })
        }
        WindowEvent::Resized(size) => Some(InputEvent::Resized {
            width: size.width,
            height: size.height,
        }),
        _ => None,
    }
}
