// Tap/click tracking for the jump trigger.
// Abstracts winit events into a queryable per-frame activation flag.

use winit::event::{ElementState, MouseButton, TouchPhase, WindowEvent};

#[derive(Debug, Default)]
pub struct TapInput {
    // Set by a touch start or left click, cleared in end_frame()
    tapped: bool,

    // Last pointer location in physical pixels (mouse cursor or touch)
    pub pointer_position: (f32, f32),
}

impl TapInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a winit WindowEvent into the input state.
    /// Call this once per event before the frame's tick.
    pub fn process_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::MouseInput { state: ElementState::Pressed, button: MouseButton::Left, .. } => {
                self.tapped = true;
            }
            WindowEvent::Touch(touch) => {
                self.pointer_position = (touch.location.x as f32, touch.location.y as f32);
                if touch.phase == TouchPhase::Started {
                    self.tapped = true;
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.pointer_position = (position.x as f32, position.y as f32);
            }
            _ => {}
        }
    }

    /// True if a tap began this frame. Held touches and held buttons don't repeat.
    pub fn activated(&self) -> bool {
        self.tapped
    }

    /// Call once per frame after the tick has consumed input.
    pub fn end_frame(&mut self) {
        self.tapped = false;
    }
}
