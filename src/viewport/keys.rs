//! Directional keyboard navigation.

use super::Viewport;
use crate::model::Point;
use serde::{Deserialize, Serialize};

/// Pixels scrolled per arrow key press.
pub const SCROLL_INCREMENT: f64 = 40.0;

/// Fraction of the window height scrolled by page up/down outside paged modes.
pub const MIN_FRACTION_TO_STEP_WHEN_PAGING: f64 = 0.875;

/// Keys the viewport reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    /// Space bar.
    Space,
    /// Page Up.
    PageUp,
    /// Page Down.
    PageDown,
    /// Left arrow.
    ArrowLeft,
    /// Right arrow.
    ArrowRight,
    /// Up arrow.
    ArrowUp,
    /// Down arrow.
    ArrowDown,
    /// Anything else.
    #[serde(other)]
    Other,
}

/// A key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyEvent {
    /// The key.
    pub key: Key,
    /// Shift held.
    #[serde(default)]
    pub shift: bool,
    /// Ctrl, Alt or Meta held.
    #[serde(default)]
    pub modifiers: bool,
    /// The key came from the renderer or a scripting client rather than the host,
    /// so the viewport must perform the scroll itself.
    #[serde(default = "default_cross_frame")]
    pub cross_frame: bool,
}

fn default_cross_frame() -> bool {
    true
}

impl KeyEvent {
    /// A plain, cross-frame press of `key`.
    pub fn new(key: Key) -> Self {
        Self {
            key,
            shift: false,
            modifiers: false,
            cross_frame: true,
        }
    }

    fn has_modifiers(&self) -> bool {
        self.shift || self.modifiers
    }
}

impl Viewport {
    /// Handle a directional key. Returns whether the key was consumed.
    ///
    /// Space is ignored while a form field has focus; arrows are ignored then or with
    /// modifiers held.
    pub fn handle_directional_key_event(
        &mut self,
        event: &KeyEvent,
        form_field_focused: bool,
    ) -> bool {
        match event.key {
            Key::Space => {
                self.page_up_down_space(event, form_field_focused);
                true
            }
            Key::PageUp | Key::PageDown => {
                if event.has_modifiers() {
                    return false;
                }
                self.page_up_down_space(event, form_field_focused);
                true
            }
            Key::ArrowLeft | Key::ArrowRight => {
                self.arrow_left_right(event, form_field_focused);
                true
            }
            Key::ArrowUp | Key::ArrowDown => {
                self.arrow_up_down(event, form_field_focused);
                true
            }
            Key::Other => false,
        }
    }

    fn page_up_down_space(&mut self, event: &KeyEvent, form_field_focused: bool) {
        // The user may be typing a space into the field.
        if form_field_focused && event.key == Key::Space {
            return;
        }

        let is_down = event.key == Key::PageDown || (event.key == Key::Space && !event.shift);
        if self.fitting_type.is_paged() {
            if is_down {
                self.go_to_next_page();
            } else {
                self.go_to_previous_page();
            }
        } else if event.cross_frame {
            let direction = if is_down { 1.0 } else { -1.0 };
            let offset = direction * self.window.height * MIN_FRACTION_TO_STEP_WHEN_PAGING;
            let position = self.position();
            self.set_position(Point::new(position.x, position.y + offset));
        }
    }

    fn arrow_left_right(&mut self, event: &KeyEvent, form_field_focused: bool) {
        if form_field_focused || event.has_modifiers() {
            return;
        }

        let is_right = event.key == Key::ArrowRight;
        if !self.document_has_scrollbars().horizontal {
            if is_right {
                self.go_to_next_page();
            } else {
                self.go_to_previous_page();
            }
        } else if event.cross_frame {
            let direction = if is_right { 1.0 } else { -1.0 };
            let position = self.position();
            self.set_position(Point::new(
                position.x + direction * SCROLL_INCREMENT,
                position.y,
            ));
        }
    }

    fn arrow_up_down(&mut self, event: &KeyEvent, form_field_focused: bool) {
        if form_field_focused || event.has_modifiers() {
            return;
        }

        let is_down = event.key == Key::ArrowDown;
        if self.presentation_mode {
            if is_down {
                self.go_to_next_page();
            } else {
                self.go_to_previous_page();
            }
        } else if event.cross_frame {
            let direction = if is_down { 1.0 } else { -1.0 };
            let position = self.position();
            self.set_position(Point::new(
                position.x,
                position.y + direction * SCROLL_INCREMENT,
            ));
        }
    }
}
