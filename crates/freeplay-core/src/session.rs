//! The interaction state machine driving the canvas.

use crate::camera::{ZOOM_STEP_IN, ZOOM_STEP_OUT};
use crate::handles;
use crate::input::{ClickTracker, Key, Modifiers, MouseButton, PointerEvent};
use crate::scene::{PersistenceError, Scene};
use crate::shapes::{
    FontFamily, FontStyle, Image, ImageDecodeError, Line, Oval, Rect, Rgba, Shape, ShapeId,
};
use crate::text_editor::TextEditor;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Drawing tools selectable from the toolbar.
///
/// `Select` draws nothing; with editing enabled it picks, drags and
/// resizes shapes instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ToolKind {
    #[default]
    Select,
    Pen,
    Line,
    Rect,
    Oval,
    Text,
}

impl ToolKind {
    fn is_drawing(self) -> bool {
        !matches!(self, ToolKind::Select)
    }
}

/// Transient gesture state between pointer-down and pointer-up.
///
/// Exactly one of these is ever active, which makes the
/// one-gesture-at-a-time invariant structural rather than a convention
/// across boolean flags.
#[derive(Debug, Clone, Copy)]
enum Gesture {
    Idle,
    /// Secondary-button pan; `last` is the previous screen position.
    Panning { last: Point },
    /// Rubber-band preview for the line/rect/oval tools, world coords.
    Drawing { start: Point, current: Point },
    /// Incremental pen stroke; every motion commits one segment.
    PenStroke { last: Point },
    /// Moving the selected shape by a fixed grab offset.
    Dragging { id: ShapeId, grab: Vec2 },
    /// Resizing an image from the corner opposite `anchor`.
    Resizing { id: ShapeId, anchor: Point },
}

/// The canvas engine: scene, tool state and gesture handling.
///
/// Collaborators (toolbars, pickers, the autosave timer, the window's
/// event loop) drive this through the setters and the pointer/key entry
/// points; they never touch shape internals directly.
#[derive(Debug)]
pub struct CanvasSession {
    /// The scene being edited.
    pub scene: Scene,
    tool: ToolKind,
    editing_enabled: bool,
    selected: Option<ShapeId>,
    gesture: Gesture,
    editor: Option<TextEditor>,
    clicks: ClickTracker,
}

impl Default for CanvasSession {
    fn default() -> Self {
        Self::new()
    }
}

impl CanvasSession {
    /// Create a session with an empty scene.
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            tool: ToolKind::default(),
            editing_enabled: false,
            selected: None,
            gesture: Gesture::Idle,
            editor: None,
            clicks: ClickTracker::new(),
        }
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    /// Switch the active tool.
    ///
    /// Switching to a drawing tool clears the selection; any in-flight
    /// gesture ends, and a live text edit is discarded. The discarded
    /// buffer (and, for an edit of an existing shape, that shape) is
    /// lost. Known limitation.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.tool = tool;
        self.gesture = Gesture::Idle;
        if self.editor.take().is_some() {
            log::debug!("live text edit discarded on tool change");
        }
        if tool.is_drawing() {
            self.selected = None;
        }
    }

    pub fn editing_enabled(&self) -> bool {
        self.editing_enabled
    }

    /// Gate selection/move/resize. When disabled, pointer-down always
    /// starts a drawing gesture or text entry, never a selection.
    pub fn set_editing_enabled(&mut self, enabled: bool) {
        self.editing_enabled = enabled;
    }

    /// The currently selected shape, if any. At most one shape is
    /// selected at a time.
    pub fn selected(&self) -> Option<ShapeId> {
        self.selected
    }

    /// The live text edit, if one is active.
    pub fn text_editor(&self) -> Option<&TextEditor> {
        self.editor.as_ref()
    }

    pub fn is_editing_text(&self) -> bool {
        self.editor.is_some()
    }

    // Style setters, called by the toolbar/picker collaborators. Changes
    // apply to future commits; a live text edit is restyled immediately.

    pub fn set_pen_color(&mut self, color: Rgba) {
        self.scene.defaults.pen_color = color;
    }

    pub fn set_pen_width(&mut self, width: f64) {
        self.scene.defaults.pen_width = width;
    }

    pub fn set_text_color(&mut self, color: Rgba) {
        self.scene.defaults.text_color = color;
        if let Some(editor) = &mut self.editor {
            editor.set_color(color);
        }
    }

    pub fn set_font_family(&mut self, family: FontFamily) {
        self.scene.defaults.font.family = family;
        self.sync_editor_font();
    }

    pub fn set_font_size(&mut self, size: f64) {
        self.scene.defaults.font.size = size;
        self.sync_editor_font();
    }

    pub fn set_font_style(&mut self, style: FontStyle) {
        self.scene.defaults.font.style = style;
        self.sync_editor_font();
    }

    fn sync_editor_font(&mut self) {
        if let Some(editor) = &mut self.editor {
            editor.set_font(self.scene.defaults.font);
        }
    }

    /// Remove every shape. View and style defaults survive.
    pub fn clear_scene(&mut self) {
        self.scene.clear();
        self.selected = None;
        self.gesture = Gesture::Idle;
    }

    /// Serialize the scene for persistence. Explicit saves and the
    /// periodic autosave both come through here, so the on-disk format
    /// cannot diverge between the two.
    pub fn save(&self) -> Result<Vec<u8>, PersistenceError> {
        self.scene.save()
    }

    /// Replace the scene from persisted bytes.
    ///
    /// On failure the live scene is untouched; on success all transient
    /// state (selection, gesture, text edit) resets.
    pub fn load(&mut self, bytes: &[u8]) -> Result<(), PersistenceError> {
        let scene = Scene::load(bytes)?;
        self.scene = scene;
        self.selected = None;
        self.gesture = Gesture::Idle;
        self.editor = None;
        Ok(())
    }

    /// Insert a dropped raster image at a screen position.
    pub fn drop_image(
        &mut self,
        screen_position: Point,
        data: &[u8],
    ) -> Result<ShapeId, ImageDecodeError> {
        let world = self.scene.camera.screen_to_world(screen_position);
        let image = Image::from_bytes(world, data)?;
        Ok(self.scene.add_shape(Shape::Image(image)))
    }

    /// Text to put on the system clipboard, when a text edit is live.
    /// Matches the editor's copy contract: empty string when nothing is
    /// selected.
    pub fn copy(&self) -> Option<String> {
        self.editor.as_ref().map(|editor| editor.selected_text())
    }

    /// Insert clipboard text into the live text edit, if any.
    pub fn paste(&mut self, text: &str) {
        if let Some(editor) = &mut self.editor {
            editor.paste(text);
        }
    }

    /// Commit the live text buffer into the scene. An empty buffer
    /// commits nothing; either way the editor state is cleared.
    pub fn commit_text(&mut self) {
        if let Some(editor) = self.editor.take() {
            if let Some(text) = editor.commit() {
                self.scene.add_shape(Shape::Text(text));
            }
        }
    }

    /// The in-progress rubber-band shape for renderers.
    pub fn drawing_preview(&self) -> Option<Shape> {
        let Gesture::Drawing { start, current } = self.gesture else {
            return None;
        };
        let d = &self.scene.defaults;
        match self.tool {
            ToolKind::Line => Some(Shape::Line(Line::new(start, current, d.pen_color, d.pen_width))),
            ToolKind::Rect => Some(Shape::Rect(Rect::new(start, current, d.pen_color, d.pen_width))),
            ToolKind::Oval => Some(Shape::Oval(Oval::new(start, current, d.pen_color, d.pen_width))),
            _ => None,
        }
    }

    /// Feed one pointer event into the state machine.
    pub fn handle_pointer(&mut self, event: PointerEvent, modifiers: Modifiers) {
        match event {
            PointerEvent::Down { position, button } => {
                self.pointer_down(position, button, modifiers)
            }
            PointerEvent::Up { position, button } => self.pointer_up(position, button),
            PointerEvent::Move { position } => self.pointer_move(position),
            PointerEvent::Scroll { position, delta } => {
                let factor = if delta > 0.0 { ZOOM_STEP_IN } else { ZOOM_STEP_OUT };
                self.scene.camera.zoom_at(position, factor);
            }
        }
    }

    /// Feed one key event into the state machine.
    pub fn handle_key(&mut self, key: Key, modifiers: Modifiers) {
        if self.editor.is_some() {
            self.editor_key(key, modifiers);
            return;
        }
        if matches!(key, Key::Delete | Key::Backspace)
            && self.editing_enabled
            && matches!(self.gesture, Gesture::Idle)
        {
            if let Some(id) = self.selected.take() {
                self.scene.remove_shape(id);
            }
        }
    }

    fn pointer_down(&mut self, position: Point, button: MouseButton, modifiers: Modifiers) {
        if button == MouseButton::Secondary {
            self.gesture = Gesture::Panning { last: position };
            return;
        }

        let double = self.clicks.register(position);
        let world = self.scene.camera.screen_to_world(position);

        // A live text edit captures clicks inside its box; a click
        // outside commits it, and the press falls through to be
        // re-evaluated as a fresh gesture.
        if let Some(editor) = &mut self.editor {
            if editor.bounds().contains(world) {
                editor.click(world, modifiers.shift);
                return;
            }
            self.commit_text();
        }

        if self.editing_enabled {
            self.pointer_down_editing(world, double, modifiers);
            return;
        }

        match self.tool {
            ToolKind::Text => {
                let d = &self.scene.defaults;
                self.editor = Some(TextEditor::new(world, d.text_color, d.font));
            }
            ToolKind::Pen => {
                self.gesture = Gesture::PenStroke { last: world };
            }
            _ => {
                // Line/Rect/Oval rubber-band; Select draws nothing and
                // its release commits nothing.
                self.gesture = Gesture::Drawing {
                    start: world,
                    current: world,
                };
            }
        }
    }

    /// Primary-down while selection/move/resize is enabled.
    fn pointer_down_editing(&mut self, world: Point, double: bool, modifiers: Modifiers) {
        // Corner handles of the selected image win over shape hits, so a
        // grab landing just outside the bitmap still resizes instead of
        // clearing the selection.
        if let Some(id) = self.selected {
            if let Some(Shape::Image(image)) = self.scene.get_shape(id) {
                if let Some(corner) = handles::hit_test_handles(image.as_rect(), world) {
                    let anchor = corner.opposite().position(image.as_rect());
                    self.gesture = Gesture::Resizing { id, anchor };
                    return;
                }
            }
        }

        match self.scene.shape_at(world) {
            Some(id) => {
                if double && matches!(self.scene.get_shape(id), Some(Shape::Text(_))) {
                    self.edit_text_shape(id, world, modifiers.shift);
                    return;
                }
                let anchor = self
                    .scene
                    .get_shape(id)
                    .map(|shape| shape.anchor())
                    .unwrap_or(world);
                self.selected = Some(id);
                self.gesture = Gesture::Dragging {
                    id,
                    grab: world - anchor,
                };
            }
            None => {
                // Click into empty space: selection cleared, no gesture,
                // so pure drawing is impossible in move mode.
                self.selected = None;
            }
        }
    }

    /// Double-click on a text shape: the shape leaves the scene for the
    /// duration of the edit and is only re-inserted on commit.
    fn edit_text_shape(&mut self, id: ShapeId, world: Point, select: bool) {
        if let Some(Shape::Text(text)) = self.scene.remove_shape(id) {
            let mut editor =
                TextEditor::with_content(text.origin, text.content, text.color, text.font);
            editor.click(world, select);
            self.selected = None;
            self.gesture = Gesture::Idle;
            self.editor = Some(editor);
        }
    }

    fn pointer_move(&mut self, position: Point) {
        match self.gesture {
            Gesture::Panning { last } => {
                self.scene.camera.pan(position - last);
                self.gesture = Gesture::Panning { last: position };
            }
            Gesture::PenStroke { last } => {
                let world = self.scene.camera.screen_to_world(position);
                if world != last {
                    let color = self.scene.defaults.pen_color;
                    let width = self.scene.defaults.pen_width;
                    self.scene
                        .add_shape(Shape::Line(Line::new(last, world, color, width)));
                    self.gesture = Gesture::PenStroke { last: world };
                }
            }
            Gesture::Drawing { start, .. } => {
                let world = self.scene.camera.screen_to_world(position);
                self.gesture = Gesture::Drawing {
                    start,
                    current: world,
                };
            }
            Gesture::Dragging { id, grab } => {
                let world = self.scene.camera.screen_to_world(position);
                if let Some(shape) = self.scene.get_shape_mut(id) {
                    // The fixed grab offset, not frame-to-frame deltas,
                    // keeps the shape from drifting off the pointer.
                    let delta = (world - grab) - shape.anchor();
                    shape.translate(delta);
                }
            }
            Gesture::Resizing { id, anchor } => {
                let world = self.scene.camera.screen_to_world(position);
                if let Some(Shape::Image(image)) = self.scene.get_shape_mut(id) {
                    image.set_rect(handles::resize_from_anchor(anchor, world));
                }
            }
            Gesture::Idle => {}
        }
    }

    fn pointer_up(&mut self, position: Point, button: MouseButton) {
        if button == MouseButton::Secondary {
            if matches!(self.gesture, Gesture::Panning { .. }) {
                self.gesture = Gesture::Idle;
            }
            return;
        }
        match self.gesture {
            Gesture::Drawing { start, .. } => {
                let world = self.scene.camera.screen_to_world(position);
                self.commit_drawn_shape(start, world);
                self.gesture = Gesture::Idle;
            }
            Gesture::PenStroke { .. } | Gesture::Dragging { .. } | Gesture::Resizing { .. } => {
                // Pen already committed incrementally; drag/resize
                // mutated the shape in place.
                self.gesture = Gesture::Idle;
            }
            _ => {}
        }
    }

    /// Commit the rubber-band gesture. A click without drag produces a
    /// zero-size shape, kept as the "dot" affordance.
    fn commit_drawn_shape(&mut self, a: Point, b: Point) {
        let d = self.scene.defaults.clone();
        let shape = match self.tool {
            ToolKind::Line => Some(Shape::Line(Line::new(a, b, d.pen_color, d.pen_width))),
            ToolKind::Rect => Some(Shape::Rect(Rect::new(a, b, d.pen_color, d.pen_width))),
            ToolKind::Oval => Some(Shape::Oval(Oval::new(a, b, d.pen_color, d.pen_width))),
            _ => None,
        };
        if let Some(shape) = shape {
            self.scene.add_shape(shape);
        }
    }

    fn editor_key(&mut self, key: Key, modifiers: Modifiers) {
        if key == Key::Escape {
            self.commit_text();
            return;
        }
        let Some(editor) = self.editor.as_mut() else {
            return;
        };
        let shift = modifiers.shift;
        match key {
            Key::Char(c) => {
                if modifiers.ctrl {
                    // Ctrl+C / Ctrl+V arrive through `copy` / `paste`;
                    // the embedder owns the system clipboard.
                    if c == 'a' || c == 'A' {
                        editor.select_all();
                    }
                } else {
                    editor.insert(c.encode_utf8(&mut [0u8; 4]));
                }
            }
            Key::Enter => editor.insert("\n"),
            Key::Backspace => editor.backspace(),
            Key::Delete => editor.delete_forward(),
            Key::Left => editor.move_left(shift),
            Key::Right => editor.move_right(shift),
            Key::Up => editor.move_up(shift),
            Key::Down => editor.move_down(shift),
            Key::Home => editor.move_line_start(shift),
            Key::End => editor.move_line_end(shift),
            Key::Escape => unreachable!("handled above"),
        }
    }
}
