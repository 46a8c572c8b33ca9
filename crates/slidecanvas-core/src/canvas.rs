//! The slide canvas: routes pointer and key input to the geometry sessions and
//! commits their results to the document store.
//!
//! Every gesture follows the same two phases. While the pointer moves, the
//! active session proposes geometry which is reported as [`Feedback`] (previews
//! plus guides) without touching the store. On release the session is torn
//! down and its result is written with a single `update_element` or
//! `batch_update` call.

use crate::camera::{PinchGesture, Stage};
use crate::config::EngineConfig;
use crate::document::{DocumentStore, SlideDocument};
use crate::drag::{DragSession, GroupDragSession, SelectionRect};
use crate::element::{Bounds, Element, ElementId, ElementKind, ElementPatch};
use crate::group::GroupTransform;
use crate::handles::{hit_test_handles, CursorKind, Handle, HandleKind, HANDLE_HIT_TOLERANCE};
use crate::input::{ClickTracker, Key, Modifiers, MouseButton, PointerEvent};
use crate::resize::{ResizeEnv, ResizeSession, RotateSession};
use crate::snap::{margin_guides, snap_targets, MarginGuide, SnapContext, SnapGuide};
use crate::text::{ApproxTextMeasurer, TextMeasurer};
use crate::tools::LineTool;
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// What pointer input currently does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CanvasMode {
    /// Select, move, resize and rotate.
    #[default]
    Select,
    /// Two-click line drawing.
    Line,
    /// An image is being edited in place; geometry gestures are ignored.
    ImageEdit(ElementId),
}

/// Result of one input event, for the rendering layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Feedback {
    /// Snap guides matched by the active gesture.
    pub guides: Vec<SnapGuide>,
    /// Slide margin lines, shown while something is moving or resizing.
    pub margin_guides: Vec<MarginGuide>,
    /// Proposed elements. Not yet committed.
    pub previews: Vec<Element>,
    /// Rubber band rectangle in logical coordinates.
    pub selection_rect: Option<Bounds>,
    pub cursor: CursorKind,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum HandleHit {
    Element(ElementId, HandleKind),
    Group(HandleKind),
}

#[derive(Debug, Clone, Default)]
enum Interaction {
    #[default]
    Idle,
    RubberBand {
        rect: SelectionRect,
        additive: bool,
    },
    Drag(DragSession),
    GroupDrag {
        session: GroupDragSession,
        proposed: Vec<(ElementId, Bounds)>,
    },
    Resize(ResizeSession),
    GroupResize {
        group: GroupTransform,
        handle: HandleKind,
        start: Point,
        proposed: Bounds,
    },
    Rotate(RotateSession),
}

impl Interaction {
    /// Elements that move with the gesture and so must not be snap targets.
    fn moving_ids(&self) -> Vec<ElementId> {
        match self {
            Interaction::Drag(drag) => vec![drag.element_id],
            Interaction::GroupDrag { session, .. } => session.group().member_ids(),
            Interaction::Resize(resize) => vec![resize.element_id()],
            _ => Vec::new(),
        }
    }

    fn shows_margins(&self) -> bool {
        matches!(
            self,
            Interaction::Drag(_)
                | Interaction::GroupDrag { .. }
                | Interaction::Resize(_)
                | Interaction::GroupResize { .. }
        )
    }
}

/// Interactive geometry engine for one slide.
pub struct SlideCanvas<S: DocumentStore = SlideDocument, M: TextMeasurer = ApproxTextMeasurer> {
    store: S,
    measurer: M,
    stage: Stage,
    config: EngineConfig,
    mode: CanvasMode,
    interaction: Interaction,
    /// Snap targets of the active gesture, collected when it starts.
    targets: Vec<Bounds>,
    line_tool: LineTool,
    line_preview: Option<Element>,
    clicks: ClickTracker,
    pinch: Option<PinchGesture>,
    hover: CursorKind,
}

impl SlideCanvas<SlideDocument, ApproxTextMeasurer> {
    /// Canvas over an in-memory slide with the default configuration.
    pub fn with_document(document: SlideDocument, viewport: Size) -> Self {
        Self::new(document, ApproxTextMeasurer, EngineConfig::default(), viewport)
    }
}

impl<S: DocumentStore, M: TextMeasurer> SlideCanvas<S, M> {
    pub fn new(store: S, measurer: M, config: EngineConfig, viewport: Size) -> Self {
        Self {
            store,
            measurer,
            stage: Stage::new(viewport, &config),
            line_tool: LineTool::new(config.line_min_extent),
            config,
            mode: CanvasMode::Select,
            interaction: Interaction::Idle,
            targets: Vec::new(),
            line_preview: None,
            clicks: ClickTracker::new(),
            pinch: None,
            hover: CursorKind::Default,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// Direct stage access, e.g. for panning.
    pub fn stage_mut(&mut self) -> &mut Stage {
        &mut self.stage
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn mode(&self) -> CanvasMode {
        self.mode
    }

    /// Whether a gesture is in progress.
    pub fn is_interacting(&self) -> bool {
        !matches!(self.interaction, Interaction::Idle)
    }

    /// Switch modes. Any gesture or unfinished line is dropped without a commit.
    pub fn set_mode(&mut self, mode: CanvasMode) -> Feedback {
        self.line_tool.cancel();
        self.line_preview = None;
        self.interaction = Interaction::Idle;
        match mode {
            CanvasMode::ImageEdit(id) => {
                self.enter_image_edit(id);
            }
            other => {
                log::debug!("Mode: {:?}", other);
                self.mode = other;
            }
        }
        self.feedback()
    }

    /// Enter in-place editing of an image. Returns false for other kinds.
    pub fn enter_image_edit(&mut self, id: ElementId) -> bool {
        match self.store.element(id) {
            Some(element) if element.kind() == ElementKind::Image => {
                log::debug!("Image edit on {}", id);
                self.interaction = Interaction::Idle;
                self.mode = CanvasMode::ImageEdit(id);
                true
            }
            _ => {
                log::debug!("Element {} is not an image, edit mode not entered", id);
                false
            }
        }
    }

    /// Dispatch a pointer event.
    pub fn handle_pointer_event(&mut self, event: &PointerEvent, now: Instant) -> Feedback {
        match *event {
            PointerEvent::Down {
                position,
                button,
                modifiers,
            } => self.pointer_down(position, button, modifiers, now),
            PointerEvent::Move {
                position,
                modifiers,
            } => self.pointer_move(position, modifiers, now),
            PointerEvent::Up {
                position,
                button,
                modifiers,
            } => self.pointer_up(position, button, modifiers, now),
        }
    }

    pub fn pointer_down(
        &mut self,
        screen: Point,
        button: MouseButton,
        modifiers: Modifiers,
        now: Instant,
    ) -> Feedback {
        if button != MouseButton::Left {
            return self.feedback();
        }
        let point = self.stage.screen_to_logical(screen);
        match self.mode {
            CanvasMode::Select => self.select_down(point, modifiers, now),
            CanvasMode::Line => self.line_click(point, modifiers),
            CanvasMode::ImageEdit(_) => {}
        }
        self.feedback()
    }

    pub fn pointer_move(&mut self, screen: Point, modifiers: Modifiers, now: Instant) -> Feedback {
        let point = self.stage.screen_to_logical(screen);
        match self.mode {
            CanvasMode::Select => {
                if self.is_interacting() {
                    self.update_interaction(point, modifiers, now);
                } else {
                    self.hover = self.hover_cursor(point, modifiers);
                }
            }
            CanvasMode::Line => {
                self.line_preview = self.line_tool.update(point, modifiers.shift);
            }
            CanvasMode::ImageEdit(_) => {}
        }
        self.feedback()
    }

    pub fn pointer_up(
        &mut self,
        screen: Point,
        button: MouseButton,
        modifiers: Modifiers,
        now: Instant,
    ) -> Feedback {
        if button != MouseButton::Left || self.mode != CanvasMode::Select {
            return self.feedback();
        }
        let point = self.stage.screen_to_logical(screen);
        self.update_interaction(point, modifiers, now);

        let targets = std::mem::take(&mut self.targets);
        match std::mem::take(&mut self.interaction) {
            Interaction::Idle => {}
            Interaction::RubberBand { rect, additive } => {
                let mut ids = if additive {
                    self.store.selection().to_vec()
                } else {
                    Vec::new()
                };
                for id in rect.select(self.store.elements()) {
                    if !ids.contains(&id) {
                        ids.push(id);
                    }
                }
                log::debug!("Rubber band selected {} elements", ids.len());
                self.store.set_selection(ids);
            }
            Interaction::Drag(drag) => {
                let id = drag.element_id;
                self.commit(id, drag.finish());
            }
            Interaction::GroupDrag { session, .. } => {
                self.commit_batch(session.finish());
            }
            Interaction::Resize(resize) => {
                let id = resize.element_id();
                let env = ResizeEnv {
                    siblings: &targets,
                    snap: self.snap_context(),
                    measurer: &self.measurer,
                };
                let patch = resize.finish(&env);
                self.commit(id, patch);
            }
            Interaction::GroupResize {
                group, proposed, ..
            } => {
                self.commit_batch(group.resize_patches(&proposed));
            }
            Interaction::Rotate(rotate) => {
                let id = rotate.element_id;
                self.commit(id, rotate.finish());
            }
        }
        self.hover = self.hover_cursor(point, modifiers);
        self.feedback()
    }

    /// Start a resize on `handle` of element `id`, for hosts that hit-test
    /// handles themselves.
    pub fn begin_resize(&mut self, id: ElementId, handle: HandleKind, screen: Point) -> Feedback {
        let point = self.stage.screen_to_logical(screen);
        if self.mode == CanvasMode::Select {
            if handle == HandleKind::Rotate {
                self.start_rotate(id);
            } else {
                self.start_resize(id, handle, point);
            }
        }
        self.feedback()
    }

    /// Start a resize of the whole multi-selection.
    pub fn begin_group_resize(&mut self, handle: HandleKind, screen: Point) -> Feedback {
        let point = self.stage.screen_to_logical(screen);
        if self.mode == CanvasMode::Select {
            self.start_group_resize(handle, point);
        }
        self.feedback()
    }

    pub fn begin_rotate(&mut self, id: ElementId) -> Feedback {
        if self.mode == CanvasMode::Select {
            self.start_rotate(id);
        }
        self.feedback()
    }

    /// Escape leaves line and image-edit modes without committing.
    pub fn key_down(&mut self, key: &Key) -> Feedback {
        if *key == Key::Escape {
            match self.mode {
                CanvasMode::Line => {
                    self.line_tool.cancel();
                    self.line_preview = None;
                    self.mode = CanvasMode::Select;
                }
                CanvasMode::ImageEdit(id) => {
                    log::debug!("Image edit on {} ended", id);
                    self.mode = CanvasMode::Select;
                }
                CanvasMode::Select => {}
            }
        }
        self.feedback()
    }

    pub fn zoom_in(&mut self) -> Feedback {
        self.stage.zoom_in();
        self.feedback()
    }

    pub fn zoom_out(&mut self) -> Feedback {
        self.stage.zoom_out();
        self.feedback()
    }

    pub fn set_zoom(&mut self, scale: f64) -> Feedback {
        self.stage.set_scale(scale);
        self.feedback()
    }

    /// Scale the slide to fit the viewport, leaving `padding` pixels around it.
    pub fn zoom_to_fit(&mut self, padding: f64) -> Feedback {
        self.stage.fit_to_viewport(padding);
        self.feedback()
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.stage.set_viewport(viewport);
    }

    /// Two touch points went down.
    pub fn pinch_start(&mut self, a: Point, b: Point) {
        self.pinch = Some(PinchGesture::start(a, b));
    }

    /// Two touch points moved. Zooms by the change in their distance.
    pub fn pinch_update(&mut self, a: Point, b: Point) -> Feedback {
        if let Some(pinch) = &mut self.pinch {
            let factor = pinch.update(a, b);
            self.stage.zoom_by(factor);
        }
        self.feedback()
    }

    pub fn pinch_end(&mut self) {
        self.pinch = None;
    }

    /// Current guides, previews and cursor.
    pub fn feedback(&self) -> Feedback {
        let mut feedback = Feedback {
            cursor: self.hover,
            ..Default::default()
        };
        match &self.interaction {
            Interaction::Idle => {
                feedback.previews.extend(self.line_preview.iter().cloned());
            }
            Interaction::RubberBand { rect, .. } => {
                feedback.selection_rect = Some(rect.to_bounds());
                feedback.cursor = CursorKind::Default;
            }
            Interaction::Drag(drag) => {
                let current = drag.current();
                feedback.guides = drag.guides().to_vec();
                feedback.previews.extend(
                    self.preview(drag.element_id, &ElementPatch::position(current.x, current.y)),
                );
                feedback.cursor = if drag.is_duplicate {
                    CursorKind::Copy
                } else {
                    CursorKind::Move
                };
            }
            Interaction::GroupDrag { session, proposed } => {
                feedback.guides = session.guides().to_vec();
                feedback.previews = proposed
                    .iter()
                    .filter_map(|(id, b)| self.preview(*id, &ElementPatch::position(b.x, b.y)))
                    .collect();
                feedback.cursor = CursorKind::Move;
            }
            Interaction::Resize(resize) => {
                let frame = resize.frame();
                let mut patch = ElementPatch::from_bounds(&frame.bounds);
                patch.content = frame.content.clone();
                feedback.guides = frame.guides.clone();
                feedback.previews.extend(self.preview(resize.element_id(), &patch));
                feedback.cursor = resize.handle().cursor();
            }
            Interaction::GroupResize {
                group,
                handle,
                proposed,
                ..
            } => {
                feedback.previews = group
                    .resize_patches(proposed)
                    .iter()
                    .filter_map(|(id, patch)| self.preview(*id, patch))
                    .collect();
                feedback.cursor = handle.cursor();
            }
            Interaction::Rotate(rotate) => {
                let patch = ElementPatch {
                    rotation: Some(rotate.angle()),
                    ..Default::default()
                };
                feedback.previews.extend(self.preview(rotate.element_id, &patch));
                feedback.cursor = CursorKind::Grab;
            }
        }
        if self.interaction.shows_margins() {
            feedback.margin_guides = margin_guides(&self.snap_context());
        }
        if self.mode == CanvasMode::Line {
            feedback.cursor = CursorKind::Crosshair;
        }
        feedback
    }

    fn select_down(&mut self, point: Point, modifiers: Modifiers, now: Instant) {
        let double_click = self.clicks.press(point, now);
        self.hover = CursorKind::Default;

        if let Some(hit) = self.handle_at(point) {
            match hit {
                HandleHit::Element(id, HandleKind::Rotate) => self.start_rotate(id),
                HandleHit::Element(id, handle) => self.start_resize(id, handle, point),
                HandleHit::Group(handle) => self.start_group_resize(handle, point),
            }
            return;
        }

        let hit = self.element_at(point).map(|e| (e.id, e.locked, e.kind()));
        if let Some((id, _, ElementKind::Image)) = hit.filter(|_| double_click) {
            self.enter_image_edit(id);
            return;
        }

        // Inside a multi-selection only the group box is draggable.
        if !modifiers.shift && self.store.selection().len() > 1 {
            if let Some(group) = self
                .selection_group()
                .filter(|group| group.bounds().contains_point(point))
            {
                self.begin(Interaction::GroupDrag {
                    session: GroupDragSession::new(group, point),
                    proposed: Vec::new(),
                });
                return;
            }
        }

        let Some((id, locked, _)) = hit else {
            if !modifiers.shift {
                self.store.set_selection(Vec::new());
            }
            self.begin(Interaction::RubberBand {
                rect: SelectionRect::new(point),
                additive: modifiers.shift,
            });
            return;
        };

        if modifiers.shift {
            let mut ids = self.store.selection().to_vec();
            if let Some(index) = ids.iter().position(|&selected| selected == id) {
                ids.remove(index);
            } else {
                ids.push(id);
            }
            self.store.set_selection(ids);
            return;
        }

        self.store.set_selection(vec![id]);
        if locked {
            log::debug!("Element {} is locked, selected without drag", id);
            return;
        }
        if modifiers.alt {
            self.start_duplicate_drag(id, point);
        } else if let Some(drag) = self
            .store
            .element(id)
            .and_then(|element| DragSession::start(element, point, false))
        {
            self.begin(Interaction::Drag(drag));
        }
    }

    /// Alt-drag: the copy is inserted and selected, and receives the drag.
    /// The original stays where it is.
    fn start_duplicate_drag(&mut self, id: ElementId, point: Point) {
        let Some(copy) = self.store.element(id).map(Element::duplicate) else {
            return;
        };
        let Some(drag) = DragSession::start(&copy, point, true) else {
            return;
        };
        let copy_id = copy.id;
        if let Err(err) = self.store.insert_element(copy) {
            log::warn!("Duplicate of {} rejected: {}", id, err);
            return;
        }
        log::debug!("Duplicated {} as {}", id, copy_id);
        self.store.set_selection(vec![copy_id]);
        self.begin(Interaction::Drag(drag));
    }

    fn line_click(&mut self, point: Point, modifiers: Modifiers) {
        let Some(line) = self.line_tool.click(point, modifiers.shift) else {
            return;
        };
        let id = line.id;
        self.line_preview = None;
        match self.store.insert_element(line) {
            Ok(()) => {
                self.store.set_selection(vec![id]);
                self.mode = CanvasMode::Select;
            }
            Err(err) => log::warn!("Line {} rejected: {}", id, err),
        }
    }

    fn start_resize(&mut self, id: ElementId, handle: HandleKind, point: Point) {
        let session = self
            .store
            .element(id)
            .and_then(|element| ResizeSession::start(element, handle, point, &self.config));
        match session {
            Some(session) => self.begin(Interaction::Resize(session)),
            None => log::debug!("Resize of {} with {:?} not started", id, handle),
        }
    }

    fn start_group_resize(&mut self, handle: HandleKind, point: Point) {
        if handle == HandleKind::Rotate {
            log::debug!("Groups cannot be rotated");
            return;
        }
        if let Some(group) = self.selection_group() {
            log::debug!("Group resize start with {:?}", handle);
            self.begin(Interaction::GroupResize {
                proposed: group.bounds(),
                group,
                handle,
                start: point,
            });
        }
    }

    fn start_rotate(&mut self, id: ElementId) {
        if let Some(session) = self.store.element(id).and_then(RotateSession::start) {
            log::debug!("Rotate start on {}", id);
            self.begin(Interaction::Rotate(session));
        }
    }

    /// Install a new gesture and collect the rectangles it may snap to.
    fn begin(&mut self, interaction: Interaction) {
        let exclude = interaction.moving_ids();
        self.targets = if exclude.is_empty() {
            Vec::new()
        } else {
            snap_targets(self.store.elements(), &exclude)
        };
        self.interaction = interaction;
    }

    fn update_interaction(&mut self, point: Point, modifiers: Modifiers, now: Instant) {
        let ctx = self.snap_context();
        let siblings = &self.targets;

        match &mut self.interaction {
            Interaction::Idle => {}
            Interaction::RubberBand { rect, .. } => rect.current = point,
            Interaction::Drag(drag) => {
                drag.update(point, siblings, &ctx);
            }
            Interaction::GroupDrag { session, proposed } => {
                *proposed = session.update(point, siblings, &ctx);
            }
            Interaction::Resize(resize) => {
                let env = ResizeEnv {
                    siblings,
                    snap: ctx,
                    measurer: &self.measurer,
                };
                resize.update(point, modifiers, &env, now);
            }
            Interaction::GroupResize {
                group,
                handle,
                start,
                proposed,
            } => {
                *proposed = group.resize_box(*handle, point - *start, modifiers.shift);
            }
            Interaction::Rotate(rotate) => {
                rotate.update(point, modifiers.shift);
            }
        }
    }

    fn commit(&mut self, id: ElementId, patch: ElementPatch) {
        if patch.is_empty() {
            return;
        }
        if let Err(err) = self.store.update_element(id, &patch) {
            log::warn!("Commit for {} rejected: {}", id, err);
        }
    }

    fn commit_batch(&mut self, updates: Vec<(ElementId, ElementPatch)>) {
        if updates.is_empty() {
            return;
        }
        if let Err(err) = self.store.batch_update(&updates) {
            log::warn!("Batch commit of {} elements rejected: {}", updates.len(), err);
        }
    }

    fn snap_context(&self) -> SnapContext {
        SnapContext::new(&self.config, self.stage.scale())
    }

    /// Front-most visible element containing `point`.
    fn element_at(&self, point: Point) -> Option<&Element> {
        self.store
            .elements()
            .rev()
            .find(|e| e.visible && e.bounds().contains_point(point))
    }

    fn selection_group(&self) -> Option<GroupTransform> {
        let selected = self
            .store
            .selection()
            .iter()
            .filter_map(|&id| self.store.element(id));
        GroupTransform::from_elements(selected, |e| self.config.min_size(e.kind()))
    }

    fn handle_at(&self, point: Point) -> Option<HandleHit> {
        let tolerance = self.stage.screen_distance_to_logical(HANDLE_HIT_TOLERANCE);
        match self.store.selection() {
            [] => None,
            [id] => {
                let element = self.store.element(*id)?;
                if element.locked {
                    return None;
                }
                hit_test_handles(element, point, tolerance).map(|kind| HandleHit::Element(*id, kind))
            }
            _ => {
                let bounds = self.selection_group()?.bounds();
                HandleKind::RESIZE
                    .into_iter()
                    .find(|kind| Handle::new(*kind, kind.anchor_on(&bounds)).hit_test(point, tolerance))
                    .map(HandleHit::Group)
            }
        }
    }

    fn hover_cursor(&self, point: Point, modifiers: Modifiers) -> CursorKind {
        if let Some(HandleHit::Element(_, kind) | HandleHit::Group(kind)) = self.handle_at(point) {
            return kind.cursor();
        }
        match self.element_at(point) {
            Some(element) if !element.locked && modifiers.alt => CursorKind::Copy,
            Some(element) if !element.locked => CursorKind::Move,
            _ => CursorKind::Default,
        }
    }

    fn preview(&self, id: ElementId, patch: &ElementPatch) -> Option<Element> {
        let mut element = self.store.element(id)?.clone();
        element.apply_patch(patch);
        Some(element)
    }
}

impl<S: DocumentStore, M: TextMeasurer> std::fmt::Debug for SlideCanvas<S, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlideCanvas")
            .field("stage", &self.stage)
            .field("mode", &self.mode)
            .field("interaction", &self.interaction)
            .finish_non_exhaustive()
    }
}
