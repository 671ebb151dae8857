use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

/// Where a panel slides in from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelKind {
    /// Full-height drawer sliding in from one side.
    Drawer(Side),
    /// Sheet sliding up from the bottom edge.
    BottomSheet,
}

impl PanelKind {
    /// CSS transform placing the panel on or off screen.
    pub fn transform(&self, open: bool) -> &'static str {
        match (self, open) {
            (PanelKind::Drawer(_), true) => "translateX(0)",
            (PanelKind::Drawer(Side::Left), false) => "translateX(-100%)",
            (PanelKind::Drawer(Side::Right), false) => "translateX(100%)",
            (PanelKind::BottomSheet, true) => "translateY(0)",
            (PanelKind::BottomSheet, false) => "translateY(100%)",
        }
    }

    pub fn to_str(&self) -> &'static str {
        match self {
            PanelKind::Drawer(_) => "drawer",
            PanelKind::BottomSheet => "bottom-sheet",
        }
    }
}

/// Render description of a panel: backdrop, sliding container, header and scroll region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelView {
    pub kind: &'static str,
    pub open: bool,
    pub backdrop: bool,
    pub transform: &'static str,
    pub title: String,
    pub aria_hidden: bool,
}

/// A dismissible sliding container. Visibility belongs to the parent and is passed
/// in on every render and interaction; the panel only reports close requests.
pub struct SlidePanel {
    kind: PanelKind,
    on_close: Box<dyn FnMut()>,
}

impl SlidePanel {
    pub fn new(kind: PanelKind, on_close: impl FnMut() + 'static) -> Self {
        Self { kind, on_close: Box::new(on_close) }
    }

    #[inline] pub fn kind(&self) -> PanelKind { self.kind }

    pub fn view(&self, is_open: bool, title: &str) -> PanelView {
        PanelView {
            kind: self.kind.to_str(),
            open: is_open,
            backdrop: is_open,
            transform: self.kind.transform(is_open),
            title: title.to_string(),
            aria_hidden: !is_open,
        }
    }

    /// Backdrop clicked. The backdrop only exists while open.
    pub fn backdrop_click(&mut self, is_open: bool) -> bool {
        self.request_close(is_open)
    }

    /// Header close control activated. The control is inert while the panel is off screen.
    pub fn close_click(&mut self, is_open: bool) -> bool {
        self.request_close(is_open)
    }

    fn request_close(&mut self, is_open: bool) -> bool {
        if is_open {
            (self.on_close)();
        }
        is_open
    }
}

impl fmt::Debug for SlidePanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlidePanel").field("kind", &self.kind).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::Cell, rc::Rc};

    fn counted(kind: PanelKind) -> (SlidePanel, Rc<Cell<u32>>) {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        (SlidePanel::new(kind, move || counter.set(counter.get() + 1)), calls)
    }

    #[test]
    fn each_interaction_closes_once() {
        let (mut panel, calls) = counted(PanelKind::Drawer(Side::Left));
        assert!(panel.backdrop_click(true));
        assert_eq!(calls.get(), 1);
        assert!(panel.close_click(true));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn closed_panel_never_calls_back() {
        let (mut panel, calls) = counted(PanelKind::BottomSheet);
        let _ = panel.view(false, "Alerts");
        assert!(!panel.backdrop_click(false));
        assert!(!panel.close_click(false));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn view_slides_in_and_out() {
        let (drawer, _) = counted(PanelKind::Drawer(Side::Right));
        let open = drawer.view(true, "Zones");
        assert_eq!(open.transform, "translateX(0)");
        assert!(open.backdrop && !open.aria_hidden);
        assert_eq!(open.title, "Zones");
        assert_eq!(drawer.view(false, "Zones").transform, "translateX(100%)");

        let (sheet, _) = counted(PanelKind::BottomSheet);
        let closed = sheet.view(false, "Radar");
        assert_eq!(closed.transform, "translateY(100%)");
        assert!(!closed.backdrop && closed.aria_hidden);
        assert_eq!(closed.kind, "bottom-sheet");
    }
}
