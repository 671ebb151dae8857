mod panel;

pub use panel::{PanelKind, PanelView, Side, SlidePanel};
