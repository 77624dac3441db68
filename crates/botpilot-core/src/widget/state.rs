//! Widget state definitions.

/// Visible phase of a widget, derived from its [`WidgetState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WidgetPhase {
    /// Enabled, not selected.
    #[default]
    Normal,
    /// Enabled and selected.
    Selected,
    /// Disabled; any stored selection is hidden.
    Disabled,
}

/// Selection and enablement of a widget.
///
/// The stored selection survives disabling: it is masked while disabled and
/// becomes visible again when the widget is re-enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetState {
    selected: bool,
    enabled: bool,
}

impl Default for WidgetState {
    fn default() -> Self {
        Self {
            selected: false,
            enabled: true,
        }
    }
}

impl WidgetState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Effective selection: never true while disabled.
    pub fn is_selected(&self) -> bool {
        self.enabled && self.selected
    }

    /// Selection flag as last set, regardless of enablement.
    pub fn stored_selection(&self) -> bool {
        self.selected
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Update the stored selection. Has no visible effect while disabled.
    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn phase(&self) -> WidgetPhase {
        match (self.enabled, self.selected) {
            (false, _) => WidgetPhase::Disabled,
            (true, true) => WidgetPhase::Selected,
            (true, false) => WidgetPhase::Normal,
        }
    }
}
