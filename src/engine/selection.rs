// Which racer identity the player has picked.
//
// Fed by image-marker detection: every tracking-status change for a marker
// selects that marker's identity. The tick reads it through `ActivationSignal`.

use bevy_ecs::prelude::*;

/// Tracking status reported for an image marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetStatus {
    NoPose,
    Limited,
    Tracked,
    ExtendedTracked,
}

impl TargetStatus {
    /// Whether the marker counts as in view.
    pub fn is_detected(self) -> bool {
        matches!(self, TargetStatus::Tracked | TargetStatus::ExtendedTracked)
    }
}

/// A physical marker bound to one racer identity, plus the text shown when it is seen.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub identity: String,
    pub display_text: String,
}

impl Marker {
    pub fn new(identity: impl Into<String>, display_text: impl Into<String>) -> Self {
        Self { identity: identity.into(), display_text: display_text.into() }
    }
}

/// What the HUD should do after a marker status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HudUpdate<'a> {
    pub visible: bool,
    pub text: &'a str,
}

#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct Selection {
    selected: Option<String>,
}

impl Selection {
    pub fn select(&mut self, identity: impl Into<String>) {
        let identity = identity.into();
        log::info!("Selected racer: {identity}");
        self.selected = Some(identity);
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Handle a tracking-status change for `marker`.
    ///
    /// The marker's identity becomes the selection on any status change, even
    /// when tracking is lost; the HUD is shown only while the marker is detected.
    pub fn observe<'m>(&mut self, marker: &'m Marker, status: TargetStatus) -> HudUpdate<'m> {
        self.select(marker.identity.as_str());
        HudUpdate {
            visible: status.is_detected(),
            text: &marker.display_text,
        }
    }
}
