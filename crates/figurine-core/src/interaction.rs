//! Prototype interactions between layers and frames.

use crate::ids::{LayerId, next_timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors raised when adding an interaction.
#[derive(Debug, Error, PartialEq)]
pub enum InteractionError {
    #[error("Source layer not found: {0}")]
    SourceNotFound(LayerId),
    #[error("Target layer not found: {0}")]
    TargetNotFound(LayerId),
    #[error("Target must be a frame, got {kind} ({id})")]
    TargetNotFrame { id: LayerId, kind: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Trigger {
    #[default]
    Click,
    Hover,
    Press,
    Key,
}

impl Trigger {
    pub fn label(&self) -> &'static str {
        match self {
            Trigger::Click => "On Click",
            Trigger::Hover => "On Hover",
            Trigger::Press => "On Press",
            Trigger::Key => "On Key Press",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    #[default]
    NavigateTo,
    OpenOverlay,
    CloseOverlay,
    Back,
    OpenLink,
    SwapVisibility,
}

impl Action {
    pub fn label(&self) -> &'static str {
        match self {
            Action::NavigateTo => "Navigate To",
            Action::OpenOverlay => "Open Overlay",
            Action::CloseOverlay => "Close Overlay",
            Action::Back => "Back",
            Action::OpenLink => "Open Link",
            Action::SwapVisibility => "Swap Visibility",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Animation {
    #[default]
    None,
    SlideLeft,
    SlideRight,
    SlideUp,
    SlideDown,
    Fade,
    Push,
}

impl Animation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Animation::None => "none",
            Animation::SlideLeft => "slide-left",
            Animation::SlideRight => "slide-right",
            Animation::SlideUp => "slide-up",
            Animation::SlideDown => "slide-down",
            Animation::Fade => "fade",
            Animation::Push => "push",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Animation::None => "Instant",
            Animation::SlideLeft => "Slide Left",
            Animation::SlideRight => "Slide Right",
            Animation::SlideUp => "Slide Up",
            Animation::SlideDown => "Slide Down",
            Animation::Fade => "Fade",
            Animation::Push => "Push",
        }
    }
}

impl fmt::Display for Animation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User choices for a new interaction, before it gets an id.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InteractionDraft {
    pub trigger: Trigger,
    pub action: Action,
    pub target: LayerId,
    pub animation: Animation,
}

impl InteractionDraft {
    pub fn navigate_to(target: impl Into<LayerId>) -> Self {
        Self {
            target: target.into(),
            ..Self::default()
        }
    }

    pub fn with_trigger(mut self, trigger: Trigger) -> Self {
        self.trigger = trigger;
        self
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.action = action;
        self
    }

    pub fn with_animation(mut self, animation: Animation) -> Self {
        self.animation = animation;
        self
    }
}

/// A prototype edge from a source layer to a target frame.
///
/// References are not revalidated after creation; either end may dangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    pub id: String,
    pub source: LayerId,
    pub trigger: Trigger,
    pub action: Action,
    pub target: LayerId,
    #[serde(default)]
    pub animation: Animation,
}

impl Interaction {
    pub fn new(source: LayerId, draft: InteractionDraft) -> Self {
        Self {
            id: format!("interaction-{}", next_timestamp()),
            source,
            trigger: draft.trigger,
            action: draft.action,
            target: draft.target,
            animation: draft.animation,
        }
    }

    /// Sentence for the interaction panel, e.g.
    /// `When on click, navigate to Frame 1 with fade animation`.
    pub fn description(&self, target_name: &str) -> String {
        let action = match self.action {
            Action::NavigateTo => "navigate to",
            Action::OpenOverlay => "open overlay",
            Action::CloseOverlay => "close overlay",
            Action::Back => "back",
            Action::OpenLink => "open link",
            Action::SwapVisibility => "swap visibility",
        };
        let mut text = format!(
            "When {}, {} {}",
            self.trigger.label().to_lowercase(),
            action,
            target_name
        );
        if self.animation != Animation::None {
            text.push_str(&format!(" with {} animation", self.animation));
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description() {
        let draft = InteractionDraft::navigate_to("frame-1").with_animation(Animation::Fade);
        let interaction = Interaction::new(LayerId::new("rectangle-1"), draft);
        assert!(interaction.id.starts_with("interaction-"));
        assert_eq!(
            interaction.description("Frame 1"),
            "When on click, navigate to Frame 1 with fade animation"
        );

        let plain = Interaction {
            animation: Animation::None,
            trigger: Trigger::Key,
            action: Action::OpenOverlay,
            ..interaction
        };
        assert_eq!(plain.description("Menu"), "When on key press, open overlay Menu");
    }

    #[test]
    fn test_wire_values_are_kebab_case() {
        let interaction = Interaction::new(
            LayerId::new("a"),
            InteractionDraft::navigate_to("b")
                .with_action(Action::SwapVisibility)
                .with_animation(Animation::SlideLeft),
        );
        let value = serde_json::to_value(&interaction).unwrap();
        assert_eq!(value["action"], "swap-visibility");
        assert_eq!(value["animation"], "slide-left");
        assert_eq!(value["trigger"], "click");
    }
}
