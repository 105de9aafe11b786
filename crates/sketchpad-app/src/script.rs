//! Recorded event scripts: input events mixed with toolbox actions.

use crate::error::{SketchError, SketchResult};
use crate::sketchpad::Sketchpad;
use serde::Deserialize;
use sketchpad_core::input::InputEvent;
use sketchpad_core::storage::Storage;
use sketchpad_core::style::{Color, ToolStyle};
use sketchpad_core::tools::ToolKind;

/// Toolbox controls, recorded by their `action` name.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ToolboxAction {
    SetTool { tool: ToolKind },
    SetStyle { style: ToolStyle },
    SetBackground { color: Color },
    Undo,
    Redo,
    Clear,
}

/// One entry of an event script.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ScriptStep {
    Input(InputEvent),
    Toolbox(ToolboxAction),
}

/// Parse a JSON array of script steps.
pub fn parse_script(json: &str) -> SketchResult<Vec<ScriptStep>> {
    serde_json::from_str(json).map_err(|e| SketchError::Script(e.to_string()))
}

impl<S: Storage> Sketchpad<S> {
    pub fn apply_step(&mut self, step: &ScriptStep) -> SketchResult<()> {
        match step {
            ScriptStep::Input(event) => self.handle_event(event)?,
            ScriptStep::Toolbox(action) => match action {
                ToolboxAction::SetTool { tool } => self.set_tool(*tool),
                ToolboxAction::SetStyle { style } => self.set_tool_style(style.clone()),
                ToolboxAction::SetBackground { color } => self.set_background(*color),
                ToolboxAction::Undo => {
                    self.undo()?;
                }
                ToolboxAction::Redo => {
                    self.redo()?;
                }
                ToolboxAction::Clear => self.clear()?,
            },
        }
        Ok(())
    }

    /// Apply every step in order, stopping at the first error.
    pub fn run_script(&mut self, steps: &[ScriptStep]) -> SketchResult<()> {
        for (index, step) in steps.iter().enumerate() {
            self.apply_step(step)
                .map_err(|e| SketchError::Script(format!("step {}: {}", index, e)))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppConfig;
    use sketchpad_core::input::CanvasOrigin;
    use sketchpad_core::storage::MemoryStorage;
    use sketchpad_core::style::DashStyle;
    use std::sync::Arc;

    const SCRIPT: &str = r##"[
        {"action": "setTool", "tool": "diamond"},
        {"action": "setStyle", "style": {"stroke_width": 3, "dash": "small", "stroke_color": "#ff0000"}},
        {"type": "pointerDown", "x": 10, "y": 10},
        {"type": "pointerMove", "x": 50, "y": 40},
        {"type": "pointerUp", "x": 50, "y": 40},
        {"action": "setBackground", "color": "#202020"},
        {"action": "undo"},
        {"action": "redo"}
    ]"##;

    #[test]
    fn test_parse_mixed_steps() {
        let steps = parse_script(SCRIPT).unwrap();
        assert_eq!(steps.len(), 8);
        assert_eq!(
            steps[0],
            ScriptStep::Toolbox(ToolboxAction::SetTool {
                tool: ToolKind::Diamond
            })
        );
        let ScriptStep::Toolbox(ToolboxAction::SetStyle { style }) = &steps[1] else {
            panic!("expected a style step");
        };
        assert_eq!(style.dash(), DashStyle::Small);
        assert_eq!(style.stroke_color(), Color::rgb(255, 0, 0));
        assert!(matches!(steps[2], ScriptStep::Input(InputEvent::PointerDown { .. })));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            parse_script(r#"[{"action": "explode"}]"#),
            Err(SketchError::Script(_))
        ));
    }

    #[test]
    fn test_style_out_of_range_is_rejected() {
        let json = r#"[{"action": "setStyle", "style": {"stroke_width": -3, "roughness": 500, "fill_opacity": 7}}]"#;
        assert!(matches!(parse_script(json), Err(SketchError::Script(_))));
    }

    #[test]
    fn test_run_script() {
        let config = AppConfig {
            width: 64,
            height: 48,
            origin: CanvasOrigin::new(0.0, 0.0),
            ..AppConfig::default()
        };
        let mut pad = Sketchpad::new(&config, Arc::new(MemoryStorage::new())).unwrap();
        pad.run_script(&parse_script(SCRIPT).unwrap()).unwrap();

        assert_eq!(pad.tool(), ToolKind::Diamond);
        assert_eq!(pad.history().len(), 1);
        assert_eq!(pad.history().cursor(), 0);
        assert_eq!(pad.background(), Color::rgb(0x20, 0x20, 0x20));
    }
}
