//! What started a run.

use std::fmt;

/// Source of a run request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trigger {
    /// Explicit user action (button)
    Button,
    /// Automatic run when the page loads with text already present
    Startup,
    /// Ctrl/Cmd+Enter inside the text field
    Shortcut,
    /// Called from code
    Api,
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Trigger::Button => "button",
            Trigger::Startup => "startup",
            Trigger::Shortcut => "shortcut",
            Trigger::Api => "api",
        })
    }
}

/// Whether a key press is the run shortcut: Enter with Ctrl or Meta held.
#[inline]
pub fn is_run_shortcut(key: &str, ctrl: bool, meta: bool) -> bool {
    (ctrl || meta) && key.eq_ignore_ascii_case("enter")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortcut() {
        assert!(is_run_shortcut("Enter", true, false));
        assert!(is_run_shortcut("enter", false, true));
        assert!(is_run_shortcut("ENTER", true, true));
        assert!(!is_run_shortcut("Enter", false, false));
        assert!(!is_run_shortcut("a", true, false));
    }
}
