//! Terminal capability probing, consulted when deciding whether to offer
//! mouse-driven block/column selection and xterm mouse-tracking mode.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct TerminalCapabilities {
    pub supports_mouse: bool,
}

impl TerminalCapabilities {
    /// Optimistic default: crossterm's mouse-capture mode works on every
    /// backend this pager targets. A future revision could probe instead.
    pub fn detect() -> Self {
        Self { supports_mouse: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_assumes_mouse_support() {
        assert!(TerminalCapabilities::detect().supports_mouse);
    }
}
