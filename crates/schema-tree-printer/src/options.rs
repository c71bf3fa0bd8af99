bitflags::bitflags! {
    /// Switches altering what the diagram shows.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RenderFlags: u8 {
        /// RFC 8340 style: prefixes instead of module names, no defaults.
        const RFC = 1 << 0;
        /// Append a section per top-level grouping.
        const GROUPINGS = 1 << 1;
        /// Show `uses` as their own lines instead of expanding them.
        const USES = 1 << 2;
        /// Print `leafref` instead of the leafref target path.
        const NO_LEAFREF_TARGET = 1 << 3;
    }
}

/// Rendering options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TreeOptions {
    /// Wrap the type column past this many characters; 0 never wraps.
    pub line_length: u16,
    pub flags: RenderFlags,
}

impl TreeOptions {
    pub fn new(line_length: u16, flags: RenderFlags) -> Self {
        Self { line_length, flags }
    }

    pub fn with_line_length(mut self, line_length: u16) -> Self {
        self.line_length = line_length;
        self
    }

    pub fn with_flags(mut self, flags: RenderFlags) -> Self {
        self.flags |= flags;
        self
    }
}
