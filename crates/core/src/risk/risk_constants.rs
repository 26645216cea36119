/// Display colors per risk code
pub const COLOR_GREEN: &str = "#27C269";
pub const COLOR_YELLOW: &str = "#E5DB5C";
pub const COLOR_ORANGE: &str = "#E18518";
pub const COLOR_RED: &str = "#EC3131";

/// Color used for codes outside the known set
pub const COLOR_DEFAULT: &str = "#B4B5C1";
