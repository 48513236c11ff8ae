pub mod formatter;

pub use formatter::{
    colorize, format_distance, format_error, format_pr_line, format_report, menu_title,
    should_use_colors, MenuColor,
};
