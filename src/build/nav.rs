//! Navigation highlighting for the header fragment.

use std::path::Path;

/// Mark the nav entry linking to the current page as active.
///
/// Looks for the literal `<li><a href="PAGE">` where PAGE is the file name of
/// `output_path`, and rewrites every occurrence to
/// `<li><a class="ACTIVE" href="PAGE">`. The fragment is returned unchanged
/// when no entry matches.
pub fn highlight_active(fragment: &str, output_path: &Path, active_class: &str) -> String {
    let Some(page) = output_path.file_name() else {
        return fragment.to_string();
    };
    let page = page.to_string_lossy();

    let link = format!(r#"<li><a href="{page}">"#);
    if !fragment.contains(&link) {
        return fragment.to_string();
    }

    let active = format!(r#"<li><a class="{active_class}" href="{page}">"#);
    fragment.replace(&link, &active)
}
