//! Sidebar and page markup in the shape the default navsync rules expect.
//!
//! Sidebars nest a `<ul>` per section inside `<ul class="nav-menu">`, so
//! every fixture exercises depth counting.

/// A single-section sidebar listing `destinations`, with `active` marked.
pub fn sidebar_html(destinations: &[&str], active: Option<&str>) -> String {
    sectioned_sidebar_html(&[("Docs", destinations)], active)
}

/// A sidebar with one `<li class="nav-section">` per `(title, destinations)`.
///
/// Every entry whose destination equals `active` gets the active class.
pub fn sectioned_sidebar_html(sections: &[(&str, &[&str])], active: Option<&str>) -> String {
    let mut html = String::from("<ul class=\"nav-menu\">\n");

    for (title, destinations) in sections {
        html.push_str("    <li class=\"nav-section\">\n");
        html.push_str(&format!(
            "        <div class=\"nav-section-title\">{title}</div>\n"
        ));
        html.push_str("        <ul>\n");
        for dest in destinations.iter() {
            let class = if Some(*dest) == active {
                "nav-item active"
            } else {
                "nav-item"
            };
            html.push_str(&format!("            <li class=\"{class}\">\n"));
            html.push_str(&format!(
                "                <a href=\"{dest}\" class=\"nav-link\">{}</a>\n",
                label(dest)
            ));
            html.push_str("            </li>\n");
        }
        html.push_str("        </ul>\n");
        html.push_str("    </li>\n");
    }

    html.push_str("</ul>");
    html
}

/// A complete page with `sidebar` inside `<nav class="sidebar">` and a
/// content list after it, so text outside the block contains `<ul>` too.
pub fn page_html(title: &str, sidebar: &str) -> String {
    format!(
        "<!DOCTYPE html>
<html>
<head>
    <meta charset=\"utf-8\">
    <title>{title}</title>
</head>
<body>
    <nav class=\"sidebar\">
{sidebar}
    </nav>
    <main>
        <h1>{title}</h1>
        <ul class=\"content-list\">
            <li>First point about {title}</li>
            <li>Second point</li>
        </ul>
    </main>
</body>
</html>
"
    )
}

fn label(destination: &str) -> String {
    destination
        .trim_end_matches(".html")
        .replace('-', " ")
}
