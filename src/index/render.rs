//! Index page rendering.
//!
//! # Page layout
//!
//! ```html
//! <div class="stats"><strong>12</strong> experiments across <strong>3</strong> group sizes</div>
//! <div class="group-toggle">
//!   <div class="group-header" onclick="toggleGroup(this)">…</div>
//!   <div class="group-content active">
//!     <div class="exp-item">
//!       <div class="exp-name">NAME</div>
//!       <div class="exp-details">
//!         <span class="exp-time">Added: Fri Mar 21 12:59:18 2025</span>
//!         <a href="results/NAME.html" target="_blank" class="exp-link">…</a>
//!       </div>
//!     </div>
//!   </div>
//! </div>
//! ```
//!
//! The `exp-name` / `exp-time` pair is what the scraper reads back on the
//! next run, so its shape must stay stable.

use super::{classify::GroupKey, entry::Entry, group::Group, reconcile::Summary};
use crate::{
    config::{GroupMode, IndexConfig},
    utils::date,
};
use quick_xml::escape::escape;
use std::path::{Component, Path, PathBuf};

// ============================================================================
// Constants
// ============================================================================

const STYLE: &str = r#"
        body {
            font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
            margin: 20px;
            background-color: #f5f5f5;
            line-height: 1.6;
        }
        .container {
            max-width: 1200px;
            margin: 0 auto;
            background: white;
            padding: 30px;
            border-radius: 10px;
            box-shadow: 0 2px 10px rgba(0,0,0,0.1);
        }
        h1 { color: #2c3e50; text-align: center; margin-bottom: 10px; font-size: 2.5em; }
        .subtitle { text-align: center; color: #7f8c8d; font-size: 1.2em; margin-bottom: 30px; }
        .stats {
            background: #ecf0f1;
            padding: 15px;
            border-radius: 8px;
            margin-bottom: 20px;
            text-align: center;
            color: #2c3e50;
        }
        .stats strong { color: #e74c3c; font-size: 1.2em; }
        .group-toggle {
            margin: 15px 0;
            border: 1px solid #e0e0e0;
            border-radius: 8px;
            overflow: hidden;
            box-shadow: 0 2px 4px rgba(0,0,0,0.05);
        }
        .group-header {
            background: linear-gradient(135deg, #74b9ff 0%, #0984e3 100%);
            color: white;
            padding: 15px 20px;
            cursor: pointer;
            font-weight: 600;
            font-size: 1.1em;
            user-select: none;
            display: flex;
            justify-content: space-between;
            align-items: center;
        }
        .group-header:hover { background: linear-gradient(135deg, #0984e3 0%, #74b9ff 100%); }
        .group-header.unknown { background: linear-gradient(135deg, #a29bfe 0%, #6c5ce7 100%); }
        .group-header.unknown:hover { background: linear-gradient(135deg, #6c5ce7 0%, #a29bfe 100%); }
        .group-icon { margin-right: 8px; font-size: 1.1em; }
        .toggle-icon { transition: transform 0.3s ease; font-size: 1.2em; }
        .group-content { display: none; background: #fafafa; border-top: 1px solid #e0e0e0; }
        .group-content.active { display: block; }
        .exp-item { padding: 15px 20px; border-bottom: 1px solid #eeeeee; background: white; }
        .exp-item:last-child { border-bottom: none; }
        .exp-item:hover { background-color: #f8f9ff; }
        .exp-name { font-weight: 600; color: #2c3e50; margin-bottom: 8px; font-size: 1.05em; }
        .exp-details {
            display: flex;
            justify-content: space-between;
            align-items: center;
            flex-wrap: wrap;
            gap: 10px;
        }
        .exp-time { color: #7f8c8d; font-size: 0.9em; }
        .exp-time.updated { color: #e17055; font-weight: 600; }
        .exp-link {
            display: inline-block;
            padding: 8px 16px;
            background: linear-gradient(135deg, #00b894 0%, #00a085 100%);
            color: white;
            text-decoration: none;
            border-radius: 5px;
            font-size: 0.9em;
            font-weight: 500;
        }
        .exp-link:hover { box-shadow: 0 4px 8px rgba(0, 184, 148, 0.3); }
        @media (max-width: 768px) {
            .container { margin: 10px; padding: 15px; }
            h1 { font-size: 2em; }
            .exp-details { flex-direction: column; align-items: flex-start; }
            .group-header, .exp-item { padding: 12px 15px; }
        }
"#;

/// Click toggles a section, `Escape` collapses all, `a` expands all.
const SCRIPT: &str = r#"
        function setOpen(content, open) {
            content.classList.toggle('active', open);
            const icon = content.previousElementSibling.querySelector('.toggle-icon');
            icon.style.transform = open ? 'rotate(90deg)' : 'rotate(0deg)';
        }
        function toggleGroup(header) {
            const content = header.nextElementSibling;
            setOpen(content, !content.classList.contains('active'));
        }
        document.addEventListener('keydown', function (e) {
            if (e.key === 'Escape') {
                document.querySelectorAll('.group-content').forEach(c => setOpen(c, false));
            }
            if (e.key === 'a' || e.key === 'A') {
                document.querySelectorAll('.group-content').forEach(c => setOpen(c, true));
            }
        });
        window.addEventListener('load', function () { window.scrollTo(0, 0); });
"#;

// ============================================================================
// Page settings
// ============================================================================

/// Everything the renderer needs besides the entries.
#[derive(Debug, Clone)]
pub struct Page {
    pub title: String,
    pub subtitle: String,
    pub link_text: String,
    pub mode: GroupMode,
    /// Directory of the output file; links are made relative to it.
    pub base_dir: PathBuf,
}

impl Page {
    pub fn from_config(config: &IndexConfig) -> Self {
        Self {
            title: config.base.title.clone(),
            subtitle: config.base.subtitle.clone(),
            link_text: config.base.link_text.clone(),
            mode: config.build.group,
            base_dir: config
                .build
                .output
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default(),
        }
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// Render the full page.
pub fn render(groups: &[Group], summary: &Summary, page: &Page) -> String {
    let total: usize = groups.iter().map(|g| g.entries.len()).sum();
    let mut html = String::with_capacity(8192 + total * 512);

    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    html.push_str("    <meta charset=\"UTF-8\">\n");
    html.push_str(&format!("    <title>{}</title>\n", escape(page.title.as_str())));
    html.push_str(&format!("    <style>{STYLE}    </style>\n"));
    html.push_str("</head>\n<body>\n    <div class=\"container\">\n");
    html.push_str(&format!("        <h1>{}</h1>\n", escape(page.title.as_str())));
    if !page.subtitle.is_empty() {
        html.push_str(&format!(
            "        <p class=\"subtitle\">{}</p>\n",
            escape(page.subtitle.as_str())
        ));
    }

    html.push_str(&stats(total, groups.len(), summary, page.mode));

    for (i, group) in groups.iter().enumerate() {
        render_group(&mut html, group, i == 0, page);
    }

    html.push_str("    </div>\n");
    html.push_str(&format!("    <script>{SCRIPT}    </script>\n"));
    html.push_str("</body>\n</html>\n");
    html
}

fn stats(total: usize, groups: usize, summary: &Summary, mode: GroupMode) -> String {
    let unit = match mode {
        GroupMode::Size => "group sizes",
        GroupMode::Date => "days",
    };
    let mut line = format!(
        "<strong>{total}</strong> experiments across <strong>{groups}</strong> {unit}"
    );
    if summary.updated > 0 {
        line.push_str(&format!(", <strong>{}</strong> updated today", summary.updated));
    }
    format!("        <div class=\"stats\">{line}</div>\n")
}

fn render_group(html: &mut String, group: &Group, expanded: bool, page: &Page) {
    let count = group.entries.len();
    let (class, icon, label) = match group.key {
        GroupKey::Size(n) => ("group-header", "👥", format!("{n} People")),
        GroupKey::Unknown => ("group-header unknown", "❓", "Unknown Group Size".to_owned()),
        GroupKey::Date(day) => ("group-header", "📅", day.format("%A, %B %d, %Y").to_string()),
    };
    let (content_class, rotation) = if expanded {
        ("group-content active", "rotate(90deg)")
    } else {
        ("group-content", "rotate(0deg)")
    };

    html.push_str("        <div class=\"group-toggle\">\n");
    html.push_str(&format!(
        "            <div class=\"{class}\" onclick=\"toggleGroup(this)\">\n"
    ));
    html.push_str(&format!(
        "                <span><span class=\"group-icon\">{icon}</span>{label} ({count} experiments)</span>\n"
    ));
    html.push_str(&format!(
        "                <span class=\"toggle-icon\" style=\"transform: {rotation};\">▶</span>\n"
    ));
    html.push_str("            </div>\n");
    html.push_str(&format!("            <div class=\"{content_class}\">\n"));

    for entry in &group.entries {
        render_entry(html, entry, page);
    }

    html.push_str("            </div>\n        </div>\n");
}

fn render_entry(html: &mut String, entry: &Entry, page: &Page) {
    let (time_class, label) = if entry.is_fresh() {
        ("exp-time updated", "🔄 Updated:")
    } else {
        ("exp-time", "Added:")
    };
    let time = date::format_display(entry.timestamp());
    let href = href(&entry.artifact_path, &page.base_dir);

    html.push_str("                <div class=\"exp-item\">\n");
    html.push_str(&format!(
        "                    <div class=\"exp-name\">{}</div>\n",
        escape(entry.identifier.as_str())
    ));
    html.push_str("                    <div class=\"exp-details\">\n");
    html.push_str(&format!(
        "                        <span class=\"{time_class}\">{label} {time}</span>\n"
    ));
    html.push_str(&format!(
        "                        <a href=\"{}\" target=\"_blank\" class=\"exp-link\">{}</a>\n",
        escape(href.as_str()),
        escape(page.link_text.as_str())
    ));
    html.push_str("                    </div>\n                </div>\n");
}

/// Link target for an artifact: relative to `base_dir` when inside it,
/// each segment percent-encoded.
fn href(path: &Path, base_dir: &Path) -> String {
    let relative = path.strip_prefix(base_dir).unwrap_or(path);
    let encoded: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(urlencoding::encode(&s.to_string_lossy()).into_owned()),
            Component::ParentDir => Some("..".to_owned()),
            _ => None,
        })
        .collect();

    let joined = encoded.join("/");
    if relative.has_root() {
        format!("/{joined}")
    } else {
        joined
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{
        group::group_and_order,
        reconcile::{Resolved, Verdict},
        scrape::scrape,
    };
    use chrono::{NaiveDate, NaiveDateTime, Timelike};

    fn at(d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    fn page(mode: GroupMode) -> Page {
        Page {
            title: "Plots".into(),
            subtitle: "Records".into(),
            link_text: "Open".into(),
            mode,
            base_dir: PathBuf::from("/site"),
        }
    }

    fn entry(id: &str, key: GroupKey, ts: NaiveDateTime, fresh: bool) -> Entry {
        Entry {
            identifier: id.into(),
            artifact_path: PathBuf::from(format!("/site/results/{id}.html")),
            group_key: key,
            recorded: None,
            filesystem: Some(ts),
            resolved: Resolved {
                timestamp: ts,
                is_fresh: fresh,
                verdict: if fresh { Verdict::Updated } else { Verdict::New },
            },
        }
    }

    fn groups(entries: Vec<Entry>) -> Vec<Group> {
        group_and_order(entries).collect()
    }

    #[test]
    fn test_href_relative_and_encoded() {
        let base = Path::new("/site");
        assert_eq!(href(Path::new("/site/results/a.html"), base), "results/a.html");
        assert_eq!(
            href(Path::new("/site/results/a b#1.html"), base),
            "results/a%20b%231.html"
        );
        assert_eq!(href(Path::new("/elsewhere/x.html"), base), "/elsewhere/x.html");
    }

    #[test]
    fn test_render_structure() {
        let gs = groups(vec![
            entry("b_person2", GroupKey::Size(2), at(20, 9, 0, 0), false),
            entry("a_person1", GroupKey::Size(1), at(21, 9, 0, 0), false),
            entry("overview", GroupKey::Unknown, at(19, 9, 0, 0), false),
        ]);
        let html = render(&gs, &Summary::default(), &page(GroupMode::Size));

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Plots</title>"));
        assert!(html.contains("<p class=\"subtitle\">Records</p>"));
        assert!(html.contains("<strong>3</strong> experiments across <strong>3</strong> group sizes"));
        assert!(html.contains("1 People (1 experiments)"));
        assert!(html.contains("❓</span>Unknown Group Size (1 experiments)"));
        assert!(html.contains("class=\"group-header unknown\""));
        assert!(html.contains("href=\"results/a_person1.html\" target=\"_blank\""));
        assert!(html.contains("Added: Fri Mar 21 09:00:00 2025"));

        // first group only is expanded
        assert_eq!(html.matches("group-content active").count(), 1);
        assert_eq!(html.matches("rotate(90deg);").count(), 1);
        let first = html.find("1 People").unwrap();
        let second = html.find("2 People").unwrap();
        let unknown = html.find("Unknown Group Size").unwrap();
        assert!(first < second && second < unknown);
    }

    #[test]
    fn test_render_fresh_entry() {
        let gs = groups(vec![entry("x_p2_y", GroupKey::Size(2), at(21, 9, 0, 5), true)]);
        let summary = Summary { updated: 1, ..Summary::default() };
        let html = render(&gs, &summary, &page(GroupMode::Size));

        assert!(html.contains(
            "<span class=\"exp-time updated\">🔄 Updated: Fri Mar 21 09:00:05 2025</span>"
        ));
        assert!(html.contains("<strong>1</strong> updated today"));
    }

    #[test]
    fn test_render_date_headers() {
        let day = NaiveDate::from_ymd_opt(2025, 3, 21).unwrap();
        let gs = groups(vec![entry("x", GroupKey::Date(day), at(21, 9, 0, 0), false)]);
        let html = render(&gs, &Summary::default(), &page(GroupMode::Date));

        assert!(html.contains("Friday, March 21, 2025 (1 experiments)"));
        assert!(html.contains("across <strong>1</strong> days"));
    }

    #[test]
    fn test_render_escapes_names() {
        let gs = groups(vec![entry("<b>&co", GroupKey::Unknown, at(21, 9, 0, 0), false)]);
        let mut p = page(GroupMode::Size);
        p.title = "A & B".into();
        let html = render(&gs, &Summary::default(), &p);

        assert!(html.contains("<div class=\"exp-name\">&lt;b&gt;&amp;co</div>"));
        assert!(html.contains("<title>A &amp; B</title>"));
        assert!(!html.contains("<b>&co"));
    }

    #[test]
    fn test_render_then_scrape_recovers_timestamps() {
        let precise = at(21, 12, 59, 18).with_nanosecond(750_000_000).unwrap();
        let entries = vec![
            entry("gdance_sample_test_p3_waltz", GroupKey::Size(3), precise, false),
            entry("run_person2", GroupKey::Size(2), at(20, 8, 0, 1), true),
            entry("tom & jerry", GroupKey::Unknown, at(1, 0, 0, 0), false),
        ];
        let expected: Vec<_> = entries
            .iter()
            .map(|e| (e.identifier.clone(), e.timestamp().with_nanosecond(0).unwrap()))
            .collect();

        let html = render(&groups(entries), &Summary::default(), &page(GroupMode::Size));
        let times = scrape(&html);

        assert_eq!(times.len(), expected.len());
        for (id, ts) in expected {
            assert_eq!(times.get(&id), Some(ts), "{id}");
        }
    }
}
