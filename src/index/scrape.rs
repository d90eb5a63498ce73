//! Recover recorded timestamps from a previously generated index page.
//!
//! The page is its own database: every entry block carries its name and the
//! time it was recorded. Several layouts have been emitted over time, so each
//! known layout gets its own pattern and all matches are merged, first match
//! per name winning.

use super::store::RecordedTimes;
use crate::{log, utils::date};
use quick_xml::escape::unescape;
use regex::Regex;
use std::sync::LazyLock;

/// `Www Mmm D HH:MM:SS YYYY`
macro_rules! stamp {
    () => {
        r"[A-Z][a-z]{2}\s+[A-Z][a-z]{2}\s+\d{1,2}\s+\d{2}:\d{2}:\d{2}\s+\d{4}"
    };
}

/// One historical page layout.
struct Layout {
    name: &'static str,
    pattern: Regex,
}

impl Layout {
    fn new(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).unwrap(),
        }
    }

    fn pairs<'a>(&self, document: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.pattern.captures_iter(document).filter_map(|caps| {
            let name = caps.get(1)?.as_str();
            let time = caps.get(2)?.as_str();
            Some((name, time))
        })
    }
}

static LAYOUTS: LazyLock<[Layout; 4]> = LazyLock::new(|| {
    [
        // <div class="exp-name">NAME</div> ... <span class="exp-time">Added: TIME</span>
        Layout::new(
            "labelled card",
            r#"(?is)<div class="exp-name">([^<]+)</div>.*?<span class="exp-time[^"]*">(?:🔄 Updated:|Added:)\s*([^<]+)</span>"#,
        ),
        // any exp-time span, optional `label:` prefix
        Layout::new(
            "lenient card",
            concat!(
                r#"(?is)<div class="exp-name">([^<]+)</div>.*?<span[^>]*class="exp-time[^"]*"[^>]*>(?:[^:<]*:)?\s*("#,
                stamp!(),
                r")</span>"
            ),
        ),
        // <h3>NAME</h3> ... <p><strong>Time added:</strong> TIME</p>
        Layout::new(
            "legacy heading",
            r"(?is)<h3>([^<]+)</h3>.*?<p><strong>Time added:</strong>\s*([^<]+)</p>",
        ),
        // exp-name followed by the first timestamp-looking text
        Layout::new(
            "nearest stamp",
            concat!(r#"(?is)<div class="exp-name">([^<]+)</div>.*?("#, stamp!(), ")"),
        ),
    ]
});

static SAMPLE_NAMES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<div class="exp-name">([^<]+)</div>"#).unwrap());
static SAMPLE_TIMES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<span[^>]*class="exp-time[^"]*"[^>]*>([^<]+)</span>"#).unwrap());

/// Below this many recovered entries, sample fragments are logged to help
/// spot a layout the patterns do not know.
const SPARSE_RESULT: usize = 10;

/// Extract `identifier -> recorded timestamp` from page text.
///
/// Unparseable timestamps are dropped with a warning. An empty document
/// yields an empty mapping.
pub fn scrape(document: &str) -> RecordedTimes {
    let mut times = RecordedTimes::default();
    if document.trim().is_empty() {
        return times;
    }

    let mut candidates = Vec::new();
    for layout in LAYOUTS.iter() {
        let before = candidates.len();
        candidates.extend(layout.pairs(document));
        log!("scrape"; "{}: {} match(es)", layout.name, candidates.len() - before);
    }

    for (raw_name, raw_time) in candidates {
        let name = decode_name(raw_name.trim());
        if times.contains(&name) {
            continue;
        }
        match date::parse_recorded(raw_time) {
            Some(ts) => {
                times.insert_if_absent(name, ts);
            }
            None => log!("warn"; "cannot parse time `{}` for {}", raw_time.trim(), name),
        }
    }

    log!("scrape"; "recovered {} recorded timestamp(s)", times.len());
    if times.len() < SPARSE_RESULT {
        log_samples(document);
    }

    times
}

/// Names are written HTML-escaped; undo that so they match file stems.
fn decode_name(raw: &str) -> String {
    unescape(raw).map_or_else(|_| raw.to_owned(), |name| name.into_owned())
}

fn log_samples(document: &str) {
    let first = |re: &Regex| -> Vec<String> {
        re.captures_iter(document)
            .take(5)
            .map(|c| c[1].trim().to_owned())
            .collect()
    };
    let names = first(&SAMPLE_NAMES);
    let times = first(&SAMPLE_TIMES);
    if !names.is_empty() || !times.is_empty() {
        log!("scrape"; "few entries recovered; sample names {:?}, sample times {:?}", names, times);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    const CURRENT: &str = r#"
        <div class="exp-item">
            <div class="exp-name">gdance_sample_test_p3_waltz</div>
            <div class="exp-details">
                <span class="exp-time">Added: Fri Mar 21 12:59:18 2025</span>
                <a href="results/gdance_sample_test_p3_waltz.html" target="_blank" class="exp-link">open</a>
            </div>
        </div>
        <div class="exp-item">
            <div class="exp-name">run_person2</div>
            <div class="exp-details">
                <span class="exp-time updated">🔄 Updated: Sat Mar 22 08:00:01 2025</span>
            </div>
        </div>
    "#;

    #[test]
    fn test_scrape_empty() {
        assert!(scrape("").is_empty());
        assert!(scrape("   \n").is_empty());
    }

    #[test]
    fn test_scrape_current_layout() {
        let times = scrape(CURRENT);
        assert_eq!(times.len(), 2);
        assert_eq!(
            times.get("gdance_sample_test_p3_waltz"),
            Some(at(2025, 3, 21, 12, 59, 18))
        );
        assert_eq!(times.get("run_person2"), Some(at(2025, 3, 22, 8, 0, 1)));
    }

    #[test]
    fn test_scrape_legacy_layout() {
        let doc = r#"
            <div class="experiment">
                <h3>old_run_p4_</h3>
                <p><strong>Time added:</strong> Mon Jan 06 09:15:00 2025</p>
            </div>
            <div class="experiment">
                <h3>older_run</h3>
                <p><strong>Time added:</strong> 2024-12-31T23:00:00</p>
            </div>
        "#;
        let times = scrape(doc);
        assert_eq!(times.get("old_run_p4_"), Some(at(2025, 1, 6, 9, 15, 0)));
        assert_eq!(times.get("older_run"), Some(at(2024, 12, 31, 23, 0, 0)));
    }

    #[test]
    fn test_scrape_lenient_label() {
        let doc = r#"
            <div class="exp-name">clip_p5_x</div>
            <span data-k="1" class="exp-time">Recorded: Tue Apr 1 07:00:00 2025</span>
        "#;
        let times = scrape(doc);
        assert_eq!(times.get("clip_p5_x"), Some(at(2025, 4, 1, 7, 0, 0)));
    }

    #[test]
    fn test_scrape_first_match_wins() {
        let doc = r#"
            <div class="exp-name">dup</div>
            <span class="exp-time">Added: Fri Mar 21 12:59:18 2025</span>
            <div class="exp-name">dup</div>
            <span class="exp-time">Added: Sat Mar 22 12:59:18 2025</span>
        "#;
        let times = scrape(doc);
        assert_eq!(times.len(), 1);
        assert_eq!(times.get("dup"), Some(at(2025, 3, 21, 12, 59, 18)));
    }

    #[test]
    fn test_scrape_drops_unparseable() {
        let doc = r#"
            <div class="exp-name">good</div>
            <span class="exp-time">Added: Fri Mar 21 12:59:18 2025</span>
            <div class="exp-name">bad</div>
            <span class="exp-time">Added: sometime last week</span>
        "#;
        let times = scrape(doc);
        assert_eq!(times.get("bad"), None);
        assert_eq!(times.get("good"), Some(at(2025, 3, 21, 12, 59, 18)));
    }

    #[test]
    fn test_scrape_unescapes_names() {
        let doc = r#"
            <div class="exp-name">tom &amp; jerry&apos;s_person2</div>
            <span class="exp-time">Added: Fri Mar 21 12:59:18 2025</span>
        "#;
        let times = scrape(doc);
        assert_eq!(
            times.get("tom & jerry's_person2"),
            Some(at(2025, 3, 21, 12, 59, 18))
        );
    }

    #[test]
    fn test_scrape_ignores_unrelated_markup() {
        let doc = "<html><body><h1>Nothing here</h1><p>Fri Mar 21 12:59:18 2025</p></body></html>";
        assert!(scrape(doc).is_empty());
    }
}
