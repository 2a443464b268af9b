//! Managed regions inside published pages.
//!
//! A page opts a section in by carrying a pair of comment markers:
//!
//! ```text
//! <!-- cms:hero:start -->
//! ...replaced on every publish...
//! <!-- cms:hero:end -->
//! ```
//!
//! Only the bytes between a pair are replaced; everything else in the page is
//! preserved exactly. Splicing the same fragments twice yields the same page.

use std::collections::BTreeMap;
use std::ops::Range;

use folio_core::error::CoreError;
use folio_core::section::SectionTag;

pub fn start_marker(tag: SectionTag) -> String {
    format!("<!-- cms:{tag}:start -->")
}

pub fn end_marker(tag: SectionTag) -> String {
    format!("<!-- cms:{tag}:end -->")
}

/// Result of splicing one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spliced {
    pub html: String,
    /// Sections whose region was found, in page order.
    pub sections: Vec<SectionTag>,
}

/// Locate the replaceable content range of every anchored section in `html`.
///
/// Fails on a marker that appears more than once, a start without an end (or
/// the reverse), an end before its start, or regions that overlap.
pub fn find_regions(page: &str, html: &str) -> Result<Vec<(SectionTag, Range<usize>)>, CoreError> {
    let malformed = |msg: String| CoreError::Validation(format!("{page}: {msg}"));
    let mut regions = Vec::new();

    for tag in SectionTag::ALL {
        let start = start_marker(tag);
        let end = end_marker(tag);
        let starts: Vec<usize> = html.match_indices(&start).map(|(i, _)| i).collect();
        let ends: Vec<usize> = html.match_indices(&end).map(|(i, _)| i).collect();

        match (starts.as_slice(), ends.as_slice()) {
            ([], []) => continue,
            ([s], [e]) if s + start.len() <= *e => {
                regions.push((tag, s + start.len()..*e));
            }
            ([_], [_]) => return Err(malformed(format!("end marker for {tag} precedes its start"))),
            _ => {
                return Err(malformed(format!(
                    "unbalanced or duplicated markers for {tag} ({} start, {} end)",
                    starts.len(),
                    ends.len()
                )))
            }
        }
    }

    regions.sort_by_key(|(_, range)| range.start);
    for pair in regions.windows(2) {
        let (first, a) = &pair[0];
        let (second, b) = &pair[1];
        // Region content ranges exclude markers; any overlap or nesting puts
        // the second start inside the first content range.
        if b.start <= a.end {
            return Err(malformed(format!("regions for {first} and {second} overlap")));
        }
    }
    Ok(regions)
}

/// Replace every anchored region of `html` with its fragment.
///
/// Sections anchored in the page but missing from `fragments` keep their
/// current content.
pub fn splice_sections(
    page: &str,
    html: &str,
    fragments: &BTreeMap<SectionTag, String>,
) -> Result<Spliced, CoreError> {
    let regions = find_regions(page, html)?;

    let mut out = String::with_capacity(html.len());
    let mut cursor = 0;
    let mut sections = Vec::with_capacity(regions.len());
    for (tag, range) in regions {
        let Some(fragment) = fragments.get(&tag) else {
            continue;
        };
        out.push_str(&html[cursor..range.start]);
        out.push_str(fragment);
        cursor = range.end;
        sections.push(tag);
    }
    out.push_str(&html[cursor..]);

    Ok(Spliced { html: out, sections })
}
