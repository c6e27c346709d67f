//! Placeholder replacement that keeps run formatting.
//!
//! Word splits visible text into runs wherever formatting, spell-check state
//! or editing history changes, so a placeholder typed as one word may be
//! stored across several `w:t` elements. Replacement works on the
//! concatenated paragraph text and maps matches back onto the original
//! text elements: the replacement lands in the element where the match
//! starts, and the matched remainder is removed from the elements after it.

use crate::docx::{visit_paragraphs_mut, Document, XmlElement};

/// Replace every occurrence of `placeholder` in the document body,
/// including table cells. Returns the number of replacements.
pub fn replace_placeholder(doc: &mut Document, placeholder: &str, replacement: &str) -> usize {
    if placeholder.is_empty() {
        return 0;
    }
    let mut count = 0;
    visit_paragraphs_mut(doc.body_mut(), &mut |p| {
        count += replace_in_paragraph(p, placeholder, replacement);
    });
    count
}

/// Replace occurrences within one paragraph.
pub fn replace_in_paragraph(paragraph: &mut XmlElement, placeholder: &str, replacement: &str) -> usize {
    if placeholder.is_empty() {
        return 0;
    }
    let mut nodes = Vec::new();
    collect_text_elements(paragraph, &mut nodes);

    let mut segments: Vec<String> = nodes.iter().map(|t| t.plain_text()).collect();
    let count = replace_in_segments(&mut segments, placeholder, replacement);
    if count == 0 {
        return 0;
    }

    for (node, text) in nodes.into_iter().zip(segments) {
        if node.plain_text() != text {
            node.set_text(text);
            node.set_attr("xml:space", "preserve");
        }
    }
    count
}

/// Text elements (`w:t`) of a paragraph in order, not descending into
/// nested paragraphs such as text boxes.
fn collect_text_elements<'a>(el: &'a mut XmlElement, out: &mut Vec<&'a mut XmlElement>) {
    for child in el.elements_mut() {
        if child.is("t") {
            out.push(child);
        } else if !child.is("p") && !child.is("pPr") && !child.is("rPr") {
            collect_text_elements(child, out);
        }
    }
}

/// Replace matches of `needle` across a sequence of text segments.
///
/// The segments are treated as one string. A match is written into the
/// segment holding its first byte; the rest of the match is cut from the
/// segments that follow.
fn replace_in_segments(segments: &mut [String], needle: &str, replacement: &str) -> usize {
    let joined = segments.concat();
    let matches: Vec<usize> = joined.match_indices(needle).map(|(i, _)| i).collect();
    if matches.is_empty() {
        return 0;
    }

    let mut starts = Vec::with_capacity(segments.len());
    let mut offset = 0;
    for segment in segments.iter() {
        starts.push(offset);
        offset += segment.len();
    }
    let owner = |pos: usize| starts.partition_point(|&s| s <= pos) - 1;

    for &start in matches.iter().rev() {
        let end = start + needle.len();
        let first = owner(start);
        let last = owner(end - 1);

        if first == last {
            let base = starts[first];
            segments[first].replace_range(start - base..end - base, replacement);
        } else {
            segments[first].truncate(start - starts[first]);
            segments[first].push_str(replacement);
            for segment in &mut segments[first + 1..last] {
                segment.clear();
            }
            segments[last].replace_range(..end - starts[last], "");
        }
    }

    matches.len()
}
