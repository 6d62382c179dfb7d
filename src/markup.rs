use docmark_stem::Keywords;
use ego_tree::{NodeId, NodeRef, Tree};
use regex::{Regex, RegexBuilder};
use scraper::{Html, Node};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::ProcessError;

pub const HIGHLIGHT_STYLE: &str = "background-color: yellow;";

/// Lets a stem run on to the end of its inflected word.
const WORD_CONTINUATION: &str = r"\w*";
/// Between words of a phrase: any whitespace, including no-break space.
const WORD_GAP: &str = r"[\s\x{A0}]+";
/// Elements whose text cannot hold inline markup.
const OPAQUE_ELEMENTS: [&str; 4] = ["script", "style", "textarea", "title"];
/// Roots of SVG and MathML content, where an HTML span would not survive a
/// reparse.
const FOREIGN_ROOTS: [&str; 2] = ["svg", "math"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MarkupReport {
    pub text_nodes_visited: usize,
    pub nodes_rewritten: usize,
    pub spans_inserted: usize,
}

/// One case-insensitive alternation over every keyword phrase.
///
/// Words inside a phrase must appear in order, separated by whitespace, and
/// each may carry any word-character continuation past its stem.
pub fn phrase_pattern(keywords: &Keywords) -> Result<Regex, regex::Error> {
    let alternatives: Vec<String> = keywords
        .phrases()
        .iter()
        .map(|phrase| {
            phrase
                .stems()
                .iter()
                .map(|stem| format!("{}{WORD_CONTINUATION}", regex::escape(stem)))
                .collect::<Vec<_>>()
                .join(WORD_GAP)
        })
        .collect();
    RegexBuilder::new(&format!("(?:{})", alternatives.join("|")))
        .case_insensitive(true)
        .build()
}

/// Wrap every phrase occurrence in the document's text in a highlight span.
///
/// Text nodes are collected before any rewriting, so replacement nodes are
/// never revisited. A matching node is rendered back to markup with its
/// matches wrapped, reparsed as a fragment, and the fragment's nodes take the
/// old node's place. Nodes without a match are left as they are.
pub fn highlight_markup(
    html: &mut Html,
    keywords: &Keywords,
) -> Result<MarkupReport, ProcessError> {
    let pattern = phrase_pattern(keywords).map_err(|e| ProcessError::Markup(e.to_string()))?;

    let text_nodes: Vec<NodeId> = html
        .tree
        .root()
        .descendants()
        .filter(|node| node.value().is_text() && !inside_opaque_element(node))
        .map(|node| node.id())
        .collect();
    let mut report = MarkupReport {
        text_nodes_visited: text_nodes.len(),
        ..MarkupReport::default()
    };

    for id in text_nodes {
        let Some(text) = html
            .tree
            .get(id)
            .and_then(|node| node.value().as_text())
            .map(|text| text.to_string())
        else {
            continue;
        };
        let Some((markup, spans)) = wrap_matches(&pattern, &text) else {
            continue;
        };
        let fragment = Html::parse_fragment(&markup);
        replace_with_fragment(&mut html.tree, id, &fragment)?;
        debug!("wrapped {spans} matches in {:?}", text);
        report.nodes_rewritten += 1;
        report.spans_inserted += spans;
    }

    info!(
        "highlighted {} spans across {} of {} text nodes",
        report.spans_inserted, report.nodes_rewritten, report.text_nodes_visited
    );
    Ok(report)
}

fn inside_opaque_element(node: &NodeRef<'_, Node>) -> bool {
    node.ancestors().any(|ancestor| {
        ancestor
            .value()
            .as_element()
            .is_some_and(|el| {
                OPAQUE_ELEMENTS.contains(&el.name()) || FOREIGN_ROOTS.contains(&el.name())
            })
    })
}

/// Render `text` as markup with each match wrapped; `None` when nothing
/// matches.
fn wrap_matches(pattern: &Regex, text: &str) -> Option<(String, usize)> {
    let mut out = String::with_capacity(text.len() + 64);
    let mut last = 0;
    let mut spans = 0;
    for m in pattern.find_iter(text) {
        if m.as_str().is_empty() {
            continue;
        }
        escape_text(&mut out, &text[last..m.start()]);
        out.push_str("<span style=\"");
        out.push_str(HIGHLIGHT_STYLE);
        out.push_str("\">");
        escape_text(&mut out, m.as_str());
        out.push_str("</span>");
        last = m.end();
        spans += 1;
    }
    if spans == 0 {
        return None;
    }
    escape_text(&mut out, &text[last..]);
    Some((out, spans))
}

fn escape_text(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

/// Put the parsed fragment's top-level nodes where `target` was, then detach
/// `target`. Other node ids in the tree stay valid.
fn replace_with_fragment(
    tree: &mut Tree<Node>,
    target: NodeId,
    fragment: &Html,
) -> Result<(), ProcessError> {
    let container = fragment.root_element();
    for child in container.children() {
        let inserted = tree
            .get_mut(target)
            .ok_or_else(|| missing_node(target))?
            .insert_before(child.value().clone())
            .id();
        copy_children(tree, inserted, child)?;
    }
    tree.get_mut(target)
        .ok_or_else(|| missing_node(target))?
        .detach();
    Ok(())
}

fn copy_children(
    tree: &mut Tree<Node>,
    parent: NodeId,
    source: NodeRef<'_, Node>,
) -> Result<(), ProcessError> {
    for child in source.children() {
        let id = tree
            .get_mut(parent)
            .ok_or_else(|| missing_node(parent))?
            .append(child.value().clone())
            .id();
        copy_children(tree, id, child)?;
    }
    Ok(())
}

fn missing_node(id: NodeId) -> ProcessError {
    ProcessError::Markup(format!("node {id:?} is no longer in the document"))
}
