// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Textarc-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Textarc and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::model::{
    Anchor, AnchorRef, AnnotationGraph, EventId, GraphError, IdError, LinkSpec, Side,
    DEFAULT_CATEGORY,
};

#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("malformed graph document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("word indices must form 0..{count} (missing {missing})")]
    NonContiguousWords { count: usize, missing: usize },
    #[error("duplicate word index {idx}")]
    DuplicateWord { idx: usize },
    #[error("invalid event id {raw:?}: {source}")]
    InvalidEventId { raw: String, source: IdError },
    #[error(transparent)]
    Graph(#[from] GraphError),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphJson {
    words: Vec<WordJson>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    clusters: Vec<ClusterJson>,
    #[serde(default)]
    links: Vec<LinkJson>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WordJson {
    idx: usize,
    text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tag: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ClusterJson {
    first: usize,
    last: usize,
    label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LinkJson {
    event_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    trigger: Option<AnchorJson>,
    #[serde(default)]
    arguments: Vec<ArgumentJson>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rel_type: Option<String>,
    #[serde(default = "default_top")]
    top: bool,
    #[serde(default = "default_category")]
    category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ArgumentJson {
    anchor: AnchorJson,
    #[serde(rename = "type")]
    arg_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum AnchorJson {
    Word(usize),
    Cluster(usize),
    Link(String),
}

fn default_top() -> bool {
    true
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_owned()
}

fn event_id(raw: &str) -> Result<EventId, FormatError> {
    EventId::new(raw).map_err(|source| FormatError::InvalidEventId { raw: raw.to_owned(), source })
}

fn anchor_ref(anchor: &AnchorJson) -> Result<AnchorRef, FormatError> {
    Ok(match anchor {
        AnchorJson::Word(idx) => AnchorRef::Word(*idx),
        AnchorJson::Cluster(idx) => AnchorRef::Cluster(*idx),
        AnchorJson::Link(raw) => AnchorRef::Event(event_id(raw)?),
    })
}

/// Parses a parser-produced graph document.
///
/// Words may be listed in any order but their `idx` values must cover `0..n` exactly once.
pub fn parse_graph_json(input: &str) -> Result<AnnotationGraph, FormatError> {
    let doc: GraphJson = serde_json::from_str(input)?;

    let count = doc.words.len();
    if doc.words.iter().any(|word| word.idx >= count) {
        let missing = (0..count)
            .find(|idx| doc.words.iter().all(|word| word.idx != *idx))
            .unwrap_or(count);
        return Err(FormatError::NonContiguousWords { count, missing });
    }

    let mut slots: Vec<Option<WordJson>> = vec![None; count];
    for word in doc.words {
        let idx = word.idx;
        if slots[idx].replace(word).is_some() {
            return Err(FormatError::DuplicateWord { idx });
        }
    }

    let mut builder = AnnotationGraph::builder();
    for word in slots.into_iter().flatten() {
        builder.tagged_word(word.text, word.tag);
    }
    for cluster in doc.clusters {
        builder.cluster(cluster.first, cluster.last, cluster.label);
    }
    for link in &doc.links {
        let mut spec = LinkSpec::new(event_id(&link.event_id)?)
            .side(Side::from_top(link.top))
            .category(SmolStr::new(&link.category));
        if let Some(trigger) = &link.trigger {
            spec = spec.trigger(anchor_ref(trigger)?);
        }
        for argument in &link.arguments {
            spec = spec.argument(anchor_ref(&argument.anchor)?, SmolStr::new(&argument.arg_type));
        }
        if let Some(rel_type) = &link.rel_type {
            spec = spec.rel_type(SmolStr::new(rel_type));
        }
        builder.link(spec);
    }

    Ok(builder.build()?)
}

fn anchor_json(graph: &AnnotationGraph, anchor: Anchor) -> AnchorJson {
    match anchor {
        Anchor::Word(word) => AnchorJson::Word(word.index()),
        Anchor::Cluster(cluster) => AnchorJson::Cluster(cluster.index()),
        Anchor::Link(link) => AnchorJson::Link(
            graph.link(link).map(|link| link.event_id().to_string()).unwrap_or_default(),
        ),
    }
}

/// Serializes a graph back into the document shape accepted by [`parse_graph_json`].
pub fn graph_to_json(graph: &AnnotationGraph) -> Result<String, FormatError> {
    let doc = GraphJson {
        words: graph
            .words()
            .iter()
            .map(|word| WordJson {
                idx: word.idx(),
                text: word.text().to_owned(),
                tag: word.tag().map(str::to_owned),
            })
            .collect(),
        clusters: graph
            .clusters()
            .iter()
            .map(|cluster| ClusterJson {
                first: cluster.first().index(),
                last: cluster.last().index(),
                label: cluster.label().to_owned(),
            })
            .collect(),
        links: graph
            .links()
            .iter()
            .map(|link| LinkJson {
                event_id: link.event_id().to_string(),
                trigger: link.trigger().map(|anchor| anchor_json(graph, anchor)),
                arguments: link
                    .arguments()
                    .iter()
                    .map(|argument| ArgumentJson {
                        anchor: anchor_json(graph, argument.anchor()),
                        arg_type: argument.arg_type().to_owned(),
                    })
                    .collect(),
                rel_type: link.rel_type().map(str::to_owned),
                top: link.is_top(),
                category: link.category().to_owned(),
            })
            .collect(),
    };

    Ok(serde_json::to_string_pretty(&doc)?)
}

#[cfg(test)]
mod tests {
    use super::{graph_to_json, parse_graph_json, FormatError};
    use crate::model::{Anchor, GraphError, Side, WordId};

    const DOC: &str = r#"{
        "words": [
            {"idx": 1, "text": "phosphorylates", "tag": "VBZ"},
            {"idx": 0, "text": "MEK"},
            {"idx": 2, "text": "ERK"},
            {"idx": 3, "text": "."}
        ],
        "links": [
            {
                "eventId": "E1",
                "trigger": {"word": 1},
                "arguments": [
                    {"anchor": {"word": 0}, "type": "controller"},
                    {"anchor": {"link": "T2"}, "type": "controlled"}
                ],
                "category": "event"
            },
            {
                "eventId": "T2",
                "arguments": [{"anchor": {"word": 2}, "type": "theme"}],
                "relType": "Protein",
                "top": false
            }
        ]
    }"#;

    #[test]
    fn parses_words_out_of_order_and_forward_link_refs() {
        let graph = parse_graph_json(DOC).expect("graph");

        let texts = graph.words().iter().map(|w| w.text()).collect::<Vec<_>>();
        assert_eq!(texts, vec!["MEK", "phosphorylates", "ERK", "."]);
        assert_eq!(graph.words()[1].tag(), Some("VBZ"));
        assert!(graph.words()[3].is_punct());

        let e1 = graph.link_by_event("E1").expect("E1");
        let t2 = graph.link_by_event("T2").expect("T2");
        assert_eq!(e1.trigger(), Some(Anchor::Word(WordId::new(1))));
        assert_eq!(e1.arguments()[1].anchor(), Anchor::Link(t2.id()));
        assert_eq!(e1.category(), "event");
        assert_eq!(e1.side(), Side::Top);
        assert_eq!(t2.side(), Side::Bottom);
        assert_eq!(t2.category(), "default");
        assert_eq!(t2.rel_type(), Some("Protein"));

        let endpoints = graph.endpoints(e1.id()).expect("endpoints");
        assert_eq!((endpoints.left().index(), endpoints.right().index()), (0, 2));
    }

    #[test]
    fn export_preserves_anchor_structure() {
        let graph = parse_graph_json(DOC).expect("graph");
        let json = graph_to_json(&graph).expect("export");
        let reparsed = parse_graph_json(&json).expect("reparse");
        assert_eq!(reparsed, graph);
    }

    #[test]
    fn rejects_gaps_in_word_indices() {
        let err = parse_graph_json(r#"{"words": [{"idx": 0, "text": "a"}, {"idx": 2, "text": "b"}]}"#)
            .expect_err("gap");
        assert!(matches!(err, FormatError::NonContiguousWords { count: 2, missing: 1 }));

        let err = parse_graph_json(r#"{"words": [{"idx": 0, "text": "a"}, {"idx": 0, "text": "b"}]}"#)
            .expect_err("duplicate");
        assert!(matches!(err, FormatError::DuplicateWord { idx: 0 }));
    }

    #[test]
    fn surfaces_graph_validation_errors() {
        let err = parse_graph_json(
            r#"{"words": [{"idx": 0, "text": "a"}],
                "links": [{"eventId": "E1", "arguments": [{"anchor": {"cluster": 3}, "type": "x"}]}]}"#,
        )
        .expect_err("unknown cluster");
        assert!(matches!(err, FormatError::Graph(GraphError::UnknownCluster { cluster: 3, .. })));

        let err = parse_graph_json(r#"{"words": [], "links": [{"eventId": "bad id"}]}"#)
            .expect_err("bad id");
        assert!(matches!(err, FormatError::InvalidEventId { .. }));
    }
}
