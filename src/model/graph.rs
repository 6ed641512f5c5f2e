// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Textarc-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Textarc and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use smallvec::SmallVec;
use smol_str::SmolStr;

use super::ids::{ClusterId, EventId, IdError, LinkId, WordId};
use super::link::{Anchor, Argument, Link, Side};
use super::word::{Word, WordCluster};

pub const DEFAULT_CATEGORY: &str = "default";

/// Leftmost and rightmost word transitively reachable from a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Endpoints {
    left: WordId,
    right: WordId,
}

impl Endpoints {
    pub fn new(a: WordId, b: WordId) -> Self {
        if a <= b {
            Self { left: a, right: b }
        } else {
            Self { left: b, right: a }
        }
    }

    pub fn left(&self) -> WordId {
        self.left
    }

    pub fn right(&self) -> WordId {
        self.right
    }

    /// Number of word steps covered (`0` when both endpoints are the same word).
    pub fn span(&self) -> usize {
        self.right.index() - self.left.index()
    }

    pub fn contains(&self, word: WordId) -> bool {
        self.left <= word && word <= self.right
    }

    fn widen(self, other: Self) -> Self {
        Self { left: self.left.min(other.left), right: self.right.max(other.right) }
    }
}

/// The immutable `{words, links}` graph handed over by a parser.
///
/// Links reference words, clusters and other links through ids; every reverse lookup
/// (`links_on_word`, `links_ending_on`, `parents`) is a derived index computed once at build
/// time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnnotationGraph {
    words: Vec<Word>,
    clusters: Vec<WordCluster>,
    links: Vec<Link>,
    events: BTreeMap<EventId, LinkId>,
    word_links: Vec<SmallVec<[LinkId; 4]>>,
    endpoint_links: Vec<SmallVec<[LinkId; 4]>>,
    link_parents: Vec<SmallVec<[LinkId; 2]>>,
    endpoints: Vec<Option<Endpoints>>,
}

impl AnnotationGraph {
    pub fn builder() -> AnnotationGraphBuilder {
        AnnotationGraphBuilder::default()
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn word(&self, id: WordId) -> Option<&Word> {
        self.words.get(id.index())
    }

    pub fn clusters(&self) -> &[WordCluster] {
        &self.clusters
    }

    pub fn cluster(&self, id: ClusterId) -> Option<&WordCluster> {
        self.clusters.get(id.index())
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn link(&self, id: LinkId) -> Option<&Link> {
        self.links.get(id.index())
    }

    pub fn link_by_event(&self, event_id: &str) -> Option<&Link> {
        self.events.get(event_id).and_then(|id| self.link(*id))
    }

    pub fn link_ids(&self) -> impl Iterator<Item = LinkId> {
        (0..self.links.len()).map(LinkId::new)
    }

    /// Links anchored on `word`, directly or through a cluster that covers it.
    pub fn links_on_word(&self, word: WordId) -> &[LinkId] {
        self.word_links.get(word.index()).map_or(&[], |links| links.as_slice())
    }

    /// Links whose transitive endpoints include `word`, including links that only reach it
    /// through nested links.
    pub fn links_ending_on(&self, word: WordId) -> &[LinkId] {
        self.endpoint_links.get(word.index()).map_or(&[], |links| links.as_slice())
    }

    /// Links that use `link` as their trigger or as one of their arguments.
    pub fn parents(&self, link: LinkId) -> &[LinkId] {
        self.link_parents.get(link.index()).map_or(&[], |links| links.as_slice())
    }

    pub fn endpoints(&self, link: LinkId) -> Option<Endpoints> {
        self.endpoints.get(link.index()).copied().flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("invalid event id: {0}")]
    InvalidEventId(#[from] IdError),
    #[error("duplicate event id {event_id}")]
    DuplicateEvent { event_id: EventId },
    #[error("link {event_id} has neither a trigger nor arguments")]
    EmptyLink { event_id: EventId },
    #[error("link {event_id} references unknown word {word}")]
    UnknownWord { event_id: EventId, word: usize },
    #[error("link {event_id} references unknown cluster {cluster}")]
    UnknownCluster { event_id: EventId, cluster: usize },
    #[error("link {event_id} references unknown event {referenced}")]
    UnknownEvent { event_id: EventId, referenced: EventId },
    #[error("cluster [{first}, {last}] is not a valid word span")]
    InvalidCluster { first: usize, last: usize },
    #[error("{len} links exceed the u32 arena index range")]
    TooManyLinks { len: usize },
}

/// Anchor as written by a parser, before event ids are resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnchorRef {
    Word(usize),
    Cluster(usize),
    Event(EventId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSpec {
    pub event_id: EventId,
    pub trigger: Option<AnchorRef>,
    pub arguments: Vec<(AnchorRef, SmolStr)>,
    pub rel_type: Option<SmolStr>,
    pub side: Side,
    pub category: SmolStr,
}

impl LinkSpec {
    pub fn new(event_id: EventId) -> Self {
        Self {
            event_id,
            trigger: None,
            arguments: Vec::new(),
            rel_type: None,
            side: Side::Top,
            category: SmolStr::new_static(DEFAULT_CATEGORY),
        }
    }

    pub fn trigger(mut self, anchor: AnchorRef) -> Self {
        self.trigger = Some(anchor);
        self
    }

    pub fn argument(mut self, anchor: AnchorRef, arg_type: impl Into<SmolStr>) -> Self {
        self.arguments.push((anchor, arg_type.into()));
        self
    }

    pub fn rel_type(mut self, rel_type: impl Into<SmolStr>) -> Self {
        self.rel_type = Some(rel_type.into());
        self
    }

    pub fn side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    pub fn category(mut self, category: impl Into<SmolStr>) -> Self {
        self.category = category.into();
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct AnnotationGraphBuilder {
    words: Vec<Word>,
    clusters: Vec<(usize, usize, SmolStr)>,
    links: Vec<LinkSpec>,
}

impl AnnotationGraphBuilder {
    /// Appends the next word in sequence order and returns its id.
    ///
    /// # Panics
    ///
    /// Panics past `u32::MAX` words, like every arena id.
    pub fn word(&mut self, text: impl Into<SmolStr>) -> WordId {
        self.tagged_word(text, None::<SmolStr>)
    }

    pub fn tagged_word(
        &mut self,
        text: impl Into<SmolStr>,
        tag: Option<impl Into<SmolStr>>,
    ) -> WordId {
        let id = WordId::new(self.words.len());
        self.words.push(Word::new(id, text).with_tag(tag.map(Into::into)));
        id
    }

    pub fn cluster(&mut self, first: usize, last: usize, label: impl Into<SmolStr>) -> ClusterId {
        let id = ClusterId::new(self.clusters.len());
        self.clusters.push((first, last, label.into()));
        id
    }

    pub fn link(&mut self, spec: LinkSpec) -> &mut Self {
        self.links.push(spec);
        self
    }

    pub fn build(self) -> Result<AnnotationGraph, GraphError> {
        let word_count = self.words.len();
        if LinkId::try_new(self.links.len()).is_none() {
            return Err(GraphError::TooManyLinks { len: self.links.len() });
        }

        let mut clusters = Vec::with_capacity(self.clusters.len());
        for (idx, (first, last, label)) in self.clusters.into_iter().enumerate() {
            if first > last || last >= word_count {
                return Err(GraphError::InvalidCluster { first, last });
            }
            clusters.push(WordCluster::new(
                ClusterId::new(idx),
                WordId::new(first),
                WordId::new(last),
                label,
            ));
        }

        let mut events = BTreeMap::<EventId, LinkId>::new();
        for (idx, spec) in self.links.iter().enumerate() {
            if events.insert(spec.event_id.clone(), LinkId::new(idx)).is_some() {
                return Err(GraphError::DuplicateEvent { event_id: spec.event_id.clone() });
            }
        }

        let resolve = |event_id: &EventId, anchor: &AnchorRef| -> Result<Anchor, GraphError> {
            match anchor {
                AnchorRef::Word(word) if *word < word_count => Ok(Anchor::Word(WordId::new(*word))),
                AnchorRef::Word(word) => {
                    Err(GraphError::UnknownWord { event_id: event_id.clone(), word: *word })
                }
                AnchorRef::Cluster(cluster) if *cluster < clusters.len() => {
                    Ok(Anchor::Cluster(ClusterId::new(*cluster)))
                }
                AnchorRef::Cluster(cluster) => Err(GraphError::UnknownCluster {
                    event_id: event_id.clone(),
                    cluster: *cluster,
                }),
                AnchorRef::Event(referenced) => events
                    .get(referenced)
                    .map(|id| Anchor::Link(*id))
                    .ok_or_else(|| GraphError::UnknownEvent {
                        event_id: event_id.clone(),
                        referenced: referenced.clone(),
                    }),
            }
        };

        let mut links = Vec::with_capacity(self.links.len());
        for (idx, spec) in self.links.iter().enumerate() {
            if spec.trigger.is_none() && spec.arguments.is_empty() {
                return Err(GraphError::EmptyLink { event_id: spec.event_id.clone() });
            }
            let trigger =
                spec.trigger.as_ref().map(|anchor| resolve(&spec.event_id, anchor)).transpose()?;
            let arguments = spec
                .arguments
                .iter()
                .map(|(anchor, arg_type)| {
                    Ok(Argument::new(resolve(&spec.event_id, anchor)?, arg_type.clone()))
                })
                .collect::<Result<SmallVec<[Argument; 2]>, GraphError>>()?;
            links.push(Link::new(
                LinkId::new(idx),
                spec.event_id.clone(),
                trigger,
                arguments,
                spec.rel_type.clone(),
                spec.side,
                spec.category.clone(),
            ));
        }

        let mut word_links = vec![SmallVec::<[LinkId; 4]>::new(); word_count];
        let mut link_parents = vec![SmallVec::<[LinkId; 2]>::new(); links.len()];
        for link in &links {
            for anchor in link.anchors() {
                match anchor {
                    Anchor::Word(word) => push_unique(&mut word_links[word.index()], link.id()),
                    Anchor::Cluster(cluster) => {
                        for word in clusters[cluster.index()].words() {
                            push_unique(&mut word_links[word.index()], link.id());
                        }
                    }
                    Anchor::Link(child) => push_unique(&mut link_parents[child.index()], link.id()),
                }
            }
        }

        let endpoints = links
            .iter()
            .map(|link| resolve_endpoints(&links, &clusters, link.id()))
            .collect::<Vec<_>>();

        let mut endpoint_links = vec![SmallVec::<[LinkId; 4]>::new(); word_count];
        for (link, span) in links.iter().zip(&endpoints) {
            if let Some(span) = span {
                push_unique(&mut endpoint_links[span.left().index()], link.id());
                push_unique(&mut endpoint_links[span.right().index()], link.id());
            }
        }

        tracing::debug!(
            words = word_count,
            clusters = clusters.len(),
            links = links.len(),
            "annotation graph built"
        );

        Ok(AnnotationGraph {
            words: self.words,
            clusters,
            links,
            events,
            word_links,
            endpoint_links,
            link_parents,
            endpoints,
        })
    }
}

fn push_unique<A: smallvec::Array<Item = LinkId>>(list: &mut SmallVec<A>, link: LinkId) {
    if !list.contains(&link) {
        list.push(link);
    }
}

/// Walks trigger/arguments transitively. Each link is visited once, so anchor cycles terminate;
/// a link whose anchors only reach other links (never a word) has no endpoints.
fn resolve_endpoints(
    links: &[Link],
    clusters: &[WordCluster],
    root: LinkId,
) -> Option<Endpoints> {
    let mut visited = vec![false; links.len()];
    let mut stack = vec![root];
    let mut acc: Option<Endpoints> = None;

    while let Some(link) = stack.pop() {
        if std::mem::replace(&mut visited[link.index()], true) {
            continue;
        }
        for anchor in links[link.index()].anchors() {
            let span = match anchor {
                Anchor::Word(word) => Endpoints::new(word, word),
                Anchor::Cluster(cluster) => {
                    let cluster = &clusters[cluster.index()];
                    Endpoints::new(cluster.first(), cluster.last())
                }
                Anchor::Link(child) => {
                    stack.push(child);
                    continue;
                }
            };
            acc = Some(acc.map_or(span, |acc| acc.widen(span)));
        }
    }

    acc
}
