use std::collections::HashSet;

use crate::dataset::NodeKind;

mod paths;

pub(super) use self::paths::shortest_path;
use super::model::GraphModel;

pub(super) const DIMMED_OPACITY: f32 = 0.2;

/// Opacity rule currently in force. Ids rather than indices, so a mode
/// survives reindexing and simply matches nothing once its nodes are gone.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(super) enum HighlightMode {
    #[default]
    None,
    Neighbors(String),
    Path(HashSet<String>),
}

impl HighlightMode {
    pub(super) fn path<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ids = ids.into_iter().map(Into::into).collect::<HashSet<_>>();
        if ids.is_empty() {
            Self::None
        } else {
            Self::Path(ids)
        }
    }
}

/// Show/hide filter by node kind. Independent of [`HighlightMode`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(super) struct TypeFilter(Option<NodeKind>);

impl TypeFilter {
    pub(super) fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => Self(None),
            Some(value) if value.eq_ignore_ascii_case("all") => Self(None),
            Some(value) => Self(Some(NodeKind::parse(value))),
        }
    }

    pub(super) fn kind(&self) -> Option<&NodeKind> {
        self.0.as_ref()
    }

    fn admits(&self, kind: &NodeKind) -> bool {
        self.0.as_ref().is_none_or(|wanted| wanted == kind)
    }
}

/// Per-element opacity and visibility, index-aligned with the model.
#[derive(Clone, Debug, Default, PartialEq)]
pub(super) struct ElementStyles {
    pub(super) node_opacity: Vec<f32>,
    pub(super) node_visible: Vec<bool>,
    pub(super) link_opacity: Vec<f32>,
    pub(super) link_visible: Vec<bool>,
}

fn opacity(active: bool) -> f32 {
    if active { 1.0 } else { DIMMED_OPACITY }
}

pub(super) fn compute_styles(
    mode: &HighlightMode,
    filter: &TypeFilter,
    model: &GraphModel,
) -> ElementStyles {
    let node_count = model.nodes.len();
    let link_count = model.links.len();
    let mut styles = ElementStyles {
        node_opacity: vec![1.0; node_count],
        node_visible: vec![true; node_count],
        link_opacity: vec![1.0; link_count],
        link_visible: vec![true; link_count],
    };

    match mode {
        HighlightMode::None => {}
        HighlightMode::Neighbors(id) => {
            if let Some(center) = model.index_of(id) {
                let mut connected = vec![false; node_count];
                connected[center] = true;
                for &neighbor in model.neighbors(center) {
                    connected[neighbor] = true;
                }
                for (index, value) in styles.node_opacity.iter_mut().enumerate() {
                    *value = opacity(connected[index]);
                }
                for (link, value) in model.links.iter().zip(styles.link_opacity.iter_mut()) {
                    *value = opacity(link.touches(center));
                }
            }
        }
        HighlightMode::Path(ids) if !ids.is_empty() => {
            let on_path = model
                .nodes
                .iter()
                .map(|node| ids.contains(&node.record.id))
                .collect::<Vec<_>>();
            for (index, value) in styles.node_opacity.iter_mut().enumerate() {
                *value = opacity(on_path[index]);
            }
            for (link, value) in model.links.iter().zip(styles.link_opacity.iter_mut()) {
                let both = link
                    .endpoints()
                    .is_some_and(|(source, target)| on_path[source] && on_path[target]);
                *value = opacity(both);
            }
        }
        HighlightMode::Path(_) => {}
    }

    for (node, visible) in model.nodes.iter().zip(styles.node_visible.iter_mut()) {
        *visible = filter.admits(&node.record.kind);
    }
    for (link, visible) in model.links.iter().zip(styles.link_visible.iter_mut()) {
        *visible = match link.endpoints() {
            Some((source, target)) => {
                filter.admits(&model.nodes[source].record.kind)
                    || filter.admits(&model.nodes[target].record.kind)
            }
            None => false,
        };
    }

    styles
}
