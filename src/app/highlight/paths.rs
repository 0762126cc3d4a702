use std::collections::VecDeque;

use super::super::model::GraphModel;

/// Shortest undirected path between two nodes, as node ids from `from` to
/// `to` inclusive.
pub(in crate::app) fn shortest_path(model: &GraphModel, from: &str, to: &str) -> Option<Vec<String>> {
    let start = model.index_of(from)?;
    let goal = model.index_of(to)?;

    if start == goal {
        return Some(vec![model.nodes[start].record.id.clone()]);
    }

    let node_count = model.nodes.len();
    let mut queue = VecDeque::from([start]);
    let mut visited = vec![false; node_count];
    let mut parent = vec![usize::MAX; node_count];
    visited[start] = true;

    while let Some(node) = queue.pop_front() {
        if node == goal {
            break;
        }

        for &next in model.neighbors(node) {
            if !visited[next] {
                visited[next] = true;
                parent[next] = node;
                queue.push_back(next);
            }
        }
    }

    if !visited[goal] {
        return None;
    }

    let mut path = vec![goal];
    let mut cursor = goal;
    while cursor != start {
        cursor = parent[cursor];
        if cursor == usize::MAX {
            return None;
        }
        path.push(cursor);
    }

    path.reverse();
    Some(
        path.into_iter()
            .map(|index| model.nodes[index].record.id.clone())
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Dataset, LinkRecord, NodeKind, NodeRecord};

    fn model() -> GraphModel {
        let mut model = GraphModel::default();
        model.load(&Dataset {
            nodes: ["a", "b", "c", "d", "e", "island"]
                .into_iter()
                .map(|id| NodeRecord::new(id, NodeKind::Concept, id))
                .collect(),
            links: vec![
                LinkRecord::new("a", "b", "is_a"),
                LinkRecord::new("c", "b", "is_a"),
                LinkRecord::new("c", "d", "is_a"),
                LinkRecord::new("a", "e", "is_a"),
                LinkRecord::new("e", "d", "is_a"),
                LinkRecord::new("d", "d", "is_a"),
            ],
        });
        model
    }

    #[test]
    fn follows_links_in_either_direction() {
        let path = shortest_path(&model(), "a", "c").expect("path");
        assert_eq!(path, vec!["a", "b", "c"]);
    }

    #[test]
    fn picks_a_shortest_route() {
        let path = shortest_path(&model(), "a", "d").expect("path");
        assert_eq!(path.len(), 3);
        assert_eq!(path.first().map(String::as_str), Some("a"));
        assert_eq!(path.last().map(String::as_str), Some("d"));
    }

    #[test]
    fn trivial_and_missing_paths() {
        let model = model();
        assert_eq!(shortest_path(&model, "b", "b"), Some(vec!["b".to_owned()]));
        assert_eq!(shortest_path(&model, "a", "island"), None);
        assert_eq!(shortest_path(&model, "a", "ghost"), None);
    }
}
