use std::collections::HashMap;

use crate::api::{Comment, CommentId};

/// A comment together with its replies, in chronological order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CommentNode {
    pub comment: Comment,
    pub children: Vec<CommentNode>,
}

impl CommentNode {
    fn leaf(comment: Comment) -> CommentNode {
        CommentNode {
            comment,
            children: Vec::new(),
        }
    }
}

/// The threaded form of one post's comments, built from the flat
/// parent-referencing list the store returns.
///
/// A comment whose parent cannot be resolved (deleted parent, or a parent id
/// equal to its own id) is kept as a top-level comment rather than dropped.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CommentTree {
    pub roots: Vec<CommentNode>,
}

impl CommentTree {
    /// Builds the forest in two passes, O(n) after the sort.
    ///
    /// The store contract orders by `created_at` ascending; the input is
    /// sorted again in case a collaborator cannot guarantee that. The sort
    /// is stable, so equal timestamps keep their input order.
    pub fn build(flat: &[Comment]) -> CommentTree {
        let mut sorted = flat.to_vec();
        sorted.sort_by_key(|c| c.created_at);

        // Pass one: one node per comment, whatever order pass two visits
        // them in. Duplicate ids are not expected upstream; last write wins.
        let mut nodes: HashMap<CommentId, CommentNode> = sorted
            .iter()
            .map(|c| (c.id, CommentNode::leaf(c.clone())))
            .collect();

        // Pass two, newest first: move each node into its parent while the
        // parent is still in the map. Replies are strictly newer than what
        // they reply to, so a node's subtree is complete by the time the
        // node itself is moved.
        let mut roots = Vec::new();
        for c in sorted.iter().rev() {
            let Some(mut node) = nodes.remove(&c.id) else {
                // second occurrence of a duplicated id
                continue;
            };
            node.children.reverse();
            let parent = c
                .parent_id
                .filter(|p| *p != c.id)
                .and_then(|p| nodes.get_mut(&p));
            match parent {
                Some(parent) => parent.children.push(node),
                None => {
                    if c.parent_id.is_some() {
                        tracing::warn!(
                            comment = ?c.id,
                            parent = ?c.parent_id,
                            "comment parent not found, keeping it as a top-level comment"
                        );
                    }
                    roots.push(node);
                }
            }
        }
        roots.reverse();
        CommentTree { roots }
    }

    /// Defensive entry point for payloads straight off the wire: anything
    /// that is not an array of comments renders as no comments at all.
    pub fn from_json(data: &serde_json::Value) -> CommentTree {
        if !data.is_array() {
            tracing::warn!("comment payload is not an array, rendering no comments");
            return CommentTree::default();
        }
        match serde_json::from_value::<Vec<Comment>>(data.clone()) {
            Ok(flat) => CommentTree::build(&flat),
            Err(err) => {
                tracing::warn!(%err, "comment payload does not decode, rendering no comments");
                CommentTree::default()
            }
        }
    }

    /// Adds one freshly created comment without rebuilding the forest.
    ///
    /// The new comment is newer than everything already in the tree, so
    /// appending keeps every sibling list chronological. Parent resolution
    /// follows the same fallback as [`CommentTree::build`].
    pub fn insert(&mut self, comment: Comment) {
        let parent = comment
            .parent_id
            .filter(|p| *p != comment.id)
            .and_then(|p| Self::find_in(&mut self.roots, p));
        match parent {
            Some(parent) => parent.children.push(CommentNode::leaf(comment)),
            None => self.roots.push(CommentNode::leaf(comment)),
        }
    }

    pub fn find(&self, id: CommentId) -> Option<&CommentNode> {
        self.iter().map(|(_, n)| n).find(|n| n.comment.id == id)
    }

    fn find_in(nodes: &mut [CommentNode], id: CommentId) -> Option<&mut CommentNode> {
        for n in nodes.iter_mut() {
            if n.comment.id == id {
                return Some(n);
            }
            if let Some(res) = Self::find_in(&mut n.children, id) {
                return Some(res);
            }
        }
        None
    }

    /// Total number of comments across the whole forest.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Depth-first traversal in render order, yielding `(depth, node)`.
    ///
    /// Uses an explicit stack so that pathological reply chains cannot
    /// overflow the call stack.
    pub fn iter(&self) -> DepthFirst<'_> {
        DepthFirst {
            stack: self.roots.iter().rev().map(|n| (0, n)).collect(),
        }
    }
}

pub struct DepthFirst<'a> {
    stack: Vec<(usize, &'a CommentNode)>,
}

impl<'a> Iterator for DepthFirst<'a> {
    type Item = (usize, &'a CommentNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        for child in node.children.iter().rev() {
            self.stack.push((depth + 1, child));
        }
        Some((depth, node))
    }
}
