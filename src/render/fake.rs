//! In-memory renderer for tests: nodes answer exactly the selectors they were wired up with.

use std::collections::HashMap;

use super::PageRenderer;
use crate::error::RenderError;

#[derive(Default)]
struct FakeNode {
    attrs: HashMap<String, String>,
    text: String,
    children: HashMap<String, Vec<usize>>,
    broken: bool,
}

pub struct FakePage {
    nodes: Vec<FakeNode>,
}

impl FakePage {
    pub const ROOT: usize = 0;

    pub fn new() -> Self {
        Self {
            nodes: vec![FakeNode::default()],
        }
    }

    /// Add a node under `parent`, reachable from it via `selector`.
    pub fn add(&mut self, parent: usize, selector: &str, text: &str) -> usize {
        let id = self.nodes.len();
        self.nodes.push(FakeNode {
            text: text.to_string(),
            ..Default::default()
        });
        self.nodes[parent]
            .children
            .entry(selector.to_string())
            .or_default()
            .push(id);
        id
    }

    pub fn set_attr(&mut self, node: usize, name: &str, value: &str) {
        self.nodes[node].attrs.insert(name.to_string(), value.to_string());
    }

    /// Every later read of `node` fails with an access error.
    pub fn detach(&mut self, node: usize) {
        self.nodes[node].broken = true;
    }

    fn node(&self, id: usize) -> Result<&FakeNode, RenderError> {
        match self.nodes.get(id) {
            Some(n) if !n.broken => Ok(n),
            _ => Err(RenderError::Access(format!("node {} is detached", id))),
        }
    }
}

impl PageRenderer for FakePage {
    type Node<'a> = usize;

    fn root(&self) -> usize {
        Self::ROOT
    }

    fn query_all<'a>(&'a self, scope: usize, selector: &str) -> Result<Vec<usize>, RenderError> {
        Ok(self.node(scope)?.children.get(selector).cloned().unwrap_or_default())
    }

    fn read_attribute<'a>(&'a self, node: usize, name: &str) -> Result<Option<String>, RenderError> {
        Ok(self.node(node)?.attrs.get(name).cloned())
    }

    fn read_text_content<'a>(&'a self, node: usize) -> Result<String, RenderError> {
        Ok(self.node(node)?.text.clone())
    }
}
