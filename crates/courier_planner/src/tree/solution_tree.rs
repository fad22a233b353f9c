use std::sync::Arc;

use crate::{
    error::PlannerError,
    problem::dispatch_problem::DispatchProblem,
    tree::solution_node::{NodeId, SolutionNode},
};

/// Every node ever created for a problem. Nodes are appended, never removed,
/// and a node's id is its position.
#[derive(Debug)]
pub struct SolutionTree {
    problem: Arc<DispatchProblem>,
    nodes: Vec<SolutionNode>,
}

impl SolutionTree {
    pub fn new(problem: Arc<DispatchProblem>) -> Self {
        SolutionTree {
            problem,
            nodes: Vec::new(),
        }
    }

    pub fn problem(&self) -> &Arc<DispatchProblem> {
        &self.problem
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[SolutionNode] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Result<&SolutionNode, PlannerError> {
        self.nodes.get(id.get()).ok_or(PlannerError::NodeNotFound(id))
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut SolutionNode, PlannerError> {
        self.nodes
            .get_mut(id.get())
            .ok_or(PlannerError::NodeNotFound(id))
    }

    pub(crate) fn create_root(&mut self) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes
            .push(SolutionNode::root(id, Arc::clone(&self.problem)));
        id
    }

    pub(crate) fn fork(&mut self, parent: NodeId) -> Result<NodeId, PlannerError> {
        let id = NodeId::new(self.nodes.len());
        let child = SolutionNode::fork_from(id, self.node(parent)?);

        self.node_mut(parent)?.add_child(id);
        self.nodes.push(child);
        Ok(id)
    }

    /// Path from the root down to `id`, both included.
    pub fn lineage(&self, id: NodeId) -> Result<Vec<NodeId>, PlannerError> {
        let mut lineage = vec![id];
        let mut current = self.node(id)?;
        while let Some(parent) = current.parent() {
            lineage.push(parent);
            current = self.node(parent)?;
        }
        lineage.reverse();
        Ok(lineage)
    }
}
