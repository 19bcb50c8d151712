//! Static description of the journey's steps and transitions.
//!
//! Not per-run data: renderers consume it once to draw the flow diagram.

use crate::Outcome;

/// Visual role of a node, used for colouring.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeRole {
    /// Entry and exit of the whole flow.
    Boundary,
    Resolution,
    /// The customer leaves without being helped.
    Abandonment,
    Decision,
    Step,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TopologyNode {
    pub name: &'static str,
    pub role: NodeRole,
    /// Layout hint `(x, y)`; larger `y` is earlier in the journey.
    pub pos:  (i32, i32),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TopologyEdge {
    pub from:  &'static str,
    pub to:    &'static str,
    pub label: Option<&'static str>,
}

/// Nodes and labelled edges of the journey graph.
#[derive(Clone, Debug, PartialEq)]
pub struct JourneyTopology {
    pub nodes: Vec<TopologyNode>,
    pub edges: Vec<TopologyEdge>,
}

const ARRIVAL: &str = "Customer Arrival";
const END: &str = "End";
const RESOLVED_AI: &str = "Resolved by AI";
const RESOLVED_L1: &str = "Resolved by Level 1";
const RESOLVED_L2: &str = "Resolved by Level 2";
const BALKS: &str = "Customer Balks";
const RENEGES: &str = "Customer Reneges";

fn node(name: &'static str, role: NodeRole, x: i32, y: i32) -> TopologyNode {
    TopologyNode { name, role, pos: (x, y) }
}

fn edge(from: &'static str, to: &'static str) -> TopologyEdge {
    TopologyEdge { from, to, label: None }
}

fn labelled(from: &'static str, to: &'static str, label: &'static str) -> TopologyEdge {
    TopologyEdge { from, to, label: Some(label) }
}

impl JourneyTopology {
    /// The support-desk journey: triage, AI, balking, L1, escalation, L2.
    pub fn support_desk() -> Self {
        use NodeRole::*;

        let nodes = vec![
            node(ARRIVAL,                    Boundary,     0, 10),
            node("Assign Request Type",      Step,         0, 9),
            node("Attempt AI Resolution",    Step,         0, 8),
            node(RESOLVED_AI,                Resolution,   2, 8),
            node("AI Fails to Resolve",      Step,        -2, 8),
            node("Check for Balking",        Decision,    -2, 7),
            node(BALKS,                      Abandonment, -4, 7),
            node("Customer Joins Queue",     Step,        -2, 6),
            node("Wait for Level 1 Support", Step,        -2, 5),
            node(RENEGES,                    Abandonment, -4, 5),
            node("Level 1 Support Starts",   Step,        -2, 4),
            node("Level 1 Resolution",       Resolution,  -2, 3),
            node(RESOLVED_L1,                Resolution,   0, 3),
            node("Escalated to Level 2",     Decision,    -4, 3),
            node("Level 2 Support Starts",   Step,        -4, 2),
            node("Level 2 Resolution",       Resolution,  -4, 1),
            node(RESOLVED_L2,                Resolution,  -2, 1),
            node(END,                        Boundary,     0, 0),
        ];

        let edges = vec![
            edge(ARRIVAL, "Assign Request Type"),
            edge("Assign Request Type", "Attempt AI Resolution"),
            edge("Attempt AI Resolution", RESOLVED_AI),
            edge("Attempt AI Resolution", "AI Fails to Resolve"),
            edge("AI Fails to Resolve", "Check for Balking"),
            labelled("Check for Balking", BALKS, "Balks"),
            labelled("Check for Balking", "Customer Joins Queue", "Joins Queue"),
            edge("Customer Joins Queue", "Wait for Level 1 Support"),
            labelled("Wait for Level 1 Support", RENEGES, "Reneges"),
            labelled("Wait for Level 1 Support", "Level 1 Support Starts", "Support Available"),
            edge("Level 1 Support Starts", "Level 1 Resolution"),
            labelled("Level 1 Resolution", RESOLVED_L1, "Resolved"),
            labelled("Level 1 Resolution", "Escalated to Level 2", "Escalate"),
            edge("Escalated to Level 2", "Level 2 Support Starts"),
            edge("Level 2 Support Starts", "Level 2 Resolution"),
            edge("Level 2 Resolution", RESOLVED_L2),
            edge(RESOLVED_L2, END),
            edge(RESOLVED_L1, END),
            edge(RESOLVED_AI, END),
            edge(BALKS, END),
            edge(RENEGES, END),
        ];

        Self { nodes, edges }
    }

    pub fn node(&self, name: &str) -> Option<&TopologyNode> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Edges leaving `name`, in declaration order.
    pub fn successors<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a TopologyEdge> + 'a {
        self.edges.iter().filter(move |e| e.from == name)
    }

    /// The node a customer with `outcome` leaves the flow through.
    ///
    /// Both renege outcomes share one node.
    pub fn outcome_node(outcome: Outcome) -> &'static str {
        match outcome {
            Outcome::AiResolved                       => RESOLVED_AI,
            Outcome::L1Resolved                       => RESOLVED_L1,
            Outcome::L2Resolved                       => RESOLVED_L2,
            Outcome::Balked                           => BALKS,
            Outcome::RenegedL1 | Outcome::RenegedL2   => RENEGES,
        }
    }
}
